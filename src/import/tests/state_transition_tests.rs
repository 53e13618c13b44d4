//! Unit tests for the import task state machine.

use crate::catalog::domain::RoleId;
use crate::import::domain::{ImportDomainError, ImportTask, ImportTaskState, UserId};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn pending_task(clock: DefaultClock) -> ImportTask {
    ImportTask::new(UserId::new(), RoleId::new(), &clock)
}

#[rstest]
#[case(ImportTaskState::Pending, ImportTaskState::Pending, false)]
#[case(ImportTaskState::Pending, ImportTaskState::Running, true)]
#[case(ImportTaskState::Pending, ImportTaskState::Success, false)]
#[case(ImportTaskState::Pending, ImportTaskState::Failed, true)]
#[case(ImportTaskState::Running, ImportTaskState::Pending, false)]
#[case(ImportTaskState::Running, ImportTaskState::Running, false)]
#[case(ImportTaskState::Running, ImportTaskState::Success, true)]
#[case(ImportTaskState::Running, ImportTaskState::Failed, true)]
#[case(ImportTaskState::Success, ImportTaskState::Pending, false)]
#[case(ImportTaskState::Success, ImportTaskState::Running, false)]
#[case(ImportTaskState::Success, ImportTaskState::Success, false)]
#[case(ImportTaskState::Success, ImportTaskState::Failed, false)]
#[case(ImportTaskState::Failed, ImportTaskState::Pending, false)]
#[case(ImportTaskState::Failed, ImportTaskState::Running, false)]
#[case(ImportTaskState::Failed, ImportTaskState::Success, false)]
#[case(ImportTaskState::Failed, ImportTaskState::Failed, false)]
fn can_transition_to_returns_expected(
    #[case] from: ImportTaskState,
    #[case] to: ImportTaskState,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(ImportTaskState::Pending, false)]
#[case(ImportTaskState::Running, false)]
#[case(ImportTaskState::Success, true)]
#[case(ImportTaskState::Failed, true)]
fn is_terminal_returns_expected(#[case] state: ImportTaskState, #[case] expected: bool) {
    assert_eq!(state.is_terminal(), expected);
}

#[rstest]
fn start_sets_running_and_start_timestamp(clock: DefaultClock, mut pending_task: ImportTask) {
    assert!(pending_task.started_at().is_none());
    pending_task.start(&clock).expect("start succeeds");
    assert_eq!(pending_task.state(), ImportTaskState::Running);
    assert!(pending_task.started_at().is_some());
    assert!(pending_task.finished_at().is_none());
}

#[rstest]
fn succeed_requires_running(clock: DefaultClock, mut pending_task: ImportTask) {
    let result = pending_task.succeed(&clock);
    assert!(matches!(
        result,
        Err(ImportDomainError::InvalidStateTransition {
            from: ImportTaskState::Pending,
            to: ImportTaskState::Success,
            ..
        })
    ));
}

#[rstest]
fn fail_is_permitted_straight_from_pending(clock: DefaultClock, mut pending_task: ImportTask) {
    pending_task.fail(&clock).expect("sweep-style failure succeeds");
    assert_eq!(pending_task.state(), ImportTaskState::Failed);
    assert!(pending_task.finished_at().is_some());
}

#[rstest]
fn terminal_states_reject_every_transition(clock: DefaultClock, mut pending_task: ImportTask) {
    pending_task.start(&clock).expect("start succeeds");
    pending_task.succeed(&clock).expect("succeed succeeds");

    let mut as_failed = pending_task.clone();
    assert!(as_failed.fail(&clock).is_err());
    assert!(pending_task.clone().start(&clock).is_err());
    assert!(pending_task.clone().succeed(&clock).is_err());
}

#[rstest]
fn state_round_trips_through_storage_form(
    clock: DefaultClock,
    mut pending_task: ImportTask,
) -> eyre::Result<()> {
    pending_task.start(&clock)?;
    let repr = pending_task.state().as_str();
    ensure!(repr == "RUNNING", "unexpected storage form {repr}");
    assert_eq!(ImportTaskState::try_from(repr)?, ImportTaskState::Running);
    Ok(())
}
