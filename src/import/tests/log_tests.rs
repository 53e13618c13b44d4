//! Unit tests for diagnostic log entries and counters.

use crate::catalog::domain::RoleId;
use crate::import::adapters::memory::InMemoryImportTasks;
use crate::import::domain::{
    DiagnosticCounts, DiagnosticMessage, ImportTask, ImportTaskId, MAX_DIAGNOSTIC_CHARS,
    Severity, UserId,
};
use crate::import::ports::{
    ImportTaskRepository, ImportTaskRepositoryError, ImportTaskRepositoryResult,
};
use crate::import::services::DiagnosticRecorder;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;
use std::sync::Arc;

#[test]
fn message_text_is_clipped_to_the_maximum() {
    let long = "x".repeat(MAX_DIAGNOSTIC_CHARS + 40);
    let message = DiagnosticMessage::new(1, Severity::Error, &long, Utc::now());
    assert_eq!(message.text().chars().count(), MAX_DIAGNOSTIC_CHARS);
}

#[test]
fn message_text_shorter_than_maximum_is_untouched() {
    let message = DiagnosticMessage::new(1, Severity::Info, "short", Utc::now());
    assert_eq!(message.text(), "short");
}

#[rstest]
#[case(Severity::Info, "INFO")]
#[case(Severity::Warning, "WARNING")]
#[case(Severity::Error, "ERROR")]
#[case(Severity::Success, "SUCCESS")]
#[case(Severity::Failed, "FAILED")]
fn severity_round_trips_through_storage_form(#[case] severity: Severity, #[case] repr: &str) {
    assert_eq!(severity.as_str(), repr);
    assert_eq!(
        Severity::try_from(repr).expect("parse succeeds"),
        severity
    );
}

#[test]
fn counts_track_only_errors_and_warnings() {
    let mut counts = DiagnosticCounts::default();
    counts.record(Severity::Info);
    counts.record(Severity::Warning);
    counts.record(Severity::Error);
    counts.record(Severity::Error);
    counts.record(Severity::Success);
    assert_eq!(counts.errors, 2);
    assert_eq!(counts.warnings, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn recorder_appends_in_order_and_counts() {
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryImportTasks::new());
    let task = ImportTask::new(UserId::new(), RoleId::new(), &*clock);
    tasks.store(&task).await.expect("store succeeds");

    let recorder = DiagnosticRecorder::new(tasks.clone(), task.id(), clock);
    recorder.info("first").await;
    recorder.warning("second").await;
    recorder.error("third").await;

    let stored = tasks.messages(task.id()).await.expect("messages load");
    let texts: Vec<&str> = stored.iter().map(DiagnosticMessage::text).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
    let sequences: Vec<u64> = stored.iter().map(DiagnosticMessage::sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    let counts = recorder.counts();
    assert_eq!(counts.errors, 1);
    assert_eq!(counts.warnings, 1);
}

mock! {
    Tasks {}

    #[async_trait]
    impl ImportTaskRepository for Tasks {
        async fn store(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()>;
        async fn update(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()>;
        async fn find_by_id(
            &self,
            id: ImportTaskId,
        ) -> ImportTaskRepositoryResult<Option<ImportTask>>;
        async fn append_message(
            &self,
            task_id: ImportTaskId,
            severity: Severity,
            text: &str,
            recorded_at: DateTime<Utc>,
        ) -> ImportTaskRepositoryResult<DiagnosticMessage>;
        async fn messages(
            &self,
            task_id: ImportTaskId,
        ) -> ImportTaskRepositoryResult<Vec<DiagnosticMessage>>;
        async fn stuck_pending(
            &self,
            cutoff: DateTime<Utc>,
        ) -> ImportTaskRepositoryResult<Vec<ImportTask>>;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn recorder_swallows_append_failures_but_still_counts() {
    let mut tasks = MockTasks::new();
    tasks.expect_append_message().times(2).returning(|_, _, _, _| {
        Err(ImportTaskRepositoryError::persistence(
            std::io::Error::other("sink unavailable"),
        ))
    });

    let recorder = DiagnosticRecorder::new(
        Arc::new(tasks),
        ImportTaskId::new(),
        Arc::new(DefaultClock),
    );
    recorder.error("first").await;
    recorder.warning("second").await;

    let counts = recorder.counts();
    assert_eq!(counts.errors, 1);
    assert_eq!(counts.warnings, 1);
}
