//! Unit tests for the generic set reconciliation planner.

use crate::import::services::plan_set;
use std::collections::BTreeSet;

fn set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|key| (*key).to_owned()).collect()
}

#[test]
fn plan_adds_missing_and_removes_stale_keys() {
    let desired = set(&["a", "b", "c"]);
    let current = set(&["b", "d"]);
    let delta = plan_set(&desired, &current);
    assert_eq!(delta.additions, vec!["a".to_owned(), "c".to_owned()]);
    assert_eq!(delta.removals, vec!["d".to_owned()]);
}

#[test]
fn plan_against_matching_sets_is_a_noop() {
    let desired = set(&["a", "b"]);
    let delta = plan_set(&desired, &desired.clone());
    assert!(delta.is_noop());
}

#[test]
fn applying_a_plan_makes_the_second_plan_empty() {
    let desired = set(&["x", "y"]);
    let mut current = set(&["y", "z"]);

    let delta = plan_set(&desired, &current);
    for key in &delta.additions {
        current.insert(key.clone());
    }
    for key in &delta.removals {
        current.remove(key);
    }

    assert_eq!(current, desired);
    assert!(plan_set(&desired, &current).is_noop());
}

#[test]
fn plan_into_empty_current_adds_everything() {
    let desired = set(&["a"]);
    let delta = plan_set(&desired, &BTreeSet::new());
    assert_eq!(delta.additions, vec!["a".to_owned()]);
    assert!(delta.removals.is_empty());
}

#[test]
fn plan_from_empty_desired_removes_everything() {
    let current = set(&["a", "b"]);
    let delta = plan_set(&BTreeSet::new(), &current);
    assert!(delta.additions.is_empty());
    assert_eq!(delta.removals, vec!["a".to_owned(), "b".to_owned()]);
}
