//! Generic set-difference reconciliation shared by every relation.

use std::collections::BTreeSet;

/// Additions and removals turning `current` into `desired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDelta<K> {
    /// Keys present in the desired set but not currently stored.
    pub additions: Vec<K>,
    /// Stored keys absent from the desired set.
    pub removals: Vec<K>,
}

impl<K> SetDelta<K> {
    /// Returns true when applying the delta would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Plans the symmetric difference between a desired key set and the
/// currently stored associations.
///
/// Running the plan twice with an unchanged desired set yields an empty
/// delta the second time, which is what makes reconciliation idempotent.
#[must_use]
pub fn plan_set<K: Ord + Clone>(desired: &BTreeSet<K>, current: &BTreeSet<K>) -> SetDelta<K> {
    SetDelta {
        additions: desired.difference(current).cloned().collect(),
        removals: current.difference(desired).cloned().collect(),
    }
}
