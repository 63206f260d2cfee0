// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pure classification of desired against observed records.

use crate::record::RecordSet;

/// The four action sets of one run.
///
/// `to_create`, `to_update` and `to_delete` are pairwise disjoint. `drift`
/// is report-only and never turns into a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Desired records absent from the store
    pub to_create: RecordSet,
    /// Desired records present but unowned; adopted under the marker
    pub to_update: RecordSet,
    /// Owned records no longer desired
    pub to_delete: RecordSet,
    /// Unowned records the inventory does not explain
    pub drift: RecordSet,
}

impl ChangeSet {
    /// Whether applying this change set would mutate anything.
    #[must_use]
    pub fn has_mutations(&self) -> bool {
        !(self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty())
    }

    /// Whether all four sets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_mutations() && self.drift.is_empty()
    }
}

/// Compute the action sets.
///
/// - `to_create = desired - owned - unowned`
/// - `to_update = desired & unowned`
/// - `to_delete = owned - desired`
/// - `drift = unowned - (owned - desired) - desired`
#[must_use]
pub fn reconcile(desired: &RecordSet, owned: &RecordSet, unowned: &RecordSet) -> ChangeSet {
    let to_create: RecordSet = desired
        .iter()
        .filter(|t| !owned.contains(*t) && !unowned.contains(*t))
        .cloned()
        .collect();

    let to_update: RecordSet = desired.intersection(unowned).cloned().collect();

    let to_delete: RecordSet = owned.difference(desired).cloned().collect();

    let drift: RecordSet = unowned
        .iter()
        .filter(|t| !to_delete.contains(*t) && !desired.contains(*t))
        .cloned()
        .collect();

    ChangeSet {
        to_create,
        to_update,
        to_delete,
        drift,
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
