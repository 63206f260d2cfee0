// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Applying a change set to the DNS store.
//!
//! Tuples are grouped by `(zone, name, type)` because PowerDNS mutates whole
//! RRSets. Create and update groups are upserted with every desired value at
//! their key; delete groups either shrink the RRSet to the values still
//! desired or remove it. Values sent to the store only ever come from the
//! desired set, so drift is never touched.

use crate::errors::SyncError;
use crate::metrics;
use crate::powerdns::types::RRSet;
use crate::powerdns::DnsStore;
use crate::reconcilers::reconcile::ChangeSet;
use crate::record::{RRSetKey, RecordSet, RecordTuple};
use crate::report::Reporter;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Kind of change applied to a tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    /// Phases in application order.
    pub const ORDER: [Action; 3] = [Action::Create, Action::Update, Action::Delete];

    /// Trace prefix, e.g. `Creating`.
    #[must_use]
    pub fn progressive(self) -> &'static str {
        match self {
            Action::Create => "Creating",
            Action::Update => "Updating",
            Action::Delete => "Deleting",
        }
    }

    /// Lowercase verb used in failures and metric labels.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    fn tuples(self, changes: &ChangeSet) -> &RecordSet {
        match self {
            Action::Create => &changes.to_create,
            Action::Update => &changes.to_update,
            Action::Delete => &changes.to_delete,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Store call for one RRSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    /// Replace the RRSet with exactly these values and the ownership marker
    Upsert { values: Vec<String> },
    /// Remove the RRSet
    Remove,
}

/// One RRSet mutation and the tuples it accounts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub action: Action,
    pub key: RRSetKey,
    pub op: MutationOp,
    pub tuples: Vec<RecordTuple>,
}

/// Desired values grouped by RRSet key.
fn desired_values(desired: &RecordSet) -> BTreeMap<RRSetKey, Vec<String>> {
    let mut values: BTreeMap<RRSetKey, Vec<String>> = BTreeMap::new();
    for tuple in desired {
        values
            .entry(tuple.rrset_key())
            .or_default()
            .push(tuple.value.clone());
    }
    values
}

/// Plan the store calls for `changes`, in create, update, delete order.
#[must_use]
pub fn plan_mutations(changes: &ChangeSet, desired: &RecordSet) -> Vec<Mutation> {
    let values = desired_values(desired);
    let mut mutations = Vec::new();

    for action in Action::ORDER {
        let mut groups: BTreeMap<RRSetKey, Vec<RecordTuple>> = BTreeMap::new();
        for tuple in action.tuples(changes) {
            groups
                .entry(tuple.rrset_key())
                .or_default()
                .push(tuple.clone());
        }

        for (key, tuples) in groups {
            let op = match values.get(&key) {
                Some(remaining) => MutationOp::Upsert {
                    values: remaining.clone(),
                },
                None => MutationOp::Remove,
            };
            mutations.push(Mutation {
                action,
                key,
                op,
                tuples,
            });
        }
    }
    mutations
}

/// Result of applying one change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Store calls issued
    pub attempted: usize,
    /// Store calls that succeeded
    pub succeeded: usize,
    /// One `MutationFailed` per tuple of every failed call
    pub failures: Vec<SyncError>,
}

/// Executes planned mutations against a [`DnsStore`].
pub struct Applier {
    store: Arc<dyn DnsStore>,
    marker: String,
    dry_run: bool,
}

impl Applier {
    #[must_use]
    pub fn new(store: Arc<dyn DnsStore>, marker: impl Into<String>, dry_run: bool) -> Self {
        Self {
            store,
            marker: marker.into(),
            dry_run,
        }
    }

    /// Apply `changes`, tracing every tuple to `reporter`.
    ///
    /// A failed call is recorded and the batch continues.
    pub async fn apply<W: Write + Send>(
        &self,
        changes: &ChangeSet,
        desired: &RecordSet,
        reporter: &mut Reporter<W>,
    ) -> ApplyOutcome {
        let mutations = plan_mutations(changes, desired);
        let mut outcome = ApplyOutcome::default();

        info!(
            mutations = mutations.len(),
            dry_run = self.dry_run,
            "Applying changes"
        );

        for action in Action::ORDER {
            for mutation in mutations.iter().filter(|m| m.action == action) {
                for tuple in &mutation.tuples {
                    reporter.trace(action, tuple);
                }

                if self.dry_run {
                    debug!(
                        zone = %mutation.key.zone,
                        name = %mutation.key.name,
                        record_type = %mutation.key.record_type,
                        "Dry run, skipping store call"
                    );
                    metrics::record_mutation(action.verb(), metrics::OUTCOME_DRY_RUN);
                    continue;
                }

                outcome.attempted += 1;
                match self.execute(mutation).await {
                    Ok(()) => {
                        outcome.succeeded += 1;
                        metrics::record_mutation(action.verb(), metrics::OUTCOME_SUCCESS);
                    }
                    Err(e) => {
                        error!(
                            zone = %mutation.key.zone,
                            name = %mutation.key.name,
                            record_type = %mutation.key.record_type,
                            error = %e,
                            "Failed to {} RRSet",
                            action.verb()
                        );
                        metrics::record_mutation(action.verb(), metrics::OUTCOME_FAILURE);
                        for tuple in &mutation.tuples {
                            let failure = SyncError::MutationFailed {
                                action: action.verb().to_string(),
                                name: tuple.name.clone(),
                                record_type: tuple.record_type.clone(),
                                value: tuple.value.clone(),
                                zone: tuple.zone.clone(),
                                reason: e.to_string(),
                            };
                            reporter.failure(&failure);
                            outcome.failures.push(failure);
                        }
                    }
                }
            }
            reporter.section_break();
        }

        outcome
    }

    async fn execute(&self, mutation: &Mutation) -> Result<(), SyncError> {
        let key = &mutation.key;
        match &mutation.op {
            MutationOp::Upsert { values } => {
                let rrset = RRSet::managed(&key.name, &key.record_type, values, &self.marker);
                self.store
                    .create_or_update_records(&key.zone, &[rrset])
                    .await
            }
            MutationOp::Remove => {
                let rrset = RRSet::reference(&key.name, &key.record_type);
                self.store.delete_records(&key.zone, &[rrset]).await
            }
        }
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
