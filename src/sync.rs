// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The sync engine.
//!
//! One run walks the selected zones one at a time. For each zone the desired
//! records are extracted and the observed records are read and partitioned;
//! a zone whose inventory or store cannot be read is skipped and reported as
//! a fault while the others continue. The union over all healthy zones is
//! reconciled once, the classification is printed, and the changes are
//! applied.

use crate::config::Config;
use crate::errors::SyncError;
use crate::metrics;
use crate::netbox::Inventory;
use crate::powerdns::DnsStore;
use crate::reconcilers::apply::Applier;
use crate::reconcilers::extract::{extractor_for, Extractor};
use crate::reconcilers::partition::{partition, Partition};
use crate::reconcilers::reconcile::{reconcile, ChangeSet};
use crate::record::RecordSet;
use crate::report::Reporter;
use crate::zone::{filter_zones, ZoneDescriptor};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A zone skipped because its inventory or store could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFault {
    /// Zone name, or `tag:<tag>` when zone discovery failed
    pub zone: String,
    pub error: SyncError,
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub changes: ChangeSet,
    pub zone_faults: Vec<ZoneFault>,
    pub mutation_failures: Vec<SyncError>,
    /// Store calls that succeeded
    pub mutations_applied: usize,
    pub dry_run: bool,
}

impl RunSummary {
    /// True when no zone was skipped and no mutation failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.zone_faults.is_empty() && self.mutation_failures.is_empty()
    }
}

/// Desired and observed state gathered across zones.
#[derive(Debug, Default)]
struct Observation {
    desired: RecordSet,
    observed: Partition,
    faults: Vec<ZoneFault>,
}

/// Drives extraction, partitioning, reconciliation and apply across zones.
pub struct SyncEngine {
    inventory: Arc<dyn Inventory>,
    store: Arc<dyn DnsStore>,
    extractor: Box<dyn Extractor>,
    zones: Vec<ZoneDescriptor>,
    zone_tag: Option<String>,
    marker: String,
    dry_run: bool,
}

impl SyncEngine {
    #[must_use]
    pub fn new(config: &Config, inventory: Arc<dyn Inventory>, store: Arc<dyn DnsStore>) -> Self {
        Self {
            extractor: extractor_for(config.strategy, inventory.clone()),
            inventory,
            store,
            zones: config.configured_zones(),
            zone_tag: config.zone_tag.clone(),
            marker: config.ownership_marker.clone(),
            dry_run: config.dry_run,
        }
    }

    /// Configured zones plus tag-discovered zones, deduplicated by name and
    /// restricted to `only` when it is non-empty.
    ///
    /// A failed tag lookup is returned as a fault; configured zones still run.
    pub async fn select_zones(&self, only: &[String]) -> (Vec<ZoneDescriptor>, Vec<ZoneFault>) {
        let mut zones = self.zones.clone();
        let mut faults = Vec::new();

        if let Some(tag) = &self.zone_tag {
            match self.inventory.zones_by_tag(tag).await {
                Ok(names) => {
                    info!(tag = %tag, discovered = names.len(), "Discovered zones by tag");
                    zones.extend(names.iter().map(|name| ZoneDescriptor::tagged(name, tag)));
                }
                Err(e) => {
                    warn!(tag = %tag, error = %e, kind = e.kind(), "Zone discovery failed");
                    faults.push(ZoneFault {
                        zone: format!("tag:{tag}"),
                        error: e,
                    });
                }
            }
        }

        let mut unique: Vec<ZoneDescriptor> = Vec::with_capacity(zones.len());
        for zone in zones {
            if !unique.iter().any(|z| z.name == zone.name) {
                unique.push(zone);
            }
        }

        (filter_zones(unique, only), faults)
    }

    /// Desired records and partitioned observed records of one zone.
    async fn observe_zone(&self, zone: &ZoneDescriptor) -> Result<(RecordSet, Partition), SyncError> {
        let desired = self.extractor.desired(zone).await?;
        let observed = self.store.get_zone(&zone.name).await?;
        Ok((desired, partition(zone, &observed.rrsets, &self.marker)))
    }

    async fn observe(&self, zones: &[ZoneDescriptor]) -> Observation {
        let mut observation = Observation::default();

        for zone in zones {
            match self.observe_zone(zone).await {
                Ok((desired, observed)) => {
                    info!(
                        zone = %zone,
                        desired = desired.len(),
                        owned = observed.owned.len(),
                        unowned = observed.unowned.len(),
                        "Observed zone"
                    );
                    observation.desired.extend(desired);
                    observation.observed.merge(observed);
                }
                Err(e) => {
                    warn!(
                        zone = %zone,
                        error = %e,
                        kind = e.kind(),
                        transient = e.is_transient(),
                        "Skipping zone"
                    );
                    observation.faults.push(ZoneFault {
                        zone: zone.name.clone(),
                        error: e,
                    });
                }
            }
        }
        observation
    }

    /// Run one reconciliation over every selected zone.
    ///
    /// `only` restricts the run to the named zones. The classification is
    /// written to `reporter` before any mutation is attempted.
    pub async fn run<W: Write + Send>(&self, only: &[String], reporter: &mut Reporter<W>) -> RunSummary {
        let start = Instant::now();

        let (zones, mut zone_faults) = self.select_zones(only).await;
        info!(zones = zones.len(), dry_run = self.dry_run, "Starting sync run");

        let observation = self.observe(&zones).await;
        zone_faults.extend(observation.faults);
        for fault in &zone_faults {
            metrics::record_zone_fault(fault.error.kind());
        }

        let changes = reconcile(
            &observation.desired,
            &observation.observed.owned,
            &observation.observed.unowned,
        );
        metrics::record_planned(&changes);
        reporter.classification(&changes);

        let applier = Applier::new(self.store.clone(), self.marker.clone(), self.dry_run);
        let outcome = applier
            .apply(&changes, &observation.desired, reporter)
            .await;

        let summary = RunSummary {
            changes,
            zone_faults,
            mutation_failures: outcome.failures,
            mutations_applied: outcome.succeeded,
            dry_run: self.dry_run,
        };
        reporter.summary(&summary);

        let elapsed = start.elapsed();
        metrics::record_run(elapsed, summary.is_success());
        info!(
            duration_secs = elapsed.as_secs_f64(),
            success = summary.is_success(),
            zone_faults = summary.zone_faults.len(),
            mutation_failures = summary.mutation_failures.len(),
            "Sync run finished"
        );
        summary
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod sync_tests;
