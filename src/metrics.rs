// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for sync runs.
//!
//! All metrics use the namespace prefix `netbox_pdns_sync_`. A run is a
//! short-lived process, so metrics are not served over HTTP; the binary
//! writes the text exposition format to a file (`--metrics-file`) for a
//! node-exporter textfile collector.
//!
//! # Metrics Categories
//!
//! - **Plan Metrics** - Size of each action set of the last run
//! - **Mutation Metrics** - Store calls by action and outcome
//! - **Fault Metrics** - Zones skipped, by error kind
//! - **Run Metrics** - Duration and success of the last run
//!
//! # Example
//!
//! ```rust,no_run
//! use netbox_pdns_sync::metrics::{gather_metrics, record_mutation, OUTCOME_SUCCESS};
//!
//! record_mutation("create", OUTCOME_SUCCESS);
//! let text = gather_metrics().unwrap();
//! assert!(text.contains("netbox_pdns_sync_mutations_total"));
//! ```

use crate::reconcilers::reconcile::ChangeSet;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "netbox_pdns_sync";

/// Mutation outcome label: the store call succeeded
pub const OUTCOME_SUCCESS: &str = "success";

/// Mutation outcome label: the store call failed
pub const OUTCOME_FAILURE: &str = "failure";

/// Mutation outcome label: dry run, no store call made
pub const OUTCOME_DRY_RUN: &str = "dry_run";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Plan Metrics
// ============================================================================

/// Records per action set of the last run
///
/// Labels:
/// - `action`: `create`, `update`, `delete` or `drift`
pub static RECORDS_PLANNED: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_records_planned"),
        "Records per action set of the last run",
    );
    let gauge = GaugeVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Mutation Metrics
// ============================================================================

/// RRSet mutations by action and outcome
///
/// Labels:
/// - `action`: `create`, `update` or `delete`
/// - `outcome`: `success`, `failure` or `dry_run`
pub static MUTATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_mutations_total"),
        "RRSet mutations by action and outcome",
    );
    let counter = CounterVec::new(opts, &["action", "outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Fault Metrics
// ============================================================================

/// Zones skipped because their inventory or store could not be read
///
/// Labels:
/// - `kind`: error kind (`SourceUnavailable`, `StoreUnavailable`, `ZoneNotFound`)
pub static ZONE_FAULTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_faults_total"),
        "Zones skipped by error kind",
    );
    let counter = CounterVec::new(opts, &["kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Run Metrics
// ============================================================================

/// Duration of sync runs in seconds
pub static RUN_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_run_duration_seconds"),
        "Duration of sync runs in seconds",
    )
    .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// 1 if the last run had no zone fault and no mutation failure, else 0
pub static LAST_RUN_SUCCESS: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        format!("{METRICS_NAMESPACE}_last_run_success"),
        "Whether the last run completed without faults",
    )
    .unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record the size of each action set
pub fn record_planned(changes: &ChangeSet) {
    for (action, tuples) in [
        ("create", &changes.to_create),
        ("update", &changes.to_update),
        ("delete", &changes.to_delete),
        ("drift", &changes.drift),
    ] {
        #[allow(clippy::cast_precision_loss)]
        RECORDS_PLANNED
            .with_label_values(&[action])
            .set(tuples.len() as f64);
    }
}

/// Record one RRSet mutation
///
/// # Arguments
/// * `action` - `create`, `update` or `delete`
/// * `outcome` - One of [`OUTCOME_SUCCESS`], [`OUTCOME_FAILURE`], [`OUTCOME_DRY_RUN`]
pub fn record_mutation(action: &str, outcome: &str) {
    MUTATIONS_TOTAL.with_label_values(&[action, outcome]).inc();
}

/// Record a skipped zone
pub fn record_zone_fault(kind: &str) {
    ZONE_FAULTS_TOTAL.with_label_values(&[kind]).inc();
}

/// Record the end of a run
pub fn record_run(duration: Duration, success: bool) {
    RUN_DURATION_SECONDS.observe(duration.as_secs_f64());
    LAST_RUN_SUCCESS.set(if success { 1.0 } else { 0.0 });
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
