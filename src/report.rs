// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Human-readable run output.
//!
//! The reporter prints the classification of a run, a trace line per tuple
//! during apply and a closing summary. Output goes to any [`Write`] sink so
//! the binary can use stdout while tests capture a buffer. Logs are kept
//! separate and go through `tracing`.

use crate::errors::SyncError;
use crate::reconcilers::apply::Action;
use crate::reconcilers::reconcile::ChangeSet;
use crate::record::{RecordSet, RecordTuple};
use crate::sync::RunSummary;
use std::io::Write;
use tracing::warn;

/// Separator printed between report sections
pub const SECTION_BREAK: &str = "----";

/// Writes run output to `W`.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!(error = %e, "Failed to write report output");
        }
    }

    fn names(&mut self, count_line: &str, tuples: &RecordSet) {
        self.line(&format!("{} {count_line}:", tuples.len()));
        for tuple in tuples {
            self.line(&tuple.name);
        }
    }

    /// Counts and owner names of every action set.
    pub fn classification(&mut self, changes: &ChangeSet) {
        self.section_break();
        self.names("records to create", &changes.to_create);
        self.section_break();
        self.names("records to update", &changes.to_update);
        self.section_break();
        self.names("records to delete", &changes.to_delete);
        self.section_break();
        self.names("missing records", &changes.drift);
        self.section_break();
    }

    /// Trace line printed right before a tuple's store call.
    pub fn trace(&mut self, action: Action, tuple: &RecordTuple) {
        self.line(&format!("{} {tuple}", action.progressive()));
    }

    /// A failed mutation.
    pub fn failure(&mut self, error: &SyncError) {
        self.line(&error.to_string());
    }

    pub fn section_break(&mut self) {
        self.line(SECTION_BREAK);
    }

    /// Closing summary with zone faults and mutation failures.
    pub fn summary(&mut self, summary: &RunSummary) {
        for fault in &summary.zone_faults {
            self.line(&format!("Zone {} skipped: {}", fault.zone, fault.error));
        }

        let mode = if summary.dry_run { " (dry run)" } else { "" };
        self.line(&format!(
            "Summary{mode}: {} created, {} updated, {} deleted, {} missing, {} mutations applied, {} zone faults, {} mutation failures",
            summary.changes.to_create.len(),
            summary.changes.to_update.len(),
            summary.changes.to_delete.len(),
            summary.changes.drift.len(),
            summary.mutations_applied,
            summary.zone_faults.len(),
            summary.mutation_failures.len(),
        ));
    }

    /// Flush and return the sink.
    pub fn into_inner(mut self) -> W {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "Failed to flush report output");
        }
        self.out
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
