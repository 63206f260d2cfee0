// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Sync error types.
//!
//! This module provides the error taxonomy used by the reconciliation engine:
//! - Inventory (NetBox) failures while building desired state
//! - Authoritative store (PowerDNS) failures while reading observed state
//! - Missing zones
//! - Individual record mutation failures
//!
//! Zone-level errors abort the affected zone only; mutation errors are
//! collected per record and never abort the batch.

use thiserror::Error;

/// Errors raised while reconciling a zone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The inventory could not be queried or returned malformed data.
    #[error("Inventory at {endpoint} unavailable: {reason}")]
    SourceUnavailable {
        /// Inventory endpoint that failed
        endpoint: String,
        /// Specific reason for the failure
        reason: String,
        /// Whether retrying later could succeed (network/5xx vs. bad data)
        transient: bool,
    },

    /// The authoritative store could not be queried or returned malformed data.
    #[error("DNS store at {endpoint} unavailable: {reason}")]
    StoreUnavailable {
        /// Store endpoint that failed
        endpoint: String,
        /// Specific reason for the failure
        reason: String,
        /// Whether retrying later could succeed (network/5xx vs. bad data)
        transient: bool,
    },

    /// The selected zone does not exist in the authoritative store.
    #[error("Zone '{zone}' not found on {endpoint}")]
    ZoneNotFound {
        /// The zone name that was not found
        zone: String,
        /// The store endpoint that reported it
        endpoint: String,
    },

    /// A single create/update/delete call failed.
    #[error("Failed to {action} record ({name}, {record_type}, {value}, {zone}): {reason}")]
    MutationFailed {
        /// Action verb (`create`, `update`, `delete`)
        action: String,
        /// Record owner name
        name: String,
        /// Record type
        record_type: String,
        /// Record value
        value: String,
        /// Zone containing the record
        zone: String,
        /// Why the call failed
        reason: String,
    },
}

impl SyncError {
    /// Returns true if this error is transient and a later run may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::SourceUnavailable { transient, .. } | Self::StoreUnavailable { transient, .. } => {
                *transient
            }
            Self::MutationFailed { .. } => true,
            Self::ZoneNotFound { .. } => false,
        }
    }

    /// Returns a stable reason code for this error.
    ///
    /// Used as a structured log field and as the metrics label for faults.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SourceUnavailable",
            Self::StoreUnavailable { .. } => "StoreUnavailable",
            Self::ZoneNotFound { .. } => "ZoneNotFound",
            Self::MutationFailed { .. } => "MutationFailed",
        }
    }

    /// Returns true for errors that abort the processing of a zone.
    #[must_use]
    pub fn is_zone_fault(&self) -> bool {
        !matches!(self, Self::MutationFailed { .. })
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
