// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Observed-state partitioning.
//!
//! Splits the RRSets of a zone into records this tool manages (the RRSet
//! carries the ownership marker comment) and records it does not. Ownership
//! is decided per RRSet: every value entry of an RRSet lands on the same side.

use crate::powerdns::types::RRSet;
use crate::record::{RecordSet, RecordTuple};
use crate::zone::ZoneDescriptor;
use tracing::debug;

/// Observed records of one zone split by ownership.
///
/// `owned` and `unowned` never intersect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub owned: RecordSet,
    pub unowned: RecordSet,
}

impl Partition {
    /// Fold another zone's partition into this one.
    pub fn merge(&mut self, other: Partition) {
        self.owned.extend(other.owned);
        self.unowned.extend(other.unowned);
    }
}

/// Whether any comment on `rrset` equals `marker`.
#[must_use]
pub fn is_owned(rrset: &RRSet, marker: &str) -> bool {
    rrset.comments.iter().any(|c| c.content == marker)
}

/// Partition the RRSets of `zone` by the ownership `marker`.
///
/// Disabled value entries are included; they still exist in the store.
#[must_use]
pub fn partition(zone: &ZoneDescriptor, rrsets: &[RRSet], marker: &str) -> Partition {
    let mut result = Partition::default();

    for rrset in rrsets {
        let owned = is_owned(rrset, marker);
        let target = if owned {
            &mut result.owned
        } else {
            &mut result.unowned
        };
        for entry in &rrset.records {
            target.insert(RecordTuple::new(
                rrset.name.clone(),
                rrset.record_type.clone(),
                entry.content.clone(),
                zone.name.clone(),
            ));
        }
    }

    debug!(
        zone = %zone,
        owned = result.owned.len(),
        unowned = result.unowned.len(),
        "Partitioned observed records"
    );
    result
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod partition_tests;
