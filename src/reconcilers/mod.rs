// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of NetBox desired state against PowerDNS observed state.
//!
//! # Reconciliation Architecture
//!
//! 1. **Extract** - Build the desired record set from the inventory ([`extract`])
//! 2. **Partition** - Split a zone's records into owned and unowned ([`partition`])
//! 3. **Reconcile** - Compute create, update, delete and drift sets ([`reconcile`])
//! 4. **Apply** - Upsert and delete RRSets in PowerDNS ([`apply`])
//!
//! Steps 1 and 2 talk to the connectors; step 3 is a pure function; step 4
//! is the only place that mutates anything.
//!
//! # Example
//!
//! ```rust
//! use netbox_pdns_sync::reconcilers::reconcile::reconcile;
//! use netbox_pdns_sync::record::{RecordSet, RecordTuple};
//!
//! let mut desired = RecordSet::new();
//! desired.insert(RecordTuple::new("a.example.com.", "A", "10.0.0.1", "example.com."));
//!
//! let changes = reconcile(&desired, &RecordSet::new(), &RecordSet::new());
//! assert_eq!(changes.to_create.len(), 1);
//! assert!(changes.to_update.is_empty());
//! ```

pub mod apply;
pub mod extract;
pub mod partition;
pub mod reconcile;

pub use apply::{plan_mutations, Action, ApplyOutcome, Applier, Mutation, MutationOp};
pub use extract::{extractor_for, AddressDerivedExtractor, Extractor, ZoneDelegatedExtractor};
pub use partition::{partition, Partition};
pub use reconcile::{reconcile, ChangeSet};
