// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # netbox-pdns-sync - NetBox to PowerDNS record reconciliation
//!
//! Keeps the records of selected PowerDNS zones in line with the hostnames
//! and addresses documented in NetBox, without touching records it does not
//! manage.
//!
//! ## Overview
//!
//! Each run reads the desired state from NetBox and the observed state from
//! PowerDNS, then classifies every record:
//!
//! - **create** - documented in NetBox, absent from PowerDNS
//! - **update** - documented in NetBox, present in PowerDNS but not managed;
//!   adopted by tagging it with the ownership marker
//! - **delete** - managed, no longer documented in NetBox
//! - **missing** - present in PowerDNS, unmanaged and undocumented; reported
//!   as drift, never changed
//!
//! Managed RRSets carry a comment equal to the ownership marker (`NetBox`).
//!
//! ## Modules
//!
//! - [`reconcilers`] - Extraction, partitioning, classification and apply
//! - [`sync`] - The engine driving a run across zones
//! - [`netbox`] - NetBox inventory connector
//! - [`powerdns`] - PowerDNS store connector
//! - [`report`] - Human-readable run output
//! - [`config`] - YAML configuration
//! - [`metrics`] - Prometheus run metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use netbox_pdns_sync::config::Config;
//! use netbox_pdns_sync::http::build_client;
//! use netbox_pdns_sync::netbox::NetboxClient;
//! use netbox_pdns_sync::powerdns::PowerDnsClient;
//! use netbox_pdns_sync::report::Reporter;
//! use netbox_pdns_sync::sync::SyncEngine;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load(Path::new("netbox-pdns-sync.yaml"))?;
//! let client = build_client(&config.http, config.ca_bundle.as_deref())?;
//! let inventory = Arc::new(NetboxClient::new(
//!     client.clone(),
//!     config.netbox.clone(),
//!     config.http.clone(),
//! ));
//! let store = Arc::new(PowerDnsClient::new(
//!     client,
//!     config.powerdns.clone(),
//!     config.http.clone(),
//! ));
//!
//! let engine = SyncEngine::new(&config, inventory, store);
//! let mut reporter = Reporter::new(std::io::stdout());
//! let summary = engine.run(&[], &mut reporter).await;
//! assert!(summary.is_success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod http;
pub mod metrics;
pub mod netbox;
pub mod powerdns;
pub mod reconcilers;
pub mod record;
pub mod report;
pub mod retry;
pub mod sync;
pub mod zone;

#[cfg(test)]
mod testing;
