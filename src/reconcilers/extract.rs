// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-state extraction.
//!
//! Two strategies turn inventory data into canonical record tuples:
//!
//! - [`AddressDerivedExtractor`] infers A/AAAA records for forward zones and
//!   PTR records for reverse zones from NetBox IP address objects.
//! - [`ZoneDelegatedExtractor`] reads records that the NetBox DNS plugin
//!   already scopes to a zone, minus NS and SOA.
//!
//! The strategy is chosen by configuration through [`extractor_for`].

use crate::config::ExtractStrategy;
use crate::constants::{EXCLUDED_RECORD_TYPES, RECORD_TYPE_PTR, ZONE_APEX_NAME};
use crate::errors::SyncError;
use crate::netbox::{Inventory, InventoryAddress, InventoryRecord};
use crate::record::{
    address_record_type, fqdn, is_within_zone, reverse_pointer, strip_prefix_len, RecordSet,
    RecordTuple,
};
use crate::zone::{ZoneDescriptor, ZoneRole};
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// Endpoint label used for errors found in inventory payloads
const INVENTORY_ENDPOINT: &str = "inventory";

/// Builds the desired record set of a zone.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Desired records for `zone`; duplicate tuples collapse.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceUnavailable`] if the inventory cannot be read
    /// or returns malformed entries.
    async fn desired(&self, zone: &ZoneDescriptor) -> Result<RecordSet, SyncError>;
}

/// Select the extractor for `strategy`.
#[must_use]
pub fn extractor_for(strategy: ExtractStrategy, inventory: Arc<dyn Inventory>) -> Box<dyn Extractor> {
    match strategy {
        ExtractStrategy::AddressDerived => Box::new(AddressDerivedExtractor::new(inventory)),
        ExtractStrategy::ZoneDelegated => Box::new(ZoneDelegatedExtractor::new(inventory)),
    }
}

fn malformed(reason: String) -> SyncError {
    SyncError::SourceUnavailable {
        endpoint: INVENTORY_ENDPOINT.to_string(),
        reason,
        transient: false,
    }
}

/// Parse an inventory address and check it against the reported family.
fn parse_address(entry: &InventoryAddress) -> Result<IpAddr, SyncError> {
    let literal = strip_prefix_len(&entry.address);
    let ip: IpAddr = literal
        .parse()
        .map_err(|e| malformed(format!("Invalid address '{}': {e}", entry.address)))?;

    let literal_family = if ip.is_ipv4() { 4 } else { 6 };
    if entry.family != literal_family {
        return Err(malformed(format!(
            "Address '{}' reported as family {} but is IPv{literal_family}",
            entry.address, entry.family
        )));
    }
    Ok(ip)
}

/// A/AAAA tuples for a forward zone.
///
/// Entries whose hostname is empty or lies outside the zone are skipped.
///
/// # Errors
///
/// Returns an error if an address cannot be parsed.
pub fn forward_records(
    zone: &ZoneDescriptor,
    addresses: &[InventoryAddress],
) -> Result<RecordSet, SyncError> {
    let mut desired = RecordSet::new();
    for entry in addresses {
        if !is_within_zone(&entry.dns_name, &zone.name) {
            debug!(
                zone = %zone,
                dns_name = %entry.dns_name,
                "Skipping address outside of zone"
            );
            continue;
        }
        let ip = parse_address(entry)?;
        desired.insert(RecordTuple::new(
            fqdn(&entry.dns_name),
            address_record_type(&ip),
            ip.to_string(),
            zone.name.clone(),
        ));
    }
    Ok(desired)
}

/// PTR tuples for a reverse zone.
///
/// Entries without a hostname are skipped.
///
/// # Errors
///
/// Returns an error if an address cannot be parsed.
pub fn reverse_records(
    zone: &ZoneDescriptor,
    addresses: &[InventoryAddress],
) -> Result<RecordSet, SyncError> {
    let mut desired = RecordSet::new();
    for entry in addresses {
        if entry.dns_name.is_empty() {
            continue;
        }
        let ip = parse_address(entry)?;
        desired.insert(RecordTuple::new(
            fqdn(&reverse_pointer(&ip)),
            RECORD_TYPE_PTR,
            fqdn(&entry.dns_name),
            zone.name.clone(),
        ));
    }
    Ok(desired)
}

/// Absolute owner name of a zone-relative record name.
fn absolute_name(name: &str, zone: &str) -> String {
    if name.is_empty() || name == ZONE_APEX_NAME {
        zone.to_string()
    } else if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

/// Tuples for records the inventory scopes to `zone`.
///
/// NS and SOA records, and records belonging to another zone, are dropped.
#[must_use]
pub fn delegated_records(zone: &ZoneDescriptor, records: &[InventoryRecord]) -> RecordSet {
    records
        .iter()
        .filter(|r| {
            !EXCLUDED_RECORD_TYPES
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&r.record_type))
        })
        .filter(|r| fqdn(&r.zone) == zone.name)
        .map(|r| {
            RecordTuple::new(
                absolute_name(&r.name, &zone.name),
                r.record_type.clone(),
                r.value.clone(),
                zone.name.clone(),
            )
        })
        .collect()
}

/// Infers A/AAAA/PTR records from IP address objects.
pub struct AddressDerivedExtractor {
    inventory: Arc<dyn Inventory>,
}

impl AddressDerivedExtractor {
    #[must_use]
    pub fn new(inventory: Arc<dyn Inventory>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl Extractor for AddressDerivedExtractor {
    async fn desired(&self, zone: &ZoneDescriptor) -> Result<RecordSet, SyncError> {
        let desired = match &zone.role {
            ZoneRole::Forward => {
                let addresses = self
                    .inventory
                    .addresses_by_dns_suffix(zone.bare_name())
                    .await?;
                forward_records(zone, &addresses)?
            }
            ZoneRole::Reverse { prefix } => {
                let addresses = self.inventory.addresses_in_prefix(prefix).await?;
                reverse_records(zone, &addresses)?
            }
        };
        info!(zone = %zone, desired = desired.len(), "Extracted address-derived records");
        Ok(desired)
    }
}

/// Reads zone-scoped records from the NetBox DNS plugin.
pub struct ZoneDelegatedExtractor {
    inventory: Arc<dyn Inventory>,
}

impl ZoneDelegatedExtractor {
    #[must_use]
    pub fn new(inventory: Arc<dyn Inventory>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl Extractor for ZoneDelegatedExtractor {
    async fn desired(&self, zone: &ZoneDescriptor) -> Result<RecordSet, SyncError> {
        let records = self
            .inventory
            .records_in_zone(zone.bare_name(), EXCLUDED_RECORD_TYPES)
            .await?;
        let desired = delegated_records(zone, &records);
        info!(zone = %zone, desired = desired.len(), "Extracted zone-delegated records");
        Ok(desired)
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod extract_tests;
