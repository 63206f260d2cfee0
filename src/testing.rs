// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory inventory and DNS store used by unit tests.

use crate::errors::SyncError;
use crate::netbox::{Inventory, InventoryAddress, InventoryRecord};
use crate::powerdns::types::{Comment, RRSet, RecordEntry, Zone};
use crate::powerdns::DnsStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Inventory backed by plain vectors.
#[derive(Default)]
pub struct MemoryInventory {
    pub addresses: Mutex<Vec<InventoryAddress>>,
    /// Addresses returned per prefix
    pub prefixes: HashMap<String, Vec<InventoryAddress>>,
    pub records: Vec<InventoryRecord>,
    pub tags: HashMap<String, Vec<String>>,
    /// Queries for these zones/prefixes fail
    pub failing: HashSet<String>,
}

impl MemoryInventory {
    pub fn with_addresses(addresses: Vec<InventoryAddress>) -> Self {
        Self {
            addresses: Mutex::new(addresses),
            ..Self::default()
        }
    }

    pub fn set_addresses(&self, addresses: Vec<InventoryAddress>) {
        *self.addresses.lock().unwrap() = addresses;
    }

    fn check(&self, key: &str) -> Result<(), SyncError> {
        if self.failing.contains(key) {
            return Err(SyncError::SourceUnavailable {
                endpoint: "memory".to_string(),
                reason: format!("query for {key} failed"),
                transient: true,
            });
        }
        Ok(())
    }
}

pub fn address(dns_name: &str, address: &str) -> InventoryAddress {
    let family = if address.contains(':') { 6 } else { 4 };
    InventoryAddress {
        dns_name: dns_name.to_string(),
        family,
        address: address.to_string(),
    }
}

#[async_trait]
impl Inventory for MemoryInventory {
    async fn addresses_by_dns_suffix(
        &self,
        zone: &str,
    ) -> Result<Vec<InventoryAddress>, SyncError> {
        self.check(zone)?;
        let suffix = zone.to_ascii_lowercase();
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.dns_name.to_ascii_lowercase().ends_with(&suffix))
            .cloned()
            .collect())
    }

    async fn addresses_in_prefix(&self, prefix: &str) -> Result<Vec<InventoryAddress>, SyncError> {
        self.check(prefix)?;
        Ok(self.prefixes.get(prefix).cloned().unwrap_or_default())
    }

    async fn records_in_zone(
        &self,
        zone: &str,
        exclude_types: &[&str],
    ) -> Result<Vec<InventoryRecord>, SyncError> {
        self.check(zone)?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.zone == zone && !exclude_types.contains(&r.record_type.as_str()))
            .cloned()
            .collect())
    }

    async fn zones_by_tag(&self, tag: &str) -> Result<Vec<String>, SyncError> {
        self.check(tag)?;
        Ok(self.tags.get(tag).cloned().unwrap_or_default())
    }
}

/// One recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Upsert { zone: String, rrsets: Vec<RRSet> },
    Delete { zone: String, rrsets: Vec<RRSet> },
}

/// DNS store with PowerDNS REPLACE/DELETE semantics.
#[derive(Default)]
pub struct MemoryStore {
    /// zone -> (name, type) -> rrset
    pub zones: Mutex<BTreeMap<String, BTreeMap<(String, String), RRSet>>>,
    pub calls: Mutex<Vec<StoreCall>>,
    /// Mutations touching these owner names fail
    pub failing_names: HashSet<String>,
}

impl MemoryStore {
    pub fn with_zones(names: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut zones = store.zones.lock().unwrap();
            for name in names {
                zones.insert((*name).to_string(), BTreeMap::new());
            }
        }
        store
    }

    /// Insert an RRSet, optionally carrying `comment`.
    pub fn seed(&self, zone: &str, name: &str, record_type: &str, values: &[&str], comment: Option<&str>) {
        let rrset = RRSet {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl: Some(3600),
            records: values
                .iter()
                .map(|v| RecordEntry {
                    content: (*v).to_string(),
                    disabled: false,
                })
                .collect(),
            comments: comment
                .map(|c| {
                    vec![Comment {
                        content: c.to_string(),
                        account: String::new(),
                    }]
                })
                .unwrap_or_default(),
            changetype: None,
        };
        self.zones
            .lock()
            .unwrap()
            .entry(zone.to_string())
            .or_default()
            .insert((name.to_string(), record_type.to_string()), rrset);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rrset(&self, zone: &str, name: &str, record_type: &str) -> Option<RRSet> {
        self.zones
            .lock()
            .unwrap()
            .get(zone)
            .and_then(|z| z.get(&(name.to_string(), record_type.to_string())).cloned())
    }

    fn check(&self, rrsets: &[RRSet]) -> Result<(), SyncError> {
        if let Some(bad) = rrsets.iter().find(|r| self.failing_names.contains(&r.name)) {
            return Err(SyncError::StoreUnavailable {
                endpoint: "memory".to_string(),
                reason: format!("write of {} rejected", bad.name),
                transient: false,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DnsStore for MemoryStore {
    async fn get_zone(&self, zone: &str) -> Result<Zone, SyncError> {
        let zones = self.zones.lock().unwrap();
        let rrsets = zones.get(zone).ok_or_else(|| SyncError::ZoneNotFound {
            zone: zone.to_string(),
            endpoint: "memory".to_string(),
        })?;
        Ok(Zone {
            name: zone.to_string(),
            rrsets: rrsets.values().cloned().collect(),
        })
    }

    async fn create_or_update_records(&self, zone: &str, rrsets: &[RRSet]) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(StoreCall::Upsert {
            zone: zone.to_string(),
            rrsets: rrsets.to_vec(),
        });
        self.check(rrsets)?;
        let mut zones = self.zones.lock().unwrap();
        let entries = zones.get_mut(zone).ok_or_else(|| SyncError::ZoneNotFound {
            zone: zone.to_string(),
            endpoint: "memory".to_string(),
        })?;
        for rrset in rrsets {
            entries.insert((rrset.name.clone(), rrset.record_type.clone()), rrset.clone());
        }
        Ok(())
    }

    async fn delete_records(&self, zone: &str, rrsets: &[RRSet]) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(StoreCall::Delete {
            zone: zone.to_string(),
            rrsets: rrsets.to_vec(),
        });
        self.check(rrsets)?;
        let mut zones = self.zones.lock().unwrap();
        if let Some(entries) = zones.get_mut(zone) {
            for rrset in rrsets {
                entries.remove(&(rrset.name.clone(), rrset.record_type.clone()));
            }
        }
        Ok(())
    }
}
