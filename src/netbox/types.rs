// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! NetBox REST API response types.
//!
//! Only the fields the sync reads are modelled; everything else in the
//! NetBox payloads is ignored.

use serde::Deserialize;

/// One page of a NetBox list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    /// Absolute URL of the next page, `None` on the last page
    pub next: Option<String>,
    pub results: Vec<T>,
}

/// Choice field as NetBox renders it (`{"value": 4, "label": "IPv4"}`).
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyChoice {
    pub value: u8,
    #[serde(default)]
    pub label: Option<String>,
}

/// `ipam.ip-addresses` object.
#[derive(Debug, Clone, Deserialize)]
pub struct NetboxIpAddress {
    pub id: u64,
    /// Address with prefix length, e.g. `10.0.0.1/24`
    pub address: String,
    pub family: FamilyChoice,
    #[serde(default)]
    pub dns_name: String,
}

/// Nested zone reference on a DNS plugin record.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedZone {
    pub name: String,
}

/// `plugins.netbox-dns.records` object.
#[derive(Debug, Clone, Deserialize)]
pub struct NetboxDnsRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub zone: NestedZone,
}

/// `plugins.netbox-dns.zones` object.
#[derive(Debug, Clone, Deserialize)]
pub struct NetboxDnsZone {
    pub id: u64,
    pub name: String,
}
