// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Inventory (source of truth) access.
//!
//! The reconciliation engine only sees the [`Inventory`] trait. [`NetboxClient`]
//! implements it against the NetBox REST API (IPAM plus the NetBox DNS
//! plugin); tests use in-memory implementations.
//!
//! The inventory is read-only for this tool: no method here mutates it.

pub mod types;

use crate::config::{HttpSettings, NetboxSettings};
use crate::constants::{
    MAX_NETBOX_PAGES, NETBOX_DNS_RECORDS_PATH, NETBOX_DNS_ZONES_PATH, NETBOX_IP_ADDRESSES_PATH,
};
use crate::errors::SyncError;
use crate::http::{get_json, join_url, RequestError};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use types::{NetboxDnsRecord, NetboxDnsZone, NetboxIpAddress, Page};
use url::Url;

/// An IP address object and the hostname assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryAddress {
    /// Hostname without trailing dot; may be empty
    pub dns_name: String,
    /// Address family as reported by the inventory (4 or 6)
    pub family: u8,
    /// Address, possibly with a `/len` suffix
    pub address: String,
}

/// A DNS record object already scoped to a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Owner name relative to the zone (`@` for the apex)
    pub name: String,
    pub record_type: String,
    pub value: String,
    /// Zone name without trailing dot
    pub zone: String,
}

/// Read access to the source-of-truth inventory.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Addresses whose DNS name ends with `zone`.
    async fn addresses_by_dns_suffix(&self, zone: &str)
        -> Result<Vec<InventoryAddress>, SyncError>;

    /// Addresses contained in `prefix`.
    async fn addresses_in_prefix(&self, prefix: &str) -> Result<Vec<InventoryAddress>, SyncError>;

    /// Record objects of `zone`, without the types in `exclude_types`.
    async fn records_in_zone(
        &self,
        zone: &str,
        exclude_types: &[&str],
    ) -> Result<Vec<InventoryRecord>, SyncError>;

    /// Names of the DNS zones carrying `tag`.
    async fn zones_by_tag(&self, tag: &str) -> Result<Vec<String>, SyncError>;
}

/// NetBox REST API client.
#[derive(Debug, Clone)]
pub struct NetboxClient {
    client: HttpClient,
    settings: NetboxSettings,
    http: HttpSettings,
    auth_header: String,
}

impl NetboxClient {
    /// Create a client; no request is made until the first query.
    #[must_use]
    pub fn new(client: HttpClient, settings: NetboxSettings, http: HttpSettings) -> Self {
        let auth_header = format!("Token {}", settings.token);
        Self {
            client,
            settings,
            http,
            auth_header,
        }
    }

    fn unavailable(&self, err: &RequestError) -> SyncError {
        SyncError::SourceUnavailable {
            endpoint: self.settings.url.clone(),
            reason: err.to_string(),
            transient: err.is_retryable(),
        }
    }

    fn malformed(&self, reason: String) -> SyncError {
        SyncError::SourceUnavailable {
            endpoint: self.settings.url.clone(),
            reason,
            transient: false,
        }
    }

    /// Build a list URL with the page size and `query` pairs.
    fn list_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, SyncError> {
        let mut url =
            join_url(&self.settings.url, path).map_err(|e| self.malformed(format!("{e:#}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("limit", &self.settings.page_size.to_string());
        }
        Ok(url)
    }

    /// Fetch every page of a list endpoint, following `next` links.
    async fn list_all_paginated<T: DeserializeOwned>(&self, first: Url) -> Result<Vec<T>, SyncError> {
        let mut all_items = Vec::new();
        let mut next = Some(first);
        let mut page_count = 0;

        while let Some(url) = next.take() {
            page_count += 1;
            if page_count > MAX_NETBOX_PAGES {
                return Err(self.malformed(format!(
                    "Pagination did not terminate after {MAX_NETBOX_PAGES} pages"
                )));
            }

            let page: Page<T> =
                get_json(&self.client, &self.http, &url, ("Authorization", self.auth_header.as_str()))
                    .await
                    .map_err(|e| self.unavailable(&e))?;

            let item_count = page.results.len();
            all_items.extend(page.results);

            debug!(
                url = %url,
                page = page_count,
                items_in_page = item_count,
                total_items = all_items.len(),
                expected_total = ?page.count,
                "Fetched page from NetBox API"
            );

            next = match page.next {
                Some(link) => Some(
                    Url::parse(&link)
                        .map_err(|e| self.malformed(format!("Invalid next link '{link}': {e}")))?,
                ),
                None => None,
            };
        }

        Ok(all_items)
    }

    async fn ip_addresses(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<InventoryAddress>, SyncError> {
        let url = self.list_url(NETBOX_IP_ADDRESSES_PATH, query)?;
        let addresses: Vec<NetboxIpAddress> = self.list_all_paginated(url).await?;
        Ok(addresses
            .into_iter()
            .map(|ip| InventoryAddress {
                dns_name: ip.dns_name,
                family: ip.family.value,
                address: ip.address,
            })
            .collect())
    }
}

#[async_trait]
impl Inventory for NetboxClient {
    async fn addresses_by_dns_suffix(
        &self,
        zone: &str,
    ) -> Result<Vec<InventoryAddress>, SyncError> {
        let addresses = self.ip_addresses(&[("dns_name__iew", zone)]).await?;
        info!(zone = zone, count = addresses.len(), "Fetched NetBox addresses by DNS name");
        Ok(addresses)
    }

    async fn addresses_in_prefix(&self, prefix: &str) -> Result<Vec<InventoryAddress>, SyncError> {
        let addresses = self.ip_addresses(&[("parent", prefix)]).await?;
        info!(prefix = prefix, count = addresses.len(), "Fetched NetBox addresses in prefix");
        Ok(addresses)
    }

    async fn records_in_zone(
        &self,
        zone: &str,
        exclude_types: &[&str],
    ) -> Result<Vec<InventoryRecord>, SyncError> {
        let mut query = vec![("zone", zone)];
        query.extend(exclude_types.iter().map(|t| ("type__n", *t)));
        let url = self.list_url(NETBOX_DNS_RECORDS_PATH, &query)?;

        let records: Vec<NetboxDnsRecord> = self.list_all_paginated(url).await?;
        info!(zone = zone, count = records.len(), "Fetched NetBox DNS records");

        Ok(records
            .into_iter()
            .map(|r| InventoryRecord {
                name: r.name,
                record_type: r.record_type,
                value: r.value,
                zone: r.zone.name,
            })
            .collect())
    }

    async fn zones_by_tag(&self, tag: &str) -> Result<Vec<String>, SyncError> {
        let url = self.list_url(NETBOX_DNS_ZONES_PATH, &[("tag", tag)])?;
        let zones: Vec<NetboxDnsZone> = self.list_all_paginated(url).await?;
        info!(tag = tag, count = zones.len(), "Discovered NetBox DNS zones by tag");
        Ok(zones.into_iter().map(|z| z.name).collect())
    }
}
