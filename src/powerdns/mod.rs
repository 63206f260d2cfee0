// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Authoritative DNS store access.
//!
//! The engine reads and writes zones only through the [`DnsStore`] trait.
//! [`PowerDnsClient`] implements it against the PowerDNS authoritative HTTP
//! API:
//!
//! - `GET   /api/v1/servers/{server_id}/zones/{zone}` - read a zone
//! - `PATCH /api/v1/servers/{server_id}/zones/{zone}` - replace or delete RRSets
//!
//! Writes use `changetype: REPLACE`, which swaps the full value set of an
//! RRSet, so applying the same RRSet twice leaves the zone unchanged.

pub mod types;

use crate::config::{HttpSettings, PowerDnsSettings};
use crate::constants::{CHANGETYPE_DELETE, CHANGETYPE_REPLACE, PDNS_API_KEY_HEADER};
use crate::errors::SyncError;
use crate::http::{api_request, get_json, join_url, RequestError};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use tracing::{debug, info};
use types::{RRSet, RRSetPatch, Zone};
use url::Url;

/// Read/write access to the authoritative DNS store.
#[async_trait]
pub trait DnsStore: Send + Sync {
    /// Read `zone` with all of its RRSets.
    async fn get_zone(&self, zone: &str) -> Result<Zone, SyncError>;

    /// Replace the full value set of each RRSet in `zone`.
    async fn create_or_update_records(&self, zone: &str, rrsets: &[RRSet]) -> Result<(), SyncError>;

    /// Remove each RRSet (name + type) from `zone`.
    async fn delete_records(&self, zone: &str, rrsets: &[RRSet]) -> Result<(), SyncError>;
}

/// PowerDNS HTTP API client.
#[derive(Debug, Clone)]
pub struct PowerDnsClient {
    client: HttpClient,
    settings: PowerDnsSettings,
    http: HttpSettings,
}

impl PowerDnsClient {
    #[must_use]
    pub fn new(client: HttpClient, settings: PowerDnsSettings, http: HttpSettings) -> Self {
        Self {
            client,
            settings,
            http,
        }
    }

    fn auth(&self) -> (&str, &str) {
        (PDNS_API_KEY_HEADER, self.settings.api_key.as_str())
    }

    fn unavailable(&self, err: &RequestError) -> SyncError {
        SyncError::StoreUnavailable {
            endpoint: self.settings.url.clone(),
            reason: err.to_string(),
            transient: err.is_retryable(),
        }
    }

    fn malformed(&self, reason: String) -> SyncError {
        SyncError::StoreUnavailable {
            endpoint: self.settings.url.clone(),
            reason,
            transient: false,
        }
    }

    /// URL of `zone` on the configured server.
    fn zone_url(&self, zone: &str) -> Result<Url, SyncError> {
        let mut url = join_url(&self.settings.url, "api/v1/servers/")
            .map_err(|e| self.malformed(format!("{e:#}")))?;
        url.path_segments_mut()
            .map_err(|()| self.malformed(format!("Base URL '{}' cannot be a base", self.settings.url)))?
            .pop_if_empty()
            .push(&self.settings.server_id)
            .push("zones")
            .push(zone);
        Ok(url)
    }

    /// Send a PATCH with `rrsets`, each tagged with `changetype`.
    async fn patch_rrsets(
        &self,
        zone: &str,
        rrsets: &[RRSet],
        changetype: &str,
    ) -> Result<(), SyncError> {
        let url = self.zone_url(zone)?;
        let body = RRSetPatch {
            rrsets: rrsets
                .iter()
                .map(|rrset| RRSet {
                    changetype: Some(changetype.to_string()),
                    ttl: if changetype == CHANGETYPE_REPLACE {
                        rrset.ttl.or(Some(self.settings.ttl))
                    } else {
                        None
                    },
                    ..rrset.clone()
                })
                .collect(),
        };

        api_request(&self.client, &self.http, Method::PATCH, &url, self.auth(), Some(&body))
            .await
            .map_err(|e| match e.status() {
                Some(StatusCode::NOT_FOUND) => SyncError::ZoneNotFound {
                    zone: zone.to_string(),
                    endpoint: self.settings.url.clone(),
                },
                _ => self.unavailable(&e),
            })?;

        debug!(
            zone = zone,
            changetype = changetype,
            rrsets = rrsets.len(),
            "Patched PowerDNS zone"
        );
        Ok(())
    }
}

/// PowerDNS answers 404 for unknown zones; older releases used 422.
fn is_zone_missing(err: &RequestError) -> bool {
    match err {
        RequestError::Status {
            status, message, ..
        } => {
            *status == StatusCode::NOT_FOUND
                || (*status == StatusCode::UNPROCESSABLE_ENTITY
                    && message.contains("Could not find domain"))
        }
        _ => false,
    }
}

#[async_trait]
impl DnsStore for PowerDnsClient {
    async fn get_zone(&self, zone: &str) -> Result<Zone, SyncError> {
        let url = self.zone_url(zone)?;
        let parsed: Zone = get_json(&self.client, &self.http, &url, self.auth())
            .await
            .map_err(|e| {
                if is_zone_missing(&e) {
                    SyncError::ZoneNotFound {
                        zone: zone.to_string(),
                        endpoint: self.settings.url.clone(),
                    }
                } else {
                    self.unavailable(&e)
                }
            })?;

        if let Some(bad) = parsed
            .rrsets
            .iter()
            .find(|r| r.name.is_empty() || r.record_type.is_empty())
        {
            return Err(self.malformed(format!(
                "Zone {zone} has an RRSet without name or type: {bad:?}"
            )));
        }

        info!(
            zone = zone,
            rrsets = parsed.rrsets.len(),
            "Fetched PowerDNS zone"
        );
        Ok(parsed)
    }

    async fn create_or_update_records(&self, zone: &str, rrsets: &[RRSet]) -> Result<(), SyncError> {
        self.patch_rrsets(zone, rrsets, CHANGETYPE_REPLACE).await
    }

    async fn delete_records(&self, zone: &str, rrsets: &[RRSet]) -> Result<(), SyncError> {
        self.patch_rrsets(zone, rrsets, CHANGETYPE_DELETE).await
    }
}
