// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Run configuration.
//!
//! Configuration is read from a YAML file and passed explicitly into every
//! component. API credentials may be supplied through the environment
//! (`NETBOX_TOKEN`, `PDNS_API_KEY`) instead of the file; the environment wins
//! when both are present.
//!
//! # Example
//!
//! ```yaml
//! netbox:
//!   url: https://netbox.example.com
//! powerdns:
//!   url: https://pdns.example.com
//! forward_zones:
//!   - example.com
//! reverse_zones:
//!   - prefix: 10.0.0.0/24
//!     zone: 0.0.10.in-addr.arpa
//! ```

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_NETBOX_PAGE_SIZE, DEFAULT_OWNERSHIP_MARKER,
    DEFAULT_PDNS_SERVER_ID, DEFAULT_RECORD_TTL_SECS, DEFAULT_RETRY_INITIAL_INTERVAL_MILLIS,
    DEFAULT_RETRY_MAX_ELAPSED_SECS, DEFAULT_RETRY_MAX_INTERVAL_SECS, ENV_NETBOX_TOKEN,
    ENV_PDNS_API_KEY,
};
use crate::zone::ZoneDescriptor;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// How desired records are derived from the inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractStrategy {
    /// A/AAAA/PTR inferred from IP address objects and their DNS names
    #[default]
    AddressDerived,
    /// Records read from the NetBox DNS plugin, scoped to a zone
    ZoneDelegated,
}

/// NetBox connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetboxSettings {
    /// Base URL, e.g. `https://netbox.example.com`
    pub url: String,
    /// API token; may be left empty and supplied via `NETBOX_TOKEN`
    #[serde(default)]
    pub token: String,
    /// Page size for list queries
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// PowerDNS connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerDnsSettings {
    /// Base URL, e.g. `https://pdns.example.com`
    pub url: String,
    /// API key; may be left empty and supplied via `PDNS_API_KEY`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_server_id")]
    pub server_id: String,
    /// TTL written on every managed RRSet
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

/// A reverse zone and the prefix whose addresses feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReverseZone {
    /// CIDR prefix, e.g. `10.0.0.0/24`
    pub prefix: String,
    /// Zone name, e.g. `0.0.10.in-addr.arpa`
    pub zone: String,
}

/// HTTP client and retry settings shared by both connectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HttpSettings {
    /// Per-request timeout
    pub timeout_secs: u64,
    pub retry_initial_interval_ms: u64,
    pub retry_max_interval_secs: u64,
    /// Total retry budget for one request; 0 disables retries
    pub retry_max_elapsed_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            retry_initial_interval_ms: DEFAULT_RETRY_INITIAL_INTERVAL_MILLIS,
            retry_max_interval_secs: DEFAULT_RETRY_MAX_INTERVAL_SECS,
            retry_max_elapsed_secs: DEFAULT_RETRY_MAX_ELAPSED_SECS,
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub netbox: NetboxSettings,
    pub powerdns: PowerDnsSettings,
    /// Extra PEM root certificate(s) trusted by both connectors
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
    #[serde(default)]
    pub strategy: ExtractStrategy,
    #[serde(default = "default_ownership_marker")]
    pub ownership_marker: String,
    #[serde(default)]
    pub forward_zones: Vec<String>,
    #[serde(default)]
    pub reverse_zones: Vec<ReverseZone>,
    /// Discover additional zones from the NetBox DNS plugin by tag
    #[serde(default)]
    pub zone_tag: Option<String>,
    /// Classify and report only; never mutate PowerDNS
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_page_size() -> u32 {
    DEFAULT_NETBOX_PAGE_SIZE
}

fn default_server_id() -> String {
    DEFAULT_PDNS_SERVER_ID.to_string()
}

fn default_ttl() -> u32 {
    DEFAULT_RECORD_TTL_SECS
}

fn default_ownership_marker() -> String {
    DEFAULT_OWNERSHIP_MARKER.to_string()
}

impl Config {
    /// Parse a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or has unknown fields.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse configuration YAML")
    }

    /// Read, parse and complete a configuration file.
    ///
    /// Credentials are taken from the process environment when set, then the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let mut config = Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override credentials from environment lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_NETBOX_TOKEN).filter(|t| !t.is_empty()) {
            self.netbox.token = token;
        }
        if let Some(key) = lookup(ENV_PDNS_API_KEY).filter(|k| !k.is_empty()) {
            self.powerdns.api_key = key;
        }
    }

    /// Check the configuration for errors that would only surface mid-run.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.netbox.url)
            .with_context(|| format!("Invalid NetBox URL '{}'", self.netbox.url))?;
        url::Url::parse(&self.powerdns.url)
            .with_context(|| format!("Invalid PowerDNS URL '{}'", self.powerdns.url))?;

        if self.netbox.token.is_empty() {
            bail!("NetBox token is not set (config netbox.token or {ENV_NETBOX_TOKEN})");
        }
        if self.powerdns.api_key.is_empty() {
            bail!("PowerDNS API key is not set (config powerdns.api_key or {ENV_PDNS_API_KEY})");
        }
        if self.netbox.page_size == 0 {
            bail!("netbox.page_size must be greater than zero");
        }
        if self.ownership_marker.is_empty() {
            bail!("ownership_marker must not be empty");
        }

        if self.forward_zones.is_empty() && self.reverse_zones.is_empty() && self.zone_tag.is_none()
        {
            bail!("No zones selected: set forward_zones, reverse_zones or zone_tag");
        }

        if self.zone_tag.is_some() && self.strategy != ExtractStrategy::ZoneDelegated {
            bail!("zone_tag discovery requires strategy 'zone-delegated'");
        }

        for zone in &self.forward_zones {
            if zone.trim_end_matches('.').is_empty() {
                bail!("Empty forward zone name");
            }
        }

        for reverse in &self.reverse_zones {
            parse_prefix(&reverse.prefix).with_context(|| {
                format!("Invalid prefix for reverse zone '{}'", reverse.zone)
            })?;
            if reverse.zone.trim_end_matches('.').is_empty() {
                bail!("Empty reverse zone name for prefix {}", reverse.prefix);
            }
        }

        Ok(())
    }

    /// Zones named directly in the configuration.
    #[must_use]
    pub fn configured_zones(&self) -> Vec<ZoneDescriptor> {
        self.forward_zones
            .iter()
            .map(|z| ZoneDescriptor::forward(z))
            .chain(
                self.reverse_zones
                    .iter()
                    .map(|r| ZoneDescriptor::reverse(&r.zone, &r.prefix)),
            )
            .collect()
    }
}

/// Parse a CIDR prefix into network address and length.
///
/// # Errors
///
/// Returns an error if the address or length is invalid for its family.
pub fn parse_prefix(prefix: &str) -> Result<(IpAddr, u8)> {
    let Some((addr, len)) = prefix.split_once('/') else {
        bail!("Prefix '{prefix}' has no length");
    };
    let ip: IpAddr = addr
        .parse()
        .with_context(|| format!("Invalid address in prefix '{prefix}'"))?;
    let len: u8 = len
        .parse()
        .with_context(|| format!("Invalid length in prefix '{prefix}'"))?;
    let max = if ip.is_ipv4() { 32 } else { 128 };
    if len > max {
        bail!("Prefix length {len} exceeds {max} in '{prefix}'");
    }
    Ok((ip, len))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
