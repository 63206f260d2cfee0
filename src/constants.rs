// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for netbox-pdns-sync.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Ownership
// ============================================================================

/// Comment attached to every RRSet this tool creates.
///
/// Its presence on an RRSet is the only signal that the RRSet is managed.
pub const DEFAULT_OWNERSHIP_MARKER: &str = "NetBox";

// ============================================================================
// DNS Record Types
// ============================================================================

/// IPv4 address record
pub const RECORD_TYPE_A: &str = "A";

/// IPv6 address record
pub const RECORD_TYPE_AAAA: &str = "AAAA";

/// Reverse lookup pointer record
pub const RECORD_TYPE_PTR: &str = "PTR";

/// Delegation record, never synced from the inventory
pub const RECORD_TYPE_NS: &str = "NS";

/// Zone authority record, never synced from the inventory
pub const RECORD_TYPE_SOA: &str = "SOA";

/// Record types excluded by the zone-delegated extractor
pub const EXCLUDED_RECORD_TYPES: &[&str] = &[RECORD_TYPE_NS, RECORD_TYPE_SOA];

/// Owner name used by the NetBox DNS plugin for the zone apex
pub const ZONE_APEX_NAME: &str = "@";

/// Suffix of IPv4 reverse lookup names
pub const IPV4_REVERSE_SUFFIX: &str = "in-addr.arpa";

/// Suffix of IPv6 reverse lookup names
pub const IPV6_REVERSE_SUFFIX: &str = "ip6.arpa";

// ============================================================================
// PowerDNS API
// ============================================================================

/// Default PowerDNS server id (the only one an authoritative server exposes)
pub const DEFAULT_PDNS_SERVER_ID: &str = "localhost";

/// Default TTL for RRSets written to PowerDNS (1 hour)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 3600;

/// PowerDNS authentication header
pub const PDNS_API_KEY_HEADER: &str = "X-API-Key";

/// RRSet change type that replaces the full value set
pub const CHANGETYPE_REPLACE: &str = "REPLACE";

/// RRSet change type that removes the RRSet
pub const CHANGETYPE_DELETE: &str = "DELETE";

// ============================================================================
// NetBox API
// ============================================================================

/// Default NetBox page size for list endpoints
pub const DEFAULT_NETBOX_PAGE_SIZE: u32 = 1000;

/// IP address list endpoint
pub const NETBOX_IP_ADDRESSES_PATH: &str = "api/ipam/ip-addresses/";

/// NetBox DNS plugin record list endpoint
pub const NETBOX_DNS_RECORDS_PATH: &str = "api/plugins/netbox-dns/records/";

/// NetBox DNS plugin zone list endpoint
pub const NETBOX_DNS_ZONES_PATH: &str = "api/plugins/netbox-dns/zones/";

/// Safety limit on followed pages for a single list query
pub const MAX_NETBOX_PAGES: usize = 10_000;

// ============================================================================
// HTTP Client
// ============================================================================

/// Default per-request timeout (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default initial retry interval (50ms)
pub const DEFAULT_RETRY_INITIAL_INTERVAL_MILLIS: u64 = 50;

/// Default maximum interval between retries (10 seconds)
pub const DEFAULT_RETRY_MAX_INTERVAL_SECS: u64 = 10;

/// Default maximum total retry time per request (1 minute)
pub const DEFAULT_RETRY_MAX_ELAPSED_SECS: u64 = 60;

/// User agent sent on every request
pub const USER_AGENT: &str = concat!("netbox-pdns-sync/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Process
// ============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "netbox-pdns-sync.yaml";

/// Environment variable holding the NetBox API token
pub const ENV_NETBOX_TOKEN: &str = "NETBOX_TOKEN";

/// Environment variable holding the PowerDNS API key
pub const ENV_PDNS_API_KEY: &str = "PDNS_API_KEY";

/// Exit code when the run finished with faults
pub const EXIT_CODE_FAULTS: u8 = 1;

/// Exit code when the run was interrupted by SIGINT
pub const EXIT_CODE_INTERRUPTED: u8 = 130;
