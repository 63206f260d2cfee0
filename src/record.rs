// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Canonical record tuples.
//!
//! A [`RecordTuple`] is the identity used for every set comparison in the
//! reconciler: `(name, type, value, zone)`, with `name` and `zone` written as
//! fully-qualified names ending in a dot. Two tuples are equal only if all
//! four fields are byte-for-byte equal; nothing is lowercased or trimmed
//! behind the caller's back.

use crate::constants::{IPV4_REVERSE_SUFFIX, IPV6_REVERSE_SUFFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

/// Ordered set of record tuples.
///
/// Ordered so reports and mutation traces come out in a stable order.
pub type RecordSet = BTreeSet<RecordTuple>;

/// Identity key of a single DNS value entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordTuple {
    /// Fully-qualified owner name with trailing dot
    pub name: String,
    /// Resource record type (e.g. "A", "PTR")
    pub record_type: String,
    /// Record data as the store renders it
    pub value: String,
    /// Fully-qualified zone name with trailing dot
    pub zone: String,
}

impl RecordTuple {
    /// Build a tuple from already-canonical parts.
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            zone: zone.into(),
        }
    }

    /// The RRSet this value entry belongs to.
    #[must_use]
    pub fn rrset_key(&self) -> RRSetKey {
        RRSetKey {
            zone: self.zone.clone(),
            name: self.name.clone(),
            record_type: self.record_type.clone(),
        }
    }
}

impl fmt::Display for RecordTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.name, self.record_type, self.value, self.zone
        )
    }
}

/// Zone + name + type: the unit the store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RRSetKey {
    pub zone: String,
    pub name: String,
    pub record_type: String,
}

/// Append the trailing dot to a domain name if it is missing.
///
/// This is the only canonicalization applied to names; case is preserved.
#[must_use]
pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Strip a `/len` prefix length from an inventory address (`10.0.0.1/24` -> `10.0.0.1`).
#[must_use]
pub fn strip_prefix_len(address: &str) -> &str {
    address.split_once('/').map_or(address, |(ip, _)| ip)
}

/// Record type matching the address family of `ip`.
#[must_use]
pub fn address_record_type(ip: &IpAddr) -> &'static str {
    match ip {
        IpAddr::V4(_) => crate::constants::RECORD_TYPE_A,
        IpAddr::V6(_) => crate::constants::RECORD_TYPE_AAAA,
    }
}

/// Standard reverse lookup name for `ip`, without trailing dot.
///
/// IPv4 addresses map to `d.c.b.a.in-addr.arpa`, IPv6 addresses to the 32
/// reversed nibbles under `ip6.arpa`.
#[must_use]
pub fn reverse_pointer(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.{IPV4_REVERSE_SUFFIX}")
        }
        IpAddr::V6(v6) => {
            let mut labels: Vec<String> = Vec::with_capacity(33);
            for byte in v6.octets().iter().rev() {
                labels.push(format!("{:x}", byte & 0x0f));
                labels.push(format!("{:x}", byte >> 4));
            }
            labels.push(IPV6_REVERSE_SUFFIX.to_string());
            labels.join(".")
        }
    }
}

/// True if `hostname` is `zone` or lies below it.
///
/// Used only to select inventory entries for a forward zone; the comparison
/// ignores case and a trailing dot on either side.
#[must_use]
pub fn is_within_zone(hostname: &str, zone: &str) -> bool {
    let host = hostname.trim_end_matches('.').to_ascii_lowercase();
    let zone = zone.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() || zone.is_empty() {
        return false;
    }
    host == zone || host.ends_with(&format!(".{zone}"))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
