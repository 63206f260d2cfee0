// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone descriptors: which zones a run touches and how each was selected.

use crate::record::fqdn;
use std::fmt;

/// Whether a zone holds forward (A/AAAA) or reverse (PTR) data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneRole {
    /// Forward zone; inventory addresses are selected by hostname suffix
    Forward,
    /// Reverse zone; inventory addresses are selected by prefix membership
    Reverse {
        /// CIDR prefix, e.g. `10.0.0.0/24`
        prefix: String,
    },
}

/// How a zone ended up in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneSelection {
    /// Listed by name in the configuration
    Explicit,
    /// Discovered from the inventory by tag
    Tag(String),
    /// Bound to a prefix in the configuration
    Prefix(String),
}

/// A zone selected for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDescriptor {
    /// Canonical zone name with trailing dot
    pub name: String,
    pub role: ZoneRole,
    pub selection: ZoneSelection,
}

impl ZoneDescriptor {
    /// Forward zone listed by name.
    #[must_use]
    pub fn forward(name: &str) -> Self {
        Self {
            name: fqdn(name),
            role: ZoneRole::Forward,
            selection: ZoneSelection::Explicit,
        }
    }

    /// Reverse zone bound to `prefix`.
    #[must_use]
    pub fn reverse(name: &str, prefix: &str) -> Self {
        Self {
            name: fqdn(name),
            role: ZoneRole::Reverse {
                prefix: prefix.to_string(),
            },
            selection: ZoneSelection::Prefix(prefix.to_string()),
        }
    }

    /// Forward zone discovered through `tag`.
    #[must_use]
    pub fn tagged(name: &str, tag: &str) -> Self {
        Self {
            name: fqdn(name),
            role: ZoneRole::Forward,
            selection: ZoneSelection::Tag(tag.to_string()),
        }
    }

    /// Zone name without the trailing dot, as the inventory stores it.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.name.trim_end_matches('.')
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        matches!(self.role, ZoneRole::Reverse { .. })
    }
}

impl fmt::Display for ZoneDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Keep only zones whose name matches one of `names`.
///
/// `names` may be written with or without the trailing dot. An empty filter
/// keeps everything.
#[must_use]
pub fn filter_zones(zones: Vec<ZoneDescriptor>, names: &[String]) -> Vec<ZoneDescriptor> {
    if names.is_empty() {
        return zones;
    }
    let wanted: Vec<String> = names.iter().map(|n| fqdn(n)).collect();
    zones
        .into_iter()
        .filter(|z| wanted.contains(&z.name))
        .collect()
}
