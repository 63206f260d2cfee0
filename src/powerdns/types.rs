// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS HTTP API types.
//!
//! These mirror the zone and RRSet objects of the PowerDNS authoritative API
//! (`/api/v1/servers/{server_id}/zones/{zone_id}`).

use serde::{Deserialize, Serialize};

/// A zone with all of its RRSets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    #[serde(default)]
    pub rrsets: Vec<RRSet>,
}

/// One value entry of an RRSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

/// A comment attached to an RRSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    #[serde(default)]
    pub account: String,
}

/// Name + type with its value entries and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub records: Vec<RecordEntry>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// `REPLACE` or `DELETE` when sent in a PATCH; absent when read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<String>,
}

impl RRSet {
    /// RRSet carrying `values`, each enabled, and the `marker` comment.
    #[must_use]
    pub fn managed(name: &str, record_type: &str, values: &[String], marker: &str) -> Self {
        Self {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl: None,
            records: values
                .iter()
                .map(|content| RecordEntry {
                    content: content.clone(),
                    disabled: false,
                })
                .collect(),
            comments: vec![Comment {
                content: marker.to_string(),
                account: String::new(),
            }],
            changetype: None,
        }
    }

    /// Bare name + type reference, used for deletions.
    #[must_use]
    pub fn reference(name: &str, record_type: &str) -> Self {
        Self {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl: None,
            records: Vec::new(),
            comments: Vec::new(),
            changetype: None,
        }
    }
}

/// Body of a zone PATCH request.
#[derive(Debug, Clone, Serialize)]
pub struct RRSetPatch {
    pub rrsets: Vec<RRSet>,
}
