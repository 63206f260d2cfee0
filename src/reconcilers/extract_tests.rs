// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `extract.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::netbox::InventoryRecord;
    use crate::testing::{address, MemoryInventory};
    use std::collections::HashMap;

    fn tuple(name: &str, record_type: &str, value: &str, zone: &str) -> RecordTuple {
        RecordTuple::new(name, record_type, value, zone)
    }

    fn record(name: &str, record_type: &str, value: &str, zone: &str) -> InventoryRecord {
        InventoryRecord {
            name: name.to_string(),
            record_type: record_type.to_string(),
            value: value.to_string(),
            zone: zone.to_string(),
        }
    }

    #[test]
    fn test_forward_records_infer_type_and_strip_prefix() {
        let zone = ZoneDescriptor::forward("example.com");
        let desired = forward_records(
            &zone,
            &[
                address("a.example.com", "10.0.0.1/24"),
                address("a.example.com", "2001:db8::1/64"),
            ],
        )
        .unwrap();

        let expected: RecordSet = [
            tuple("a.example.com.", "A", "10.0.0.1", "example.com."),
            tuple("a.example.com.", "AAAA", "2001:db8::1", "example.com."),
        ]
        .into_iter()
        .collect();
        assert_eq!(desired, expected);
    }

    #[test]
    fn test_forward_records_skip_foreign_and_empty_hostnames() {
        let zone = ZoneDescriptor::forward("example.com");
        let desired = forward_records(
            &zone,
            &[
                address("notexample.com", "10.0.0.9/24"),
                address("", "10.0.0.8/24"),
                address("b.example.com", "10.0.0.2/24"),
            ],
        )
        .unwrap();

        assert_eq!(desired.len(), 1);
        assert!(desired.contains(&tuple("b.example.com.", "A", "10.0.0.2", "example.com.")));
    }

    #[test]
    fn test_forward_records_collapse_duplicates() {
        let zone = ZoneDescriptor::forward("example.com");
        let desired = forward_records(
            &zone,
            &[
                address("a.example.com", "10.0.0.1/24"),
                address("a.example.com", "10.0.0.1/32"),
            ],
        )
        .unwrap();
        assert_eq!(desired.len(), 1);
    }

    #[test]
    fn test_invalid_address_is_source_unavailable() {
        let zone = ZoneDescriptor::forward("example.com");
        let err = forward_records(&zone, &[address("a.example.com", "10.0.0/24")]).unwrap_err();
        assert!(matches!(err, SyncError::SourceUnavailable { transient: false, .. }));
    }

    #[test]
    fn test_family_mismatch_is_source_unavailable() {
        let zone = ZoneDescriptor::forward("example.com");
        let mut entry = address("a.example.com", "10.0.0.1/24");
        entry.family = 6;
        assert!(forward_records(&zone, &[entry]).is_err());
    }

    #[test]
    fn test_reverse_records_emit_ptr() {
        let zone = ZoneDescriptor::reverse("0.0.10.in-addr.arpa", "10.0.0.0/24");
        let desired = reverse_records(
            &zone,
            &[
                address("a.example.com", "10.0.0.1/24"),
                address("", "10.0.0.2/24"),
            ],
        )
        .unwrap();

        let expected: RecordSet = [tuple(
            "1.0.0.10.in-addr.arpa.",
            "PTR",
            "a.example.com.",
            "0.0.10.in-addr.arpa.",
        )]
        .into_iter()
        .collect();
        assert_eq!(desired, expected);
    }

    #[test]
    fn test_delegated_records_exclude_ns_soa_and_resolve_apex() {
        let zone = ZoneDescriptor::forward("example.com");
        let desired = delegated_records(
            &zone,
            &[
                record("www", "A", "10.0.0.1", "example.com"),
                record("@", "MX", "10 mail.example.com.", "example.com"),
                record("@", "NS", "ns1.example.com.", "example.com"),
                record("@", "soa", "ns1 hostmaster 1 2 3 4 5", "example.com"),
                record("other", "A", "10.0.0.5", "example.org"),
                record("abs.example.com.", "CNAME", "www.example.com.", "example.com"),
            ],
        );

        let expected: RecordSet = [
            tuple("www.example.com.", "A", "10.0.0.1", "example.com."),
            tuple("example.com.", "MX", "10 mail.example.com.", "example.com."),
            tuple("abs.example.com.", "CNAME", "www.example.com.", "example.com."),
        ]
        .into_iter()
        .collect();
        assert_eq!(desired, expected);
    }

    #[tokio::test]
    async fn test_address_derived_extractor_uses_zone_role() {
        let mut inventory = MemoryInventory::with_addresses(vec![address(
            "a.example.com",
            "10.0.0.1/24",
        )]);
        inventory.prefixes = HashMap::from([(
            "10.0.0.0/24".to_string(),
            vec![address("a.example.com", "10.0.0.1/24")],
        )]);
        let extractor = extractor_for(ExtractStrategy::AddressDerived, Arc::new(inventory));

        let forward = extractor
            .desired(&ZoneDescriptor::forward("example.com"))
            .await
            .unwrap();
        assert!(forward.contains(&tuple("a.example.com.", "A", "10.0.0.1", "example.com.")));

        let reverse = extractor
            .desired(&ZoneDescriptor::reverse("0.0.10.in-addr.arpa", "10.0.0.0/24"))
            .await
            .unwrap();
        assert!(reverse.contains(&tuple(
            "1.0.0.10.in-addr.arpa.",
            "PTR",
            "a.example.com.",
            "0.0.10.in-addr.arpa."
        )));
    }

    #[tokio::test]
    async fn test_zone_delegated_extractor() {
        let inventory = MemoryInventory {
            records: vec![
                record("www", "A", "10.0.0.1", "example.com"),
                record("@", "NS", "ns1.example.com.", "example.com"),
            ],
            ..MemoryInventory::default()
        };
        let extractor = extractor_for(ExtractStrategy::ZoneDelegated, Arc::new(inventory));

        let desired = extractor
            .desired(&ZoneDescriptor::forward("example.com"))
            .await
            .unwrap();
        assert_eq!(desired.len(), 1);
    }

    #[tokio::test]
    async fn test_inventory_failure_propagates() {
        let mut inventory = MemoryInventory::default();
        inventory.failing.insert("example.com".to_string());
        let extractor = extractor_for(ExtractStrategy::AddressDerived, Arc::new(inventory));

        let err = extractor
            .desired(&ZoneDescriptor::forward("example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "SourceUnavailable");
    }
}
