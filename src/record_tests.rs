// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `record.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::net::IpAddr;

    #[test]
    fn test_fqdn_appends_dot_once() {
        assert_eq!(fqdn("example.com"), "example.com.");
        assert_eq!(fqdn("example.com."), "example.com.");
    }

    #[test]
    fn test_fqdn_preserves_case() {
        assert_eq!(fqdn("Host.Example.com"), "Host.Example.com.");
    }

    #[test]
    fn test_strip_prefix_len() {
        assert_eq!(strip_prefix_len("10.0.0.1/24"), "10.0.0.1");
        assert_eq!(strip_prefix_len("2001:db8::1/64"), "2001:db8::1");
        assert_eq!(strip_prefix_len("10.0.0.1"), "10.0.0.1");
    }

    #[test]
    fn test_reverse_pointer_ipv4() {
        let ip: IpAddr = "192.0.2.15".parse().unwrap();
        assert_eq!(reverse_pointer(&ip), "15.2.0.192.in-addr.arpa");
    }

    #[test]
    fn test_reverse_pointer_ipv6() {
        let ip: IpAddr = "2001:db8::567:89ab".parse().unwrap();
        assert_eq!(
            reverse_pointer(&ip),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa"
        );
    }

    #[test]
    fn test_address_record_type() {
        let v4: IpAddr = "10.0.0.1".parse().unwrap();
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(address_record_type(&v4), "A");
        assert_eq!(address_record_type(&v6), "AAAA");
    }

    #[test]
    fn test_is_within_zone_respects_label_boundary() {
        assert!(is_within_zone("a.example.com", "example.com."));
        assert!(is_within_zone("example.com", "example.com"));
        assert!(is_within_zone("A.Example.COM.", "example.com"));
        assert!(!is_within_zone("notexample.com", "example.com"));
        assert!(!is_within_zone("", "example.com"));
    }

    #[test]
    fn test_tuple_equality_uses_all_fields() {
        let a = RecordTuple::new("a.example.com.", "A", "10.0.0.1", "example.com.");
        let other_zone = RecordTuple::new("a.example.com.", "A", "10.0.0.1", "com.");
        let other_case = RecordTuple::new("A.example.com.", "A", "10.0.0.1", "example.com.");

        assert_ne!(a, other_zone);
        assert_ne!(a, other_case);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_record_set_collapses_duplicates() {
        let mut set = RecordSet::new();
        set.insert(RecordTuple::new("a.example.com.", "A", "10.0.0.1", "example.com."));
        set.insert(RecordTuple::new("a.example.com.", "A", "10.0.0.1", "example.com."));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_tuple_display() {
        let t = RecordTuple::new("a.example.com.", "A", "10.0.0.1", "example.com.");
        assert_eq!(t.to_string(), "(a.example.com., A, 10.0.0.1, example.com.)");
    }

    #[test]
    fn test_rrset_key_drops_value() {
        let one = RecordTuple::new("a.example.com.", "A", "10.0.0.1", "example.com.");
        let two = RecordTuple::new("a.example.com.", "A", "10.0.0.2", "example.com.");
        assert_eq!(one.rrset_key(), two.rrset_key());
    }
}
