// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `apply.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::reconcilers::partition::partition;
    use crate::reconcilers::reconcile::reconcile;
    use crate::testing::{MemoryStore, StoreCall};
    use crate::zone::ZoneDescriptor;

    const ZONE: &str = "example.com.";

    fn a(name: &str, value: &str) -> RecordTuple {
        RecordTuple::new(format!("{name}.example.com."), "A", value, ZONE)
    }

    fn set(tuples: &[RecordTuple]) -> RecordSet {
        tuples.iter().cloned().collect()
    }

    async fn observe(store: &MemoryStore) -> (RecordSet, RecordSet) {
        let zone = store.get_zone(ZONE).await.unwrap();
        let split = partition(&ZoneDescriptor::forward(ZONE), &zone.rrsets, "NetBox");
        (split.owned, split.unowned)
    }

    async fn run(store: &Arc<MemoryStore>, desired: &RecordSet, dry_run: bool) -> (ChangeSet, ApplyOutcome, String) {
        let (owned, unowned) = observe(store).await;
        let changes = reconcile(desired, &owned, &unowned);
        let applier = Applier::new(store.clone(), "NetBox", dry_run);
        let mut reporter = Reporter::new(Vec::new());
        let outcome = applier.apply(&changes, desired, &mut reporter).await;
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        (changes, outcome, text)
    }

    #[test]
    fn test_plan_groups_values_by_rrset() {
        let desired = set(&[a("a", "10.0.0.1"), a("a", "10.0.0.2")]);
        let changes = ChangeSet {
            to_create: desired.clone(),
            ..ChangeSet::default()
        };

        let plan = plan_mutations(&changes, &desired);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].action, Action::Create);
        assert_eq!(plan[0].tuples.len(), 2);
        assert_eq!(
            plan[0].op,
            MutationOp::Upsert {
                values: vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]
            }
        );
    }

    #[test]
    fn test_plan_create_carries_all_desired_values() {
        let desired = set(&[a("a", "10.0.0.1"), a("a", "10.0.0.2")]);
        let changes = ChangeSet {
            to_create: set(&[a("a", "10.0.0.2")]),
            ..ChangeSet::default()
        };

        let plan = plan_mutations(&changes, &desired);

        assert_eq!(
            plan[0].op,
            MutationOp::Upsert {
                values: vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]
            }
        );
    }

    #[test]
    fn test_plan_delete_shrinks_or_removes() {
        let desired = set(&[a("a", "10.0.0.1")]);
        let changes = ChangeSet {
            to_delete: set(&[a("a", "10.0.0.2"), a("b", "10.0.0.3")]),
            ..ChangeSet::default()
        };

        let plan = plan_mutations(&changes, &desired);

        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan[0].op,
            MutationOp::Upsert {
                values: vec!["10.0.0.1".to_string()]
            }
        );
        assert_eq!(plan[1].op, MutationOp::Remove);
        assert_eq!(plan[1].key.name, "b.example.com.");
    }

    #[test]
    fn test_plan_order_is_create_update_delete() {
        let desired = set(&[a("a", "10.0.0.1"), a("b", "10.0.0.2")]);
        let changes = ChangeSet {
            to_create: set(&[a("b", "10.0.0.2")]),
            to_update: set(&[a("a", "10.0.0.1")]),
            to_delete: set(&[a("c", "10.0.0.3")]),
            drift: set(&[a("d", "10.0.0.4")]),
        };

        let actions: Vec<Action> = plan_mutations(&changes, &desired)
            .iter()
            .map(|m| m.action)
            .collect();
        assert_eq!(actions, vec![Action::Create, Action::Update, Action::Delete]);
    }

    #[tokio::test]
    async fn test_apply_then_rerun_is_idempotent() {
        let store = Arc::new(MemoryStore::with_zones(&[ZONE]));
        store.seed(ZONE, "old.example.com.", "A", &["10.0.0.9"], Some("NetBox"));
        store.seed(ZONE, "b.example.com.", "A", &["10.0.0.2"], None);
        let desired = set(&[a("a", "10.0.0.1"), a("b", "10.0.0.2")]);

        let (_, first, _) = run(&store, &desired, false).await;
        assert_eq!(first.attempted, 3);
        assert!(first.failures.is_empty());

        let (changes, second, _) = run(&store, &desired, false).await;
        assert!(!changes.has_mutations());
        assert_eq!(second.attempted, 0);

        let (owned, unowned) = observe(&store).await;
        assert_eq!(owned, desired);
        assert!(unowned.is_empty());
    }

    #[tokio::test]
    async fn test_drift_is_never_mutated() {
        let store = Arc::new(MemoryStore::with_zones(&[ZONE]));
        store.seed(ZONE, "legacy.example.com.", "A", &["10.0.0.9"], None);
        store.seed(ZONE, "example.com.", "SOA", &["ns1 hostmaster 1 2 3 4 5"], None);
        let desired = set(&[a("a", "10.0.0.1")]);

        let (changes, _, _) = run(&store, &desired, false).await;
        assert_eq!(changes.drift.len(), 2);

        for call in store.calls() {
            let rrsets = match call {
                StoreCall::Upsert { rrsets, .. } | StoreCall::Delete { rrsets, .. } => rrsets,
            };
            for rrset in rrsets {
                assert_ne!(rrset.name, "legacy.example.com.");
                assert_ne!(rrset.record_type, "SOA");
            }
        }
        assert!(store.rrset(ZONE, "legacy.example.com.", "A").is_some());
    }

    #[tokio::test]
    async fn test_dry_run_traces_without_calls() {
        let store = Arc::new(MemoryStore::with_zones(&[ZONE]));
        store.seed(ZONE, "old.example.com.", "A", &["10.0.0.9"], Some("NetBox"));
        let desired = set(&[a("a", "10.0.0.1")]);

        let (changes, outcome, text) = run(&store, &desired, true).await;

        assert!(store.calls().is_empty());
        assert_eq!(outcome, ApplyOutcome::default());
        assert_eq!(changes.to_create.len(), 1);
        assert!(text.contains("Creating (a.example.com., A, 10.0.0.1, example.com.)"));
        assert!(text.contains("Deleting (old.example.com., A, 10.0.0.9, example.com.)"));
        assert_eq!(text.matches("----").count(), 3);
    }

    #[tokio::test]
    async fn test_adoption_writes_marker() {
        let store = Arc::new(MemoryStore::with_zones(&[ZONE]));
        store.seed(ZONE, "a.example.com.", "A", &["10.0.0.1"], None);
        let desired = set(&[a("a", "10.0.0.1")]);

        let (changes, _, text) = run(&store, &desired, false).await;

        assert_eq!(changes.to_update.len(), 1);
        assert!(text.contains("Updating (a.example.com., A, 10.0.0.1, example.com.)"));
        let rrset = store.rrset(ZONE, "a.example.com.", "A").unwrap();
        assert_eq!(rrset.comments[0].content, "NetBox");
    }

    #[tokio::test]
    async fn test_failed_call_does_not_stop_batch() {
        let mut store = MemoryStore::with_zones(&[ZONE]);
        store.failing_names.insert("a.example.com.".to_string());
        let store = Arc::new(store);
        let desired = set(&[a("a", "10.0.0.1"), a("a", "10.0.0.2"), a("b", "10.0.0.3")]);

        let (_, outcome, text) = run(&store, &desired, false).await;

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome
            .failures
            .iter()
            .all(|f| matches!(f, SyncError::MutationFailed { .. })));
        assert!(text.contains("Failed to create record (a.example.com., A, 10.0.0.1, example.com.)"));
        assert!(store.rrset(ZONE, "b.example.com.", "A").is_some());
    }
}
