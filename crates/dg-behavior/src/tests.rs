//! Unit tests for dg-behavior.

use std::sync::Arc;

use dg_core::{DgResult, Value};

use crate::{BehaviorSet, BehaviorSetBuilder, Entity, expect_arity};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `counter` kind: `bump` adds 1 to `count`, `twice` bumps twice via nested
/// calls, `who` returns the receiver's `label`.
fn counter_kind() -> Arc<BehaviorSet> {
    BehaviorSetBuilder::new("counter")
        .operation("bump", |rx, args| {
            expect_arity("bump", args, 0)?;
            rx.add_int("count", 1).map(Value::Int)
        })
        .operation("twice", |rx, _args| {
            rx.invoke("bump", &[])?;
            rx.invoke("bump", &[])
        })
        .operation("who", |rx, _args| Ok(Value::from(rx.text_field("label")?)))
        .build()
        .expect("counter kind builds")
}

/// `fancy` extends `counter` with `reset`.
fn fancy_kind(parent: &Arc<BehaviorSet>) -> Arc<BehaviorSet> {
    BehaviorSetBuilder::new("fancy")
        .extends(parent)
        .operation("reset", |rx, _args| {
            rx.set_field("count", 0);
            Ok(Value::Unit)
        })
        .build()
        .expect("fancy kind builds")
}

fn counter_entity(kind: &Arc<BehaviorSet>, label: &str, count: i64) -> Entity {
    let mut e = Entity::new(kind);
    e.set_field("label", label);
    e.set_field("count", count);
    e
}

// ── BehaviorSet ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod set_tests {
    use dg_core::DgError;

    use super::*;

    #[test]
    fn root_set_has_no_parent() {
        let kind = counter_kind();
        assert_eq!(kind.name(), "counter");
        assert!(kind.parent().is_none());
        assert_eq!(kind.depth(), 0);
    }

    #[test]
    fn operation_names_are_sorted_and_own_only() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        assert_eq!(base.operation_names(), vec!["bump", "twice", "who"]);
        assert_eq!(fancy.operation_names(), vec!["reset"]);
        assert!(fancy.defines("reset"));
        assert!(!fancy.defines("bump"));
    }

    #[test]
    fn ancestors_run_child_to_root() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let names: Vec<&str> = fancy.ancestors().map(BehaviorSet::name).collect();
        assert_eq!(names, vec!["fancy", "counter"]);
        assert_eq!(fancy.depth(), 1);
        assert!(fancy.extends("counter"));
        assert!(fancy.extends("fancy"));
        assert!(!base.extends("fancy"));
    }

    #[test]
    fn lookup_reports_supplying_level() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let (_, owner, depth) = fancy.lookup("bump").expect("bump is inherited");
        assert_eq!(owner.name(), "counter");
        assert_eq!(depth, 1);
        assert!(fancy.lookup("missing").is_none());
    }

    #[test]
    fn child_shares_parent_not_copy() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let parent = fancy.parent().expect("fancy has a parent");
        assert!(Arc::ptr_eq(parent, &base));
    }

    #[test]
    fn extending_own_name_is_cyclic() {
        let base = counter_kind();
        let err = BehaviorSetBuilder::new("counter").extends(&base).build().unwrap_err();
        assert_eq!(
            err,
            DgError::CyclicExtension {
                kind: "counter".into(),
                path: vec!["counter".into(), "counter".into()],
            }
        );
    }

    #[test]
    fn extending_descendant_with_ancestor_name_is_cyclic() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let err = BehaviorSetBuilder::new("counter").extends(&fancy).build().unwrap_err();
        match err {
            DgError::CyclicExtension { kind, path } => {
                assert_eq!(kind, "counter");
                assert_eq!(path, vec!["counter", "fancy", "counter"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn named_parent_without_catalog_is_unknown() {
        let err = BehaviorSetBuilder::new("paid").extends_kind("user").build().unwrap_err();
        assert_eq!(err, DgError::UnknownKind("user".into()));
    }

    #[test]
    fn last_registration_wins() {
        let kind = BehaviorSetBuilder::new("k")
            .operation("op", |_, _| Ok(Value::Int(1)))
            .operation("op", |_, _| Ok(Value::Int(2)))
            .build()
            .unwrap();
        let mut e = Entity::new(&kind);
        assert_eq!(e.invoke("op", &[]).unwrap(), Value::Int(2));
    }

    #[test]
    fn sets_are_shareable_across_threads() {
        let kind = counter_kind();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let kind = Arc::clone(&kind);
                std::thread::spawn(move || {
                    let mut e = counter_entity(&kind, "t", i);
                    e.invoke("bump", &[]).unwrap();
                    e.int_field("count").unwrap()
                })
            })
            .collect();
        let mut results: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort_unstable();
        assert_eq!(results, vec![1, 2, 3, 4]);
    }
}

// ── KindCatalog ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog_tests {
    use dg_core::DgError;

    use crate::{KindCatalogBuilder, Operation};

    use super::*;

    fn named(name: &str, parent: Option<&str>) -> BehaviorSetBuilder {
        let b = BehaviorSetBuilder::new(name);
        match parent {
            Some(p) => b.extends_kind(p),
            None => b,
        }
    }

    #[test]
    fn forward_references_link() {
        let catalog = KindCatalogBuilder::new()
            .declare(named("c", Some("b")))
            .declare(named("b", Some("a")))
            .declare(named("a", None))
            .finish()
            .unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.names(), vec!["a", "b", "c"]);
        let c = catalog.get("c").unwrap();
        assert_eq!(c.depth(), 2);
        let b = catalog.get("b").unwrap();
        assert!(Arc::ptr_eq(c.parent().unwrap(), b));
    }

    #[test]
    fn self_extension_rejected() {
        let err = KindCatalogBuilder::new()
            .declare(named("a", Some("a")))
            .finish()
            .unwrap_err();
        assert_eq!(
            err,
            DgError::CyclicExtension { kind: "a".into(), path: vec!["a".into(), "a".into()] }
        );
    }

    #[test]
    fn two_kind_cycle_rejected() {
        let err = KindCatalogBuilder::new()
            .declare(named("a", Some("b")))
            .declare(named("b", Some("a")))
            .finish()
            .unwrap_err();
        assert!(matches!(err, DgError::CyclicExtension { .. }));
    }

    #[test]
    fn three_kind_cycle_reports_path() {
        let err = KindCatalogBuilder::new()
            .declare(named("root", None))
            .declare(named("x", Some("y")))
            .declare(named("y", Some("z")))
            .declare(named("z", Some("x")))
            .finish()
            .unwrap_err();
        match err {
            DgError::CyclicExtension { path, .. } => {
                assert_eq!(path, vec!["x", "y", "z", "x"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_parent_rejected() {
        let err = KindCatalogBuilder::new()
            .declare(named("paid", Some("user")))
            .finish()
            .unwrap_err();
        assert_eq!(err, DgError::UnknownKind("user".into()));
    }

    #[test]
    fn duplicate_rejected() {
        let err = KindCatalogBuilder::new()
            .declare(named("user", None))
            .declare(named("user", None))
            .finish()
            .unwrap_err();
        assert_eq!(err, DgError::DuplicateKind("user".into()));
    }

    #[test]
    fn get_unknown_kind() {
        let catalog = KindCatalogBuilder::new().finish().unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.get("nope").unwrap_err(), DgError::UnknownKind("nope".into()));
    }

    #[test]
    fn catalog_kind_can_extend_prebuilt_set() {
        let base = counter_kind();
        let catalog = KindCatalogBuilder::new()
            .declare(BehaviorSetBuilder::new("child").extends(&base))
            .finish()
            .unwrap();
        let child = catalog.get("child").unwrap();
        assert!(child.extends("counter"));
        assert!(!catalog.contains("counter"));
    }

    #[test]
    fn inherited_operations_work_through_catalog() {
        let catalog = KindCatalogBuilder::new()
            .declare(named("child", Some("base")))
            .declare(
                named("base", None)
                    .with_operation("one", Operation::new(|_, _| Ok(Value::Int(1)))),
            )
            .finish()
            .unwrap();
        let mut e = Entity::new(catalog.get("child").unwrap());
        assert_eq!(e.invoke("one", &[]).unwrap(), Value::Int(1));
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod entity_tests {
    use dg_core::DgError;

    use super::*;

    #[test]
    fn fields_read_and_write() {
        let kind = counter_kind();
        let mut e = counter_entity(&kind, "Phil", 4);
        assert_eq!(e.int_field("count").unwrap(), 4);
        assert_eq!(e.text_field("label").unwrap(), "Phil");
        assert_eq!(e.set_field("count", 9), Some(Value::Int(4)));
        assert!(e.has_field("count"));
        assert_eq!(e.field_names().collect::<Vec<_>>(), vec!["count", "label"]);
        assert_eq!(e.remove_field("count"), Some(Value::Int(9)));
        assert!(!e.has_field("count"));
    }

    #[test]
    fn typed_reads_report_errors() {
        let kind = counter_kind();
        let e = counter_entity(&kind, "Phil", 4);
        assert_eq!(e.int_field("nope").unwrap_err(), DgError::MissingField("nope".into()));
        assert_eq!(
            e.int_field("label").unwrap_err(),
            DgError::FieldType { field: "label".into(), expected: "int", found: "text" }
        );
        assert!(matches!(e.text_field("count"), Err(DgError::FieldType { .. })));
    }

    #[test]
    fn add_int_overflow_leaves_field() {
        let kind = counter_kind();
        let mut e = counter_entity(&kind, "max", i64::MAX);
        assert_eq!(e.add_int("count", 1).unwrap_err(), DgError::Overflow("count".into()));
        assert_eq!(e.int_field("count").unwrap(), i64::MAX);
    }

    #[test]
    fn entities_share_kind() {
        let kind = counter_kind();
        let before = Arc::strong_count(&kind);
        let a = counter_entity(&kind, "a", 0);
        let b = counter_entity(&kind, "b", 0);
        assert_eq!(Arc::strong_count(&kind), before + 2);
        assert!(Arc::ptr_eq(a.kind(), b.kind()));
        drop(a);
        assert_eq!(Arc::strong_count(&kind), before + 1);
    }

    #[test]
    fn is_kind_of_walks_chain() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let e = Entity::new(&fancy);
        assert_eq!(e.kind_name(), "fancy");
        assert!(e.is_kind_of("fancy"));
        assert!(e.is_kind_of("counter"));
        assert!(!Entity::new(&base).is_kind_of("fancy"));
    }

    #[test]
    fn clone_copies_fields_and_shares_kind() {
        let kind = counter_kind();
        let a = counter_entity(&kind, "a", 1);
        let mut b = a.clone();
        b.invoke("bump", &[]).unwrap();
        assert_eq!(a.int_field("count").unwrap(), 1);
        assert_eq!(b.int_field("count").unwrap(), 2);
        assert!(Arc::ptr_eq(a.kind(), b.kind()));
    }

    #[test]
    fn debug_shows_kind_name() {
        let kind = counter_kind();
        let e = counter_entity(&kind, "a", 1);
        let text = format!("{e:?}");
        assert!(text.contains("counter"));
        assert!(text.contains("label"));
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use dg_core::DgError;

    use crate::{Operation, Source, invoke, invoke_with, resolve};

    use super::*;

    #[test]
    fn invoke_mutates_receiver() {
        let kind = counter_kind();
        let mut e = counter_entity(&kind, "a", 4);
        assert_eq!(invoke(&mut e, "bump", &[]).unwrap(), Value::Int(5));
        assert_eq!(e.int_field("count").unwrap(), 5);
    }

    #[test]
    fn inherited_operation_binds_original_receiver() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let mut e = counter_entity(&fancy, "child", 10);
        e.invoke("bump", &[]).unwrap();
        assert_eq!(e.int_field("count").unwrap(), 11);
        assert_eq!(e.invoke("who", &[]).unwrap(), Value::from("child"));
        e.invoke("reset", &[]).unwrap();
        assert_eq!(e.int_field("count").unwrap(), 0);
    }

    #[test]
    fn nested_calls_keep_receiver() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let mut e = counter_entity(&fancy, "child", 0);
        assert_eq!(e.invoke("twice", &[]).unwrap(), Value::Int(2));
        assert_eq!(e.int_field("count").unwrap(), 2);
    }

    #[test]
    fn missing_operation_names_kind() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let mut e = counter_entity(&fancy, "child", 0);
        assert_eq!(
            e.invoke("noSuchOp", &[]).unwrap_err(),
            DgError::MissingOperation { operation: "noSuchOp".into(), kind: "fancy".into() }
        );
        assert!(!e.responds_to("noSuchOp"));
        assert!(e.responds_to("bump"));
    }

    #[test]
    fn arity_checked() {
        let kind = counter_kind();
        let mut e = counter_entity(&kind, "a", 0);
        assert_eq!(
            e.invoke("bump", &[Value::Int(1)]).unwrap_err(),
            DgError::Arity { operation: "bump".into(), expected: 0, got: 1 }
        );
        assert_eq!(e.int_field("count").unwrap(), 0);
    }

    #[test]
    fn resolve_reports_source() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let e = counter_entity(&fancy, "child", 0);
        assert_eq!(
            resolve(&e, "reset").unwrap().source,
            Source::Kind { kind: "fancy".into(), depth: 0 }
        );
        assert_eq!(
            resolve(&e, "bump").unwrap().source,
            Source::Kind { kind: "counter".into(), depth: 1 }
        );
        assert_eq!(Source::Kind { kind: "counter".into(), depth: 1 }.to_string(), "counter@1");
    }

    #[test]
    fn resolved_operation_is_the_shared_body() {
        let base = counter_kind();
        let fancy = fancy_kind(&base);
        let a = counter_entity(&fancy, "a", 0);
        let b = counter_entity(&base, "b", 0);
        let via_child = resolve(&a, "bump").unwrap().operation;
        let via_base = resolve(&b, "bump").unwrap().operation;
        assert!(via_child.ptr_eq(&via_base));
        assert!(via_base.ptr_eq(base.own_operation("bump").unwrap()));
    }

    #[test]
    fn resolution_is_read_only() {
        let kind = counter_kind();
        let e = counter_entity(&kind, "a", 3);
        let _ = resolve(&e, "bump").unwrap();
        assert_eq!(e.int_field("count").unwrap(), 3);
    }

    #[test]
    fn own_operation_shadows_kind() {
        let kind = counter_kind();
        let mut e = counter_entity(&kind, "a", 0);
        e.define_own(
            "bump",
            Operation::new(|rx, _| rx.add_int("count", 100).map(Value::Int)),
        );
        assert_eq!(resolve(&e, "bump").unwrap().source, Source::Own);
        e.invoke("bump", &[]).unwrap();
        assert_eq!(e.int_field("count").unwrap(), 100);

        // Other entities of the kind are unaffected.
        let mut other = counter_entity(&kind, "b", 0);
        other.invoke("bump", &[]).unwrap();
        assert_eq!(other.int_field("count").unwrap(), 1);

        e.remove_own("bump");
        e.invoke("bump", &[]).unwrap();
        assert_eq!(e.int_field("count").unwrap(), 101);
    }

    #[test]
    fn nested_call_sees_own_override() {
        let kind = counter_kind();
        let mut e = counter_entity(&kind, "a", 0);
        e.define_own("bump", Operation::new(|rx, _| rx.add_int("count", 10).map(Value::Int)));
        e.invoke("twice", &[]).unwrap();
        assert_eq!(e.int_field("count").unwrap(), 20);
    }

    #[test]
    fn invoke_with_applies_to_unrelated_receiver() {
        let counter = counter_kind();
        let unrelated = BehaviorSetBuilder::new("unrelated").build().unwrap();
        let mut e = counter_entity(&unrelated, "stranger", 7);

        assert!(matches!(e.invoke("bump", &[]), Err(DgError::MissingOperation { .. })));
        assert_eq!(invoke_with(&counter, "bump", &mut e, &[]).unwrap(), Value::Int(8));
        assert_eq!(e.int_field("count").unwrap(), 8);
        assert!(Arc::ptr_eq(e.kind(), &unrelated));
    }

    #[test]
    fn invoke_with_nested_calls_use_borrowed_chain() {
        let counter = counter_kind();
        let unrelated = BehaviorSetBuilder::new("unrelated").build().unwrap();
        let mut e = counter_entity(&unrelated, "stranger", 0);
        invoke_with(&counter, "twice", &mut e, &[]).unwrap();
        assert_eq!(e.int_field("count").unwrap(), 2);
    }

    #[test]
    fn invoke_with_ignores_own_operations() {
        let counter = counter_kind();
        let mut e = counter_entity(&counter, "a", 0);
        e.define_own("bump", Operation::new(|_, _| Ok(Value::from("shadowed"))));
        assert_eq!(invoke_with(&counter, "bump", &mut e, &[]).unwrap(), Value::Int(1));
    }

    #[test]
    fn invoke_with_missing_names_borrowed_set() {
        let counter = counter_kind();
        let other = BehaviorSetBuilder::new("other")
            .operation("only_here", |_, _| Ok(Value::Unit))
            .build()
            .unwrap();
        let mut e = Entity::new(&other);
        assert_eq!(
            invoke_with(&counter, "only_here", &mut e, &[]).unwrap_err(),
            DgError::MissingOperation { operation: "only_here".into(), kind: "counter".into() }
        );
    }

    #[test]
    fn receiver_reports_borrowed_set() {
        let probe = BehaviorSetBuilder::new("probe")
            .operation("where", |rx, _| {
                Ok(rx.borrowed_from().map(Value::from).unwrap_or_default())
            })
            .build()
            .unwrap();
        let mut e = Entity::new(&probe);
        assert_eq!(e.invoke("where", &[]).unwrap(), Value::Unit);
        assert_eq!(invoke_with(&probe, "where", &mut e, &[]).unwrap(), Value::from("probe"));
    }

    #[test]
    fn failing_operation_returns_error() {
        let kind = counter_kind();
        let mut e = Entity::new(&kind);
        assert_eq!(e.invoke("bump", &[]).unwrap_err(), DgError::MissingField("count".into()));
        let r: DgResult<Value> = e.invoke("who", &[]);
        assert!(r.is_err());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// Bumping n times through an inherited operation adds exactly n.
        #[test]
        fn inherited_bump_adds_n(start in -1_000_i64..1_000, n in 0_usize..64) {
            let base = counter_kind();
            let fancy = fancy_kind(&base);
            let mut e = counter_entity(&fancy, "p", start);
            for _ in 0..n {
                e.invoke("bump", &[]).unwrap();
            }
            prop_assert_eq!(e.int_field("count").unwrap(), start + n as i64);
        }

        /// Chains of any depth resolve root operations.
        #[test]
        fn deep_chain_resolves_root(depth in 1_usize..16) {
            let mut set = counter_kind();
            for i in 0..depth {
                set = BehaviorSetBuilder::new(format!("level{i}")).extends(&set).build().unwrap();
            }
            prop_assert_eq!(set.depth(), depth);
            let mut e = counter_entity(&set, "deep", 0);
            e.invoke("bump", &[]).unwrap();
            prop_assert_eq!(e.int_field("count").unwrap(), 1);
        }
    }
}
