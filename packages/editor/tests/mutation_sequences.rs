//! Tests for long mutation sequences
//!
//! This tests:
//! - Dense ordering after arbitrary add/remove/reorder chains
//! - Exact undo/redo restoration
//! - History bound and eviction order

use blockpage_editor::{LayoutMutation, LayoutStore, DEFAULT_HISTORY_LIMIT};
use blockpage_layout::{Component, ComponentData, ComponentType};
use proptest::prelude::*;

fn block(id: &str) -> Component {
    let kind = ComponentType::Hero;
    let data = ComponentData::placeholder(&kind);
    Component::new(id, kind, data)
}

fn assert_dense(store: &LayoutStore) {
    for (index, component) in store.components().iter().enumerate() {
        assert_eq!(
            component.order, index,
            "component {} has order {} at index {}",
            component.id, component.order, index
        );
    }
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove(usize),
    RemoveMissing,
    Reorder(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        2 => (0usize..16).prop_map(Op::Remove),
        1 => Just(Op::RemoveMissing),
        3 => (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Reorder(a, b)),
    ]
}

proptest! {
    #[test]
    fn orders_stay_dense(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut store = LayoutStore::new();
        let mut next_id = 0;

        for op in ops {
            let len = store.components().len();
            match op {
                Op::Add => {
                    store.add_component(block(&format!("c{}", next_id))).unwrap();
                    next_id += 1;
                }
                Op::Remove(i) if len > 0 => {
                    let id = store.components()[i % len].id.clone();
                    prop_assert!(store.remove_component(&id));
                }
                Op::Remove(_) | Op::RemoveMissing => {
                    let before = store.components().to_vec();
                    let dirty = store.is_dirty();
                    prop_assert!(!store.remove_component("never-added"));
                    prop_assert_eq!(store.components(), before.as_slice());
                    prop_assert_eq!(store.is_dirty(), dirty);
                }
                Op::Reorder(a, b) if len > 0 => {
                    store.reorder_components(a % len, b % len).unwrap();
                }
                Op::Reorder(a, b) => {
                    prop_assert!(store.reorder_components(a, b).is_err());
                }
            }
            assert_dense(&store);
        }
    }

    #[test]
    fn undo_restores_previous_list(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut store = LayoutStore::new();
        let mut next_id = 0;

        for op in ops {
            let len = store.components().len();
            let before = store.components().to_vec();

            let changed = match op {
                Op::Add => {
                    store.add_component(block(&format!("c{}", next_id))).unwrap();
                    next_id += 1;
                    true
                }
                Op::Remove(i) if len > 0 => {
                    let id = store.components()[i % len].id.clone();
                    store.remove_component(&id)
                }
                Op::Reorder(a, b) if len > 0 => store.reorder_components(a % len, b % len).unwrap(),
                _ => false,
            };

            if changed {
                let after = store.components().to_vec();

                prop_assert!(store.undo());
                prop_assert_eq!(store.components(), before.as_slice());

                prop_assert!(store.redo());
                prop_assert_eq!(store.components(), after.as_slice());
            }
        }
    }
}

#[test]
fn test_scenario_add_two_components() {
    let mut store = LayoutStore::new();

    let mut hero = block("hero-1");
    hero.order = 0;
    store.add_component(hero).unwrap();
    assert_eq!(store.components().len(), 1);
    assert_eq!(store.components()[0].order, 0);
    assert!(store.is_dirty());

    let kind = ComponentType::ImageGrid;
    let mut grid = Component::new("grid-1", kind.clone(), ComponentData::placeholder(&kind));
    grid.order = 0;
    store.add_component(grid).unwrap();

    assert_eq!(store.components().len(), 2);
    let grid = store.components().iter().find(|c| c.id == "grid-1").unwrap();
    assert_eq!(grid.order, 1);
}

#[test]
fn test_three_undos_then_three_redos() {
    let mut store = LayoutStore::new();

    store.add_component(block("a")).unwrap();
    store.add_component(block("b")).unwrap();
    store.reorder_components(0, 1).unwrap();
    let third = store.components().to_vec();

    for _ in 0..3 {
        assert!(store.undo());
    }
    assert!(store.components().is_empty());
    assert!(!store.undo());

    for _ in 0..3 {
        assert!(store.redo());
    }
    assert_eq!(store.components(), third.as_slice());
    assert!(!store.redo());
}

#[test]
fn test_sixty_mutations_keep_fifty_snapshots() {
    let mut store = LayoutStore::new();

    for i in 0..60 {
        store.add_component(block(&format!("c{}", i))).unwrap();
    }
    assert_eq!(store.history().undo_levels(), DEFAULT_HISTORY_LIMIT);

    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);

    // The ten oldest states were evicted; the deepest reachable has ten blocks
    assert_eq!(store.components().len(), 10);
    assert_eq!(store.components()[9].id, "c9");
}

#[test]
fn test_new_mutation_clears_redo() {
    let mut store = LayoutStore::new();

    for i in 0..5 {
        store.add_component(block(&format!("v{}", i))).unwrap();
    }
    for _ in 0..3 {
        store.undo();
    }
    assert_eq!(store.history().redo_levels(), 3);

    store
        .apply(LayoutMutation::AddComponent {
            component: block("branch"),
        })
        .unwrap();
    assert_eq!(store.history().redo_levels(), 0);
    assert!(!store.redo());
}

#[test]
fn test_move_then_delete_sequence() {
    let mut store = LayoutStore::new();
    store.set_components(vec![block("a"), block("b"), block("c")]);

    store.reorder_components(2, 0).unwrap();
    store.remove_component("a");

    let ids: Vec<&str> = store.components().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b"]);

    // Undo delete
    store.undo();
    let ids: Vec<&str> = store.components().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    // Undo move; back to the hydrated list
    store.undo();
    let ids: Vec<&str> = store.components().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(!store.can_undo());
}
