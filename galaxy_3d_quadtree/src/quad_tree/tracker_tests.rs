/// Tests for LeafTracker
///
/// Three objects on a line, 150 units apart, seen at a viewing distance
/// of 160: each sees its direct neighbours only.

use super::*;
use crate::quad_tree::ObjectState;
use glam::DMat3;
use slotmap::SlotMap;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

struct Fixture {
    tree: QuadTree,
    states: SlotMap<ObjectKey, ObjectState>,
    a: ObjectKey,
    b: ObjectKey,
    c: ObjectKey,
}

impl Fixture {
    fn new() -> Self {
        let mut states = SlotMap::with_key();
        let mut tree = QuadTree::new(100.0).unwrap();
        let vertices: Arc<[DVec3]> = Arc::from(vec![DVec3::ZERO]);
        let mut place =
            |x: f64| states.insert(ObjectState::new(DVec3::new(x, 0.0, 0.0), vertices.clone()));
        let a = place(0.0);
        let b = place(150.0);
        let c = place(300.0);
        for key in [a, b, c] {
            assert!(tree.insert(key, &states[key], &DMat3::IDENTITY));
        }
        tree.initialize(160.0).unwrap();
        Self { tree, states, a, b, c }
    }
}

fn at(x: f64) -> DVec3 {
    DVec3::new(x, 1.8, 0.0)
}

fn sorted(mut keys: Vec<ObjectKey>) -> Vec<ObjectKey> {
    keys.sort();
    keys
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_empty_tree_yields_nothing() {
    let tree = QuadTree::new(100.0).unwrap();
    let mut tracker = LeafTracker::new();

    assert!(tracker.update(&tree, at(0.0)).is_empty());
    assert!(tracker.current_leaf().is_none());
}

#[test]
fn test_first_update_shows_visible_objects() {
    let f = Fixture::new();
    let mut tracker = LeafTracker::new();

    let delta = tracker.update(&f.tree, at(0.0));

    assert_eq!(sorted(delta.shown), sorted(vec![f.a, f.b]));
    assert!(delta.hidden.is_empty());
    let leaf = f.tree.get_leaf_node(at(0.0)).unwrap().key();
    assert_eq!(tracker.current_leaf(), Some(leaf));
}

#[test]
fn test_same_leaf_yields_empty_delta() {
    let f = Fixture::new();
    let mut tracker = LeafTracker::new();
    tracker.update(&f.tree, at(0.0));

    assert!(tracker.update(&f.tree, at(10.0)).is_empty());
    assert!(tracker.update(&f.tree, at(-20.0)).is_empty());
}

#[test]
fn test_moving_between_leaves() {
    let f = Fixture::new();
    let mut tracker = LeafTracker::new();
    tracker.update(&f.tree, at(0.0));

    // a and b visible before, b and c visible after
    let delta = tracker.update(&f.tree, at(300.0));
    assert_eq!(delta.shown, vec![f.c]);
    assert_eq!(delta.hidden, vec![f.a]);

    // Middle leaf sees everything: only a comes back
    let delta = tracker.update(&f.tree, at(150.0));
    assert_eq!(delta.shown, vec![f.a]);
    assert!(delta.hidden.is_empty());
}

#[test]
fn test_entering_empty_cell_keeps_neighbours() {
    let f = Fixture::new();
    let mut tracker = LeafTracker::new();
    tracker.update(&f.tree, at(0.0));

    // (0, 0, -100) is an empty cell next to a's leaf
    let empty = f.tree.get_leaf_node(DVec3::new(0.0, 0.0, -100.0)).unwrap();
    assert!(!empty.is_populated());
    let delta = tracker.update(&f.tree, DVec3::new(0.0, 0.0, -100.0));

    // The empty cell still sees a and b, so nothing changes
    let visible = empty.visible_leaves().unwrap();
    assert_eq!(visible.len(), 2);
    assert!(visible.contains(&f.tree.get_leaf_node(at(0.0)).unwrap().key()));
    assert!(delta.is_empty());
    assert_eq!(tracker.current_leaf(), Some(empty.key()));
}

#[test]
fn test_leaving_tree_hides_everything() {
    let f = Fixture::new();
    let mut tracker = LeafTracker::new();
    tracker.update(&f.tree, at(150.0));

    let delta = tracker.update(&f.tree, at(1.0e6));
    assert!(delta.shown.is_empty());
    assert_eq!(sorted(delta.hidden), sorted(vec![f.a, f.b, f.c]));
    assert!(tracker.current_leaf().is_none());

    // Still outside: nothing more to hide
    assert!(tracker.update(&f.tree, at(2.0e6)).is_empty());
}

#[test]
fn test_stale_list_shows_nothing_until_initialized() {
    let mut f = Fixture::new();
    let d = f.states.insert(ObjectState::point(DVec3::new(310.0, 0.0, 10.0)));
    f.tree.insert(d, &f.states[d], &DMat3::IDENTITY);

    let mut tracker = LeafTracker::new();
    assert!(tracker.update(&f.tree, at(300.0)).is_empty());

    tracker.reset();
    f.tree.initialize(160.0).unwrap();
    let delta = tracker.update(&f.tree, at(300.0));
    assert_eq!(sorted(delta.shown), sorted(vec![f.b, f.c, d]));
}

#[test]
fn test_reset_forgets_current_leaf() {
    let f = Fixture::new();
    let mut tracker = LeafTracker::new();
    tracker.update(&f.tree, at(0.0));

    tracker.reset();
    assert!(tracker.current_leaf().is_none());

    let delta = tracker.update(&f.tree, at(0.0));
    assert_eq!(sorted(delta.shown), sorted(vec![f.a, f.b]));
}
