/// LeafTracker: follows the camera from leaf to leaf.
///
/// Each time the camera moves, the renderer asks the tracker which objects
/// became visible and which stopped being visible. Nothing changes while
/// the camera stays within the same leaf cell.

use glam::DVec3;
use rustc_hash::FxHashSet;
use crate::quadtree_debug;
use super::node::QuadNodeKey;
use super::placement::ObjectKey;
use super::quad_tree::QuadTree;

const SOURCE: &str = "galaxy3d::LeafTracker";

/// Objects to show and hide after the camera changed leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityDelta {
    /// Objects of leaves that entered the visible set
    pub shown: Vec<ObjectKey>,
    /// Objects of leaves that left the visible set
    pub hidden: Vec<ObjectKey>,
}

impl VisibilityDelta {
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }
}

/// Remembers the leaf the camera was last in.
#[derive(Debug, Clone, Default)]
pub struct LeafTracker {
    current: Option<QuadNodeKey>,
}

impl LeafTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaf the camera was in at the last update.
    pub fn current_leaf(&self) -> Option<QuadNodeKey> {
        self.current
    }

    /// Forget the tracked leaf (e.g. after the tree was cleared).
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Move the camera to `position` and report the visibility changes.
    ///
    /// - Same leaf as before: empty delta.
    /// - New leaf: hide the leaves visible before but not now, show the
    ///   leaves visible now but not before (everything, if the previous
    ///   list is unknown).
    /// - Outside the tree: hide everything that was visible before.
    ///
    /// Stale (not yet rebuilt) visibility lists count as unknown.
    pub fn update(&mut self, tree: &QuadTree, position: DVec3) -> VisibilityDelta {
        let next = tree.get_leaf_node(position).map(|leaf| leaf.key());
        if next == self.current {
            return VisibilityDelta::default();
        }

        let previous_list = self
            .current
            .and_then(|key| tree.node(key))
            .and_then(|node| node.visible_leaves());
        let next_list = next
            .and_then(|key| tree.node(key))
            .and_then(|node| node.visible_leaves());

        let mut delta = VisibilityDelta::default();
        match next {
            Some(_) => {
                if let (Some(previous), Some(current)) = (previous_list, next_list) {
                    let current: FxHashSet<QuadNodeKey> = current.iter().copied().collect();
                    for leaf in previous.iter().filter(|leaf| !current.contains(*leaf)) {
                        Self::extend_with_objects(tree, *leaf, &mut delta.hidden);
                    }
                }
                if let Some(current) = next_list {
                    let previous: FxHashSet<QuadNodeKey> =
                        previous_list.unwrap_or(&[]).iter().copied().collect();
                    for leaf in current.iter().filter(|leaf| !previous.contains(*leaf)) {
                        Self::extend_with_objects(tree, *leaf, &mut delta.shown);
                    }
                }
            }
            None => {
                for leaf in previous_list.unwrap_or(&[]) {
                    Self::extend_with_objects(tree, *leaf, &mut delta.hidden);
                }
            }
        }

        quadtree_debug!(
            SOURCE,
            "Camera moved from {:?} to {:?}: {} shown, {} hidden",
            self.current,
            next,
            delta.shown.len(),
            delta.hidden.len()
        );

        self.current = next;
        delta
    }

    fn extend_with_objects(tree: &QuadTree, leaf: QuadNodeKey, out: &mut Vec<ObjectKey>) {
        if let Some(node) = tree.node(leaf) {
            out.extend_from_slice(node.objects());
        }
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
