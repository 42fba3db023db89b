/// Visibility lists: which populated leaves can be seen from each leaf.
///
/// Built once per viewing distance by `QuadTree::initialize`:
/// 1. Finalize: every leaf rectangle is grown to cover its cell (geometry
///    may still reach beyond it), and ancestors are re-unioned.
/// 2. For every leaf, walk the tree from the root and collect the populated
///    leaves whose enclosing rectangle may hold geometry within the viewing
///    distance of any point of the leaf's enclosing rectangle.
///
/// The test is conservative: it compares rectangles, not the camera
/// position, so the lists can be reused every frame until the viewing
/// distance changes or content is added.

use crate::error::Galaxy3dResult;
use crate::{quadtree_err, quadtree_info};
use super::bounds::QuadTreeBounds;
use super::node::{QuadNodeKey, QuadNodeKind};
use super::quad_tree::QuadTree;

const SOURCE: &str = "galaxy3d::QuadTree";

/// Returns true if any point of `candidate` may be within `viewing_distance`
/// of some point of `target`.
///
/// - Rectangles overlapping on both axes are always visible.
/// - Rectangles whose gap along a single axis is within the distance are visible.
/// - Diagonally separated rectangles are visible if their closest corners
///   are within the distance.
pub fn within_viewing_distance(
    target: &QuadTreeBounds,
    candidate: &QuadTreeBounds,
    viewing_distance: f64,
) -> bool {
    if !(viewing_distance > 0.0) {
        return false;
    }
    if target.intersects(candidate) {
        return true;
    }
    if !target.expanded(viewing_distance).intersects(candidate) {
        return false;
    }
    if target.overlaps_x(candidate) || target.overlaps_z(candidate) {
        return true;
    }
    target.corner_distance_squared(candidate) <= viewing_distance * viewing_distance
}

impl QuadTree {
    /// Settle all enclosing rectangles and build the visibility list of every leaf.
    ///
    /// Call after loading, whenever the viewing distance changes, and after
    /// any later batch of insertions. Does nothing on an empty tree.
    ///
    /// # Errors
    ///
    /// Returns `Galaxy3dError::InvalidArgument` if `viewing_distance` is not positive.
    pub fn initialize(&mut self, viewing_distance: f64) -> Galaxy3dResult<()> {
        if !(viewing_distance > 0.0) {
            return Err(quadtree_err!(
                SOURCE,
                "Viewing distance must be positive, got {}",
                viewing_distance
            ));
        }
        let Some(root) = self.root else {
            return Ok(());
        };

        self.finalize_bounding_rectangles(root);
        let (leaf_count, link_count) = self.build_visibility_lists(root, viewing_distance);

        quadtree_info!(
            SOURCE,
            "Initialized {} leaves at viewing distance {} ({} visibility links, {} nodes)",
            leaf_count,
            viewing_distance,
            link_count,
            self.nodes.len()
        );
        Ok(())
    }

    /// Grow every leaf rectangle to cover at least the leaf's cell and
    /// propagate the change to its ancestors (post-order).
    ///
    /// Afterwards every leaf rectangle contains the leaf's cell.
    pub(super) fn finalize_bounding_rectangles(&mut self, key: QuadNodeKey) {
        if let Some(children) = self.nodes[key].children().copied() {
            for child in children {
                self.finalize_bounding_rectangles(child);
            }
            return;
        }

        let node = &mut self.nodes[key];
        if node.enclosing.contains(&node.cell) {
            return;
        }
        node.enclosing = node.enclosing.union(&node.cell);
        let parent = node.parent;
        if let Some(parent) = parent {
            self.propagate_enclosing(parent);
        }
    }

    /// Build the visibility list of every leaf below `root`.
    ///
    /// Returns (leaves processed, total list entries).
    fn build_visibility_lists(&mut self, root: QuadNodeKey, viewing_distance: f64) -> (usize, usize) {
        let leaves: Vec<QuadNodeKey> = self.leaves().map(|leaf| leaf.key()).collect();
        let mut link_count = 0;

        for &leaf in &leaves {
            let target = self.nodes[leaf].enclosing;
            let mut visible = Vec::new();
            self.collect_visible_leaves(&target, Some(root), viewing_distance, &mut visible);
            link_count += visible.len();
            self.nodes[leaf].visible_leaves = Some(visible);
        }

        (leaves.len(), link_count)
    }

    /// Collect the populated leaves under `node` visible from `target`.
    ///
    /// Invisible subtrees are pruned without visiting their children.
    fn collect_visible_leaves(
        &self,
        target: &QuadTreeBounds,
        node: Option<QuadNodeKey>,
        viewing_distance: f64,
        visible: &mut Vec<QuadNodeKey>,
    ) {
        let Some(key) = node else {
            return;
        };
        let Some(candidate) = self.nodes.get(key) else {
            return;
        };
        if !within_viewing_distance(target, &candidate.enclosing, viewing_distance) {
            return;
        }
        match &candidate.kind {
            QuadNodeKind::Internal { children } => {
                for child in children {
                    self.collect_visible_leaves(target, Some(*child), viewing_distance, visible);
                }
            }
            QuadNodeKind::PopulatedLeaf { .. } => visible.push(key),
            QuadNodeKind::UnpopulatedLeaf => {}
        }
    }
}
