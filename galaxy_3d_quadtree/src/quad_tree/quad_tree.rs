/// QuadTree: growable ground-plane index of placed objects.
///
/// The tree starts empty and grows in any direction as objects are inserted:
/// when a position falls outside the root cell, the root is wrapped in a new
/// internal node of twice the size, grown toward that position. Below the
/// root, cells are refined lazily: an empty cell is split into quadrants
/// until it reaches the configured leaf side length, and only then becomes a
/// populated leaf.
///
/// After loading, `initialize` settles all enclosing rectangles and
/// precomputes per-leaf visibility lists (see `visibility.rs`).

use glam::{DMat3, DVec2, DVec3};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::error::{Galaxy3dError, Galaxy3dResult};
use crate::{quadtree_debug, quadtree_trace, quadtree_warn};
use super::bounds::{planar, Quadrant, QuadTreeBounds};
use super::node::{LeafNode, QuadNode, QuadNodeKey, QuadNodeKind};
use super::placement::{world_extents, ObjectKey, PlacedObject};

const SOURCE: &str = "galaxy3d::QuadTree";

/// Default side length of a populated leaf cell.
pub const DEFAULT_LEAF_SIDE_LENGTH: f64 = 60.0;

/// Default viewing distance used to build visibility lists.
pub const DEFAULT_VIEWING_DISTANCE: f64 = 600.0;

/// Default slack when deciding whether an empty cell is small enough to
/// become a populated leaf.
pub const DEFAULT_TOLERANCE_FACTOR: f64 = 1.01;

// ===== CONFIG =====

/// Quad tree configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeConfig {
    /// Target side length of a populated leaf cell (world units)
    pub leaf_side_length: f64,
    /// An empty cell whose side is below `tolerance_factor * leaf_side_length`
    /// becomes a populated leaf instead of being split further.
    /// Affects tree depth only, never correctness.
    pub tolerance_factor: f64,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            leaf_side_length: DEFAULT_LEAF_SIDE_LENGTH,
            tolerance_factor: DEFAULT_TOLERANCE_FACTOR,
        }
    }
}

impl QuadTreeConfig {
    /// Check that the configuration describes a terminating subdivision.
    pub fn validate(&self) -> Galaxy3dResult<()> {
        if !(self.leaf_side_length.is_finite() && self.leaf_side_length > 0.0) {
            return Err(Galaxy3dError::InvalidArgument(format!(
                "Leaf side length must be finite and positive, got {}",
                self.leaf_side_length
            )));
        }
        if !(self.tolerance_factor.is_finite() && self.tolerance_factor >= 1.0) {
            return Err(Galaxy3dError::InvalidArgument(format!(
                "Tolerance factor must be finite and at least 1, got {}",
                self.tolerance_factor
            )));
        }
        Ok(())
    }
}

// ===== QUAD TREE =====

/// Growable quad tree over the ground plane.
///
/// Owns the node arena and the registry of inserted objects. Objects
/// themselves stay with the caller and are referred to by `ObjectKey`.
pub struct QuadTree {
    /// Node arena (parents and children are keys into it)
    pub(super) nodes: SlotMap<QuadNodeKey, QuadNode>,
    /// Root node, absent until the first insertion
    pub(super) root: Option<QuadNodeKey>,
    /// Every object ever inserted (duplicate rejection)
    objects: FxHashSet<ObjectKey>,
    /// Sequence number handed to the next leaf that becomes populated
    next_sequence: u64,
    config: QuadTreeConfig,
}

impl QuadTree {
    /// Create an empty quad tree with the given leaf side length.
    ///
    /// # Errors
    ///
    /// Returns `Galaxy3dError::InvalidArgument` if `leaf_side_length` is not finite and positive.
    pub fn new(leaf_side_length: f64) -> Galaxy3dResult<Self> {
        Self::with_config(QuadTreeConfig {
            leaf_side_length,
            ..QuadTreeConfig::default()
        })
    }

    /// Create an empty quad tree from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns `Galaxy3dError::InvalidArgument` if the configuration is invalid
    /// (see [`QuadTreeConfig::validate`]).
    pub fn with_config(config: QuadTreeConfig) -> Galaxy3dResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: QuadTreeConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            objects: FxHashSet::default(),
            next_sequence: 0,
            config,
        }
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Target side length of a populated leaf.
    pub fn side_length(&self) -> f64 {
        self.config.leaf_side_length
    }

    /// Number of distinct objects inserted.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if `key` has been inserted.
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes of every kind.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<QuadNodeKey> {
        self.root
    }

    /// Cell of the root node (the area covered by the tree).
    pub fn root_cell(&self) -> Option<QuadTreeBounds> {
        self.root.map(|root| self.nodes[root].cell)
    }

    /// Enclosing rectangle of everything in the tree.
    pub fn root_enclosing(&self) -> Option<QuadTreeBounds> {
        self.root.map(|root| self.nodes[root].enclosing)
    }

    /// Look up any node by key.
    pub fn node(&self, key: QuadNodeKey) -> Option<&QuadNode> {
        self.nodes.get(key)
    }

    /// Look up a leaf by key.
    ///
    /// # Errors
    ///
    /// Returns `Galaxy3dError::InvalidNode` if the key is stale (the tree was cleared)
    /// or refers to an internal node.
    pub fn leaf(&self, key: QuadNodeKey) -> Galaxy3dResult<LeafNode<'_>> {
        match self.nodes.get(key) {
            Some(node) if node.is_leaf() => Ok(LeafNode::new(key, node)),
            Some(_) => Err(Galaxy3dError::InvalidNode(format!("{:?} is an internal node", key))),
            None => Err(Galaxy3dError::InvalidNode(format!("{:?} does not belong to this tree", key))),
        }
    }

    /// Iterate over all leaves (populated or not).
    pub fn leaves(&self) -> impl Iterator<Item = LeafNode<'_>> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(key, node)| LeafNode::new(key, node))
    }

    /// Iterate over populated leaves only.
    pub fn populated_leaves(&self) -> impl Iterator<Item = LeafNode<'_>> + '_ {
        self.leaves().filter(|leaf| leaf.is_populated())
    }

    /// Number of levels below the root (0 for a single leaf, 0 when empty).
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut depth = 0;
        let mut level = vec![root];
        loop {
            let next: Vec<QuadNodeKey> = level
                .iter()
                .filter_map(|key| self.nodes[*key].children())
                .flat_map(|children| children.iter().copied())
                .collect();
            if next.is_empty() {
                return depth;
            }
            depth += 1;
            level = next;
        }
    }

    // ===== INSERTION =====

    /// Insert a placed object with its world orientation.
    ///
    /// `orientation` maps the object's local axes to world axes (columns are
    /// the local X, Y, Z axes in world space); it is applied to the mesh
    /// vertices when growing the leaf's enclosing rectangle.
    ///
    /// Returns false (and leaves the tree untouched) if `key` was already
    /// inserted or if the object's position is not finite on the ground plane.
    ///
    /// The visibility list of the receiving leaf becomes stale; call
    /// `initialize` again before relying on it.
    pub fn insert<O: PlacedObject + ?Sized>(
        &mut self,
        key: ObjectKey,
        object: &O,
        orientation: &DMat3,
    ) -> bool {
        if self.objects.contains(&key) {
            quadtree_trace!(SOURCE, "Ignoring duplicate insertion of {:?}", key);
            return false;
        }
        let position = object.world_position();
        let point = planar(position);
        if !point.is_finite() {
            quadtree_debug!(SOURCE, "Ignoring {:?} at non-finite position {}", key, position);
            return false;
        }

        let extents = world_extents(object, orientation);

        let Some(root) = self.root else {
            let cell = QuadTreeBounds::centered(point, self.config.leaf_side_length);
            let mut leaf = QuadNode::populated(cell, None, self.take_sequence());
            leaf.push_object(key);
            leaf.enclosing = extents;
            self.root = Some(self.nodes.insert(leaf));
            self.objects.insert(key);
            quadtree_debug!(SOURCE, "Created root leaf {:?} around {:?}", cell, point);
            return true;
        };

        let Some(root) = self.grow_to_contain(root, point) else {
            quadtree_warn!(SOURCE, "Ignoring {:?}: position {} is beyond the representable area", key, position);
            return false;
        };
        self.objects.insert(key);

        let leaf = self.descend_to_leaf(root, point);
        self.add_to_leaf(leaf, key, &extents);
        quadtree_trace!(SOURCE, "Inserted {:?} into leaf {:?}", key, leaf);
        true
    }

    /// Drop every node and forget every inserted object.
    ///
    /// All previously returned `QuadNodeKey`s become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.objects.clear();
        self.next_sequence = 0;
        quadtree_debug!(SOURCE, "Cleared");
    }

    fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Wrap the root in larger internal nodes until its cell contains `point`.
    ///
    /// Each step doubles the root cell toward the quadrant holding `point`;
    /// the old root keeps its cell and becomes the opposite child.
    /// Returns None, leaving the tree untouched, if the cell would overflow
    /// to infinity.
    fn grow_to_contain(&mut self, mut root: QuadNodeKey, point: DVec2) -> Option<QuadNodeKey> {
        let mut steps = Vec::new();
        let mut cell = self.nodes[root].cell;
        while !cell.contains_point(point) {
            let (grown, slot) = cell.grown_toward(point);
            if !grown.is_finite() {
                return None;
            }
            steps.push((cell, grown, slot));
            cell = grown;
        }

        for (cell, grown, slot) in steps {
            let new_root = self.nodes.insert(QuadNode::unpopulated(grown, None));
            let children = self.make_children(new_root, &grown, Some((slot, root)));
            let enclosing = self.nodes[root].enclosing;
            self.nodes[root].parent = Some(new_root);

            let node = &mut self.nodes[new_root];
            node.kind = QuadNodeKind::Internal { children };
            node.enclosing = enclosing;

            quadtree_debug!(
                SOURCE,
                "Grew root toward {:?}: side {} -> {}",
                slot.opposite(),
                cell.side_length(),
                grown.side_length()
            );

            self.root = Some(new_root);
            root = new_root;
        }
        Some(root)
    }

    /// Create the four children of `parent` as empty leaves, except for the
    /// optional `existing` child placed in its quadrant.
    fn make_children(
        &mut self,
        parent: QuadNodeKey,
        cell: &QuadTreeBounds,
        existing: Option<(Quadrant, QuadNodeKey)>,
    ) -> [QuadNodeKey; 4] {
        Quadrant::ALL.map(|quadrant| match existing {
            Some((slot, child)) if slot == quadrant => child,
            _ => self
                .nodes
                .insert(QuadNode::unpopulated(cell.quadrant_cell(quadrant), Some(parent))),
        })
    }

    /// Walk from `root` to the populated leaf whose cell holds `point`,
    /// refining empty cells on the way.
    ///
    /// A point on an edge already covered by a populated leaf goes to that
    /// leaf, so that lookups find it there. `point` must lie within the root cell.
    fn descend_to_leaf(&mut self, root: QuadNodeKey, point: DVec2) -> QuadNodeKey {
        if let Some(leaf) = self.locate_leaf(root, point) {
            if self.nodes[leaf].is_populated() {
                return leaf;
            }
        }

        let threshold = self.config.tolerance_factor * self.config.leaf_side_length;
        let mut current = root;

        loop {
            let node = &self.nodes[current];
            match &node.kind {
                QuadNodeKind::PopulatedLeaf { .. } => return current,
                QuadNodeKind::Internal { children } => {
                    current = children[node.cell.quadrant(point).index()];
                }
                QuadNodeKind::UnpopulatedLeaf => {
                    let cell = node.cell;
                    if cell.side_length() < threshold {
                        let sequence = self.take_sequence();
                        let node = &mut self.nodes[current];
                        node.kind = QuadNodeKind::PopulatedLeaf { objects: Vec::new(), sequence };
                        node.enclosing = QuadTreeBounds::UNINITIALIZED;
                        node.visible_leaves = None;
                        return current;
                    }
                    let children = self.make_children(current, &cell, None);
                    let node = &mut self.nodes[current];
                    node.kind = QuadNodeKind::Internal { children };
                    node.enclosing = QuadTreeBounds::UNINITIALIZED;
                    node.visible_leaves = None;
                }
            }
        }
    }

    /// Append an object to a populated leaf and grow the leaf's enclosing
    /// rectangle (and its ancestors') by the object's extents.
    fn add_to_leaf(&mut self, leaf: QuadNodeKey, key: ObjectKey, extents: &QuadTreeBounds) {
        let node = &mut self.nodes[leaf];
        node.push_object(key);
        node.enclosing.expand_to_include(extents);
        let parent = node.parent;
        if let Some(parent) = parent {
            self.propagate_enclosing(parent);
        }
    }

    /// Re-union each ancestor's enclosing rectangle with its children's,
    /// starting at `start`, until one does not change.
    ///
    /// The union includes the ancestor's previous value, so rectangles only grow.
    pub(super) fn propagate_enclosing(&mut self, start: QuadNodeKey) {
        let mut current = Some(start);
        while let Some(key) = current {
            let node = &self.nodes[key];
            let Some(children) = node.children() else {
                return;
            };
            let enclosing = children
                .iter()
                .fold(node.enclosing, |acc, child| acc.union(&self.nodes[*child].enclosing));
            if enclosing == node.enclosing {
                return;
            }
            let node = &mut self.nodes[key];
            node.enclosing = enclosing;
            current = node.parent;
        }
    }

    // ===== LOOKUP =====

    /// Find the leaf whose cell contains `position` (projected on the ground plane).
    ///
    /// Cells share their edges. A point on a shared edge resolves to the
    /// earliest populated leaf touching it, which is where insertion put any
    /// object at that point; if none is populated, to the first empty leaf
    /// in quadrant order.
    ///
    /// Returns None for an empty tree or a position outside the root cell.
    pub fn get_leaf_node(&self, position: DVec3) -> Option<LeafNode<'_>> {
        let root = self.root?;
        let key = self.locate_leaf(root, planar(position))?;
        Some(LeafNode::new(key, &self.nodes[key]))
    }

    fn locate_leaf(&self, root: QuadNodeKey, point: DVec2) -> Option<QuadNodeKey> {
        let mut populated = None;
        let mut empty = None;
        self.leaves_at(root, point, &mut populated, &mut empty);
        populated.map(|(_, key)| key).or(empty)
    }

    /// Visit every leaf under `key` whose cell contains `point`, keeping the
    /// earliest populated one and the first empty one.
    ///
    /// Away from edges exactly one child matches per level.
    fn leaves_at(
        &self,
        key: QuadNodeKey,
        point: DVec2,
        populated: &mut Option<(u64, QuadNodeKey)>,
        empty: &mut Option<QuadNodeKey>,
    ) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        if !node.cell.contains_point(point) {
            return;
        }
        match &node.kind {
            QuadNodeKind::Internal { children } => {
                for child in children {
                    self.leaves_at(*child, point, populated, empty);
                }
            }
            QuadNodeKind::PopulatedLeaf { sequence, .. } => {
                if populated.is_none_or(|(best, _)| *sequence < best) {
                    *populated = Some((*sequence, key));
                }
            }
            QuadNodeKind::UnpopulatedLeaf => {
                if empty.is_none() {
                    *empty = Some(key);
                }
            }
        }
    }
}

impl Default for QuadTree {
    fn default() -> Self {
        Self::from_valid_config(QuadTreeConfig::default())
    }
}

#[cfg(test)]
#[path = "quad_tree_tests.rs"]
mod tests;
