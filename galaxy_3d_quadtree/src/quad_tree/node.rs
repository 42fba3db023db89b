/// Quad tree nodes.
///
/// Nodes live in an arena (`SlotMap`) owned by the `QuadTree`. Children and
/// parents are arena handles, so the parent link is purely navigational.
///
/// Three node kinds share the same cell / enclosing rectangle contract:
/// - **Internal**: exactly four children (near-left, near-right, far-left, far-right)
/// - **UnpopulatedLeaf**: an empty grid cell
/// - **PopulatedLeaf**: a grid cell holding placed objects

use slotmap::new_key_type;
use super::bounds::QuadTreeBounds;
use super::placement::ObjectKey;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Handle to a node inside a `QuadTree`.
    ///
    /// Keys stay valid until the tree is cleared. Leaves may later be
    /// refined in place (populated or split), keeping their key.
    pub struct QuadNodeKey;
}

// ===== NODE KIND =====

/// Kind-specific payload of a node.
#[derive(Debug, Clone)]
pub enum QuadNodeKind {
    /// Four children, indexed by `Quadrant`
    Internal {
        children: [QuadNodeKey; 4],
    },
    /// Empty grid cell
    UnpopulatedLeaf,
    /// Grid cell with content
    PopulatedLeaf {
        /// Objects placed in this cell, in insertion order
        objects: Vec<ObjectKey>,
        /// Order in which this leaf became populated (0 for the first).
        /// Points on a shared edge belong to the earliest populated leaf.
        sequence: u64,
    },
}

// ===== NODE =====

/// A single node of the quad tree.
#[derive(Debug, Clone)]
pub struct QuadNode {
    /// Fixed grid cell, assigned at creation
    pub(crate) cell: QuadTreeBounds,
    /// Tightest known rectangle around the node's content (grow-only)
    pub(crate) enclosing: QuadTreeBounds,
    /// Parent handle (None for the root)
    pub(crate) parent: Option<QuadNodeKey>,
    /// Kind-specific payload
    pub(crate) kind: QuadNodeKind,
    /// Cached visible populated leaves (leaves only).
    /// `None` means the list is stale and `QuadTree::initialize` must run.
    pub(crate) visible_leaves: Option<Vec<QuadNodeKey>>,
}

impl QuadNode {
    pub(crate) fn unpopulated(cell: QuadTreeBounds, parent: Option<QuadNodeKey>) -> Self {
        Self {
            cell,
            enclosing: QuadTreeBounds::UNINITIALIZED,
            parent,
            kind: QuadNodeKind::UnpopulatedLeaf,
            visible_leaves: None,
        }
    }

    pub(crate) fn populated(cell: QuadTreeBounds, parent: Option<QuadNodeKey>, sequence: u64) -> Self {
        Self {
            kind: QuadNodeKind::PopulatedLeaf { objects: Vec::new(), sequence },
            ..Self::unpopulated(cell, parent)
        }
    }

    /// Append an object, doubling the content capacity when it is exhausted.
    ///
    /// Returns false if this node is not a populated leaf.
    pub(crate) fn push_object(&mut self, key: ObjectKey) -> bool {
        let QuadNodeKind::PopulatedLeaf { objects, .. } = &mut self.kind else {
            return false;
        };
        if objects.len() == objects.capacity() {
            objects.reserve_exact(objects.capacity().max(1));
        }
        objects.push(key);
        self.visible_leaves = None;
        true
    }

    /// The fixed grid cell of this node.
    pub fn cell(&self) -> &QuadTreeBounds {
        &self.cell
    }

    /// The enclosing rectangle of this node's content.
    ///
    /// May still be `QuadTreeBounds::UNINITIALIZED` before
    /// `QuadTree::initialize` has run.
    pub fn enclosing(&self) -> &QuadTreeBounds {
        &self.enclosing
    }

    pub fn parent(&self) -> Option<QuadNodeKey> {
        self.parent
    }

    pub fn kind(&self) -> &QuadNodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, QuadNodeKind::Internal { .. })
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.kind, QuadNodeKind::PopulatedLeaf { .. })
    }

    /// Population order of a populated leaf.
    pub fn sequence(&self) -> Option<u64> {
        match &self.kind {
            QuadNodeKind::PopulatedLeaf { sequence, .. } => Some(*sequence),
            _ => None,
        }
    }

    /// Children in quadrant order, for internal nodes.
    pub fn children(&self) -> Option<&[QuadNodeKey; 4]> {
        match &self.kind {
            QuadNodeKind::Internal { children } => Some(children),
            _ => None,
        }
    }

    /// Objects held by this node (empty unless populated).
    pub fn objects(&self) -> &[ObjectKey] {
        match &self.kind {
            QuadNodeKind::PopulatedLeaf { objects, .. } => objects,
            _ => &[],
        }
    }

    /// Number of objects held by this node.
    pub fn object_count(&self) -> usize {
        self.objects().len()
    }

    /// Visible populated leaves, or `None` if the list is stale
    /// (never built, or content was added since the last build).
    pub fn visible_leaves(&self) -> Option<&[QuadNodeKey]> {
        self.visible_leaves.as_deref()
    }
}

// ===== LEAF VIEW =====

/// Borrowed view of a leaf, returned by leaf lookups.
#[derive(Debug, Clone, Copy)]
pub struct LeafNode<'a> {
    key: QuadNodeKey,
    node: &'a QuadNode,
}

impl<'a> LeafNode<'a> {
    pub(crate) fn new(key: QuadNodeKey, node: &'a QuadNode) -> Self {
        debug_assert!(node.is_leaf());
        Self { key, node }
    }

    /// Handle of this leaf (stable until the tree is cleared).
    pub fn key(&self) -> QuadNodeKey {
        self.key
    }

    pub fn cell(&self) -> &'a QuadTreeBounds {
        &self.node.cell
    }

    pub fn enclosing(&self) -> &'a QuadTreeBounds {
        &self.node.enclosing
    }

    pub fn is_populated(&self) -> bool {
        self.node.is_populated()
    }

    /// Objects placed in this leaf.
    pub fn objects(&self) -> &'a [ObjectKey] {
        self.node.objects()
    }

    /// Populated leaves visible from this leaf, or `None` if stale.
    pub fn visible_leaves(&self) -> Option<&'a [QuadNodeKey]> {
        self.node.visible_leaves()
    }

    /// The underlying node.
    pub fn node(&self) -> &'a QuadNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn cell() -> QuadTreeBounds {
        QuadTreeBounds::new(0.0, 10.0, 0.0, 10.0).unwrap()
    }

    #[test]
    fn test_push_object_invalidates_visibility_list() {
        let mut keys = SlotMap::<ObjectKey, ()>::with_key();
        let mut node = QuadNode::populated(cell(), None, 0);
        node.visible_leaves = Some(Vec::new());

        assert!(node.push_object(keys.insert(())));
        assert!(node.visible_leaves().is_none());
        assert_eq!(node.object_count(), 1);
    }

    #[test]
    fn test_push_object_doubles_capacity() {
        let mut keys = SlotMap::<ObjectKey, ()>::with_key();
        let mut node = QuadNode::populated(cell(), None, 0);
        let mut capacities = Vec::new();
        for _ in 0..9 {
            node.push_object(keys.insert(()));
            let QuadNodeKind::PopulatedLeaf { objects, .. } = &node.kind else {
                unreachable!()
            };
            capacities.push(objects.capacity());
        }
        assert!(capacities.iter().all(|c| c.is_power_of_two()), "capacities: {:?}", capacities);
        assert!(capacities.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(node.object_count(), 9);
    }

    #[test]
    fn test_push_object_rejected_by_non_populated_nodes() {
        let mut keys = SlotMap::<ObjectKey, ()>::with_key();
        let mut node = QuadNode::unpopulated(cell(), None);
        assert!(!node.push_object(keys.insert(())));
        assert!(node.objects().is_empty());
    }

    #[test]
    fn test_new_nodes_start_uninitialized() {
        let node = QuadNode::unpopulated(cell(), None);
        assert!(node.enclosing().is_uninitialized());
        assert!(node.is_leaf());
        assert!(!node.is_populated());
        assert!(node.children().is_none());
    }

    #[test]
    fn test_sequence_only_on_populated_leaves() {
        assert_eq!(QuadNode::populated(cell(), None, 7).sequence(), Some(7));
        assert_eq!(QuadNode::unpopulated(cell(), None).sequence(), None);
    }
}
