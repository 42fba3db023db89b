//! Ground-plane quad tree
//!
//! Indexes placed scene objects by their position on the ground plane and
//! precomputes, for every leaf cell, the populated leaves that may be visible
//! from it at a given viewing distance.

mod bounds;
mod node;
mod placement;
#[allow(clippy::module_inception)]
mod quad_tree;
mod tracker;
mod visibility;

pub use bounds::{planar, Quadrant, QuadTreeBounds};
pub use node::{LeafNode, QuadNode, QuadNodeKey, QuadNodeKind};
pub use placement::{world_extents, ObjectKey, ObjectState, PlacedObject};
pub use quad_tree::{
    QuadTree, QuadTreeConfig,
    DEFAULT_LEAF_SIDE_LENGTH, DEFAULT_TOLERANCE_FACTOR, DEFAULT_VIEWING_DISTANCE,
};
pub use tracker::{LeafTracker, VisibilityDelta};
pub use visibility::within_viewing_distance;
