/// Placed scene objects as seen by the quad tree.
///
/// The quad tree never owns objects. Loaders keep their objects in their own
/// storage and hand the tree an `ObjectKey` plus read access to the object's
/// placement and mesh vertices.

use std::sync::Arc;
use glam::{DMat3, DVec3};
use slotmap::new_key_type;
use super::bounds::{planar, QuadTreeBounds};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle to a placed object, owned by the loader's object storage.
    ///
    /// The quad tree stores these handles in its leaves and uses them to
    /// reject duplicate insertions.
    pub struct ObjectKey;
}

// ===== PLACED OBJECT =====

/// Read access to a placed object's geometry.
///
/// Implemented by whatever object model the loader uses.
pub trait PlacedObject {
    /// World-space position of the object's origin.
    fn world_position(&self) -> DVec3;

    /// Mesh vertex coordinates in the object's local space.
    fn local_vertices(&self) -> &[DVec3];
}

/// Ground-plane extents of an object's mesh after rotating every local
/// vertex by `orientation` and translating it to the world position.
///
/// Returns the sentinel if the mesh has no vertices.
pub fn world_extents<O: PlacedObject + ?Sized>(object: &O, orientation: &DMat3) -> QuadTreeBounds {
    let position = object.world_position();
    let mut extents = QuadTreeBounds::UNINITIALIZED;
    for vertex in object.local_vertices() {
        extents.include_point(planar(position + *orientation * *vertex));
    }
    extents
}

// ===== OBJECT STATE =====

/// Minimal `PlacedObject`: a world position and a shared vertex list.
///
/// Several placements of the same prototype can share one vertex list.
#[derive(Debug, Clone)]
pub struct ObjectState {
    /// World position of the object origin
    pub world_position: DVec3,
    /// Local mesh vertices (shared between instances of a prototype)
    pub vertices: Arc<[DVec3]>,
}

impl ObjectState {
    /// Create an object state at `world_position` using `vertices`.
    pub fn new(world_position: DVec3, vertices: Arc<[DVec3]>) -> Self {
        Self { world_position, vertices }
    }

    /// Object without geometry (a marker, or a prototype not loaded yet).
    pub fn point(world_position: DVec3) -> Self {
        Self { world_position, vertices: Arc::from(Vec::new()) }
    }
}

impl PlacedObject for ObjectState {
    fn world_position(&self) -> DVec3 {
        self.world_position
    }

    fn local_vertices(&self) -> &[DVec3] {
        &self.vertices
    }
}
