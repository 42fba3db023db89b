/*!
# Galaxy 3D Quad Tree

Ground-plane spatial index for Galaxy3D scenes.

Static scene objects (track pieces, buildings, scenery) are inserted one by
one while a route loads. The tree grows to cover any area without knowing
its bounds up front. Once loading is done, `QuadTree::initialize` precomputes
for every leaf cell the list of populated cells that can be seen from it at
the configured viewing distance, so the per-frame work reduces to a point
lookup and a list read.

## Architecture

- **QuadTreeBounds**: ground-plane rectangle (X = left/right, Z = near/far)
- **QuadNode**: arena node (internal, unpopulated leaf, populated leaf)
- **QuadTree**: growth, insertion, lookup, visibility lists
- **LeafTracker**: turns camera leaf changes into show/hide sets

## Example

```no_run
use std::sync::Arc;
use galaxy_3d_quadtree::galaxy3d::quad_tree::{ObjectKey, ObjectState, QuadTree};
use galaxy_3d_quadtree::glam::{DMat3, DVec3};
use slotmap::SlotMap;

let mut objects = SlotMap::<ObjectKey, ObjectState>::with_key();
let vertices: Arc<[DVec3]> = Arc::from(vec![DVec3::new(-1.0, 0.0, -1.0), DVec3::new(1.0, 0.0, 1.0)]);
let key = objects.insert(ObjectState::new(DVec3::new(10.0, 0.0, 10.0), vertices));

let mut tree = QuadTree::new(60.0)?;
tree.insert(key, &objects[key], &DMat3::IDENTITY);
tree.initialize(600.0)?;

let leaf = tree.get_leaf_node(DVec3::new(10.0, 0.0, 10.0)).unwrap();
assert!(leaf.objects().contains(&key));
# Ok::<(), galaxy_3d_quadtree::galaxy3d::Galaxy3dError>(())
```
*/

// Internal modules
mod error;
pub mod log;
pub mod quad_tree;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Galaxy3dError, Galaxy3dResult};

    // Logging sub-module (types and logger control, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    // Quad tree sub-module
    pub mod quad_tree {
        pub use crate::quad_tree::*;
    }
}

// Re-export math library at crate root
pub use glam;
