/// Ground-plane rectangles used as node cells and enclosing rectangles.
///
/// The ground plane is spanned by world X (left → right) and world Z
/// (near → far). Planar points are passed as `DVec2 { x: world_x, y: world_z }`.

use glam::{DVec2, DVec3};
use crate::error::{Galaxy3dError, Galaxy3dResult};

/// Project a world position onto the ground plane.
#[inline]
pub fn planar(position: DVec3) -> DVec2 {
    DVec2::new(position.x, position.z)
}

// ===== QUADRANT =====

/// One of the four child slots of an internal node.
///
/// Slot order is near-left, near-right, far-left, far-right.
/// Bit 0 selects the right half, bit 1 the far half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NearLeft = 0,
    NearRight = 1,
    FarLeft = 2,
    FarRight = 3,
}

impl Quadrant {
    /// All quadrants in slot order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NearLeft,
        Quadrant::NearRight,
        Quadrant::FarLeft,
        Quadrant::FarRight,
    ];

    /// Build a quadrant from its two half selections.
    pub fn from_halves(right: bool, far: bool) -> Self {
        Self::ALL[(right as usize) | ((far as usize) << 1)]
    }

    /// Child slot index (0–3).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for the two quadrants on the right (high X) half.
    #[inline]
    pub fn is_right(self) -> bool {
        self.index() & 1 != 0
    }

    /// True for the two quadrants on the far (high Z) half.
    #[inline]
    pub fn is_far(self) -> bool {
        self.index() & 2 != 0
    }

    /// The diagonally opposite quadrant.
    #[inline]
    pub fn opposite(self) -> Self {
        Self::ALL[self.index() ^ 3]
    }
}

// ===== BOUNDS =====

/// An axis-aligned rectangle on the ground plane.
///
/// Settled bounds satisfy `left <= right` and `near <= far`.
/// [`QuadTreeBounds::UNINITIALIZED`] is an inverted rectangle meaning
/// "not computed yet"; it is the identity of [`QuadTreeBounds::union`] and
/// must not be compared as if it were settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeBounds {
    left: f64,
    right: f64,
    near: f64,
    far: f64,
}

impl QuadTreeBounds {
    /// Sentinel for a rectangle that has not been computed yet.
    pub const UNINITIALIZED: QuadTreeBounds = QuadTreeBounds {
        left: f64::MAX,
        right: f64::MIN,
        near: f64::MAX,
        far: f64::MIN,
    };

    /// Create bounds from four edges.
    ///
    /// # Errors
    ///
    /// Returns `Galaxy3dError::InvalidArgument` if any edge is infinite or NaN.
    pub fn new(left: f64, right: f64, near: f64, far: f64) -> Galaxy3dResult<Self> {
        if !(left.is_finite() && right.is_finite() && near.is_finite() && far.is_finite()) {
            return Err(Galaxy3dError::InvalidArgument(format!(
                "Bounds edges must be finite (left={}, right={}, near={}, far={})",
                left, right, near, far
            )));
        }
        Ok(Self::from_edges(left, right, near, far))
    }

    /// Create bounds from edges already known to be finite.
    #[inline]
    pub(crate) const fn from_edges(left: f64, right: f64, near: f64, far: f64) -> Self {
        Self { left, right, near, far }
    }

    /// Square of side `side_length` centered on a planar point.
    pub(crate) fn centered(center: DVec2, side_length: f64) -> Self {
        let half = 0.5 * side_length;
        Self::from_edges(center.x - half, center.x + half, center.y - half, center.y + half)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.right
    }

    #[inline]
    pub fn near(&self) -> f64 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f64 {
        self.far
    }

    /// True while no edge has been set (inverted on either axis).
    #[inline]
    pub fn is_uninitialized(&self) -> bool {
        self.left > self.right || self.near > self.far
    }

    /// Extent along X.
    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Extent along Z.
    #[inline]
    pub fn depth(&self) -> f64 {
        self.far - self.near
    }

    /// Mean of width and depth (cells are square, so this is their side).
    #[inline]
    pub fn side_length(&self) -> f64 {
        0.5 * (self.width() + self.depth())
    }

    /// Center point on the ground plane.
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(0.5 * (self.left + self.right), 0.5 * (self.near + self.far))
    }

    /// True if all four edges are finite.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
            && self.near.is_finite() && self.far.is_finite()
    }

    /// Edge-inclusive point containment.
    #[inline]
    pub fn contains_point(&self, point: DVec2) -> bool {
        point.x >= self.left && point.x <= self.right
            && point.y >= self.near && point.y <= self.far
    }

    /// Edge-inclusive rectangle containment.
    pub fn contains(&self, other: &QuadTreeBounds) -> bool {
        self.left <= other.left && self.right >= other.right
            && self.near <= other.near && self.far >= other.far
    }

    /// Overlap (or touch) along X.
    #[inline]
    pub fn overlaps_x(&self, other: &QuadTreeBounds) -> bool {
        self.left <= other.right && self.right >= other.left
    }

    /// Overlap (or touch) along Z.
    #[inline]
    pub fn overlaps_z(&self, other: &QuadTreeBounds) -> bool {
        self.near <= other.far && self.far >= other.near
    }

    /// Overlap (or touch) on both axes.
    #[inline]
    pub fn intersects(&self, other: &QuadTreeBounds) -> bool {
        self.overlaps_x(other) && self.overlaps_z(other)
    }

    /// These bounds grown by `distance` on all four sides.
    pub fn expanded(&self, distance: f64) -> QuadTreeBounds {
        Self::from_edges(
            self.left - distance,
            self.right + distance,
            self.near - distance,
            self.far + distance,
        )
    }

    /// Smallest rectangle enclosing both. The sentinel is the identity.
    pub fn union(&self, other: &QuadTreeBounds) -> QuadTreeBounds {
        Self::from_edges(
            self.left.min(other.left),
            self.right.max(other.right),
            self.near.min(other.near),
            self.far.max(other.far),
        )
    }

    /// Grow these bounds in place to include `other`.
    #[inline]
    pub fn expand_to_include(&mut self, other: &QuadTreeBounds) {
        *self = self.union(other);
    }

    /// Grow these bounds in place to include a planar point.
    pub fn include_point(&mut self, point: DVec2) {
        self.left = self.left.min(point.x);
        self.right = self.right.max(point.x);
        self.near = self.near.min(point.y);
        self.far = self.far.max(point.y);
    }

    /// Quadrant of `point` relative to this rectangle's center.
    ///
    /// Points on a midline belong to the left / near half.
    pub fn quadrant(&self, point: DVec2) -> Quadrant {
        let center = self.center();
        Quadrant::from_halves(point.x > center.x, point.y > center.y)
    }

    /// The sub-rectangle covering one quadrant.
    pub fn quadrant_cell(&self, quadrant: Quadrant) -> QuadTreeBounds {
        let center = self.center();
        let (left, right) = if quadrant.is_right() {
            (center.x, self.right)
        } else {
            (self.left, center.x)
        };
        let (near, far) = if quadrant.is_far() {
            (center.y, self.far)
        } else {
            (self.near, center.y)
        };
        Self::from_edges(left, right, near, far)
    }

    /// Double these bounds toward `point`.
    ///
    /// Grows left when `point.x` is at or left of the center (right otherwise)
    /// and near when `point.y` is at or near of the center (far otherwise).
    /// Returns the grown bounds and the quadrant `self` occupies within them,
    /// which is always opposite to the growth direction.
    pub fn grown_toward(&self, point: DVec2) -> (QuadTreeBounds, Quadrant) {
        let growth = self.quadrant(point);
        let (left, right) = if growth.is_right() {
            (self.left, 2.0 * self.right - self.left)
        } else {
            (2.0 * self.left - self.right, self.right)
        };
        let (near, far) = if growth.is_far() {
            (self.near, 2.0 * self.far - self.near)
        } else {
            (2.0 * self.near - self.far, self.far)
        };
        (Self::from_edges(left, right, near, far), growth.opposite())
    }

    /// Squared distance between the closest corners of two rectangles that
    /// do not overlap on either axis.
    pub fn corner_distance_squared(&self, other: &QuadTreeBounds) -> f64 {
        let dx = if self.right <= other.left {
            self.right - other.left
        } else {
            self.left - other.right
        };
        let dz = if self.far <= other.near {
            self.far - other.near
        } else {
            self.near - other.far
        };
        dx * dx + dz * dz
    }
}

impl Default for QuadTreeBounds {
    fn default() -> Self {
        Self::UNINITIALIZED
    }
}
