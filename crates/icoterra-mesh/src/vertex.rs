//! Sphere vertices: position, elevation, classification, and adjacency.

use std::ops::{BitOr, BitOrAssign};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Neighbor count above which a vertex is reported as anomalous.
///
/// Six neighbors is the norm, five at the twelve icosahedron corners. Two
/// more are tolerated for seam twins before a merge defect is suspected.
pub const NEIGHBOR_ANOMALY_THRESHOLD: usize = 8;

/// Index of a vertex inside a vertex array (a patch's, or the unified sphere's).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

impl VertexId {
    /// The id as a `usize` slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-vertex classification bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexFlags(u8);

impl VertexFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Below sea level.
    pub const WATER: Self = Self(1);
    /// Carries a road.
    pub const ROAD: Self = Self(2);
    /// Carries a settlement.
    pub const SETTLEMENT: Self = Self(4);

    /// Returns `true` if every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Raw bit pattern.
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for VertexFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VertexFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Broad terrain profile assigned from the landscape gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandscapeType {
    Mountains,
    Hills,
    Plains,
    Swamps,
    Desert,
}

/// A vertex's landscape classification and how strongly it belongs to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandscapeClass {
    /// The governing landscape type.
    pub landscape: LandscapeType,
    /// Blend weight of `landscape` at this vertex, in `[0.0, 1.0]`.
    pub score: f64,
}

/// A point of the planet mesh.
///
/// `position` always lies on the base sphere. Displacement writes the
/// elevation `h` and the displaced `surface` point without moving `position`,
/// so identity and seam matching stay stable. Equality compares positions only.
#[derive(Clone, Debug)]
pub struct Vertex {
    /// Point on the sphere of the configured radius.
    pub position: DVec3,
    /// `position` pushed along its radial direction by `h`.
    pub surface: DVec3,
    /// Elevation relative to the base sphere.
    pub h: f64,
    /// Classification bits.
    pub flags: VertexFlags,
    /// Adjacent vertices, deduplicated. Ids index the same array this vertex lives in.
    pub neighbors: Vec<VertexId>,
    /// Landscape classification, set by displacement.
    pub landscape: Option<LandscapeClass>,
}

impl Vertex {
    /// Create a vertex at `position` with zero elevation and no neighbors.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            surface: position,
            h: 0.0,
            flags: VertexFlags::NONE,
            neighbors: Vec::with_capacity(6),
            landscape: None,
        }
    }

    /// Create a vertex at `point` re-projected onto the sphere of `radius`.
    pub fn on_sphere(point: DVec3, radius: f64) -> Self {
        Self::new(project_to_sphere(point, radius))
    }

    /// Register `id` as a neighbor. Returns `false` if it was already present.
    pub fn add_neighbor(&mut self, id: VertexId) -> bool {
        if self.neighbors.contains(&id) {
            return false;
        }
        self.neighbors.push(id);
        true
    }

    /// Returns `true` if the neighbor count exceeds [`NEIGHBOR_ANOMALY_THRESHOLD`].
    pub fn is_anomalous(&self) -> bool {
        self.neighbors.len() > NEIGHBOR_ANOMALY_THRESHOLD
    }

    /// Set the elevation and recompute the displaced surface point.
    pub fn set_elevation(&mut self, h: f64) {
        self.h = h;
        self.surface = self.position + self.position.normalize_or_zero() * h;
    }

    /// Returns `true` if both positions lie within `tolerance` of each other.
    pub fn coincides(&self, other: &Vertex, tolerance: f64) -> bool {
        self.position.distance_squared(other.position) <= tolerance * tolerance
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

/// Scale `point` so it lies on the sphere of `radius` centered at the origin.
#[inline]
pub fn project_to_sphere(point: DVec3, radius: f64) -> DVec3 {
    point * (radius / point.length())
}
