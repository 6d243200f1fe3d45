//! Triangles (cells) and the outer-edge bookkeeping used for stitching.

use std::ops::{BitAnd, BitOr};

use crate::VertexId;

/// One of the three edges of a base face, named by its endpoints in winding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeRole {
    AB,
    BC,
    CA,
}

impl EdgeRole {
    /// All three edges, in the order patches store their edge lists.
    pub const ALL: [EdgeRole; 3] = [EdgeRole::AB, EdgeRole::BC, EdgeRole::CA];

    /// Slot of this edge in a patch's edge-list array.
    pub fn index(self) -> usize {
        match self {
            EdgeRole::AB => 0,
            EdgeRole::BC => 1,
            EdgeRole::CA => 2,
        }
    }

    /// Single-edge mask for this role.
    pub fn mask(self) -> EdgeMask {
        match self {
            EdgeRole::AB => EdgeMask::AB,
            EdgeRole::BC => EdgeMask::BC,
            EdgeRole::CA => EdgeMask::CA,
        }
    }

    /// Whether boundary lists for this edge run with the face winding.
    ///
    /// AB lists run A to B and BC lists B to C. CA lists run A to C, against
    /// the winding, because subdivision visits the corner-A child first.
    pub fn follows_winding(self) -> bool {
        !matches!(self, EdgeRole::CA)
    }
}

/// Set of outer edges a (sub-)triangle still touches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeMask(u8);

impl EdgeMask {
    pub const NONE: Self = Self(0);
    pub const AB: Self = Self(1);
    pub const BC: Self = Self(2);
    pub const CA: Self = Self(4);
    pub const ALL: Self = Self(7);

    /// Returns `true` if `role` is in the mask.
    pub fn contains(self, role: EdgeRole) -> bool {
        self.0 & role.mask().0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for EdgeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for EdgeMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// A triangle of a patch, wound consistently with its base face.
///
/// The vertex order encodes orientation and must survive every transform:
/// stitching relies on it to know which way matched edges run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub a: VertexId,
    pub b: VertexId,
    pub c: VertexId,
    /// Outer edges of the base face this triangle lies on.
    pub outer: EdgeMask,
}

impl Triangle {
    /// An interior triangle.
    pub fn new(a: VertexId, b: VertexId, c: VertexId) -> Self {
        Self {
            a,
            b,
            c,
            outer: EdgeMask::NONE,
        }
    }

    /// Vertex ids in winding order.
    pub fn vertices(&self) -> [VertexId; 3] {
        [self.a, self.b, self.c]
    }

    /// Returns `true` if this triangle's `role` edge lies on the base face's outer edge.
    pub fn is_outer(&self, role: EdgeRole) -> bool {
        self.outer.contains(role)
    }

    /// Endpoints of the `role` edge in winding order.
    pub fn edge(&self, role: EdgeRole) -> (VertexId, VertexId) {
        match role {
            EdgeRole::AB => (self.a, self.b),
            EdgeRole::BC => (self.b, self.c),
            EdgeRole::CA => (self.c, self.a),
        }
    }

    /// Map every vertex id through `f`, keeping the winding and edge marks.
    pub fn remap(&self, mut f: impl FnMut(VertexId) -> VertexId) -> Self {
        Self {
            a: f(self.a),
            b: f(self.b),
            c: f(self.c),
            outer: self.outer,
        }
    }
}
