//! Recursive 4-way subdivision of one base face into a patch.
//!
//! Every split replaces a triangle `(a, b, c)` by three corner children and a
//! middle child:
//!
//! ```text
//!              c
//!             / \
//!            / C \
//!        ca /_____\ bc
//!          / \ M / \
//!         / A \ / B \
//!        /_____\/____\
//!       a      ab     b
//! ```
//!
//! Children are always visited A, B, C, then M, so leaves land on the outer
//! edge lists in traversal order. Midpoints are shared through a cache keyed
//! by the unordered parent pair, so siblings never duplicate a vertex.

use glam::DVec3;
use rustc_hash::FxHashMap;

use crate::{EdgeMask, EdgeRole, MeshError, Patch, Triangle, Vertex, VertexId};

/// Deepest supported subdivision. Twenty patches at this depth still fit
/// their vertex ids in 32 bits.
pub const MAX_DEPTH: u32 = 12;

/// Midpoints already created for this patch, keyed by `(smaller, larger)` parent id.
///
/// Owned by a single face's subdivision and handed down the recursion by
/// exclusive reference; never shared between workers.
pub struct MidpointCache {
    map: FxHashMap<(u32, u32), VertexId>,
}

impl MidpointCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = FxHashMap::default();
        map.reserve(capacity);
        Self { map }
    }

    fn key(a: VertexId, b: VertexId) -> (u32, u32) {
        if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) }
    }

    /// Return the midpoint of `a` and `b`, creating it on the sphere of `radius` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::MidpointIndexOutOfRange`] if either parent is not
    /// in `vertices`; this means the recursion handed down a stale id.
    pub fn midpoint(
        &mut self,
        a: VertexId,
        b: VertexId,
        vertices: &mut Vec<Vertex>,
        radius: f64,
    ) -> Result<VertexId, MeshError> {
        let key = Self::key(a, b);
        if let Some(&id) = self.map.get(&key) {
            return Ok(id);
        }

        let pa = position_of(vertices, a)?;
        let pb = position_of(vertices, b)?;
        let id = VertexId(vertices.len() as u32);
        vertices.push(Vertex::on_sphere((pa + pb) * 0.5, radius));
        self.map.insert(key, id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn position_of(vertices: &[Vertex], id: VertexId) -> Result<DVec3, MeshError> {
    vertices
        .get(id.index())
        .map(|v| v.position)
        .ok_or(MeshError::MidpointIndexOutOfRange {
            index: id.0,
            len: vertices.len(),
        })
}

/// Vertices in a patch of the given depth: `(n² + n) / 2` with `n = 2^depth + 1`.
pub fn patch_vertex_count(depth: u32) -> usize {
    let n = (1usize << depth) + 1;
    (n * n + n) / 2
}

/// Triangles in a patch of the given depth: `4^depth`.
pub fn patch_triangle_count(depth: u32) -> usize {
    1usize << (2 * depth)
}

/// Subdivide base face `face` with corners `corners` (in winding order) `depth` times.
///
/// Vertices 0, 1 and 2 of the resulting patch are the base corners, copied
/// exactly. A depth of 0 yields the base triangle with all three edges outer.
///
/// # Errors
///
/// Returns [`MeshError::InvalidRadius`] or [`MeshError::DepthTooLarge`] on bad
/// input, and [`MeshError::MidpointIndexOutOfRange`] if the recursion breaks
/// its own invariants.
pub fn subdivide_face(
    face: usize,
    corners: [DVec3; 3],
    depth: u32,
    radius: f64,
) -> Result<Patch, MeshError> {
    check_inputs(depth, radius)?;

    let mut patch = Patch::with_capacity(
        face,
        patch_vertex_count(depth),
        patch_triangle_count(depth),
    );
    for role in EdgeRole::ALL {
        patch.edges[role.index()].reserve(1 << depth);
    }
    patch.vertices.extend(corners.map(Vertex::new));

    let mut cache = MidpointCache::with_capacity(patch_vertex_count(depth));
    let root = Triangle::new(VertexId(0), VertexId(1), VertexId(2));
    split(root, EdgeMask::ALL, depth, &mut patch, &mut cache, radius)?;

    Ok(patch)
}

pub(crate) fn check_inputs(depth: u32, radius: f64) -> Result<(), MeshError> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(MeshError::InvalidRadius(radius));
    }
    if depth > MAX_DEPTH {
        return Err(MeshError::DepthTooLarge {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

fn split(
    cell: Triangle,
    outer: EdgeMask,
    depth: u32,
    patch: &mut Patch,
    cache: &mut MidpointCache,
    radius: f64,
) -> Result<(), MeshError> {
    if depth == 0 {
        let index = patch.triangles.len() as u32;
        patch.triangles.push(Triangle { outer, ..cell });
        for role in EdgeRole::ALL {
            if outer.contains(role) {
                patch.edges[role.index()].push(index);
            }
        }
        return Ok(());
    }

    let ab = cache.midpoint(cell.a, cell.b, &mut patch.vertices, radius)?;
    let bc = cache.midpoint(cell.b, cell.c, &mut patch.vertices, radius)?;
    let ca = cache.midpoint(cell.c, cell.a, &mut patch.vertices, radius)?;

    let next = depth - 1;
    split(
        Triangle::new(cell.a, ab, ca),
        outer & (EdgeMask::AB | EdgeMask::CA),
        next,
        patch,
        cache,
        radius,
    )?;
    split(
        Triangle::new(ab, cell.b, bc),
        outer & (EdgeMask::AB | EdgeMask::BC),
        next,
        patch,
        cache,
        radius,
    )?;
    split(
        Triangle::new(ca, bc, cell.c),
        outer & (EdgeMask::CA | EdgeMask::BC),
        next,
        patch,
        cache,
        radius,
    )?;
    // The middle child never touches an outer edge, whatever its parent's mask.
    split(
        Triangle::new(bc, ca, ab),
        EdgeMask::NONE,
        next,
        patch,
        cache,
        radius,
    )
}
