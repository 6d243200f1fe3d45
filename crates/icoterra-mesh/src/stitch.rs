//! Edge stitching between independently subdivided patches.
//!
//! Each patch owns copies of the vertices on its outer edges. Stitching finds
//! the partner edge of every outer edge by comparing edge endpoints, then
//! joins the duplicate vertices in a [`DisjointSet`] over global vertex ids
//! (`offsets[face] + local`). Nothing is copied or overwritten here;
//! [`unify`](crate::unify) resolves the classes afterwards.

use std::sync::Mutex;

use glam::DVec3;

use crate::disjoint_set::DisjointSet;
use crate::parallel::fork_join;
use crate::{EdgeRole, MeshError, Patch, VertexId};

/// Relative tolerance for position comparisons along seams.
pub const SEAM_TOLERANCE: f64 = 1e-9;

/// Relative iteration direction of two matched boundary lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Point `k` of one list meets point `k` of the other.
    Forward,
    /// Point `k` of one list meets point `len - 1 - k` of the other.
    Reversed,
}

/// One of the nine ways an edge of a lower-index face can meet an edge of a
/// higher-index face. The first role belongs to the lower face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePairing {
    AbAb,
    AbBc,
    AbCa,
    BcAb,
    BcBc,
    BcCa,
    CaAb,
    CaBc,
    CaCa,
}

impl EdgePairing {
    pub const ALL: [EdgePairing; 9] = [
        EdgePairing::AbAb,
        EdgePairing::AbBc,
        EdgePairing::AbCa,
        EdgePairing::BcAb,
        EdgePairing::BcBc,
        EdgePairing::BcCa,
        EdgePairing::CaAb,
        EdgePairing::CaBc,
        EdgePairing::CaCa,
    ];

    /// `(ours, theirs)` edge roles.
    pub fn roles(self) -> (EdgeRole, EdgeRole) {
        use EdgeRole::{AB, BC, CA};
        match self {
            EdgePairing::AbAb => (AB, AB),
            EdgePairing::AbBc => (AB, BC),
            EdgePairing::AbCa => (AB, CA),
            EdgePairing::BcAb => (BC, AB),
            EdgePairing::BcBc => (BC, BC),
            EdgePairing::BcCa => (BC, CA),
            EdgePairing::CaAb => (CA, AB),
            EdgePairing::CaBc => (CA, BC),
            EdgePairing::CaCa => (CA, CA),
        }
    }

    /// The pairing for a pair of roles.
    pub fn from_roles(ours: EdgeRole, theirs: EdgeRole) -> Self {
        Self::ALL[ours.index() * 3 + theirs.index()]
    }

    /// How the two boundary lists must line up for this pairing.
    ///
    /// Adjacent faces run a shared edge in opposite directions. CA lists run
    /// against their face's winding, so pairing a CA list with an AB or BC
    /// list cancels the flip and the lists line up forward.
    pub fn traversal(self) -> Traversal {
        let (ours, theirs) = self.roles();
        if ours.follows_winding() == theirs.follows_winding() {
            Traversal::Reversed
        } else {
            Traversal::Forward
        }
    }
}

/// A matched pair of outer edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seam {
    /// Lower face index.
    pub face: usize,
    /// Higher face index.
    pub other: usize,
    pub pairing: EdgePairing,
}

/// Global vertex id offsets: patch `i` owns ids `offsets[i]..offsets[i + 1]`.
pub fn vertex_offsets(patches: &[Patch]) -> Vec<u32> {
    let mut offsets = Vec::with_capacity(patches.len() + 1);
    let mut next = 0u32;
    for patch in patches {
        offsets.push(next);
        next += patch.vertices.len() as u32;
    }
    offsets.push(next);
    offsets
}

/// Boundary lists of one patch, indexed by [`EdgeRole::index`].
struct Boundaries {
    lists: [Vec<VertexId>; 3],
}

impl Boundaries {
    fn of(patch: &Patch) -> Self {
        Self {
            lists: EdgeRole::ALL.map(|role| patch.boundary(role)),
        }
    }

    fn get(&self, role: EdgeRole) -> &[VertexId] {
        &self.lists[role.index()]
    }
}

struct Stitcher<'a> {
    patches: &'a [Patch],
    boundaries: Vec<Boundaries>,
    offsets: &'a [u32],
    set: &'a DisjointSet,
    corners: Mutex<()>,
    tolerance: f64,
}

impl Stitcher<'_> {
    fn global(&self, face: usize, id: VertexId) -> u32 {
        self.offsets[face] + id.0
    }

    fn close(&self, a: DVec3, b: DVec3) -> bool {
        a.distance_squared(b) <= self.tolerance * self.tolerance
    }

    /// Match every outer edge of face `p` against faces above it.
    fn stitch_face(&self, p: usize) -> Result<Vec<Seam>, MeshError> {
        let mut seams = Vec::new();
        let mut matched = [false; 3];

        for q in p + 1..self.patches.len() {
            for pairing in EdgePairing::ALL {
                let (ours, theirs) = pairing.roles();
                if matched[ours.index()] {
                    continue;
                }
                let Some(traversal) = self.match_endpoints(p, ours, q, theirs) else {
                    continue;
                };
                if traversal != pairing.traversal() {
                    return Err(MeshError::WindingMismatch {
                        face: p,
                        edge: ours,
                        other: q,
                        other_edge: theirs,
                    });
                }
                self.join_edges(p, ours, q, theirs, traversal)?;
                matched[ours.index()] = true;
                seams.push(Seam {
                    face: p,
                    other: q,
                    pairing,
                });
            }
        }
        Ok(seams)
    }

    /// Compare the endpoints of two edges; `None` if they are not the same edge.
    fn match_endpoints(
        &self,
        p: usize,
        ours: EdgeRole,
        q: usize,
        theirs: EdgeRole,
    ) -> Option<Traversal> {
        let a = self.boundaries[p].get(ours);
        let b = self.boundaries[q].get(theirs);
        let (a0, a1) = (a.first()?, a.last()?);
        let (b0, b1) = (b.first()?, b.last()?);
        let pa = &self.patches[p];
        let pb = &self.patches[q];

        if self.close(pa.position(*a0), pb.position(*b0))
            && self.close(pa.position(*a1), pb.position(*b1))
        {
            Some(Traversal::Forward)
        } else if self.close(pa.position(*a0), pb.position(*b1))
            && self.close(pa.position(*a1), pb.position(*b0))
        {
            Some(Traversal::Reversed)
        } else {
            None
        }
    }

    fn join_edges(
        &self,
        p: usize,
        ours: EdgeRole,
        q: usize,
        theirs: EdgeRole,
        traversal: Traversal,
    ) -> Result<(), MeshError> {
        let a = self.boundaries[p].get(ours);
        let mut b = self.boundaries[q].get(theirs).to_vec();
        if traversal == Traversal::Reversed {
            b.reverse();
        }
        if a.len() != b.len() {
            return Err(MeshError::EdgeLengthMismatch {
                face: p,
                edge: ours,
                len: a.len(),
                other: q,
                other_edge: theirs,
                other_len: b.len(),
            });
        }

        let last = a.len() - 1;
        {
            // Corners are shared by five patches and touched by several tasks.
            let _guard = self
                .corners
                .lock()
                .map_err(|_| MeshError::StitchLockPoisoned)?;
            self.set.union(self.global(p, a[0]), self.global(q, b[0]));
            self.set.union(self.global(p, a[last]), self.global(q, b[last]));
        }

        let pa = &self.patches[p];
        let pb = &self.patches[q];
        for k in 1..last {
            let (x, y) = (pa.position(a[k]), pb.position(b[k]));
            if !self.close(x, y) {
                return Err(MeshError::EdgeEndpointMismatch {
                    face: p,
                    edge: ours,
                    other: q,
                    other_edge: theirs,
                    point: k,
                    distance: x.distance(y),
                });
            }
            self.set
                .link_exclusive(self.global(q, b[k]), self.global(p, a[k]));
        }
        Ok(())
    }
}

/// Find every shared edge between `patches` and join their duplicate vertices in `set`.
///
/// `set` must span all patch vertices, with patch `i` starting at
/// `offsets[i]` (see [`vertex_offsets`]). Work is split per lower face over
/// up to `workers` threads.
///
/// # Errors
///
/// Returns [`MeshError::WindingMismatch`], [`MeshError::EdgeLengthMismatch`]
/// or [`MeshError::EdgeEndpointMismatch`] if a matched edge is inconsistent,
/// and [`MeshError::UnmatchedEdges`] if some face does not end up with
/// exactly three seams.
pub fn stitch(
    patches: &[Patch],
    offsets: &[u32],
    set: &DisjointSet,
    radius: f64,
    workers: usize,
) -> Result<Vec<Seam>, MeshError> {
    let stitcher = Stitcher {
        patches,
        boundaries: patches.iter().map(Boundaries::of).collect(),
        offsets,
        set,
        corners: Mutex::new(()),
        tolerance: radius * SEAM_TOLERANCE,
    };

    let per_face = fork_join("stitch", workers, patches.len(), |p| stitcher.stitch_face(p))?;
    let seams: Vec<Seam> = per_face.into_iter().flatten().collect();

    let mut counts = vec![0usize; patches.len()];
    for seam in &seams {
        counts[seam.face] += 1;
        counts[seam.other] += 1;
    }
    if let Some((face, &matched)) = counts.iter().enumerate().find(|(_, c)| **c != 3) {
        return Err(MeshError::UnmatchedEdges { face, matched });
    }

    tracing::debug!(seams = seams.len(), "edges stitched");
    Ok(seams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FACE_COUNT, Icosahedron, subdivide_face};

    fn patches(depth: u32, radius: f64) -> Vec<Patch> {
        let ico = Icosahedron::new(radius);
        (0..FACE_COUNT)
            .map(|i| subdivide_face(i, ico.face(i), depth, radius).unwrap())
            .collect()
    }

    fn stitched(depth: u32, radius: f64, workers: usize) -> (Vec<Patch>, DisjointSet, Vec<Seam>) {
        let patches = patches(depth, radius);
        let offsets = vertex_offsets(&patches);
        let set = DisjointSet::new(offsets[FACE_COUNT] as usize);
        let seams = stitch(&patches, &offsets, &set, radius, workers).unwrap();
        (patches, set, seams)
    }

    #[test]
    fn test_pairing_roles_round_trip() {
        for pairing in EdgePairing::ALL {
            let (a, b) = pairing.roles();
            assert_eq!(EdgePairing::from_roles(a, b), pairing);
        }
    }

    #[test]
    fn test_traversal_table() {
        let forward: Vec<EdgePairing> = EdgePairing::ALL
            .into_iter()
            .filter(|p| p.traversal() == Traversal::Forward)
            .collect();
        assert_eq!(
            forward,
            vec![
                EdgePairing::AbCa,
                EdgePairing::BcCa,
                EdgePairing::CaAb,
                EdgePairing::CaBc
            ]
        );
    }

    #[test]
    fn test_thirty_seams_at_every_depth() {
        for depth in 0..=3 {
            let (_, set, seams) = stitched(depth, 10.0, 4);
            assert_eq!(seams.len(), 30, "depth {depth}");
            assert_eq!(set.class_count(), 10 * 4usize.pow(depth) + 2, "depth {depth}");
        }
    }

    #[test]
    fn test_depth_zero_joins_only_corners() {
        let (_, set, _) = stitched(0, 1.0, 2);
        assert_eq!(set.class_count(), 12);
    }

    #[test]
    fn test_joined_vertices_share_position() {
        let (patches, set, _) = stitched(2, 10.0, 3);
        let offsets = vertex_offsets(&patches);
        let position = |g: u32| {
            let face = offsets.partition_point(|&o| o <= g) - 1;
            patches[face].position(VertexId(g - offsets[face]))
        };
        for g in 0..offsets[FACE_COUNT] {
            let root = set.find(g);
            assert!(root <= g);
            assert!(position(g).distance(position(root)) < 1e-8);
        }
    }

    #[test]
    fn test_result_does_not_depend_on_worker_count() {
        let (_, one, seams_one) = stitched(3, 5.0, 1);
        let (_, many, seams_many) = stitched(3, 5.0, 8);
        assert_eq!(seams_one, seams_many);
        for g in 0..one.len() as u32 {
            assert_eq!(one.find(g), many.find(g));
        }
    }

    #[test]
    fn test_missing_face_is_reported() {
        let mut patches = patches(1, 1.0);
        patches.truncate(19);
        let offsets = vertex_offsets(&patches);
        let set = DisjointSet::new(offsets[19] as usize);
        let err = stitch(&patches, &offsets, &set, 1.0, 2).unwrap_err();
        assert!(matches!(err, MeshError::UnmatchedEdges { .. }));
    }

    #[test]
    fn test_depth_mismatch_is_reported() {
        let ico = Icosahedron::new(1.0);
        let mut patches = patches(2, 1.0);
        patches[0] = subdivide_face(0, ico.face(0), 1, 1.0).unwrap();
        let offsets = vertex_offsets(&patches);
        let set = DisjointSet::new(offsets[FACE_COUNT] as usize);
        let err = stitch(&patches, &offsets, &set, 1.0, 1).unwrap_err();
        assert!(matches!(err, MeshError::EdgeLengthMismatch { face: 0, .. }));
    }
}
