//! The sphere build pipeline: subdivide, link, stitch, unify.

use std::time::Instant;

use tracing::{info, info_span};

use crate::disjoint_set::DisjointSet;
use crate::parallel::{fork_join, resolve_workers};
use crate::stitch::{stitch, vertex_offsets};
use crate::subdivision::check_inputs;
use crate::unify::{SphereMesh, unify};
use crate::{FACE_COUNT, Icosahedron, MeshError, Patch, link_neighbors, subdivide_face};

/// Builds a stitched icosphere.
///
/// Each stage joins all of its workers before the next begins. A failure in
/// any task aborts the whole build.
#[derive(Clone, Copy, Debug)]
pub struct SphereBuilder {
    radius: f64,
    depth: u32,
    workers: usize,
}

impl SphereBuilder {
    /// A builder for a sphere of `radius` subdivided `depth` times, using one
    /// worker per logical CPU.
    pub fn new(radius: f64, depth: u32) -> Self {
        Self {
            radius,
            depth,
            workers: 0,
        }
    }

    /// Use `workers` threads per stage (`0` = one per logical CPU).
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Subdivide all twenty faces and link each patch's neighbors, without stitching.
    pub fn build_patches(&self) -> Result<Vec<Patch>, MeshError> {
        check_inputs(self.depth, self.radius)?;
        let ico = Icosahedron::new(self.radius);

        let _span = info_span!("subdivide", depth = self.depth).entered();
        let start = Instant::now();
        let patches = fork_join("subdivide", self.workers, FACE_COUNT, |face| {
            let mut patch = subdivide_face(face, ico.face(face), self.depth, self.radius)?;
            let _span = info_span!("link_neighbors", face).entered();
            link_neighbors(&mut patch);
            Ok::<_, MeshError>(patch)
        })?;
        info!(
            patches = patches.len(),
            workers = resolve_workers(self.workers).min(FACE_COUNT),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "faces subdivided"
        );
        Ok(patches)
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidRadius`] or [`MeshError::DepthTooLarge`] for
    /// bad input, or the first stage error otherwise.
    pub fn build(&self) -> Result<SphereMesh, MeshError> {
        let patches = self.build_patches()?;
        let offsets = vertex_offsets(&patches);
        let set = DisjointSet::new(offsets[patches.len()] as usize);

        {
            let _span = info_span!("stitch").entered();
            let start = Instant::now();
            let seams = stitch(&patches, &offsets, &set, self.radius, self.workers)?;
            info!(
                seams = seams.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "patches stitched"
            );
        }

        let _span = info_span!("unify").entered();
        let start = Instant::now();
        let mesh = unify(patches, &offsets, &set, self.radius, self.depth);
        info!(
            vertices = mesh.stats.vertices,
            triangles = mesh.stats.triangles,
            anomalies = mesh.stats.anomalies,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "sphere unified"
        );
        Ok(mesh)
    }
}
