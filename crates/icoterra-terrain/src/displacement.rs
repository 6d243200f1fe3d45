//! Noise displacement of sphere vertices.

use std::time::Instant;

use glam::DVec3;
use icoterra_mesh::parallel::fork_join_mut;
use icoterra_mesh::{LandscapeClass, Vertex, VertexFlags};
use tracing::{info, info_span};

use crate::{FractalNoise, FractalNoiseParams, GradientTable, TerrainError};

/// Elevation and classification computed for one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementSample {
    /// Shaped, scaled fractal noise.
    pub raw: f64,
    /// Gradient table multiplier at this point.
    pub multiplier: f64,
    /// Final elevation, `raw * multiplier`.
    pub h: f64,
    pub landscape: Option<LandscapeClass>,
}

/// Lowest and highest elevation written by a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

impl ElevationRange {
    /// The range of the elevations in `vertices`; `0..0` if there are none.
    pub fn of(vertices: &[Vertex]) -> Self {
        if vertices.is_empty() {
            return Self { min: 0.0, max: 0.0 };
        }
        vertices.iter().fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |r, v| Self {
                min: r.min.min(v.h),
                max: r.max.max(v.h),
            },
        )
    }
}

/// Two independently seeded noise fields and a landscape gradient.
///
/// The height field gives the raw elevation. The biome field, rescaled from
/// `[-1, 1]` to `[0, 1]`, picks the height multiplier from the gradient.
pub struct DisplacementField {
    radius: f64,
    height: FractalNoise,
    biome: FractalNoise,
    gradient: GradientTable,
    ridge: Option<f64>,
    amplitude: f64,
}

impl DisplacementField {
    /// The biome field uses the height field's parameters with seed
    /// `params.seed + biome_seed_offset`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRadius`] or the noise parameter errors
    /// of [`FractalNoise::new`].
    pub fn new(
        radius: f64,
        params: FractalNoiseParams,
        biome_seed_offset: u32,
        gradient: GradientTable,
    ) -> Result<Self, TerrainError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(TerrainError::InvalidRadius(radius));
        }
        let biome_seed = params.seed.wrapping_add(biome_seed_offset);
        let height = FractalNoise::new(params)?;
        let biome = height.reseeded(biome_seed);
        Ok(Self {
            radius,
            height,
            biome,
            gradient,
            ridge: None,
            amplitude: 1.0,
        })
    }

    /// Shape raw noise as `offset - |n|`, which draws ridges along the noise zero set.
    pub fn with_ridge(mut self, offset: f64) -> Self {
        self.ridge = Some(offset);
        self
    }

    /// Scale raw noise by `amplitude`.
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn gradient(&self) -> &GradientTable {
        &self.gradient
    }

    /// Evaluate both fields at `position`.
    pub fn sample(&self, position: DVec3) -> DisplacementSample {
        let n = self.height.sample(position);
        let shaped = match self.ridge {
            Some(offset) => offset - n.abs(),
            None => n,
        };
        let raw = shaped * self.amplitude;

        let biome = (self.biome.sample(position) + 1.0) * 0.5;
        let gradient = self.gradient.sample(biome);

        DisplacementSample {
            raw,
            multiplier: gradient.multiplier,
            h: raw * gradient.multiplier,
            landscape: gradient.class,
        }
    }

    /// Write elevation, displaced surface, landscape class and the water flag
    /// into every vertex, `batch_size` vertices per task.
    ///
    /// Only base-sphere positions are read, so repeated passes give the same result.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Mesh`] if a worker cannot be started or panics.
    pub fn apply(
        &self,
        vertices: &mut [Vertex],
        batch_size: usize,
        workers: usize,
    ) -> Result<ElevationRange, TerrainError> {
        let _span = info_span!("displace", vertices = vertices.len()).entered();
        let start = Instant::now();

        fork_join_mut("displace", workers, vertices, batch_size, |_, batch| {
            for v in batch {
                let s = self.sample(v.position);
                v.set_elevation(s.h);
                v.landscape = s.landscape;
                if s.h < 0.0 {
                    v.flags.insert(VertexFlags::WATER);
                } else {
                    v.flags.remove(VertexFlags::WATER);
                }
            }
            Ok::<_, TerrainError>(())
        })?;

        let range = ElevationRange::of(vertices);
        info!(
            min = range.min,
            max = range.max,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "vertices displaced"
        );
        Ok(range)
    }
}
