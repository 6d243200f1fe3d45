//! Multi-octave coherent noise over 3-D sphere positions.

use glam::DVec3;
use noise::{NoiseFn, OpenSimplex};

use crate::TerrainError;

/// Parameters for [`FractalNoise`].
#[derive(Clone, Debug, PartialEq)]
pub struct FractalNoiseParams {
    pub seed: u32,
    /// Number of octaves summed per sample.
    pub octaves: u32,
    /// Wavelength of the first octave in world units. Smaller means more detail.
    pub period: f64,
    /// Amplitude ratio between successive octaves.
    pub persistence: f64,
    /// Frequency ratio between successive octaves.
    pub lacunarity: f64,
}

impl Default for FractalNoiseParams {
    fn default() -> Self {
        Self {
            seed: 69420,
            octaves: 8,
            period: 4.2,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Fractal Brownian motion over OpenSimplex noise, normalized to roughly `[-1, 1]`.
pub struct FractalNoise {
    noise: OpenSimplex,
    params: FractalNoiseParams,
    normalization: f64,
}

impl FractalNoise {
    /// # Errors
    ///
    /// Returns [`TerrainError::NonPositivePeriod`] or [`TerrainError::ZeroOctaves`].
    pub fn new(params: FractalNoiseParams) -> Result<Self, TerrainError> {
        if !(params.period > 0.0 && params.period.is_finite()) {
            return Err(TerrainError::NonPositivePeriod(params.period));
        }
        if params.octaves == 0 {
            return Err(TerrainError::ZeroOctaves);
        }

        let mut sum = 0.0;
        let mut amplitude = 1.0_f64;
        for _ in 0..params.octaves {
            sum += amplitude.abs();
            amplitude *= params.persistence;
        }

        Ok(Self {
            noise: OpenSimplex::new(params.seed),
            normalization: if sum > 0.0 { 1.0 / sum } else { 1.0 },
            params,
        })
    }

    /// Same parameters, different seed.
    pub fn reseeded(&self, seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            params: FractalNoiseParams {
                seed,
                ..self.params.clone()
            },
            normalization: self.normalization,
        }
    }

    /// Sample at a 3-D point.
    pub fn sample(&self, point: DVec3) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0 / self.params.period;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            let p = point * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;

            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total * self.normalization
    }

    pub fn params(&self) -> &FractalNoiseParams {
        &self.params
    }
}
