//! The whole generation request.

use std::path::Path;
use std::time::Instant;

use icoterra_config::Config;
use icoterra_mesh::SphereBuilder;
use icoterra_terrain::{DisplacementField, FractalNoiseParams, GradientTable};
use tracing::{info, info_span};

use crate::{PlanetError, PlanetTopology};

/// Turns a validated [`Config`] into a [`PlanetTopology`].
pub struct PlanetGenerator {
    config: Config,
    field: DisplacementField,
}

impl PlanetGenerator {
    /// # Errors
    ///
    /// Returns [`PlanetError::Config`] if `config` fails validation, or
    /// [`PlanetError::Terrain`] if the noise or gradient settings are rejected.
    pub fn new(config: Config) -> Result<Self, PlanetError> {
        config.validate()?;

        let gradient = GradientTable::from_rows(config.gradient.iter().map(|e| {
            (e.landscape, e.from, e.blend_width, e.height_multiplier)
        }))?;
        let params = FractalNoiseParams {
            seed: config.noise.seed,
            octaves: config.noise.octaves,
            period: config.noise.period,
            persistence: config.noise.persistence,
            lacunarity: config.noise.lacunarity,
        };

        let mut field = DisplacementField::new(
            config.planet.radius,
            params,
            config.noise.biome_seed_offset,
            gradient,
        )?
        .with_amplitude(config.displacement.amplitude);
        if config.displacement.ridged {
            field = field.with_ridge(config.displacement.ridge_offset);
        }

        Ok(Self { config, field })
    }

    /// Load `planet.ron` from `config_dir` (creating it if missing) and build a generator.
    pub fn from_config_dir(config_dir: &Path) -> Result<Self, PlanetError> {
        Self::new(Config::load_or_create(config_dir)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build, stitch and displace the sphere.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the request; no partial planet is returned.
    pub fn generate(&self) -> Result<PlanetTopology, PlanetError> {
        let planet = &self.config.planet;
        let workers = self.config.runtime.workers;
        let _span = info_span!(
            "generate",
            radius = planet.radius,
            subdivisions = planet.subdivisions
        )
        .entered();
        let start = Instant::now();

        let mut mesh = SphereBuilder::new(planet.radius, planet.subdivisions)
            .workers(workers)
            .build()?;
        let elevation =
            self.field
                .apply(&mut mesh.vertices, self.config.displacement.batch_size, workers)?;

        info!(
            vertices = mesh.stats.vertices,
            triangles = mesh.stats.triangles,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "planet generated"
        );
        Ok(PlanetTopology::new(mesh, elevation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Config {
        let mut config = Config::standard();
        config.planet.subdivisions = 2;
        config
    }

    #[test]
    fn test_generate_small_planet() {
        let planet = PlanetGenerator::new(small()).unwrap().generate().unwrap();
        assert_eq!(planet.vertex_count(), 162);
        assert_eq!(planet.triangle_count(), 320);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_generation() {
        let mut config = small();
        config.planet.radius = -2.0;
        assert!(matches!(
            PlanetGenerator::new(config),
            Err(PlanetError::Config(_))
        ));
    }

    #[test]
    fn test_ridged_config_changes_elevations() {
        let plain = PlanetGenerator::new(small()).unwrap().generate().unwrap();
        let mut config = small();
        config.displacement.ridged = true;
        let ridged = PlanetGenerator::new(config).unwrap().generate().unwrap();
        let differs = plain
            .vertices()
            .iter()
            .zip(ridged.vertices())
            .any(|(a, b)| a.h != b.h);
        assert!(differs);
    }

    #[test]
    fn test_from_config_dir_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = PlanetGenerator::from_config_dir(dir.path()).unwrap();
        assert_eq!(generator.config(), &Config::standard());
        assert!(dir.path().join(icoterra_config::CONFIG_FILE).exists());
    }
}
