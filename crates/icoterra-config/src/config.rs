//! Configuration structs with defaults, validation, and RON persistence.

use std::path::Path;

use icoterra_mesh::{LandscapeType, MAX_DEPTH};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE: &str = "planet.ron";

/// Top-level generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sphere size and detail.
    pub planet: PlanetConfig,
    /// Height and biome noise.
    pub noise: NoiseConfig,
    /// Landscape gradient, in ascending `from` order. An empty list disables
    /// biome scaling.
    #[serde(default = "GradientEntryConfig::standard")]
    pub gradient: Vec<GradientEntryConfig>,
    /// Displacement pass settings.
    pub displacement: DisplacementConfig,
    /// Threads and logging.
    pub runtime: RuntimeConfig,
}

/// Planet geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Base sphere radius.
    pub radius: f64,
    /// Recursive subdivisions per base face. Cost grows as `4^subdivisions`.
    pub subdivisions: u32,
}

/// Fractal noise settings shared by the height and biome fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Height field seed.
    pub seed: u32,
    pub octaves: u32,
    /// First-octave wavelength in world units.
    pub period: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Added to `seed` for the biome field.
    pub biome_seed_offset: u32,
}

/// One landscape gradient step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradientEntryConfig {
    pub landscape: LandscapeType,
    /// Cumulative threshold on the `[0, 1]` biome value.
    pub from: f64,
    pub blend_width: f64,
    pub height_multiplier: f64,
}

/// Displacement pass settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplacementConfig {
    /// Vertices per worker task.
    pub batch_size: usize,
    /// Shape raw noise as `ridge_offset - |n|`.
    pub ridged: bool,
    pub ridge_offset: f64,
    /// Scale applied to raw noise.
    pub amplitude: f64,
}

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker threads per stage (0 = one per logical CPU).
    pub workers: usize,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            planet: PlanetConfig::default(),
            noise: NoiseConfig::default(),
            gradient: GradientEntryConfig::standard(),
            displacement: DisplacementConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            subdivisions: 5,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 69420,
            octaves: 8,
            period: 4.2,
            persistence: 0.5,
            lacunarity: 2.0,
            biome_seed_offset: 69,
        }
    }
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            ridged: false,
            ridge_offset: 0.2,
            amplitude: 1.0,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            log_level: "info".to_string(),
        }
    }
}

impl GradientEntryConfig {
    fn new(landscape: LandscapeType, from: f64, blend_width: f64, height_multiplier: f64) -> Self {
        Self {
            landscape,
            from,
            blend_width,
            height_multiplier,
        }
    }

    /// The stock seven-step gradient.
    pub fn standard() -> Vec<Self> {
        use LandscapeType::{Hills, Mountains, Plains};
        vec![
            Self::new(Plains, 0.0, 0.0, 0.2),
            Self::new(Hills, 0.3, 0.05, 0.6),
            Self::new(Hills, 0.4, 0.1, 0.8),
            Self::new(Mountains, 0.6, 0.069, 1.25),
            Self::new(Mountains, 0.7, 0.69, 2.5),
            Self::new(Mountains, 0.9, 0.69, 3.3),
            Self::new(Mountains, 1.7, 0.69, 5.0),
        ]
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Same as [`Config::default`].
    pub fn standard() -> Self {
        Self::default()
    }

    /// Parse a RON document. Missing fields take their defaults; an explicit
    /// `gradient: []` stays empty.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let config = Self::from_ron_str(&contents)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::standard();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `planet.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
        let new_config = Self::from_ron_str(&contents)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Check the settings a generation run cannot recover from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: String, reason: String| {
            Err(ConfigError::Invalid { field, reason })
        };

        if !(self.planet.radius > 0.0 && self.planet.radius.is_finite()) {
            return invalid(
                "planet.radius".into(),
                format!("must be positive, got {}", self.planet.radius),
            );
        }
        if self.planet.subdivisions > MAX_DEPTH {
            return invalid(
                "planet.subdivisions".into(),
                format!("must be at most {MAX_DEPTH}, got {}", self.planet.subdivisions),
            );
        }
        if !(self.noise.period > 0.0 && self.noise.period.is_finite()) {
            return invalid(
                "noise.period".into(),
                format!("must be positive, got {}", self.noise.period),
            );
        }
        if self.noise.octaves == 0 {
            return invalid("noise.octaves".into(), "must be at least 1".into());
        }
        if self.displacement.batch_size == 0 {
            return invalid("displacement.batch_size".into(), "must be at least 1".into());
        }

        let mut previous = f64::NEG_INFINITY;
        for (i, entry) in self.gradient.iter().enumerate() {
            if !(entry.from >= previous) {
                return invalid(
                    format!("gradient[{i}].from"),
                    format!("{} is below the previous entry's {previous}", entry.from),
                );
            }
            if !(entry.blend_width >= 0.0 && entry.blend_width.is_finite()) {
                return invalid(
                    format!("gradient[{i}].blend_width"),
                    format!("must be non-negative, got {}", entry.blend_width),
                );
            }
            previous = entry.from;
        }
        Ok(())
    }
}
