//! Planet generation settings, persisted to disk as RON.
//!
//! Every section falls back to its defaults when missing, so partial files
//! and files written by older versions load cleanly.

mod config;
mod error;

pub use config::{
    CONFIG_FILE, Config, DisplacementConfig, GradientEntryConfig, NoiseConfig, PlanetConfig,
    RuntimeConfig,
};
pub use error::ConfigError;
