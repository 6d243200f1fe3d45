//! Errors raised while reading, writing or checking `planet.ron`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid RON for [`crate::Config`].
    #[error("malformed planet config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    #[error("cannot serialize planet config: {0}")]
    Serialize(#[source] ron::Error),

    /// The config parsed but describes a planet that cannot be generated.
    /// `field` is the dotted path of the first offending setting.
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },
}
