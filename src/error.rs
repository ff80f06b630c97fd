//! Error types for the terminal host.
//!
//! Gameplay itself cannot fail; these cover terminal I/O, settings and assets.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Terminal or file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be read
    #[error("failed to read settings from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Settings file is not valid TOML or has unknown keys
    #[error("invalid settings in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Settings parsed but hold an unusable value
    #[error("invalid setting `{key}`: {reason}")]
    ConfigValue { key: &'static str, reason: String },

    /// An image asset could not be opened or decoded
    #[error("failed to load asset {name}: {source}")]
    Asset {
        name: String,
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
