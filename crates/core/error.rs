//! Crate-level error type and `Result` alias.

use thiserror::Error;

pub use geostreams_types::ModelError;

#[derive(Debug, Error)]
pub enum GeostreamsError {
    /// Building, reading or reconstructing a model failed
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input that has no counterpart in the GeoJSON model
    #[error("GeoJSON conversion error: {0}")]
    GeoJson(String),
}

pub type Result<T> = std::result::Result<T, GeostreamsError>;
