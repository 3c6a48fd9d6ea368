use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the library and the headless binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to write EXR to '{path}': {reason}")]
    Exr { path: PathBuf, reason: String },

    #[error("Render failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
