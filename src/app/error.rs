use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a collection run.
///
/// Per-file read failures are deliberately absent here: they are always
/// recoverable, recorded as skip entries in the output document instead of
/// aborting the run.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Failed to read configuration {0}: {1}")]
    ConfigRead(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error("Invalid exclude pattern: {0}")]
    InvalidGlob(#[from] globset::Error),
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
    #[error("Failed to write output {0}: {1}")]
    OutputWrite(PathBuf, #[source] std::io::Error),
}
