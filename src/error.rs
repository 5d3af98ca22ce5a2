//! Error types for the photo date sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo date sorter
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source directory not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Destination directory not found: {}", path.display())]
    DestinationNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Cannot read source directory {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to extract video metadata from {}: {message}", path.display())]
    VideoMetadata { path: PathBuf, message: String },

    #[error("FFprobe not found. Please install FFmpeg and ensure ffprobe is in PATH")]
    FfprobeNotFound,

    #[error("Invalid file name: {}", path.display())]
    InvalidFileName { path: PathBuf },

    #[error("already exists in {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Sorting worker panicked")]
    WorkerPanicked,
}

impl Error {
    /// Whether this error prevents a run from starting at all
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound { .. }
                | Error::DestinationNotFound { .. }
                | Error::NotADirectory { .. }
                | Error::SourceUnreadable { .. }
        )
    }
}
