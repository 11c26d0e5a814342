use std::path::PathBuf;
use serde::Serialize;

pub mod audio;
pub mod cli;
pub mod organize;
pub mod scan;
pub mod utils;

/// Artist/album/title as read from a file's embedded metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tags {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

/// A file with its tags resolved, ready to be placed under the destination root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizedSong {
    pub source_path: PathBuf,
    pub artist: String,
    pub album: String,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Metadata extraction error: {0}")]
    Metadata(String),
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing {0} environment variable.")]
    MissingDestination(&'static str),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, OrganizeError>;

// Re-exports for convenience
pub use audio::metadata::{FileTagReader, TagReader};
pub use organize::grouping::{organize, resolve_tags, Grouping, Organized, TagFailure};
pub use scan::walker::FileWalker;
pub use utils::file_ops::{existing_directory, MoveOutcome, MoveResult, Mover};
pub use utils::reporting::Reporter;
