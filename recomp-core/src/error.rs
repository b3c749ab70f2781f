use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecompError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The Option '{option}' was not one of [{allowed}] (got '{value}')", allowed = Format::allowed_list())]
    UnknownFormat { option: &'static str, value: String },

    #[error("The Directory '{}' does not exist", .0.display())]
    NotADirectory(PathBuf),

    #[error("worker count must be at least 1")]
    InvalidThreads,

    #[error("{format} decode failed: {source}")]
    Decode {
        format: Format,
        source: std::io::Error,
    },

    #[error("{format} encode failed: {source}")]
    Encode {
        format: Format,
        source: std::io::Error,
    },

    #[error("job panicked: {0}")]
    JobPanicked(String),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RecompError {
    /// Configuration errors are detected before any file is touched.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownFormat { .. } | Self::NotADirectory(_) | Self::InvalidThreads
        )
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, RecompError>;
