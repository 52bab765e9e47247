//! Error types for the photo archiver

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for archiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo archiver
///
/// Source-level failures (`ExifRead`) are absorbed and logged where the
/// source is read; the remaining variants are fatal and abort the run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("No capture time in EXIF data, filename, or file system for {path}")]
    NoTimeSource { path: PathBuf },

    #[error("{destination} already exists with different content than {source_path}")]
    DestinationConflict {
        source_path: PathBuf,
        destination: PathBuf,
    },

    #[error("Failed to compare {source_path} with {destination}: {message}")]
    Compare {
        source_path: PathBuf,
        destination: PathBuf,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_conflict_message_names_both_paths() {
        let err = Error::DestinationConflict {
            source_path: PathBuf::from("/inbox/a.jpg"),
            destination: PathBuf::from("/archive/2023-07/a.jpg"),
        };

        let message = err.to_string();
        assert!(message.contains("/inbox/a.jpg"));
        assert!(message.contains("/archive/2023-07/a.jpg"));
        // The paths are message details, not an underlying cause
        assert!(err.source().is_none());
    }

    #[test]
    fn test_compare_message_names_both_paths() {
        let err = Error::Compare {
            source_path: PathBuf::from("/inbox/b.jpg"),
            destination: PathBuf::from("/archive/2021-05/b.jpg"),
            message: "read failed".into(),
        };

        let message = err.to_string();
        assert!(message.contains("/inbox/b.jpg"));
        assert!(message.contains("/archive/2021-05/b.jpg"));
        assert!(err.source().is_none());
    }
}
