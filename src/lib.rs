//! Photo Archiver - a CLI tool that files photos and videos into month folders
//!
//! This library resolves a capture time for every media file from:
//! - EXIF metadata (`DateTimeOriginal`)
//! - Timestamp patterns in the filename
//! - The filesystem birth time
//!
//! and moves each file into a `YYYY-MM` folder under the archive root,
//! deleting exact duplicates and refusing to overwrite conflicting content.

pub mod archive;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod time;

pub use archive::{ArchiveStats, ArchiveStatus, Archiver, FileReport};
pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use time::{FileTimeSet, ResolvedTime, TimeSource, extract_time};
