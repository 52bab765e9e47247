//! Capture time resolution
//!
//! Three sources can testify to when a media file was captured:
//! - EXIF metadata (`DateTimeOriginal`)
//! - Timestamp patterns in the filename
//! - The filesystem birth time
//!
//! All three are gathered up front, then resolved by trustworthiness.

pub mod birth;
pub mod exif;
pub mod filename;

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, warn};

/// Where a resolved timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// EXIF `DateTimeOriginal`
    Exif,
    /// A timestamp pattern in the filename
    Filename,
    /// Filesystem birth time
    Birth,
}

/// The capture time candidates a single file offers
#[derive(Debug, Clone, Default)]
pub struct FileTimeSet {
    /// EXIF `DateTimeOriginal`, when present and well formed
    pub exif: Option<NaiveDateTime>,
    /// Timestamp parsed out of the filename
    pub filename: Option<NaiveDateTime>,
    /// Filesystem birth time, when the platform records one
    pub birth: Option<NaiveDateTime>,
}

/// A capture time together with the source that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTime {
    pub timestamp: NaiveDateTime,
    pub source: TimeSource,
}

impl FileTimeSet {
    /// Collect every candidate the file offers.
    ///
    /// Individual sources fail soft: an unreadable or absent source
    /// leaves its slot `None` and the others are still consulted. A file
    /// with nothing to offer yields an all-`None` set.
    pub fn gather(path: &Path) -> Self {
        let exif = match exif::extract_exif_time(path) {
            Ok(time) => Some(time),
            Err(e) => {
                debug!(?path, error = %e, "No EXIF capture time");
                None
            }
        };

        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(filename::parse_filename_time);

        Self {
            exif,
            filename,
            birth: birth::birth_time(path),
        }
    }

    /// Pick the most trustworthy candidate: EXIF beats the filename,
    /// which beats the birth time.
    ///
    /// Resolving down to the birth time alone is worth a warning, since
    /// that timestamp moves when files are copied between disks. A file
    /// with no candidate at all is unplaceable and fails the run.
    pub fn resolve(&self, path: &Path) -> Result<ResolvedTime> {
        if let Some(timestamp) = self.exif {
            return Ok(ResolvedTime {
                timestamp,
                source: TimeSource::Exif,
            });
        }
        if let Some(timestamp) = self.filename {
            return Ok(ResolvedTime {
                timestamp,
                source: TimeSource::Filename,
            });
        }
        if let Some(timestamp) = self.birth {
            warn!(?path, %timestamp, "Only the filesystem birth time is available");
            return Ok(ResolvedTime {
                timestamp,
                source: TimeSource::Birth,
            });
        }
        Err(Error::NoTimeSource {
            path: path.to_path_buf(),
        })
    }
}

/// Gather and resolve in one step
pub fn extract_time(path: &Path) -> Result<ResolvedTime> {
    FileTimeSet::gather(path).resolve(path)
}
