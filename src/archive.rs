//! Archiving pipeline
//!
//! Walks the source directory, resolves a capture time for every media
//! file, and moves each one into `<archive>/<YYYY-MM>/`. Files are handled
//! one at a time in filename order so a failed run stops at a well-defined
//! point.

use crate::compare::files_identical;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::time::{ResolvedTime, extract_time};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, info, span, warn};
use walkdir::WalkDir;

/// Result of archiving a single file
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Source file path
    pub source: PathBuf,
    /// Where the file ended up, or would end up
    pub destination: Option<PathBuf>,
    /// Resolved capture time
    pub time: Option<ResolvedTime>,
    /// What happened to the file
    pub status: ArchiveStatus,
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// File was moved into its month folder
    Moved,
    /// Destination already held identical content, the source was deleted
    Duplicate,
    /// File extension is not on the archive list
    Skipped,
    /// Dry run, nothing was touched
    DryRun,
}

/// Counters for a whole run
#[derive(Debug, Default, Clone)]
pub struct ArchiveStats {
    pub total: usize,
    pub moved: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

impl ArchiveStats {
    fn record(&mut self, status: ArchiveStatus) {
        match status {
            ArchiveStatus::Moved | ArchiveStatus::DryRun => self.moved += 1,
            ArchiveStatus::Duplicate => self.duplicates += 1,
            ArchiveStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Moved: {}, Duplicates: {}, Skipped: {}",
            self.total, self.moved, self.duplicates, self.skipped
        )
    }
}

/// Main archiver for filing media into month folders
pub struct Archiver {
    config: Config,
    stats: ArchiveStats,
}

impl Archiver {
    /// Create a new archiver with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: ArchiveStats::default(),
        }
    }

    /// Run the archiving pipeline.
    ///
    /// Returns one report per file looked at. The first fatal condition
    /// (unplaceable file, destination conflict, failed filesystem
    /// operation) aborts the run with everything before it already moved.
    pub fn run(&mut self) -> Result<Vec<FileReport>> {
        let _span = span!(Level::INFO, "archive_run").entered();

        info!(source = ?self.config.source_dir, "Scanning source directory");
        let files = self.collect_files()?;
        info!(count = files.len(), "Found files to consider");

        self.stats.total = files.len();

        if files.is_empty() {
            info!("Nothing to archive");
            return Ok(Vec::new());
        }

        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            let report = self.process_file(&path)?;
            self.stats.record(report.status);
            reports.push(report);
        }

        info!("{}", self.stats.summary());
        Ok(reports)
    }

    /// Collect the regular files directly inside the source directory.
    ///
    /// The walk is non-recursive and sorted by filename, so runs are
    /// deterministic. Subdirectories are left alone.
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.config.source_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.path().to_path_buf());
            }
        }

        Ok(files)
    }

    /// Archive a single file
    fn process_file(&self, path: &Path) -> Result<FileReport> {
        let _file_span = span!(Level::DEBUG, "archive_file", ?path).entered();

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.config.is_supported(ext) {
            warn!(?path, "File is not an archivable format");
            return Ok(FileReport {
                source: path.to_path_buf(),
                destination: None,
                time: None,
                status: ArchiveStatus::Skipped,
            });
        }

        let resolved = extract_time(path)?;

        let month_dir = self.config.archive_dir.join(format!(
            "{:04}-{:02}",
            resolved.timestamp.year(),
            resolved.timestamp.month()
        ));
        if !month_dir.exists() {
            if self.config.dry_run {
                info!(?month_dir, "Would create month folder");
            } else {
                info!(?month_dir, "Creating month folder");
                fs::create_dir(&month_dir)?;
            }
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| Error::Config("Invalid source filename".into()))?;
        let destination = month_dir.join(file_name);

        if destination.exists() {
            if !files_identical(path, &destination)? {
                return Err(Error::DestinationConflict {
                    source_path: path.to_path_buf(),
                    destination,
                });
            }
            if self.config.dry_run {
                info!(?path, ?destination, "Would remove duplicate source");
            } else {
                warn!(
                    ?path,
                    ?destination,
                    "Destination already holds identical content, removing source"
                );
                fs::remove_file(path)?;
            }
            return Ok(FileReport {
                source: path.to_path_buf(),
                destination: Some(destination),
                time: Some(resolved),
                status: ArchiveStatus::Duplicate,
            });
        }

        if self.config.dry_run {
            info!(
                source = ?path,
                destination = ?destination,
                time_source = ?resolved.source,
                "Would move file"
            );
            return Ok(FileReport {
                source: path.to_path_buf(),
                destination: Some(destination),
                time: Some(resolved),
                status: ArchiveStatus::DryRun,
            });
        }

        move_file(path, &destination)?;
        info!(
            source = ?path,
            destination = ?destination,
            time_source = ?resolved.source,
            timestamp = %resolved.timestamp,
            "Moved file"
        );

        Ok(FileReport {
            source: path.to_path_buf(),
            destination: Some(destination),
            time: Some(resolved),
            status: ArchiveStatus::Moved,
        })
    }

    /// Get the counters for the run
    pub fn stats(&self) -> &ArchiveStats {
        &self.stats
    }
}

/// Move a file, falling back to copy + delete across filesystems.
///
/// The fallback carries the source modification time over before the
/// source is deleted, since a plain copy would reset it.
fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }

    let mtime = fs::metadata(source)
        .and_then(|m| m.modified())
        .ok()
        .map(filetime::FileTime::from_system_time);

    fs::copy(source, destination)?;
    if let Some(mtime) = mtime {
        let _ = filetime::set_file_mtime(destination, mtime);
    }
    fs::remove_file(source)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(source: &Path, archive: &Path) -> Config {
        Config {
            source_dir: source.to_path_buf(),
            archive_dir: archive.to_path_buf(),
            ..Config::default()
        }
    }

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("inbox");
        let archive = dir.path().join("archive");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&archive).unwrap();
        (dir, source, archive)
    }

    #[test]
    fn test_moves_file_into_month_folder() {
        let (_dir, source, archive) = setup();
        let file = source.join("wx_camera_1689324886317.jpg");
        fs::write(&file, b"photo bytes").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, ArchiveStatus::Moved);

        let moved = archive.join("2023-07").join("wx_camera_1689324886317.jpg");
        assert!(moved.exists());
        assert!(!file.exists());
        assert_eq!(fs::read(&moved).unwrap(), b"photo bytes");
        assert_eq!(archiver.stats().moved, 1);
    }

    #[test]
    fn test_uppercase_extension_is_archived() {
        let (_dir, source, archive) = setup();
        let file = source.join("WX_CAMERA_1689324886317.JPG");
        fs::write(&file, b"photo bytes").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        assert_eq!(reports[0].status, ArchiveStatus::Moved);
        assert!(
            archive
                .join("2023-07")
                .join("WX_CAMERA_1689324886317.JPG")
                .exists()
        );
        assert!(!file.exists());
    }

    #[test]
    fn test_early_year_folder_is_zero_padded() {
        let (_dir, source, archive) = setup();
        let file = source.join("0123_06_26.jpg");
        fs::write(&file, b"very old scan").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        assert_eq!(reports[0].status, ArchiveStatus::Moved);
        assert!(archive.join("0123-06").join("0123_06_26.jpg").exists());
    }

    #[test]
    fn test_identical_copy_in_archive_removes_source() {
        let (_dir, source, archive) = setup();
        let month = archive.join("2021-05");
        fs::create_dir_all(&month).unwrap();
        fs::write(month.join("mmexport1622020005757.jpg"), b"same").unwrap();

        let file = source.join("mmexport1622020005757.jpg");
        fs::write(&file, b"same").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        assert_eq!(reports[0].status, ArchiveStatus::Duplicate);
        assert!(!file.exists());
        assert!(month.join("mmexport1622020005757.jpg").exists());
        assert_eq!(archiver.stats().duplicates, 1);
    }

    #[test]
    fn test_conflicting_destination_halts_the_run() {
        let (_dir, source, archive) = setup();
        let month = archive.join("2021-05");
        fs::create_dir_all(&month).unwrap();
        fs::write(month.join("mmexport1622020005757.jpg"), b"original").unwrap();

        let file = source.join("mmexport1622020005757.jpg");
        fs::write(&file, b"different").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let result = archiver.run();

        assert!(matches!(result, Err(Error::DestinationConflict { .. })));
        // Neither side is touched
        assert!(file.exists());
        assert_eq!(
            fs::read(month.join("mmexport1622020005757.jpg")).unwrap(),
            b"original"
        );
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let (_dir, source, archive) = setup();
        let file = source.join("notes.txt");
        fs::write(&file, b"not media").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        assert_eq!(reports[0].status, ArchiveStatus::Skipped);
        assert!(file.exists());
        assert_eq!(archiver.stats().skipped, 1);
    }

    #[test]
    fn test_subdirectories_are_left_alone() {
        let (_dir, source, archive) = setup();
        let nested = source.join("already-sorted");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("wx_camera_1689324886317.jpg"), b"nested").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        assert!(reports.is_empty());
        assert!(nested.join("wx_camera_1689324886317.jpg").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let (_dir, source, archive) = setup();
        let file = source.join("wx_camera_1689324886317.jpg");
        fs::write(&file, b"photo bytes").unwrap();

        let mut config = config_for(&source, &archive);
        config.dry_run = true;

        let mut archiver = Archiver::new(config);
        let reports = archiver.run().unwrap();

        assert_eq!(reports[0].status, ArchiveStatus::DryRun);
        assert_eq!(
            reports[0].destination,
            Some(archive.join("2023-07").join("wx_camera_1689324886317.jpg"))
        );
        assert!(file.exists());
        assert!(!archive.join("2023-07").exists());
    }

    #[test]
    fn test_files_are_processed_in_name_order() {
        let (_dir, source, archive) = setup();
        fs::write(source.join("b_20230626_113855.jpg"), b"second").unwrap();
        fs::write(source.join("a_20230626_113855.jpg"), b"first").unwrap();

        let mut archiver = Archiver::new(config_for(&source, &archive));
        let reports = archiver.run().unwrap();

        let names: Vec<_> = reports
            .iter()
            .map(|r| r.source.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a_20230626_113855.jpg", "b_20230626_113855.jpg"]);
    }
}
