//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Photo Archiver - file photos and videos into month folders
///
/// Resolves a capture time for every media file from EXIF data, filename
/// patterns, or the filesystem birth time, and moves each file into a
/// YYYY-MM folder under the archive root.
#[derive(Parser, Debug)]
#[command(name = "photo-archiver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Directory holding the unsorted media files
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Archive root under which the month folders live
    #[arg(short, long)]
    pub archive: Option<PathBuf>,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file in addition to stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Output log format as JSON (file log only)
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref archive) = self.archive {
            config.archive_dir = archive.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
