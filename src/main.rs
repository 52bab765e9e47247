//! Photo Archiver - file photos and videos into month folders
//!
//! A CLI tool that resolves a capture time for every media file from
//! EXIF data, filename patterns, or the filesystem birth time, and
//! moves each file into a YYYY-MM folder under the archive root.

use anyhow::Result;
use clap::Parser;
use photo_archiver::{ArchiveStatus, Archiver, Cli, Config};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Styling helpers for the command line summary

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        /// Success color (green)
        pub const SUCCESS: Color = Color::Green;
        /// Warning color (yellow)
        pub const WARNING: Color = Color::Yellow;
        /// Error color (red)
        pub const ERROR: Color = Color::Red;
        /// Hint color (dark grey)
        pub const HINT: Color = Color::DarkGrey;
        /// Accent color (cyan)
        pub const ACCENT: Color = Color::Cyan;
    }

    /// Print a separator line
    pub fn print_separator() {
        let _ = stdout().execute(Print(&format!("{}\n", "─".repeat(60))));
    }

    /// Print a centered title
    pub fn print_title(title: &str) {
        let width = 60;
        let padding = (width - title.len()) / 2;
        let left_pad = " ".repeat(padding.saturating_sub(1));

        let _ = stdout().execute(Print(&format!(
            "{}{} {}{}\n",
            left_pad,
            "╔".bold().stylize(),
            title.bold().stylize(),
            "╗".bold().stylize(),
        )));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print a warning message
    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print an error message
    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a hint message
    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a statistics item
    pub fn print_stat(key: &str, value: &str, color: Color) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = style(value).with(color).bold();
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print a per-file result row
    pub fn print_result(status_icon: &str, status_color: Color, source: &str, dest_or_msg: &str) {
        let icon_styled = style(status_icon).with(status_color).bold();
        let source_styled = style(source).italic();
        let msg_styled = style(dest_or_msg).with(CliTheme::HINT);

        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(icon_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(source_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(msg_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print the log file path
    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  📁 ").with(CliTheme::ACCENT)));
        let _ = stdout().execute(Print(style("Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    /// Print a blank line
    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let _guard = setup_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Photo Archiver starting"
    );

    // Load configuration
    let config = load_config(&cli)?;

    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    // Validate configuration
    validate_config(&config)?;

    let verbose = config.verbose;
    let dry_run = config.dry_run;

    // Create and run the archiver
    let mut archiver = Archiver::new(config);

    match archiver.run() {
        Ok(reports) => {
            use cli_output::*;

            // Print summary header
            print_separator();
            print_title("Archive Complete");
            print_separator();

            let stats = archiver.stats();

            // Print stats with colors
            print_blank();
            print_stat("Moved", &stats.moved.to_string(), CliTheme::SUCCESS);
            print_stat(
                "Duplicates removed",
                &stats.duplicates.to_string(),
                CliTheme::ACCENT,
            );
            print_stat("Skipped", &stats.skipped.to_string(), CliTheme::WARNING);
            print_blank();

            // Print detailed results if verbose
            if verbose {
                print_separator();
                print_hint("Detailed results:");
                print_blank();

                for report in &reports {
                    let dest = report
                        .destination
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    let source = report.source.display().to_string();

                    match report.status {
                        ArchiveStatus::Moved => {
                            print_result("✓", CliTheme::SUCCESS, &source, &format!("→ {}", dest));
                        }
                        ArchiveStatus::Duplicate => {
                            print_result(
                                "≡",
                                CliTheme::ACCENT,
                                &source,
                                &format!("duplicate of {}", dest),
                            );
                        }
                        ArchiveStatus::Skipped => {
                            print_result("⊘", CliTheme::WARNING, &source, "not an archivable format");
                        }
                        ArchiveStatus::DryRun => {
                            print_result("~", CliTheme::ACCENT, &source, &format!("→ {}", dest));
                        }
                    }
                }
            }

            if dry_run {
                print_separator();
                print_warning("Dry run - no files were moved");
            }

            if let Some(ref log_file) = cli.log_file {
                print_separator();
                print_log_path(&log_file.display().to_string());
            }

            info!("Archiving complete");

            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Archiving failed");
            cli_output::print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if config.source_dir.as_os_str().is_empty() {
        anyhow::bail!("No source directory given, use --source or a config file");
    }
    if config.archive_dir.as_os_str().is_empty() {
        anyhow::bail!("No archive directory given, use --archive or a config file");
    }

    Ok(config)
}

/// Setup logging (stderr, plus an optional log file)
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let Some(ref log_path) = cli.log_file else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

/// Validate configuration before archiving
fn validate_config(config: &Config) -> Result<()> {
    if !config.source_dir.is_dir() {
        anyhow::bail!(
            "Source directory does not exist: {}",
            config.source_dir.display()
        );
    }
    if !config.archive_dir.is_dir() {
        anyhow::bail!(
            "Archive directory does not exist: {}",
            config.archive_dir.display()
        );
    }

    Ok(())
}
