//! Configuration types for the photo archiver

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions archived when the config does not name its own list
fn default_extensions() -> Vec<String> {
    vec![
        "jpg".into(),
        "jpeg".into(),
        "png".into(),
        "gif".into(),
        "webp".into(),
        "heic".into(),
        "tiff".into(),
        "mp4".into(),
        "mkv".into(),
        "mov".into(),
    ]
}

/// Configuration for an archiving run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the unsorted media files
    #[serde(default)]
    pub source_dir: PathBuf,

    /// Archive root under which the month folders live
    #[serde(default)]
    pub archive_dir: PathBuf,

    /// File extensions that count as media, compared case-insensitively
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Report what would happen without touching any file
    #[serde(default)]
    pub dry_run: bool,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            archive_dir: PathBuf::new(),
            extensions: default_extensions(),
            dry_run: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Check if a file extension is on the archive list
    pub fn is_supported(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.extensions.iter().any(|e| e == &ext_lower)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_toml_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"
source_dir = "/data/inbox"
archive_dir = "/data/archive"
dry_run = true
"#,
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/data/inbox"));
        assert_eq!(config.archive_dir, PathBuf::from("/data/archive"));
        assert!(config.dry_run);
        // Fields absent from the file keep their defaults
        assert!(!config.verbose);
        assert!(config.is_supported("jpg"));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "source_dir = [not toml").unwrap();

        let result = Config::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = Config::load_from_file("/nonexistent/photo-archiver.toml");
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
