// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration source adapter.
//!
//! This module provides a parser that turns YAML text into a [`Conf`] document
//! and a source that reads one from a file.

use crate::domain::{Conf, ConfigError, Result};
use crate::ports::{ConfigParser, ConfigSource};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum allowed file size for YAML configuration files (10MB)
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "yaml-file";

/// YAML parser implementation.
///
/// The document keeps its nested structure. The top level must be a mapping;
/// an empty document parses to an empty [`Conf`].
///
/// # Examples
///
/// ```rust
/// use colcfg::adapters::YamlParser;
/// use colcfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let conf = parser.parse("exporters:\n  otlp:\n    endpoint: collector:4317").unwrap();
/// assert!(conf.is_set("exporters"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Conf> {
        Conf::from_yaml(content)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Configuration source adapter for YAML files.
///
/// The file is checked and parsed when the adapter is created, so a missing or
/// malformed file is reported early. Every [`retrieve`](ConfigSource::retrieve)
/// reads the file again, picking up edits made in between.
///
/// # Examples
///
/// ```rust,no_run
/// use colcfg::adapters::YamlFileAdapter;
/// use colcfg::ports::ConfigSource;
///
/// // Load from a specific file
/// let adapter = YamlFileAdapter::from_file("/etc/otelcol/config.yaml").unwrap();
/// let conf = adapter.retrieve().unwrap();
///
/// // Load from default OS location
/// let adapter = YamlFileAdapter::from_default_location("otelcol", "io.opentelemetry").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Canonical path to the YAML file
    file_path: PathBuf,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Creates a new YAML file adapter from a specific file path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use colcfg::adapters::YamlFileAdapter;
    ///
    /// let adapter = YamlFileAdapter::from_file("/etc/otelcol/config.yaml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path.canonicalize().map_err(|e| {
            source_error(
                format!("Invalid or inaccessible path: {}", display_name(file_path)),
                Some(e),
            )
        })?;

        let adapter = Self {
            file_path: canonical_path,
            parser: YamlParser::new(),
        };
        adapter.read()?;
        Ok(adapter)
    }

    /// Creates a new YAML file adapter for `config.yaml` in the OS-appropriate
    /// configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "otelcol")
    /// * `qualifier` - The organization/qualifier (e.g., "io.opentelemetry")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Creates a new YAML file adapter with a custom file name in the default location.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use colcfg::adapters::YamlFileAdapter;
    ///
    /// let adapter =
    ///     YamlFileAdapter::with_filename("otelcol", "io.opentelemetry", "gateway.yaml").unwrap();
    /// ```
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            source_error("Failed to determine project directories".to_string(), None)
        })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self) -> Result<Conf> {
        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(&self.file_path).map_err(|e| {
            source_error(
                format!("Failed to read file metadata: {}", display_name(&self.file_path)),
                Some(e),
            )
        })?;

        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(source_error(
                format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_YAML_FILE_SIZE
                ),
                None,
            ));
        }

        let content = fs::read_to_string(&self.file_path).map_err(|e| {
            source_error(
                format!(
                    "Failed to read configuration file: {}",
                    display_name(&self.file_path)
                ),
                Some(e),
            )
        })?;

        debug!(path = %self.file_path.display(), bytes = content.len(), "Read configuration file");
        self.parser.parse(&content)
    }
}

impl ConfigSource for YamlFileAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn retrieve(&self) -> Result<Conf> {
        self.read()
    }
}

fn source_error(message: String, source: Option<std::io::Error>) -> ConfigError {
    ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message,
        source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}
