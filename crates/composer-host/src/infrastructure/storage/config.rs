//! TOML-based configuration for the host process.
//!
//! Example file:
//!
//! ```toml
//! [engine]
//! canvas_width = 1920
//! canvas_height = 1080
//! nominal_width = 1280
//! nominal_height = 720
//! initial_mode = "grid6"
//!
//! [logging]
//! log_level = "debug"
//! ```
//!
//! # Serde default values
//!
//! Every field is annotated with `#[serde(default = "some_fn")]`, so a missing
//! file, a missing section or a missing key all fall back to the same values
//! as [`HostConfig::default()`].

use std::path::{Path, PathBuf};

use composer_core::{Canvas, EngineConfig, LayoutMode, NOMINAL_CANVAS};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration and scenario file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Layout engine construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSection {
    /// Canvas width used until the first topology switch.
    #[serde(default = "default_width")]
    pub canvas_width: u32,
    /// Canvas height used until the first topology switch.
    #[serde(default = "default_height")]
    pub canvas_height: u32,
    /// Canvas width restored by every topology switch.
    #[serde(default = "default_width")]
    pub nominal_width: u32,
    /// Canvas height restored by every topology switch.
    #[serde(default = "default_height")]
    pub nominal_height: u32,
    /// Topology applied at startup: `"unbounded"`, `"grid6"` or `"single"`.
    #[serde(default)]
    pub initial_mode: LayoutMode,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// `tracing` filter directive, e.g. `"info"` or `"composer_core=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_width() -> u32 {
    NOMINAL_CANVAS.width
}
fn default_height() -> u32 {
    NOMINAL_CANVAS.height
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            canvas_width: default_width(),
            canvas_height: default_height(),
            nominal_width: default_width(),
            nominal_height: default_height(),
            initial_mode: LayoutMode::default(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl EngineSection {
    /// Converts the file representation into engine construction parameters.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            canvas: Canvas::new(self.canvas_width, self.canvas_height),
            nominal_canvas: Canvas::new(self.nominal_width, self.nominal_height),
            initial_mode: self.initial_mode,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a value has the
/// wrong type (for example an unknown `initial_mode`).
pub fn parse_config(content: &str) -> Result<HostConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration at `path`, returning `HostConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads and deserializes any TOML document.  Unlike [`load_config`], a
/// missing file is an error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it does not match `T`.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
