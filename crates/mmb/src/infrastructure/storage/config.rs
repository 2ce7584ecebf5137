//! TOML configuration for mmb.
//!
//! Read from `$XDG_CONFIG_HOME/mmb/config.toml` (or `~/.config/mmb/config.toml`),
//! or from the path given with `--config`. Every key is optional:
//!
//! ```toml
//! [render]
//! clip = false          # fill/clip instead of fit/letterbox
//! filter = "lanczos3"   # lanczos3 | catmull-rom | gaussian | triangle
//!
//! [logging]
//! level = "info"        # overridden by RUST_LOG
//!
//! [x11]
//! display = ":0"
//! ignore_bad_window = true
//! tolerate_stale_owner_errors = true
//!
//! # Optional: use this layout instead of asking the X server.
//! [layout]
//! screen_width = 3200
//! screen_height = 1080
//! monitors = [
//!     { x = 0,    y = 0, width = 1920, height = 1080 },
//!     { x = 1920, y = 0, width = 1280, height = 1024 },
//! ]
//! ```
//!
//! Command-line flags override the file; the file overrides built-in
//! defaults.

use std::path::{Path, PathBuf};

use mmb_core::ResampleFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::x11::X11Options;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub x11: X11Options,
    /// Fixed layout replacing display-server enumeration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutOverride>,
}

/// How the source image is placed and resampled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// Fill each monitor, cropping overflow, instead of letterboxing.
    #[serde(default)]
    pub clip: bool,
    #[serde(default)]
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level or filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// A monitor layout given explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutOverride {
    pub screen_width: u32,
    pub screen_height: u32,
    #[serde(default)]
    pub monitors: Vec<MonitorEntry>,
}

/// One monitor of a [`LayoutOverride`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorEntry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the default config file, returning `AppConfig::default()` if it does
/// not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;
    Ok(read_config(&path)?.unwrap_or_default())
}

/// Loads a config file named explicitly by the user. Unlike [`load_config`]
/// a missing file is an error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    read_config(path)?.ok_or_else(|| ConfigError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })
}

/// Renders `config` as TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn to_toml_string(config: &AppConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Reads and parses `path`; `Ok(None)` if it does not exist.
fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "loaded config file");
            Ok(Some(toml::from_str(&content)?))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(None)
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Resolves the config base directory, including the `mmb` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("mmb"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
