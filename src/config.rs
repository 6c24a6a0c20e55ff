//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user file (if any) is merged on top, so
//! a config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml          # Optional, all keys optional
//! ├── templates/
//! ├── content/
//! ├── static/
//! └── photos/raw/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! title = "Band"            # Exposed to templates as `site.title`
//!
//! [images]
//! display_width = 1600      # Long edge of the display derivative
//! thumbnail_width = 400     # Long edge of the thumbnail derivative
//! display_quality = 88      # JPEG quality (1-100)
//! thumbnail_quality = 85
//!
//! [albums]
//! sort_by = "date"          # Optional: "date", "year" or "title"
//! newest_first = false
//!
//! [home]
//! concert_limit = 5         # Upcoming shows on the homepage
//! photo_limit = 6           # Gallery photos on the homepage
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the configuration file at the site root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide metadata handed to every template.
    pub site: SiteMeta,
    /// Derivative sizes and encoding quality.
    pub images: ImagesConfig,
    /// Optional ordering of the albums list.
    pub albums: AlbumsConfig,
    /// Homepage excerpt sizes.
    pub home: HomeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.display_width == 0 {
            return Err(ConfigError::Validation(
                "images.display_width must be greater than 0".into(),
            ));
        }
        if self.images.thumbnail_width == 0 {
            return Err(ConfigError::Validation(
                "images.thumbnail_width must be greater than 0".into(),
            ));
        }
        for (key, quality) in [
            ("images.display_quality", self.images.display_quality),
            ("images.thumbnail_quality", self.images.thumbnail_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!("{key} must be 1-100")));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Site-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Band".to_string(),
        }
    }
}

/// Image derivative settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Target long edge of the display derivative, in pixels.
    pub display_width: u32,
    /// Target long edge of the thumbnail, in pixels.
    pub thumbnail_width: u32,
    pub display_quality: u32,
    pub thumbnail_quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            display_width: 1600,
            thumbnail_width: 400,
            display_quality: 88,
            thumbnail_quality: 85,
        }
    }
}

/// Field used to order `albums.yaml` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumSort {
    Date,
    Year,
    Title,
}

/// Album list ordering. Without `sort_by` albums keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<AlbumSort>,
    pub newest_first: bool,
}

/// How much of each list the homepage shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    pub concert_limit: usize,
    pub photo_limit: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            concert_limit: 5,
            photo_limit: 6,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("cannot serialize defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bandsite configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata (available to every template as `site`)
# ---------------------------------------------------------------------------
[site]
title = "Band"

# ---------------------------------------------------------------------------
# Image derivatives
# ---------------------------------------------------------------------------
[images]
# Long edge, in pixels, of the large "display" derivative. Also used as the
# output directory name (photos/1600/). Images are never upscaled.
display_width = 1600

# Long edge, in pixels, of the thumbnail derivative.
thumbnail_width = 400

# JPEG encoding quality (1 = worst, 100 = best).
display_quality = 88
thumbnail_quality = 85

# ---------------------------------------------------------------------------
# Albums listing
# ---------------------------------------------------------------------------
[albums]
# Sort albums.yaml entries by "date", "year" or "title".
# Omit to keep the order of the file.
# sort_by = "date"

# Reverse the sort (newest first). Only used with sort_by.
newest_first = false

# ---------------------------------------------------------------------------
# Homepage
# ---------------------------------------------------------------------------
[home]
# Number of upcoming shows passed to index.html as `upcoming_concerts`.
concert_limit = 5

# Number of gallery photos passed to index.html as `photos`.
photo_limit = 6

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
