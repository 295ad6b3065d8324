//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults are
//! serialized to a TOML table and the user file is merged on top, so a config
//! file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! small_breakpoint = 580     # Viewports narrower than this use small_coefficient
//! large_breakpoint = 880     # Viewports wider than this use the fixed large_flex
//! small_coefficient = 0.065
//! normal_coefficient = 0.025
//! large_flex = 17.0
//! landscape_cap = 35.0       # Max flex-basis % for landscape/square tiles
//! portrait_cap = 25.0        # Max flex-basis % for portrait tiles
//!
//! [preload]
//! delay_ms = 300             # Placeholder → image swap delay
//! # placeholder = "spinner.svg"
//!
//! [ingest]
//! error_policy = "last-write-wins"
//! manifest_policy = "trusted"
//! # max_workers = 4          # Probe workers (omit for auto = CPU cores)
//! timeout_secs = 30
//! user_agent = "gallery-loader/<version>"
//!
//! [render]
//! title = "Gallery"
//! viewport_width = 1280      # Width used to pre-size tiles in HTML output
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::layout::LayoutParams;
use crate::manifest::ManifestPolicy;
use crate::session::ErrorPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Flex-basis sizing constants.
    pub layout: LayoutParams,
    /// Placeholder transition settings.
    pub preload: PreloadConfig,
    /// Input ingestion settings.
    pub ingest: IngestConfig,
    /// Static HTML output settings.
    pub render: RenderConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.small_breakpoint >= layout.large_breakpoint {
            return Err(ConfigError::Validation(
                "layout.small_breakpoint must be below layout.large_breakpoint".into(),
            ));
        }
        let positives = [
            ("layout.small_coefficient", layout.small_coefficient),
            ("layout.normal_coefficient", layout.normal_coefficient),
            ("layout.large_flex", layout.large_flex),
            ("layout.landscape_cap", layout.landscape_cap),
            ("layout.portrait_cap", layout.portrait_cap),
        ];
        for (key, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a positive number"
                )));
            }
        }
        if self.preload.delay_ms > 10_000 {
            return Err(ConfigError::Validation(
                "preload.delay_ms must be at most 10000".into(),
            ));
        }
        if self.ingest.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "ingest.timeout_secs must be non-zero".into(),
            ));
        }
        if self.ingest.max_workers == Some(0) {
            return Err(ConfigError::Validation(
                "ingest.max_workers must be non-zero".into(),
            ));
        }
        if self.render.viewport_width == 0 {
            return Err(ConfigError::Validation(
                "render.viewport_width must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Placeholder transition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreloadConfig {
    /// Milliseconds between the placeholder loading and the real image swap.
    pub delay_ms: u64,
    /// Placeholder image source. When absent the bundled spinner is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl PreloadConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            delay_ms: 300,
            placeholder: None,
        }
    }
}

/// User agent sent when `[ingest] user_agent` is not set.
pub const DEFAULT_USER_AGENT: &str = concat!("gallery-loader/", env!("CARGO_PKG_VERSION"));

/// Input ingestion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// How failures are kept when several inputs fail.
    pub error_policy: ErrorPolicy,
    /// Which manifest entries are admitted into the gallery.
    pub manifest_policy: ManifestPolicy,
    /// Maximum number of background probe workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    /// Network timeout for manifest and image fetches.
    pub timeout_secs: u64,
    /// User agent sent with HTTP requests.
    pub user_agent: String,
}

impl IngestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            manifest_policy: ManifestPolicy::default(),
            max_workers: None,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &IngestConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Static HTML output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Document title.
    pub title: String,
    /// Viewport width the inline tile sizes are computed for. The page script
    /// recomputes them for the real viewport on load and on resize.
    pub viewport_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            viewport_width: 1280,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when the
/// file does not exist.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `gallery.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    concat!(
        r##"# Gallery Loader Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Tile sizing
# ---------------------------------------------------------------------------
[layout]
# Viewports narrower than this (px) scale tiles with small_coefficient.
small_breakpoint = 580
# Viewports wider than this (px) use the fixed large_flex instead of scaling.
large_breakpoint = 880
small_coefficient = 0.065
normal_coefficient = 0.025
large_flex = 17.0
# Upper bounds on the flex-basis percentage.
landscape_cap = 35.0
portrait_cap = 25.0

# ---------------------------------------------------------------------------
# Placeholder transition
# ---------------------------------------------------------------------------
[preload]
# Milliseconds between the placeholder loading and the real image swap.
delay_ms = 300
# Placeholder image source. Omit to use the bundled spinner.
# placeholder = "spinner.svg"

# ---------------------------------------------------------------------------
# Ingestion
# ---------------------------------------------------------------------------
[ingest]
# "last-write-wins" keeps only the latest failure, "collect" keeps them all.
error_policy = "last-write-wins"
# "trusted" appends every manifest entry (malformed fields become "" or 0),
# "strict" drops entries without a url and positive integer width/height.
manifest_policy = "trusted"
# Maximum parallel probe workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_workers = 4
# Network timeout in seconds for manifest and image fetches.
timeout_secs = 30
user_agent = "gallery-loader/"##,
        env!("CARGO_PKG_VERSION"),
        r##""

# ---------------------------------------------------------------------------
# HTML output
# ---------------------------------------------------------------------------
[render]
title = "Gallery"
# Viewport width used to pre-size tiles before the page script runs.
viewport_width = 1280
"##,
    )
}
