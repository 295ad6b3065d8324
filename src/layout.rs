//! Flex-basis sizing for gallery tiles.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Sizing has three regimes keyed on the viewport width:
//!
//! ```text
//!   width < 580        Small   raw = width * 0.065
//!   580 <= w <= 880    Normal  raw = width * 0.025
//!   width > 880        Large   raw = 17 (pinned)
//! ```
//!
//! Landscape and square images take `min(raw, 35)`; portrait images take
//! `min(raw / 2, 25)`. The result is a percentage of the container width and
//! is emitted as the CSS shorthand `flex: 1 1 <pct>%`.

use crate::types::ImageRecord;
use serde::{Deserialize, Serialize};

/// Sizing constants. Defaults reproduce the reference layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutParams {
    pub small_breakpoint: u32,
    pub large_breakpoint: u32,
    pub small_coefficient: f64,
    pub normal_coefficient: f64,
    pub large_flex: f64,
    pub landscape_cap: f64,
    pub portrait_cap: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            small_breakpoint: 580,
            large_breakpoint: 880,
            small_coefficient: 0.065,
            normal_coefficient: 0.025,
            large_flex: 17.0,
            landscape_cap: 35.0,
            portrait_cap: 25.0,
        }
    }
}

/// Which branch of the sizing rule a viewport width falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Small,
    Normal,
    Large,
}

impl Regime {
    pub fn label(self) -> &'static str {
        match self {
            Regime::Small => "small",
            Regime::Normal => "normal",
            Regime::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `width >= height`
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(record: &ImageRecord) -> Self {
        if record.is_landscape() {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

/// Sizing directive for one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub flex_basis_percent: f64,
    pub regime: Regime,
    pub orientation: Orientation,
}

impl Sizing {
    /// CSS `flex` shorthand, e.g. `1 1 17.5%`.
    pub fn flex_css(&self) -> String {
        format!("1 1 {}%", format_percent(self.flex_basis_percent))
    }
}

/// Classify a viewport width.
pub fn regime(viewport_width: u32, params: &LayoutParams) -> Regime {
    if viewport_width > params.large_breakpoint {
        Regime::Large
    } else if viewport_width < params.small_breakpoint {
        Regime::Small
    } else {
        Regime::Normal
    }
}

/// Raw flex value before the orientation cap is applied.
pub fn raw_flex(viewport_width: u32, params: &LayoutParams) -> f64 {
    let coefficient = if viewport_width < params.small_breakpoint {
        params.small_coefficient
    } else {
        params.normal_coefficient
    };
    let raw = viewport_width as f64 * coefficient;
    if viewport_width > params.large_breakpoint {
        params.large_flex
    } else {
        raw
    }
}

/// Compute the flex-basis percentage for a record at a viewport width.
///
/// # Examples
/// ```
/// # use gallery_loader::layout::{LayoutParams, compute_sizing};
/// # use gallery_loader::types::{Dimensions, ImageRecord};
/// let params = LayoutParams::default();
/// let landscape = ImageRecord::new("a.png", Dimensions::new(100, 50));
/// assert_eq!(compute_sizing(&landscape, 1000, &params).flex_basis_percent, 17.0);
///
/// let portrait = ImageRecord::new("b.png", Dimensions::new(50, 100));
/// assert_eq!(compute_sizing(&portrait, 1000, &params).flex_basis_percent, 8.5);
/// ```
pub fn compute_sizing(record: &ImageRecord, viewport_width: u32, params: &LayoutParams) -> Sizing {
    let raw = raw_flex(viewport_width, params);
    let orientation = Orientation::of(record);
    let flex_basis_percent = match orientation {
        Orientation::Landscape => raw.min(params.landscape_cap),
        Orientation::Portrait => (raw / 2.0).min(params.portrait_cap),
    };
    Sizing {
        flex_basis_percent,
        regime: regime(viewport_width, params),
        orientation,
    }
}

/// Format a percentage with at most four decimals and no trailing zeros.
///
/// `17.0` → `"17"`, `17.5` → `"17.5"`, `37.635` → `"37.635"`.
pub fn format_percent(value: f64) -> String {
    let rounded = format!("{:.4}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
