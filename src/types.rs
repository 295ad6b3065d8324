//! Shared types passed between ingestion, layout and rendering.
//!
//! [`ImageRecord`] is also the element type of the manifest `galleryImages`
//! array, so its serde field names match the manifest format exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resolved gallery entry: navigable source plus intrinsic pixel size.
///
/// `url` is either a remote URL, a local path/`file://` URL, or a
/// self-contained `data:` URI for dropped files. Records produced by the
/// probe always have positive dimensions; manifest-sourced records are
/// admitted by [`ManifestPolicy`](crate::manifest::ManifestPolicy) and may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ImageRecord {
    pub fn new(url: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            url: url.into(),
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Landscape or square images get the wider tile cap.
    pub fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}

/// Intrinsic pixel dimensions reported by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `800x600`.
impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid width '{w}': {e}"))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid height '{h}': {e}"))?;
        Ok(Self { width, height })
    }
}
