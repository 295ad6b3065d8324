//! Gallery manifest parsing.
//!
//! A manifest is a JSON document describing a batch of images:
//!
//! ```json
//! {
//!   "galleryImages": [
//!     { "url": "https://example.com/a.jpg", "width": 640, "height": 480 }
//!   ]
//! }
//! ```
//!
//! Manifest entries are not probed. Whether they are admitted as-is or
//! filtered is decided in one place, [`ManifestPolicy::admit`], so both the
//! manifest-URL path and the dropped-JSON path go through the same boundary.

use crate::types::ImageRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level manifest document. Unknown top-level keys are ignored.
///
/// Entries are kept as raw JSON: a malformed entry never fails the document,
/// it is resolved (or dropped) by [`ManifestPolicy::admit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "galleryImages")]
    pub gallery_images: Vec<Value>,
}

impl Manifest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_records(records: &[ImageRecord]) -> Result<Self, ManifestError> {
        let gallery_images = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;
        Ok(Self { gallery_images })
    }
}

/// Which manifest entries are appended to the gallery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestPolicy {
    /// Append every entry, malformed ones included. A missing or non-string
    /// `url` becomes empty and a missing or non-numeric size becomes 0.
    #[default]
    Trusted,
    /// Drop entries without a non-empty string `url` and positive integer
    /// `width`/`height`.
    Strict,
}

impl ManifestPolicy {
    pub fn admit(self, manifest: Manifest) -> Vec<ImageRecord> {
        match self {
            ManifestPolicy::Trusted => manifest.gallery_images.iter().map(lenient_record).collect(),
            ManifestPolicy::Strict => {
                let total = manifest.gallery_images.len();
                let admitted: Vec<ImageRecord> =
                    manifest.gallery_images.iter().filter_map(strict_record).collect();
                if admitted.len() < total {
                    tracing::warn!(
                        dropped = total - admitted.len(),
                        "strict manifest policy dropped entries"
                    );
                }
                admitted
            }
        }
    }
}

fn lenient_record(entry: &Value) -> ImageRecord {
    ImageRecord {
        url: entry
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        width: lenient_size(entry.get("width")),
        height: lenient_size(entry.get("height")),
    }
}

/// Integers saturate to `u32`, fractions truncate, anything else is 0.
fn lenient_size(value: Option<&Value>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    match value.as_u64() {
        Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
        // Float-to-int `as` saturates and maps NaN and negatives to 0.
        None => value.as_f64().map_or(0, |f| f as u32),
    }
}

fn strict_record(entry: &Value) -> Option<ImageRecord> {
    let url = entry.get("url")?.as_str().filter(|u| !u.is_empty())?;
    let size = |key: &str| {
        entry
            .get(key)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
    };
    Some(ImageRecord {
        url: url.to_string(),
        width: size("width")?,
        height: size("height")?,
    })
}
