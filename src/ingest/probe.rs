//! Image probing: learn the intrinsic pixel size of an image source.
//!
//! The [`ImageProbe`] trait is the single primitive ingestion needs from an
//! image decoder. [`RustProbe`] reads the source bytes (via a [`Fetcher`] for
//! remote URLs) and decodes only the image header with the `image` crate.
//!
//! | Source | Bytes from |
//! |---|---|
//! | `http(s)://` | [`Fetcher::fetch`] |
//! | `file://`, bare path | `std::fs::read` |
//! | `data:` | base64 / percent decoding |

use super::fetch::{FetchError, Fetcher};
use super::source::ImageSource;
use crate::types::Dimensions;
use image::ImageReader;
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Could not read image: {0}")]
    Fetch(#[from] FetchError),
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Image has zero width or height ({0})")]
    Empty(Dimensions),
}

/// Resolves an image source to its intrinsic dimensions.
pub trait ImageProbe: Send + Sync {
    fn probe(&self, source: &ImageSource) -> Result<Dimensions, ProbeError>;
}

/// Probe backed by the `image` crate's header decoders.
pub struct RustProbe {
    fetcher: Arc<dyn Fetcher>,
}

impl RustProbe {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

impl ImageProbe for RustProbe {
    fn probe(&self, source: &ImageSource) -> Result<Dimensions, ProbeError> {
        let bytes = source.read(self.fetcher.as_ref())?;
        probe_bytes(&bytes)
    }
}

/// Decode the header of an in-memory image.
pub fn probe_bytes(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProbeError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ProbeError::Decode(e.to_string()))?;
    let dims = Dimensions::new(width, height);
    if dims.is_empty() {
        return Err(ProbeError::Empty(dims));
    }
    Ok(dims)
}
