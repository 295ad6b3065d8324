//! Shared test utilities for the gallery-loader test suite.
//!
//! Provides encoded image fixtures, a manifest builder and in-memory
//! [`Fetcher`]s so ingestion tests never touch the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fetcher = MockFetcher::new()
//!     .with("https://example.com/a.png", png_bytes(100, 50))
//!     .with("https://example.com/g.json", manifest_json(&[("a.jpg", 3, 4)]).into_bytes());
//! ```

use crate::ingest::fetch::{FetchError, Fetcher};
use image::{ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};

// =========================================================================
// Image fixtures
// =========================================================================

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Encoded PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// Encoded JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

// =========================================================================
// Manifest fixtures
// =========================================================================

/// A manifest document with one entry per `(url, width, height)`.
pub fn manifest_json(entries: &[(&str, u32, u32)]) -> String {
    let images: Vec<serde_json::Value> = entries
        .iter()
        .map(|(url, width, height)| {
            serde_json::json!({ "url": url, "width": width, "height": height })
        })
        .collect();
    serde_json::json!({ "galleryImages": images }).to_string()
}

// =========================================================================
// Fetchers
// =========================================================================

/// Serves fixed bodies by URL; unknown URLs answer HTTP 404.
#[derive(Default)]
pub struct MockFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.bodies.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Blocks every fetch until the test sends on the gate channel, so tests can
/// act while a job is known to be in flight.
pub struct GatedFetcher {
    inner: MockFetcher,
    gate: Mutex<Receiver<()>>,
}

impl GatedFetcher {
    pub fn new(inner: MockFetcher, gate: Receiver<()>) -> Self {
        Self {
            inner,
            gate: Mutex::new(gate),
        }
    }
}

impl Fetcher for GatedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.gate.lock().unwrap().recv().unwrap();
        self.inner.fetch(url)
    }
}

/// Gates fetches per URL: a gated URL blocks until its own sender fires, so
/// tests choose the order in which concurrent jobs finish. Other URLs are
/// served immediately.
pub struct PerUrlGatedFetcher {
    inner: MockFetcher,
    gates: HashMap<String, Mutex<Receiver<()>>>,
}

impl PerUrlGatedFetcher {
    pub fn new(inner: MockFetcher) -> Self {
        Self {
            inner,
            gates: HashMap::new(),
        }
    }

    /// Gate `url`; sending on the returned channel releases one fetch.
    pub fn gate(&mut self, url: &str) -> Sender<()> {
        let (tx, rx) = channel();
        self.gates.insert(url.to_string(), Mutex::new(rx));
        tx
    }
}

impl Fetcher for PerUrlGatedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(gate) = self.gates.get(url) {
            gate.lock().unwrap().recv().unwrap();
        }
        self.inner.fetch(url)
    }
}
