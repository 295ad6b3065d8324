//! Input ingestion: turn URLs, manifests and dropped files into image records.
//!
//! | Input | Path |
//! |---|---|
//! | Image URL | probe → one record |
//! | Manifest URL (`*.json`) | fetch → parse → manifest policy → records |
//! | Dropped JPEG/PNG | data URI → probe → one record |
//! | Dropped JSON | parse → manifest policy → records |
//!
//! The module is split into:
//! - **Source**: classification of inputs and dropped files
//! - **Fetch**: [`Fetcher`] trait + [`HttpFetcher`]
//! - **Probe**: [`ImageProbe`] trait + [`RustProbe`]
//! - **Controller**: [`IngestionController`], which owns the input session and
//!   the worker pool

pub mod controller;
pub mod fetch;
pub mod probe;
pub mod source;

pub use controller::{IngestError, IngestEvent, IngestionController};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use probe::{ImageProbe, ProbeError, RustProbe, probe_bytes};
pub use source::{
    DroppedFile, FileKind, ImageSource, InputKind, classify_input, load_dropped_files,
};
