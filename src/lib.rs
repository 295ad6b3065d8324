//! # Gallery Loader
//!
//! An image gallery loader: feed it image URLs, JSON manifests or dropped
//! files and it keeps an ordered list of `{url, width, height}` records laid
//! out as a responsive wrapping grid, each tile fading from a placeholder to
//! the real image.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! inputs ──► IngestionController ──► Gallery ──► layout ──► tiles / HTML
//!            (probe workers)          (records)   (flex-basis %)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | Input classification, fetching, probing and the ingestion controller |
//! | [`manifest`] | `galleryImages` JSON parsing and the manifest admission policy |
//! | [`session`] | Input text, drag flag, error policy and the user-facing messages |
//! | [`gallery`] | The ordered record list and its setter capability |
//! | [`layout`] | Flex-basis sizing from viewport width and aspect ratio |
//! | [`preload`] | Placeholder → image swap state for mounted tiles |
//! | [`viewport`] | Resize notifications with scoped listener registration |
//! | [`app`] | The container tying gallery, controller, viewport and tiles together |
//! | [`render`] | Self-contained HTML page rendered with Maud |
//! | [`console`] | Line-oriented session driving an app from stdin |
//! | [`config`] | `gallery.toml` loading, merging and validation |
//! | [`data_uri`] | `data:` URI encoding and decoding |
//! | [`types`] | Shared types (`ImageRecord`, `Dimensions`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Single-Owner Event Loop
//!
//! The gallery is mutated only by the thread that owns the app. Probes and
//! manifest fetches run on a private rayon pool and hand results back over a
//! channel; the owner applies them in [`ingest::IngestionController::poll`].
//! Appends from independent inputs land in completion order, not submission
//! order.
//!
//! ## Generations Instead of Cancellation
//!
//! In-flight probes are not cancelled by `clear()`. Each job carries the
//! generation it was dispatched in, and results from an older generation are
//! discarded when they arrive.
//!
//! ## Manifests Are Not Probed
//!
//! Manifest entries are appended with the dimensions they declare. The one
//! place that can filter them is [`manifest::ManifestPolicy`].
//!
//! ## Explicit Time
//!
//! The placeholder swap has no timers. Tiles hold a deadline and the owner
//! advances them with the current instant, so dropping a tile is all it takes
//! to cancel its swap.

pub mod app;
pub mod config;
pub mod console;
pub mod data_uri;
pub mod gallery;
pub mod ingest;
pub mod layout;
pub mod manifest;
pub mod output;
pub mod preload;
pub mod render;
pub mod session;
pub mod types;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_helpers;
