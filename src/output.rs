//! CLI output formatting for the console session and batch commands.
//!
//! # Output Format
//!
//! ## Gallery
//!
//! ```text
//! Gallery (2 images, viewport 1280px)
//! 001 https://example.com/a.jpg
//!     800x600 landscape, flex 1 1 17%, loaded
//! 002 data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAA... (1874 chars)
//!     6x3 landscape, flex 1 1 17%, placeholder
//! ```
//!
//! ## Ingestion events
//!
//! ```text
//! Added 1 image from https://example.com/a.jpg
//! Error: Please enter a valid url string.
//!     https://example.com/missing.png: https://example.com/missing.png returned HTTP 404
//! Discarded https://example.com/slow.png (cleared)
//! ```
//!
//! ## Layout
//!
//! ```text
//! Viewport 700px (normal)
//!     800x600 landscape → 1 1 17.5%
//!     600x800 portrait → 1 1 8.75%
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::app::TileView;
use crate::ingest::IngestEvent;
use crate::layout::{LayoutParams, Sizing, regime};
use crate::session::InputSession;
use crate::types::Dimensions;

/// URLs longer than this are shortened in listings.
const MAX_URL_CHARS: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Shorten long URLs (typically data URIs) to `max` characters plus the
/// original length.
fn truncate_url(url: &str, max: usize) -> String {
    let total = url.chars().count();
    if total <= max {
        url.to_string()
    } else {
        let head: String = url.chars().take(max).collect();
        format!("{head}... ({total} chars)")
    }
}

fn sizing_line(dims: Dimensions, sizing: &Sizing) -> String {
    format!(
        "{} {}, flex {}",
        dims,
        sizing.orientation.label(),
        sizing.flex_css()
    )
}

// ============================================================================
// Gallery
// ============================================================================

/// Format the mounted tiles.
pub fn format_gallery(tiles: &[TileView], viewport_width: u32) -> Vec<String> {
    let mut lines = vec![format!(
        "Gallery ({}, viewport {}px)",
        plural(tiles.len(), "image"),
        viewport_width
    )];
    for (i, tile) in tiles.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            truncate_url(tile.url, MAX_URL_CHARS)
        ));
        let state = if tile.displayed == tile.url {
            "loaded"
        } else {
            "placeholder"
        };
        lines.push(format!(
            "{}{}, {}",
            indent(1),
            sizing_line(tile.dims, &tile.sizing),
            state
        ));
    }
    lines
}

// ============================================================================
// Ingestion events
// ============================================================================

pub fn format_ingest_event(event: &IngestEvent) -> Vec<String> {
    match event {
        IngestEvent::Appended { source, count } => vec![format!(
            "Added {} from {}",
            plural(*count, "image"),
            truncate_url(source, MAX_URL_CHARS)
        )],
        IngestEvent::Failed(failure) => vec![
            format!("Error: {}", failure.message()),
            format!(
                "{}{}: {}",
                indent(1),
                truncate_url(failure.subject(), MAX_URL_CHARS),
                failure.detail()
            ),
        ],
        IngestEvent::Discarded { source } => vec![format!(
            "Discarded {} (cleared)",
            truncate_url(source, MAX_URL_CHARS)
        )],
    }
}

pub fn print_ingest_event(event: &IngestEvent) {
    for line in format_ingest_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Status
// ============================================================================

/// Format the input session plus gallery counters.
pub fn format_status(
    session: &InputSession,
    in_flight: usize,
    images: usize,
    viewport_width: u32,
) -> Vec<String> {
    let value = if session.value().is_empty() {
        "(empty)".to_string()
    } else {
        truncate_url(session.value(), MAX_URL_CHARS)
    };
    let mut lines = vec![
        format!("Input: {}", value),
        format!("Hint: {}", session.placeholder_hint()),
    ];
    match session.errors().entries() {
        [] => lines.push("Error: none".to_string()),
        [only] => lines.push(format!("Error: {}", only.message())),
        many => {
            lines.push(format!("Errors: {}", many.len()));
            for failure in many {
                lines.push(format!(
                    "{}{}: {}",
                    indent(1),
                    truncate_url(failure.subject(), MAX_URL_CHARS),
                    failure.message()
                ));
            }
        }
    }
    lines.push(format!("Pending: {}", in_flight));
    lines.push(format!(
        "Images: {} (viewport {}px)",
        images, viewport_width
    ));
    lines
}

// ============================================================================
// Layout
// ============================================================================

/// Format sizing for a list of image sizes at one viewport width.
pub fn format_layout(
    viewport_width: u32,
    params: &LayoutParams,
    rows: &[(Dimensions, Sizing)],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Viewport {}px ({})",
        viewport_width,
        regime(viewport_width, params).label()
    )];
    for (dims, sizing) in rows {
        lines.push(format!(
            "{}{} {} → {}",
            indent(1),
            dims,
            sizing.orientation.label(),
            sizing.flex_css()
        ));
    }
    lines
}

pub fn print_layout(viewport_width: u32, params: &LayoutParams, rows: &[(Dimensions, Sizing)]) {
    for line in format_layout(viewport_width, params, rows) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
