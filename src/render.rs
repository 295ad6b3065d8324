//! Static HTML rendering of a gallery.
//!
//! Produces one self-contained page: tiles are pre-sized for a configured
//! viewport width, and an embedded script takes over in the browser.
//!
//! ## Page Structure
//!
//! ```text
//! main.gallery  data-* sizing constants + preload delay
//! └── div.gallery__item  style="flex: 1 1 <pct>%"  data-width  data-height
//!     └── img.gallery__img  src=<placeholder>  data-src=<record url>
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Grid and tile styles
//! - `static/preload.js`: Placeholder swap and resize recomputation. It reads
//!   the same sizing constants from the `data-*` attributes, registers its
//!   resize listener once and removes it (and any pending swaps) on `pagehide`.
//!
//! Uses [maud](https://maud.lambda.xyz/) so every record URL is escaped.

use crate::config::GalleryConfig;
use crate::layout::{LayoutParams, compute_sizing};
use crate::types::ImageRecord;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/preload.js");

/// Everything the page needs besides the records.
#[derive(Debug, Clone)]
pub struct PageOptions<'a> {
    pub title: &'a str,
    pub viewport_width: u32,
    pub layout: &'a LayoutParams,
    pub placeholder: &'a str,
    pub delay_ms: u64,
}

impl<'a> PageOptions<'a> {
    pub fn from_config(config: &'a GalleryConfig, placeholder: &'a str) -> Self {
        Self {
            title: &config.render.title,
            viewport_width: config.render.viewport_width,
            layout: &config.layout,
            placeholder,
            delay_ms: config.preload.delay_ms,
        }
    }
}

/// Render the full page.
pub fn render_page(records: &[ImageRecord], options: &PageOptions) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (options.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1.page-title { (options.title) }
                (render_gallery(records, options))
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Render the gallery container and its tiles.
pub fn render_gallery(records: &[ImageRecord], options: &PageOptions) -> Markup {
    let p = options.layout;
    html! {
        main.gallery
            data-small-breakpoint=(p.small_breakpoint)
            data-large-breakpoint=(p.large_breakpoint)
            data-small-coefficient=(p.small_coefficient)
            data-normal-coefficient=(p.normal_coefficient)
            data-large-flex=(p.large_flex)
            data-landscape-cap=(p.landscape_cap)
            data-portrait-cap=(p.portrait_cap)
            data-delay-ms=(options.delay_ms)
        {
            @if records.is_empty() {
                p.gallery__empty { "No images yet." }
            }
            @for record in records {
                (render_tile(record, options))
            }
        }
    }
}

fn render_tile(record: &ImageRecord, options: &PageOptions) -> Markup {
    let sizing = compute_sizing(record, options.viewport_width, options.layout);
    let style = format!("flex: {}", sizing.flex_css());
    html! {
        div.gallery__item
            style=(style)
            data-width=(record.width)
            data-height=(record.height)
        {
            img.gallery__img
                src=(options.placeholder)
                data-src=(record.url)
                alt=(record.url);
        }
    }
}

/// Render the page and write it to `path`.
pub fn write_page(
    path: &Path,
    records: &[ImageRecord],
    options: &PageOptions,
) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_page(records, options).into_string())?;
    tracing::info!(
        path = %path.display(),
        tiles = records.len(),
        viewport = options.viewport_width,
        "wrote page"
    );
    Ok(())
}
