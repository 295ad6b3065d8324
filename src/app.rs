//! The gallery container.
//!
//! [`GalleryApp`] owns the gallery and the viewport width. The ingestion
//! controller only ever receives the gallery as a
//! [`GallerySetter`](crate::gallery::GallerySetter). On mount
//! the app subscribes once to the [`ResizeBus`]; the subscription is released
//! when the app is dropped.

use crate::config::GalleryConfig;
use crate::gallery::Gallery;
use crate::ingest::{DroppedFile, IngestionController};
use crate::layout::{Sizing, compute_sizing};
use crate::preload::{TileSet, placeholder_source};
use crate::render::PageOptions;
use crate::types::Dimensions;
use crate::viewport::{ResizeBus, ResizeListener};
use std::time::Instant;

/// A rendered tile as the view sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView<'a> {
    pub url: &'a str,
    /// Placeholder until the swap deadline has passed, then the record URL.
    pub displayed: &'a str,
    pub dims: Dimensions,
    pub sizing: Sizing,
}

pub struct GalleryApp {
    config: GalleryConfig,
    gallery: Gallery,
    controller: IngestionController,
    viewport_width: u32,
    placeholder: String,
    tiles: TileSet,
    resize: ResizeListener,
}

impl GalleryApp {
    /// Mount the container: subscribe to resizes and start with an empty gallery.
    pub fn mount(
        config: GalleryConfig,
        controller: IngestionController,
        bus: &ResizeBus,
        viewport_width: u32,
    ) -> Self {
        let placeholder = placeholder_source(&config.preload);
        let tiles = TileSet::new(config.preload.delay());
        Self {
            config,
            gallery: Gallery::new(),
            controller,
            viewport_width,
            placeholder,
            tiles,
            resize: bus.subscribe(),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn controller(&self) -> &IngestionController {
        &self.controller
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    // =========================================================================
    // Input forwarding
    // =========================================================================

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.controller.set_input(value);
    }

    pub fn submit(&mut self) {
        self.controller.submit();
    }

    pub fn submit_value(&mut self, value: impl Into<String>) {
        self.controller.submit_value(value);
    }

    pub fn handle_drop(&mut self, files: Vec<DroppedFile>) {
        self.controller.handle_drop(files, &mut self.gallery);
        self.tiles.sync(self.gallery.records());
    }

    pub fn drag_enter(&mut self) {
        self.controller.drag_enter();
    }

    pub fn drag_over(&mut self) {
        self.controller.drag_over();
    }

    pub fn drag_leave(&mut self) {
        self.controller.drag_leave();
    }

    pub fn clear(&mut self) {
        self.controller.clear(&mut self.gallery);
        self.tiles.sync(self.gallery.records());
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Apply finished ingestion work and pending resizes, mount new tiles and
    /// advance swaps to `now`. Returns how many tiles swapped.
    pub fn pump(&mut self, now: Instant) -> usize {
        self.controller.poll(&mut self.gallery);
        if let Some(width) = self.resize.latest() {
            tracing::debug!(from = self.viewport_width, to = width, "viewport resized");
            self.viewport_width = width;
        }
        self.tiles.sync(self.gallery.records());
        self.tiles.tick(now)
    }

    /// Report the placeholder loaded on every tile still showing it.
    pub fn placeholders_loaded(&mut self, now: Instant) {
        self.tiles.placeholders_loaded(now);
    }

    /// Block until ingestion is idle and mount the resulting tiles.
    pub fn wait_idle(&mut self) {
        self.controller.wait_idle(&mut self.gallery);
        self.tiles.sync(self.gallery.records());
    }

    /// Block until ingestion is idle, then let every tile finish its swap.
    pub fn settle(&mut self) {
        self.controller.wait_idle(&mut self.gallery);
        self.pump(Instant::now());
        self.tiles.placeholders_loaded(Instant::now());
        while let Some(due) = self.tiles.next_deadline() {
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            self.pump(Instant::now());
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Sizing for every record at the current viewport width.
    pub fn sizings(&self) -> Vec<Sizing> {
        self.gallery
            .records()
            .iter()
            .map(|r| compute_sizing(r, self.viewport_width, &self.config.layout))
            .collect()
    }

    pub fn view(&self) -> Vec<TileView<'_>> {
        self.tiles
            .tiles()
            .iter()
            .map(|tile| TileView {
                url: &tile.record().url,
                displayed: tile.displayed(&self.placeholder),
                dims: tile.record().dimensions(),
                sizing: compute_sizing(tile.record(), self.viewport_width, &self.config.layout),
            })
            .collect()
    }

    /// Page options sized for the current viewport.
    pub fn page_options(&self) -> PageOptions<'_> {
        PageOptions {
            viewport_width: self.viewport_width,
            ..PageOptions::from_config(&self.config, &self.placeholder)
        }
    }
}
