//! Placeholder → image transition for mounted tiles.
//!
//! A tile first shows the placeholder. Once the placeholder reports loaded, a
//! swap is scheduled `delay` later; at or after that deadline the tile shows
//! the record URL. There are no timers: the owner drives time explicitly with
//! [`TileSet::tick`], so a tile that is dropped simply never swaps.
//!
//! ```text
//! Placeholder --placeholder_loaded--> Scheduled { due } --tick(now >= due)--> Loaded
//! ```

use crate::config::PreloadConfig;
use crate::data_uri;
use crate::types::ImageRecord;
use std::time::{Duration, Instant};

const PLACEHOLDER_SVG: &str = include_str!("../static/preloader.svg");

/// The bundled spinner as a self-contained data URI.
pub fn bundled_placeholder() -> String {
    data_uri::encode("image/svg+xml", PLACEHOLDER_SVG.as_bytes())
}

/// Placeholder source from config, or the bundled spinner.
pub fn placeholder_source(config: &PreloadConfig) -> String {
    config
        .placeholder
        .clone()
        .unwrap_or_else(bundled_placeholder)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Placeholder,
    Scheduled { due: Instant },
    Loaded,
}

/// One mounted gallery tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    record: ImageRecord,
    phase: Phase,
}

impl Tile {
    pub fn new(record: ImageRecord) -> Self {
        Self {
            record,
            phase: Phase::Placeholder,
        }
    }

    pub fn record(&self) -> &ImageRecord {
        &self.record
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The placeholder finished loading. Only the first report schedules a
    /// swap; later load events (including the real image's own) are ignored.
    pub fn placeholder_loaded(&mut self, now: Instant, delay: Duration) {
        if self.phase == Phase::Placeholder {
            self.phase = Phase::Scheduled { due: now + delay };
        }
    }

    /// Advance the clock. Returns true if the tile swapped on this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Scheduled { due } if now >= due => {
                self.phase = Phase::Loaded;
                true
            }
            _ => false,
        }
    }

    /// The source the tile currently displays.
    pub fn displayed<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.phase {
            Phase::Loaded => &self.record.url,
            Phase::Placeholder | Phase::Scheduled { .. } => placeholder,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Scheduled { due } => Some(due),
            _ => None,
        }
    }
}

/// The mounted tiles, kept in step with the gallery.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    delay: Duration,
}

impl TileSet {
    pub fn new(delay: Duration) -> Self {
        Self {
            tiles: Vec::new(),
            delay,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reconcile tiles with `records` by position. Tiles whose record is
    /// unchanged keep their phase; changed positions are remounted and
    /// surplus tiles are torn down.
    pub fn sync(&mut self, records: &[ImageRecord]) {
        self.tiles.truncate(records.len());
        for (tile, record) in self.tiles.iter_mut().zip(records) {
            if tile.record != *record {
                *tile = Tile::new(record.clone());
            }
        }
        let mounted = self.tiles.len();
        self.tiles
            .extend(records[mounted..].iter().cloned().map(Tile::new));
    }

    /// Report the placeholder loaded for the tile at `index`.
    pub fn placeholder_loaded(&mut self, index: usize, now: Instant) {
        if let Some(tile) = self.tiles.get_mut(index) {
            tile.placeholder_loaded(now, self.delay);
        }
    }

    /// Report the placeholder loaded for every tile still showing it.
    pub fn placeholders_loaded(&mut self, now: Instant) {
        for tile in &mut self.tiles {
            tile.placeholder_loaded(now, self.delay);
        }
    }

    /// Advance every tile. Returns how many swapped.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut swapped = 0;
        for tile in &mut self.tiles {
            if tile.tick(now) {
                swapped += 1;
            }
        }
        swapped
    }

    /// Earliest pending swap.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tiles.iter().filter_map(Tile::next_deadline).min()
    }

    /// Number of tiles that have not swapped yet.
    pub fn pending(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.phase != Phase::Loaded)
            .count()
    }
}
