//! The shared, ordered list of image records.
//!
//! The container owns a [`Gallery`]; everything else only sees it through
//! [`GallerySetter`], which can append records or replace the whole list.
//! Insertion order is display order.

use crate::types::ImageRecord;

/// A single mutation of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryUpdate {
    Append(Vec<ImageRecord>),
    Replace(Vec<ImageRecord>),
}

/// Setter capability handed to the ingestion controller.
pub trait GallerySetter {
    fn set(&mut self, update: GalleryUpdate);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    records: Vec<ImageRecord>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GallerySetter for Gallery {
    fn set(&mut self, update: GalleryUpdate) {
        match update {
            GalleryUpdate::Append(mut records) => self.records.append(&mut records),
            GalleryUpdate::Replace(records) => self.records = records,
        }
    }
}
