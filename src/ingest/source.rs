//! Input classification: what kind of thing the user handed us.
//!
//! Three decisions live here:
//!
//! - [`classify_input`]: manifest URL (`*.json`) vs direct image URL
//! - [`ImageSource::parse`]: where the bytes of a URL come from
//! - [`FileKind::from_mime`]: how a dropped file is handled

use super::fetch::{FetchError, Fetcher};
use crate::data_uri;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// How a submitted input string is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Points to a JSON manifest.
    Manifest,
    /// Points directly to an image.
    Image,
}

/// Classify an input string. Only a literal `.json` suffix marks a manifest;
/// query strings or fragments after the extension make it an image URL.
pub fn classify_input(input: &str) -> InputKind {
    if input.ends_with(".json") {
        InputKind::Manifest
    } else {
        InputKind::Image
    }
}

/// Where the bytes behind a URL string live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `http://` or `https://`
    Remote(String),
    /// `file://` URL or a bare local path
    Local(PathBuf),
    /// Self-contained `data:` URI
    Data(String),
}

impl ImageSource {
    /// Classify by URL scheme. Strings that are not absolute URLs, or use a
    /// scheme other than `http`, `https`, `file` or `data`, are local paths.
    pub fn parse(s: &str) -> Self {
        if data_uri::is_data_uri(s) {
            return ImageSource::Data(s.to_string());
        }
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                ImageSource::Remote(s.to_string())
            }
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => ImageSource::Local(path),
                Err(()) => {
                    tracing::debug!(url = s, "file URL has no local path");
                    ImageSource::Local(PathBuf::from(s))
                }
            },
            _ => ImageSource::Local(PathBuf::from(s)),
        }
    }

    /// Load the raw bytes for this source.
    pub fn read(&self, fetcher: &dyn Fetcher) -> Result<Vec<u8>, FetchError> {
        match self {
            ImageSource::Remote(url) => fetcher.fetch(url),
            ImageSource::Local(path) => Ok(fs::read(path)?),
            ImageSource::Data(uri) => Ok(data_uri::decode(uri)?.bytes),
        }
    }
}

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JSON: &str = "application/json";

/// How a dropped file is handled, keyed on its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Jpeg,
    Png,
    Json,
    Unsupported(String),
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            MIME_JPEG => FileKind::Jpeg,
            MIME_PNG => FileKind::Png,
            MIME_JSON => FileKind::Json,
            other => FileKind::Unsupported(other.to_string()),
        }
    }
}

/// A file handed over by a drop gesture: name, declared type, contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime)
    }

    /// Read a local file, declaring its type from the extension the way a
    /// browser file picker does.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            mime: mime_for_path(path).to_string(),
            bytes,
        })
    }
}

/// Declared content type for a path, by extension. Unknown extensions map to
/// `application/octet-stream`.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => MIME_JPEG,
        Some("png") => MIME_PNG,
        Some("json") => MIME_JSON,
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Expand dropped paths: directories contribute their immediate files,
/// sorted by name; plain files pass through in the given order.
pub fn expand_drop_paths(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry.map_err(std::io::Error::other)?;
                if entry.file_type().is_file() {
                    expanded.push(entry.into_path());
                }
            }
        } else {
            expanded.push(path.clone());
        }
    }
    Ok(expanded)
}

/// Read every dropped path into a [`DroppedFile`].
pub fn load_dropped_files(paths: &[PathBuf]) -> std::io::Result<Vec<DroppedFile>> {
    expand_drop_paths(paths)?
        .iter()
        .map(|p| DroppedFile::from_path(p))
        .collect()
}
