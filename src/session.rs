//! Transient input state owned by the ingestion controller.
//!
//! [`InputSession`] holds the text field value, the drag-hover flag and the
//! failures of the most recent submission or drop. How several failures share
//! the error slot is an explicit [`ErrorPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_INVALID_URL: &str = "Please enter a valid url string.";
pub const MSG_UPLOAD_FAILED: &str = "An error occurred when uploading a file.";
pub const MSG_UNSUPPORTED_FORMAT: &str =
    "Files of such format are not supported. Supported file formats: *.json, *.jpg, *.jpeg, *.png.";
pub const MSG_MANIFEST_FAILED: &str = "Could not load images from the manifest.";

pub const HINT_DRAG_ACTIVE: &str = "Drop file(s) to upload images";
pub const HINT_IDLE: &str =
    "Drag file(s) or insert a url to upload images. Supported file formats: *.json, *.jpg, *.jpeg, *.png.";

/// A user-visible ingestion failure. Each variant maps to one fixed message;
/// the fields are diagnostics for logs and the `collect` policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestFailure {
    /// A submitted image URL could not be read or decoded.
    InvalidUrl { input: String, reason: String },
    /// A dropped JPEG/PNG could not be decoded.
    UploadFailed { name: String, reason: String },
    /// A dropped file with a type other than JPEG, PNG or JSON.
    UnsupportedFormat { name: String, mime: String },
    /// A manifest URL or dropped JSON file could not be read or parsed.
    ManifestFailed { source: String, reason: String },
}

impl IngestFailure {
    pub fn message(&self) -> &'static str {
        match self {
            IngestFailure::InvalidUrl { .. } => MSG_INVALID_URL,
            IngestFailure::UploadFailed { .. } => MSG_UPLOAD_FAILED,
            IngestFailure::UnsupportedFormat { .. } => MSG_UNSUPPORTED_FORMAT,
            IngestFailure::ManifestFailed { .. } => MSG_MANIFEST_FAILED,
        }
    }

    /// The input or file the failure is about.
    pub fn subject(&self) -> &str {
        match self {
            IngestFailure::InvalidUrl { input, .. } => input,
            IngestFailure::UploadFailed { name, .. } => name,
            IngestFailure::UnsupportedFormat { name, .. } => name,
            IngestFailure::ManifestFailed { source, .. } => source,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            IngestFailure::InvalidUrl { reason, .. }
            | IngestFailure::UploadFailed { reason, .. }
            | IngestFailure::ManifestFailed { reason, .. } => reason.clone(),
            IngestFailure::UnsupportedFormat { mime, .. } => format!("type '{mime}'"),
        }
    }
}

impl fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How failures from independent inputs share the error slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// A single slot; each failure overwrites the previous one.
    #[default]
    LastWriteWins,
    /// Keep every failure in the order it was observed.
    Collect,
}

/// Failures since the last clear, stored according to an [`ErrorPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    policy: ErrorPolicy,
    entries: Vec<IngestFailure>,
}

impl ErrorLog {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, failure: IngestFailure) {
        if self.policy == ErrorPolicy::LastWriteWins {
            self.entries.clear();
        }
        self.entries.push(failure);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The failure currently shown to the user.
    pub fn current(&self) -> Option<&IngestFailure> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[IngestFailure] {
        &self.entries
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }
}

/// Text field value, drag flag and error log.
#[derive(Debug, Clone, Default)]
pub struct InputSession {
    pub(crate) value: String,
    pub(crate) drag: bool,
    pub(crate) errors: ErrorLog,
}

impl InputSession {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            value: String::new(),
            drag: false,
            errors: ErrorLog::new(policy),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_dragging(&self) -> bool {
        self.drag
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// The current error message, or the empty string when there is none.
    pub fn error_message(&self) -> &'static str {
        self.errors.current().map(IngestFailure::message).unwrap_or("")
    }

    /// Placeholder text for the input field.
    pub fn placeholder_hint(&self) -> &'static str {
        if self.drag { HINT_DRAG_ACTIVE } else { HINT_IDLE }
    }
}
