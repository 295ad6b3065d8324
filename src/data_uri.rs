//! `data:` URI encoding and decoding.
//!
//! Dropped image files are turned into self-contained `data:<mime>;base64,...`
//! sources so the resulting record needs no access to the original file.
//! Decoding accepts both base64 and percent-encoded payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI has no ',' separator")]
    MissingPayload,
    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media type, `text/plain;charset=US-ASCII` when omitted.
    pub mime: String,
    pub bytes: Vec<u8>,
}

const DEFAULT_MIME: &str = "text/plain;charset=US-ASCII";

/// Encode bytes as a base64 data URI.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn is_data_uri(s: &str) -> bool {
    s.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:"))
}

/// Decode a data URI into its media type and payload bytes.
pub fn decode(uri: &str) -> Result<DataUri, DataUriError> {
    if !is_data_uri(uri) {
        return Err(DataUriError::MissingScheme);
    }
    let rest = &uri[5..];
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;

    let (mime, is_base64) = match header.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (header, false),
    };
    let mime = if mime.is_empty() {
        DEFAULT_MIME.to_string()
    } else {
        mime.to_string()
    };

    let bytes = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DataUriError::Base64(e.to_string()))?
    } else {
        // Malformed escapes are kept literally.
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(DataUri { mime, bytes })
}
