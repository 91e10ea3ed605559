//! Inline bookmark icons.
//!
//! Browsers export favicons as `data:` URIs in the `ICON` attribute. The
//! payload is stored as-is; this module decodes it when the bytes are needed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::errors::IconError;

const DEFAULT_MIME: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes a base64 `data:` URI such as `data:image/png;base64,iVBOR...`.
pub fn decode_data_uri(icon: &str) -> Result<IconData, IconError> {
    let rest = icon
        .trim()
        .strip_prefix("data:")
        .ok_or(IconError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(IconError::NotDataUri)?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| IconError::UnsupportedEncoding(header.to_string()))?;
    let mime_type = match mime.split(';').next().unwrap_or_default() {
        "" => DEFAULT_MIME.to_string(),
        m => m.to_ascii_lowercase(),
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| IconError::Decode(e.to_string()))?;

    Ok(IconData { mime_type, bytes })
}
