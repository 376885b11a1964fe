//! # Inline Encoding
//!
//! Binary attachments are stored as `data:<mime>;base64,<payload>` strings so
//! they can sit directly inside the JSON collection.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Fallback MIME type for unknown extensions
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Guess a MIME type from a file name's extension
pub fn guess_mime(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => DEFAULT_MIME,
    }
}

/// Encode bytes as a base64 data URL
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URL back into MIME type and bytes.
///
/// Returns `None` for anything that is not a well-formed base64 data URL.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}
