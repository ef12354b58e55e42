//! Cookie codec
//!
//! `ConsentSettings` -> JSON -> standard Base64 (the `btoa` alphabet, padded),
//! and back. Decoding never fails the caller: malformed text reads as absent.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::settings::ConsentSettings;
use crate::Result;

pub fn encode(settings: &ConsentSettings) -> Result<String> {
    let json = serde_json::to_string(settings)?;
    Ok(STANDARD.encode(json))
}

/// Decode a cookie value, reporting why it could not be read
pub fn try_decode(text: &str) -> Result<ConsentSettings> {
    let bytes = STANDARD.decode(text.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Decode a cookie value; missing or corrupt input yields `None`
pub fn decode(text: &str) -> Option<ConsentSettings> {
    if text.trim().is_empty() {
        return None;
    }

    match try_decode(text) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable consent cookie");
            None
        }
    }
}
