//! Settings error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Cookie payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown consent category: {0}")]
    UnknownCategory(String),

    #[error("Invalid consent key: {0}")]
    InvalidKey(String),

    #[error("Invalid flag value: {0}")]
    InvalidFlag(String),
}
