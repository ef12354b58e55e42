//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] consent_storage::StorageError),

    #[error("Settings error: {0}")]
    Settings(#[from] consent_settings::SettingsError),

    #[error("Loader error: {0}")]
    Loader(#[from] consent_loaders::LoaderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Consent form element not found: #{0}")]
    MissingElement(&'static str),
}
