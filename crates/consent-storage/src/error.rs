//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid timestamp for cookie {name}: {source}")]
    Timestamp {
        name: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid cookie name: {0:?}")]
    InvalidName(String),
}
