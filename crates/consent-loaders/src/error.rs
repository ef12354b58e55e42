//! Loader error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Invalid script URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid {kind} id: {id:?}")]
    InvalidId { kind: &'static str, id: String },
}
