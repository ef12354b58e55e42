//! Consent Storage Layer
//!
//! Cookies are the only persistence medium for consent state.
//! A `CookieJar` is whatever holds them: an in-memory jar seeded from a
//! request header, or a SQLite-backed jar for long-lived local state.

mod cookie;
mod database;
mod error;
mod jar;
mod migrations;
mod sqlite_jar;

pub use cookie::{parse_cookie_header, Cookie};
pub use database::Database;
pub use error::StorageError;
pub use jar::{CookieJar, MemoryCookieJar};
pub use sqlite_jar::SqliteCookieJar;

pub type Result<T> = std::result::Result<T, StorageError>;
