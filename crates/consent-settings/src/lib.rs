//! Consent Settings
//!
//! The consent state a visitor leaves behind:
//! - `basic` is a single flag, always granted once the visitor decides
//! - `marketing` and `analytics` map sub-categories to flags
//! - a flag is the literal string `"0"` or `"1"` on the wire
//!
//! The whole structure travels as Base64-encoded JSON inside one cookie.

pub mod codec;
mod error;
mod flag;
mod settings;

pub use error::SettingsError;
pub use flag::{ConsentCategory, ConsentKey, Flag};
pub use settings::{ConsentSettings, ANALYTICS_PIXEL, ANALYTICS_TAG_MANAGER, MARKETING_CRM};

pub type Result<T> = std::result::Result<T, SettingsError>;
