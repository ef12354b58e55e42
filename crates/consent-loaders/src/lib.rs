//! Consent Loaders
//!
//! Third-party bootstrap code that may only run after consent:
//! - Tag manager container (`analytics.google`)
//! - Social pixel (`analytics.facebook`)
//! - CRM tracking SDK (`marketing.custobar`)
//!
//! Loaders never touch a real DOM. They write script tags into a
//! [`Document`], and the page bridge renders whatever ends up there.

mod crm;
mod document;
mod error;
mod pixel;
mod tag_manager;

pub use crm::{CrmCommand, CrmState, CrmTracker};
pub use document::{Document, PageDocument, PreloadLink, ScriptTag};
pub use error::LoaderError;
pub use pixel::SocialPixel;
pub use tag_manager::TagManager;

pub type Result<T> = std::result::Result<T, LoaderError>;
