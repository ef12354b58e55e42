//! Consent Core
//!
//! Coordination layer: reads the consent cookie, mirrors it into the consent
//! form, and runs the handlers the visitor agreed to.

mod config;
mod error;
mod form;
pub mod integrations;
mod manager;
mod menu;
mod store;
mod summary;

pub use config::Config;
pub use error::CoreError;
pub use form::ConsentForm;
pub use manager::ConsentManager;
pub use menu::MenuState;
pub use store::{ConsentStore, CONSENT_COOKIE_NAME, EXPIRATION_IN_DAYS};
pub use summary::ConsentSummary;

// Re-export core components
pub use consent_dispatch::{Callback, ConsentHandlers, Handler, Trigger};
pub use consent_loaders::{
    CrmCommand, CrmState, CrmTracker, Document, LoaderError, PageDocument, ScriptTag,
    SocialPixel, TagManager,
};
pub use consent_settings::{
    codec, ConsentCategory, ConsentKey, ConsentSettings, Flag, SettingsError, ANALYTICS_PIXEL,
    ANALYTICS_TAG_MANAGER, MARKETING_CRM,
};
pub use consent_storage::{
    parse_cookie_header, Cookie, CookieJar, Database, MemoryCookieJar, SqliteCookieJar,
    StorageError,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
