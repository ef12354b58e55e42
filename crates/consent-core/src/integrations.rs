//! Built-in third-party integrations
//!
//! | Consent key          | Loader       |
//! |----------------------|--------------|
//! | `analytics.google`   | Tag manager  |
//! | `analytics.facebook` | Social pixel |
//! | `marketing.custobar` | CRM tracker  |
//!
//! Only integrations with an id in the config are registered.

use std::sync::Arc;

use consent_dispatch::{ConsentHandlers, Trigger};
use consent_loaders::{CrmTracker, Document, SocialPixel, TagManager};
use consent_settings::{ConsentKey, ANALYTICS_PIXEL, ANALYTICS_TAG_MANAGER, MARKETING_CRM};

use crate::config::Config;
use crate::Result;

/// Register a `Trigger::Load` handler for every configured integration
///
/// Returns the CRM tracker when one is configured, so the page bridge can
/// report script loads and forward tracking calls.
pub fn register<D>(
    handlers: &mut ConsentHandlers,
    config: &Config,
    doc: Arc<D>,
) -> Result<Option<Arc<CrmTracker>>>
where
    D: Document + 'static,
{
    if let Some(id) = &config.tag_manager_id {
        let gtm = TagManager::new(id.as_str())?;
        let doc = Arc::clone(&doc);
        handlers.on(
            ConsentKey::analytics(ANALYTICS_TAG_MANAGER),
            Trigger::Load,
            move || {
                if let Err(e) = gtm.load(doc.as_ref()) {
                    tracing::error!(error = %e, "Failed to load tag manager");
                }
            },
        );
    }

    if let Some(id) = &config.pixel_id {
        let pixel = SocialPixel::new(id.as_str())?;
        let doc = Arc::clone(&doc);
        handlers.on(ConsentKey::analytics(ANALYTICS_PIXEL), Trigger::Load, move || {
            if let Err(e) = pixel.load(doc.as_ref()) {
                tracing::error!(error = %e, "Failed to load pixel");
            }
        });
    }

    let Some(token) = &config.crm_company_token else {
        return Ok(None);
    };

    let crm = Arc::new(CrmTracker::new(token.as_str())?);
    {
        let crm = Arc::clone(&crm);
        let doc = Arc::clone(&doc);
        handlers.on(ConsentKey::marketing(MARKETING_CRM), Trigger::Load, move || {
            crm.load(doc.as_ref());
        });
    }
    {
        let crm = Arc::clone(&crm);
        handlers.on(ConsentKey::marketing(MARKETING_CRM), Trigger::Revoke, move || {
            crm.reset();
        });
    }

    Ok(Some(crm))
}
