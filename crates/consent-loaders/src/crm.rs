//! CRM tracking SDK loader
//!
//! ```text
//! Idle --load--> Loading --script_loaded--> Ready
//! ```
//! Tracking calls made before the SDK is ready are queued and replayed in
//! order once the client starts.

use parking_lot::Mutex;
use serde::Serialize;
use url::Url;

use crate::document::{Document, PreloadLink, ScriptTag};
use crate::error::LoaderError;
use crate::Result;

const CRM_SDK_URL: &str = "https://custobar.com/js/custobar.js";
const SCRIPT_ID: &str = "custobar-script";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrmState {
    Idle,
    Loading,
    Ready,
}

/// Calls for the page bridge to make against the CRM client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CrmCommand {
    Start {
        company_token: String,
        banners: serde_json::Value,
    },
    TrackBrowseProduct {
        product_id: String,
    },
}

struct CrmInner {
    state: CrmState,
    pending: Vec<String>,
    commands: Vec<CrmCommand>,
}

pub struct CrmTracker {
    company_token: String,
    script_src: Url,
    inner: Mutex<CrmInner>,
}

impl CrmTracker {
    pub fn new(company_token: impl Into<String>) -> Result<Self> {
        Self::with_script_src(company_token, Url::parse(CRM_SDK_URL)?)
    }

    pub fn with_script_src(company_token: impl Into<String>, script_src: Url) -> Result<Self> {
        let company_token = company_token.into();

        if company_token.is_empty()
            || !company_token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(LoaderError::InvalidId {
                kind: "CRM company token",
                id: company_token,
            });
        }

        Ok(Self {
            company_token,
            script_src,
            inner: Mutex::new(CrmInner {
                state: CrmState::Idle,
                pending: Vec::new(),
                commands: Vec::new(),
            }),
        })
    }

    pub fn state(&self) -> CrmState {
        self.inner.lock().state
    }

    /// Hint the browser to fetch the SDK early without running it
    pub fn preload(&self, doc: &dyn Document) {
        doc.insert_preload(PreloadLink {
            href: self.script_src.clone(),
        });
    }

    /// Inject the SDK script; returns false if it was already requested
    pub fn load(&self, doc: &dyn Document) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != CrmState::Idle {
            return false;
        }

        if !doc.has_script(SCRIPT_ID) {
            doc.insert_script(ScriptTag::external(self.script_src.clone()).with_id(SCRIPT_ID));
        }
        inner.state = CrmState::Loading;

        tracing::info!(src = %self.script_src, "CRM script requested");
        true
    }

    /// The page reports the SDK finished loading
    ///
    /// Starts the client and replays queued tracking. Returns the commands
    /// recorded by this call.
    pub fn script_loaded(&self) -> Vec<CrmCommand> {
        let mut inner = self.inner.lock();
        if inner.state == CrmState::Ready {
            return Vec::new();
        }

        let mut recorded = vec![CrmCommand::Start {
            company_token: self.company_token.clone(),
            banners: serde_json::json!({}),
        }];
        recorded.extend(
            inner
                .pending
                .drain(..)
                .map(|product_id| CrmCommand::TrackBrowseProduct { product_id }),
        );

        inner.state = CrmState::Ready;
        inner.commands.extend(recorded.iter().cloned());

        tracing::info!(replayed = recorded.len() - 1, "CRM client started");
        recorded
    }

    /// Track a product view, loading the SDK first if needed
    pub fn track_browse_product(&self, doc: &dyn Document, product_id: impl Into<String>) {
        let product_id = product_id.into();

        {
            let mut inner = self.inner.lock();
            if inner.state == CrmState::Ready {
                tracing::debug!(product_id = %product_id, "Tracking CRM product");
                inner
                    .commands
                    .push(CrmCommand::TrackBrowseProduct { product_id });
                return;
            }

            tracing::debug!(product_id = %product_id, "CRM not ready, queueing product");
            inner.pending.push(product_id);
        }

        self.load(doc);
    }

    pub fn commands(&self) -> Vec<CrmCommand> {
        self.inner.lock().commands.clone()
    }

    pub fn take_commands(&self) -> Vec<CrmCommand> {
        std::mem::take(&mut self.inner.lock().commands)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Forget the client; used when marketing consent is withdrawn
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.state = CrmState::Idle;
        inner.pending.clear();
        inner.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;

    fn tracker() -> CrmTracker {
        CrmTracker::new("company-123").unwrap()
    }

    #[test]
    fn test_rejects_bad_token() {
        assert!(CrmTracker::new("").is_err());
        assert!(CrmTracker::new("a b").is_err());
    }

    #[test]
    fn test_load_then_start() {
        let doc = PageDocument::new();
        let crm = tracker();
        assert_eq!(crm.state(), CrmState::Idle);

        assert!(crm.load(&doc));
        assert!(!crm.load(&doc));
        assert_eq!(crm.state(), CrmState::Loading);
        assert!(doc.has_script(SCRIPT_ID));
        assert_eq!(doc.scripts().len(), 1);

        let started = crm.script_loaded();
        assert_eq!(
            started,
            vec![CrmCommand::Start {
                company_token: "company-123".to_string(),
                banners: serde_json::json!({}),
            }]
        );
        assert_eq!(crm.state(), CrmState::Ready);
        assert!(crm.script_loaded().is_empty());
    }

    #[test]
    fn test_tracking_before_ready_is_replayed() {
        let doc = PageDocument::new();
        let crm = tracker();

        crm.track_browse_product(&doc, "sku-1");
        crm.track_browse_product(&doc, "sku-2");
        assert_eq!(crm.state(), CrmState::Loading);
        assert_eq!(crm.pending_count(), 2);
        assert_eq!(doc.scripts().len(), 1);

        let recorded = crm.script_loaded();
        assert_eq!(recorded.len(), 3);
        assert_eq!(
            recorded[1],
            CrmCommand::TrackBrowseProduct {
                product_id: "sku-1".to_string()
            }
        );
        assert_eq!(crm.pending_count(), 0);

        crm.track_browse_product(&doc, "sku-3");
        assert_eq!(crm.commands().len(), 4);
        assert_eq!(crm.take_commands().len(), 4);
        assert!(crm.commands().is_empty());
    }

    #[test]
    fn test_command_wire_format() {
        let json = serde_json::to_value(CrmCommand::TrackBrowseProduct {
            product_id: "sku-1".to_string(),
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({"command": "track_browse_product", "product_id": "sku-1"})
        );
    }

    #[test]
    fn test_preload_and_reset() {
        let doc = PageDocument::new();
        let crm = tracker();

        crm.preload(&doc);
        assert_eq!(doc.preloads()[0].href.as_str(), CRM_SDK_URL);

        crm.load(&doc);
        crm.script_loaded();
        crm.reset();
        assert_eq!(crm.state(), CrmState::Idle);
        assert!(crm.commands().is_empty());
    }
}
