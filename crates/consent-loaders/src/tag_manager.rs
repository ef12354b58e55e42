//! Tag manager container loader

use chrono::{DateTime, Utc};
use url::Url;

use crate::document::{Document, ScriptTag};
use crate::error::LoaderError;
use crate::Result;

const GTM_BASE_URL: &str = "https://www.googletagmanager.com/gtm.js";
const DEFAULT_DATA_LAYER: &str = "dataLayer";
const SCRIPT_ID: &str = "gtm-script";
const BOOTSTRAP_ID: &str = "gtm-bootstrap";

#[derive(Debug, Clone)]
pub struct TagManager {
    container_id: String,
    data_layer: String,
}

impl TagManager {
    pub fn new(container_id: impl Into<String>) -> Result<Self> {
        Self::with_data_layer(container_id, DEFAULT_DATA_LAYER)
    }

    pub fn with_data_layer(
        container_id: impl Into<String>,
        data_layer: impl Into<String>,
    ) -> Result<Self> {
        let container_id = container_id.into();
        let data_layer = data_layer.into();

        if container_id.is_empty()
            || !container_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(LoaderError::InvalidId {
                kind: "tag manager container",
                id: container_id,
            });
        }

        let is_identifier = data_layer
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && data_layer
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !is_identifier {
            return Err(LoaderError::InvalidId {
                kind: "data layer",
                id: data_layer,
            });
        }

        Ok(Self {
            container_id,
            data_layer,
        })
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn script_url(&self) -> Result<Url> {
        let mut url = Url::parse(GTM_BASE_URL)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("id", &self.container_id);
            if self.data_layer != DEFAULT_DATA_LAYER {
                query.append_pair("l", &self.data_layer);
            }
        }
        Ok(url)
    }

    fn bootstrap(&self, started_at: DateTime<Utc>) -> String {
        format!(
            "(function(w,l){{w[l]=w[l]||[];w[l].push({{'gtm.start':{},event:'gtm.js'}});}})(window,'{}');",
            started_at.timestamp_millis(),
            self.data_layer
        )
    }

    /// Inject the container; returns false if it is already on the page
    pub fn load(&self, doc: &dyn Document) -> Result<bool> {
        self.load_at(doc, Utc::now())
    }

    pub fn load_at(&self, doc: &dyn Document, started_at: DateTime<Utc>) -> Result<bool> {
        if doc.has_script(SCRIPT_ID) {
            return Ok(false);
        }

        let src = self.script_url()?;
        doc.insert_script(ScriptTag::inline(self.bootstrap(started_at)).with_id(BOOTSTRAP_ID));
        doc.insert_script(ScriptTag::external(src).with_id(SCRIPT_ID));

        tracing::info!(container_id = %self.container_id, "Tag manager loaded");
        Ok(true)
    }
}
