//! Social pixel loader

use url::Url;

use crate::document::{Document, ScriptTag};
use crate::error::LoaderError;
use crate::Result;

const PIXEL_SDK_URL: &str = "https://connect.facebook.net/en_US/fbevents.js";
const SCRIPT_ID: &str = "fb-pixel-sdk";
const BOOTSTRAP_ID: &str = "fb-pixel-init";

/// Queue stub so `fbq` calls made before the SDK arrives are kept
const QUEUE_STUB: &str = "!function(f){if(f.fbq)return;var n=f.fbq=function(){n.callMethod?\
n.callMethod.apply(n,arguments):n.queue.push(arguments)};if(!f._fbq)f._fbq=n;n.push=n;\
n.loaded=!0;n.version='2.0';n.queue=[]}(window);";

#[derive(Debug, Clone)]
pub struct SocialPixel {
    pixel_id: String,
}

impl SocialPixel {
    pub fn new(pixel_id: impl Into<String>) -> Result<Self> {
        let pixel_id = pixel_id.into();

        if pixel_id.is_empty() || !pixel_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(LoaderError::InvalidId {
                kind: "pixel",
                id: pixel_id,
            });
        }

        Ok(Self { pixel_id })
    }

    pub fn pixel_id(&self) -> &str {
        &self.pixel_id
    }

    fn bootstrap(&self) -> String {
        format!(
            "{}fbq('init','{}');fbq('track','PageView');",
            QUEUE_STUB, self.pixel_id
        )
    }

    /// Inject the pixel; returns false if it is already on the page
    pub fn load(&self, doc: &dyn Document) -> Result<bool> {
        if doc.has_script(SCRIPT_ID) {
            tracing::debug!(pixel_id = %self.pixel_id, "Pixel already loaded");
            return Ok(false);
        }

        let src = Url::parse(PIXEL_SDK_URL)?;
        doc.insert_script(ScriptTag::inline(self.bootstrap()).with_id(BOOTSTRAP_ID));
        doc.insert_script(ScriptTag::external(src).with_id(SCRIPT_ID));

        tracing::info!(pixel_id = %self.pixel_id, "Pixel initialized, page view tracked");
        Ok(true)
    }
}
