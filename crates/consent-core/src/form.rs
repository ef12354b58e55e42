//! Consent form state
//!
//! The consent menu carries two checkboxes: `#cookie_marketing` and
//! `#cookie_analytics`. `basic` has no checkbox and is always granted.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use consent_settings::{ConsentKey, ConsentSettings, MARKETING_CRM, ANALYTICS_TAG_MANAGER};

use crate::error::CoreError;
use crate::Result;

pub const MARKETING_INPUT_ID: &str = "cookie_marketing";
pub const ANALYTICS_INPUT_ID: &str = "cookie_analytics";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentForm {
    pub marketing: bool,
    pub analytics: bool,
}

impl ConsentForm {
    pub fn new(marketing: bool, analytics: bool) -> Self {
        Self {
            marketing,
            analytics,
        }
    }

    /// Read the checkbox states out of submitted page markup
    pub fn from_html(html: &str) -> Result<Self> {
        let doc = Html::parse_document(html);

        Ok(Self {
            marketing: is_checked(&doc, MARKETING_INPUT_ID)?,
            analytics: is_checked(&doc, ANALYTICS_INPUT_ID)?,
        })
    }

    /// Mirror stored consent back into the checkboxes
    ///
    /// Only a granted flag ticks a box; missing settings leave both clear.
    pub fn from_settings(settings: Option<&ConsentSettings>) -> Self {
        let granted = |key: ConsentKey| {
            settings
                .and_then(|s| s.flag_at(&key))
                .is_some_and(|flag| flag.is_granted())
        };

        Self {
            marketing: granted(ConsentKey::marketing(MARKETING_CRM)),
            analytics: granted(ConsentKey::analytics(ANALYTICS_TAG_MANAGER)),
        }
    }

    pub fn to_settings(&self) -> ConsentSettings {
        ConsentSettings::from_selections(self.marketing, self.analytics)
    }
}

fn is_checked(doc: &Html, id: &'static str) -> Result<bool> {
    let selector =
        Selector::parse(&format!("#{id}")).map_err(|_| CoreError::MissingElement(id))?;

    let input = doc
        .select(&selector)
        .next()
        .ok_or(CoreError::MissingElement(id))?;

    Ok(input.value().attr("checked").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_settings::Flag;

    const MENU_HTML: &str = r#"
        <div id="cookie_menu" style="display: none">
            <label><input type="checkbox" id="cookie_marketing" checked> Marketing</label>
            <label><input type="checkbox" id="cookie_analytics"> Analytics</label>
            <button>Save</button>
        </div>
    "#;

    #[test]
    fn test_from_html() {
        let form = ConsentForm::from_html(MENU_HTML).unwrap();
        assert_eq!(form, ConsentForm::new(true, false));
    }

    #[test]
    fn test_from_html_missing_input() {
        let result = ConsentForm::from_html(r#"<input type="checkbox" id="cookie_marketing">"#);
        assert!(matches!(
            result,
            Err(CoreError::MissingElement(ANALYTICS_INPUT_ID))
        ));
    }

    #[test]
    fn test_to_settings() {
        let settings = ConsentForm::new(true, false).to_settings();

        assert_eq!(settings.basic, Flag::Granted);
        assert_eq!(settings.value_at("marketing.custobar"), Some(Flag::Granted));
        assert_eq!(settings.value_at("analytics.google"), Some(Flag::Denied));
        assert_eq!(settings.value_at("analytics.facebook"), Some(Flag::Denied));
    }

    #[test]
    fn test_from_settings() {
        let settings = ConsentSettings::from_selections(false, true);
        assert_eq!(
            ConsentForm::from_settings(Some(&settings)),
            ConsentForm::new(false, true)
        );
        assert_eq!(ConsentForm::from_settings(None), ConsentForm::default());
    }
}
