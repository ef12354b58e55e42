//! Consent store: the consent cookie inside a cookie jar

use consent_settings::{codec, ConsentSettings};
use consent_storage::{Cookie, CookieJar};

use crate::config::Config;
use crate::Result;

pub const CONSENT_COOKIE_NAME: &str = "consent-cookie";
pub const EXPIRATION_IN_DAYS: u32 = 365;

pub struct ConsentStore<J: CookieJar> {
    jar: J,
    cookie_name: String,
    expiry_days: Option<u32>,
}

impl<J: CookieJar> ConsentStore<J> {
    pub fn new(jar: J) -> Self {
        Self {
            jar,
            cookie_name: CONSENT_COOKIE_NAME.to_string(),
            expiry_days: Some(EXPIRATION_IN_DAYS),
        }
    }

    pub fn from_config(jar: J, config: &Config) -> Self {
        Self {
            jar,
            cookie_name: config.cookie_name.clone(),
            expiry_days: config.expiry_days,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn jar(&self) -> &J {
        &self.jar
    }

    /// Overwrite the stored consent
    pub fn save(&self, settings: &ConsentSettings) -> Result<()> {
        let value = codec::encode(settings)?;

        let mut cookie = Cookie::new(self.cookie_name.as_str(), value);
        if let Some(days) = self.expiry_days {
            cookie = cookie.with_expiry_days(days);
        }
        self.jar.set(cookie)?;

        tracing::info!(
            cookie = %self.cookie_name,
            granted = settings.granted_count(),
            "Saved consent"
        );
        Ok(())
    }

    /// Stored consent, or `None` if it is missing or unreadable
    pub fn load(&self) -> Option<ConsentSettings> {
        match self.jar.get(&self.cookie_name) {
            Ok(Some(value)) => codec::decode(&value),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, cookie = %self.cookie_name, "Failed to read consent cookie");
                None
            }
        }
    }

    pub fn raw_value(&self) -> Result<Option<String>> {
        Ok(self.jar.get(&self.cookie_name)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.jar.remove(&self.cookie_name)?;
        tracing::info!(cookie = %self.cookie_name, "Cleared consent");
        Ok(())
    }
}
