//! Cookie model and header formatting

use chrono::{DateTime, Duration, Utc};

use crate::error::StorageError;
use crate::Result;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// `None` makes a session cookie
    pub expires_at: Option<DateTime<Utc>>,
    pub path: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: None,
            path: "/".to_string(),
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Expire `days` days from now
    pub fn with_expiry_days(self, days: u32) -> Self {
        self.with_expiry(Utc::now() + Duration::days(i64::from(days)))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn is_session(&self) -> bool {
        self.expires_at.is_none()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let invalid = self.name.is_empty()
            || self
                .name
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','));

        if invalid {
            return Err(StorageError::InvalidName(self.name.clone()));
        }
        Ok(())
    }

    /// `Set-Cookie` header value for this cookie
    pub fn to_set_cookie_header(&self) -> String {
        let mut header = format!("{}={}; Path={}", self.name, self.value, self.path);

        if let Some(expires_at) = self.expires_at {
            header.push_str("; Expires=");
            header.push_str(&expires_at.format(HTTP_DATE_FORMAT).to_string());
        }

        header.push_str("; SameSite=Lax");
        header
    }

    /// `Set-Cookie` header value that deletes the named cookie
    pub fn removal_header(name: &str) -> String {
        format!("{}=; Path=/; Expires={}; Max-Age=0", name, EPOCH_HTTP_DATE)
    }
}

/// Split a request `Cookie` header into name/value pairs
///
/// Pairs without `=` or with an empty name are skipped.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
