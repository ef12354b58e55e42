//! Cookie jars

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cookie::{parse_cookie_header, Cookie};
use crate::Result;

/// Anything that can hold named cookies
///
/// Expired cookies read as missing. Writes replace any previous value.
pub trait CookieJar: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>>;

    fn set(&self, cookie: Cookie) -> Result<()>;

    fn remove(&self, name: &str) -> Result<()>;
}

impl<J: CookieJar + ?Sized> CookieJar for Arc<J> {
    fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name)
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        (**self).set(cookie)
    }

    fn remove(&self, name: &str) -> Result<()> {
        (**self).remove(name)
    }
}

/// In-memory jar
///
/// Seed it from a request `Cookie` header and read back the `Set-Cookie`
/// lines the writes produced.
#[derive(Default)]
pub struct MemoryCookieJar {
    cookies: RwLock<HashMap<String, Cookie>>,
    /// Set-Cookie lines in write order
    outgoing: RwLock<Vec<String>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cookie_header(header: &str) -> Self {
        let cookies = parse_cookie_header(header)
            .into_iter()
            .map(|(name, value)| (name.clone(), Cookie::new(name, value)))
            .collect();

        Self {
            cookies: RwLock::new(cookies),
            outgoing: RwLock::new(Vec::new()),
        }
    }

    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.outgoing.read().clone()
    }

    pub fn len(&self) -> usize {
        self.cookies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.read().is_empty()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let now = Utc::now();
        let mut cookies = self.cookies.write();

        match cookies.get(name) {
            Some(cookie) if cookie.is_expired(now) => {
                cookies.remove(name);
                Ok(None)
            }
            Some(cookie) => Ok(Some(cookie.value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        cookie.validate()?;

        self.outgoing.write().push(cookie.to_set_cookie_header());
        self.cookies.write().insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.outgoing.write().push(Cookie::removal_header(name));
        self.cookies.write().remove(name);
        Ok(())
    }
}
