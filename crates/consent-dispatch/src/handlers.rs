//! Handler registry and the dispatch rule
//!
//! A handler fires only when the flag at its key is exactly `"1"`:
//! ```text
//! settings {basic:"1", marketing:{custobar:"0"}}
//! handlers {basic, marketing.custobar}
//!   -> basic runs, marketing.custobar does not
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use consent_settings::{ConsentKey, ConsentSettings, Flag};

pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Selects a nested handler under a consent key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trigger {
    /// Page load, or a consent decision was just saved
    Load,
    /// The stored consent was cleared
    Revoke,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Load => "load",
            Trigger::Revoke => "revoke",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone)]
pub enum Handler {
    /// Runs on untriggered dispatch only
    Single(Callback),
    /// Runs when dispatch names one of its triggers
    Triggered(BTreeMap<Trigger, Callback>),
}

impl Handler {
    pub fn single<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Handler::Single(Arc::new(f))
    }

    pub fn triggered<F>(trigger: Trigger, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Handler::Triggered(BTreeMap::from([(trigger, Arc::new(f) as Callback)]))
    }

    fn select(&self, trigger: Option<Trigger>) -> Option<&Callback> {
        match (self, trigger) {
            (Handler::Single(callback), None) => Some(callback),
            (Handler::Triggered(callbacks), Some(trigger)) => callbacks.get(&trigger),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Single(_) => f.write_str("Single"),
            Handler::Triggered(callbacks) => f
                .debug_tuple("Triggered")
                .field(&callbacks.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Consent key -> handler, in registration order
#[derive(Clone, Debug, Default)]
pub struct ConsentHandlers {
    entries: Vec<(ConsentKey, Handler)>,
}

impl ConsentHandlers {
    /// Registry with the default `basic` handler
    pub fn new() -> Self {
        let mut handlers = Self::empty();
        handlers.insert(
            ConsentKey::basic(),
            Handler::single(|| tracing::info!("Basic cookies enabled")),
        );
        handlers
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a handler, replacing any handler already under `key`
    pub fn insert(&mut self, key: ConsentKey, handler: Handler) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = handler,
            None => self.entries.push((key, handler)),
        }
    }

    /// Register `f` under `key` for one trigger
    ///
    /// Other triggers already under `key` are kept; a `Single` handler is
    /// replaced.
    pub fn on<F>(&mut self, key: ConsentKey, trigger: Trigger, f: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(f);

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Handler::Triggered(callbacks))) => {
                callbacks.insert(trigger, callback);
            }
            Some((_, existing)) => {
                *existing = Handler::Triggered(BTreeMap::from([(trigger, callback)]));
            }
            None => self.entries.push((
                key,
                Handler::Triggered(BTreeMap::from([(trigger, callback)])),
            )),
        }
        self
    }

    /// Overwrite or add every entry of `other`; nothing is removed
    pub fn merge(&mut self, other: ConsentHandlers) {
        for (key, handler) in other.entries {
            self.insert(key, handler);
        }
    }

    pub fn get(&self, key: &ConsentKey) -> Option<&Handler> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, handler)| handler)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConsentKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke every handler whose consent flag is granted
    ///
    /// With no trigger only `Single` handlers run; with a trigger only the
    /// `Triggered` handlers that define it run. Missing settings run nothing.
    /// Returns the keys whose callbacks ran, in registration order.
    pub fn dispatch(
        &self,
        settings: Option<&ConsentSettings>,
        trigger: Option<Trigger>,
    ) -> Vec<ConsentKey> {
        let Some(settings) = settings else {
            tracing::info!("Consent cookie unavailable, skipping handlers");
            return Vec::new();
        };

        let mut invoked = Vec::new();

        for (key, handler) in &self.entries {
            if settings.flag_at(key) != Some(Flag::Granted) {
                continue;
            }

            if let Some(callback) = handler.select(trigger) {
                tracing::debug!(
                    key = %key,
                    trigger = trigger.map(|t| t.as_str()).unwrap_or("none"),
                    "Invoking consent handler"
                );
                callback();
                invoked.push(key.clone());
            }
        }

        invoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn settings(basic: Flag, custobar: Flag) -> ConsentSettings {
        ConsentSettings {
            marketing: BTreeMap::from([("custobar".to_string(), custobar)]),
            analytics: BTreeMap::new(),
            basic,
        }
    }

    #[test]
    fn test_only_granted_handlers_run() {
        let (basic_count, basic) = counter();
        let (crm_count, crm) = counter();

        let mut handlers = ConsentHandlers::empty();
        handlers.insert(ConsentKey::basic(), Handler::single(basic));
        handlers.insert(ConsentKey::marketing("custobar"), Handler::single(crm));

        let invoked = handlers.dispatch(Some(&settings(Flag::Granted, Flag::Denied)), None);

        assert_eq!(invoked, vec![ConsentKey::basic()]);
        assert_eq!(basic_count.load(Ordering::SeqCst), 1);
        assert_eq!(crm_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_settings_run_nothing() {
        let (count, basic) = counter();
        let mut handlers = ConsentHandlers::empty();
        handlers.insert(ConsentKey::basic(), Handler::single(basic));

        assert!(handlers.dispatch(None, None).is_empty());
        assert!(handlers.dispatch(None, Some(Trigger::Load)).is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trigger_selects_nested_handler() {
        let (single_count, single) = counter();
        let (load_count, load) = counter();
        let (revoke_count, revoke) = counter();

        let mut handlers = ConsentHandlers::empty();
        handlers.insert(ConsentKey::basic(), Handler::single(single));
        handlers
            .on(ConsentKey::marketing("custobar"), Trigger::Load, load)
            .on(ConsentKey::marketing("custobar"), Trigger::Revoke, revoke);

        let granted = settings(Flag::Granted, Flag::Granted);

        // a trigger skips single handlers
        let invoked = handlers.dispatch(Some(&granted), Some(Trigger::Load));
        assert_eq!(invoked, vec![ConsentKey::marketing("custobar")]);
        assert_eq!(single_count.load(Ordering::SeqCst), 0);
        assert_eq!(load_count.load(Ordering::SeqCst), 1);
        assert_eq!(revoke_count.load(Ordering::SeqCst), 0);

        // no trigger skips triggered handlers
        let invoked = handlers.dispatch(Some(&granted), None);
        assert_eq!(invoked, vec![ConsentKey::basic()]);
        assert_eq!(load_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_group_key_never_matches() {
        let (count, f) = counter();
        let mut handlers = ConsentHandlers::empty();
        handlers.insert(
            ConsentKey::category(consent_settings::ConsentCategory::Analytics),
            Handler::single(f),
        );

        handlers.dispatch(Some(&ConsentSettings::allow_all()), None);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_merge_overwrites_and_adds() {
        let (old_count, old) = counter();
        let (new_count, new) = counter();
        let (crm_count, crm) = counter();

        let mut handlers = ConsentHandlers::empty();
        handlers.insert(ConsentKey::basic(), Handler::single(old));

        let mut custom = ConsentHandlers::empty();
        custom.insert(ConsentKey::basic(), Handler::single(new));
        custom.insert(ConsentKey::marketing("custobar"), Handler::single(crm));
        handlers.merge(custom);

        assert_eq!(handlers.len(), 2);
        handlers.dispatch(Some(&ConsentSettings::allow_all()), None);

        assert_eq!(old_count.load(Ordering::SeqCst), 0);
        assert_eq!(new_count.load(Ordering::SeqCst), 1);
        assert_eq!(crm_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merge_keeps_registration_order() {
        let mut handlers = ConsentHandlers::new();
        handlers.on(ConsentKey::analytics("google"), Trigger::Load, || {});

        let mut custom = ConsentHandlers::empty();
        custom.insert(ConsentKey::marketing("custobar"), Handler::single(|| {}));
        custom.insert(ConsentKey::basic(), Handler::single(|| {}));
        handlers.merge(custom);

        let keys: Vec<String> = handlers.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["basic", "analytics.google", "marketing.custobar"]);
    }

    #[test]
    fn test_default_registry_has_basic() {
        let handlers = ConsentHandlers::new();
        assert!(matches!(
            handlers.get(&ConsentKey::basic()),
            Some(Handler::Single(_))
        ));

        let invoked = handlers.dispatch(Some(&ConsentSettings::allow_all()), None);
        assert_eq!(invoked, vec![ConsentKey::basic()]);
    }
}
