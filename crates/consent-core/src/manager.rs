//! Consent manager
//!
//! Owns the consent store, the handler registry supplied by the caller, and
//! the UI state of the consent menu. Every consent action overwrites the
//! whole stored structure and then runs the handlers it allows.

use parking_lot::RwLock;

use consent_dispatch::{ConsentHandlers, Trigger};
use consent_settings::{ConsentKey, ConsentSettings};
use consent_storage::CookieJar;

use crate::config::Config;
use crate::form::ConsentForm;
use crate::menu::MenuState;
use crate::store::ConsentStore;
use crate::summary::ConsentSummary;
use crate::Result;

pub struct ConsentManager<J: CookieJar> {
    config: Config,
    store: ConsentStore<J>,
    handlers: RwLock<ConsentHandlers>,
    form: RwLock<ConsentForm>,
    menu: RwLock<MenuState>,
}

impl<J: CookieJar> ConsentManager<J> {
    pub fn new(config: Config, jar: J, handlers: ConsentHandlers) -> Self {
        let store = ConsentStore::from_config(jar, &config);

        Self {
            config,
            store,
            handlers: RwLock::new(handlers),
            form: RwLock::new(ConsentForm::default()),
            menu: RwLock::new(MenuState::Hidden),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ConsentStore<J> {
        &self.store
    }

    pub fn current_settings(&self) -> Option<ConsentSettings> {
        self.store.load()
    }

    pub fn summary(&self) -> ConsentSummary {
        ConsentSummary::new(self.current_settings())
    }

    // === Handlers ===

    /// Merge handlers into the registry, overwriting keys already present
    pub fn set_consent_handler(&self, handlers: ConsentHandlers) {
        self.handlers.write().merge(handlers);
    }

    pub fn handler_keys(&self) -> Vec<ConsentKey> {
        self.handlers.read().keys().cloned().collect()
    }

    /// Run the handlers the stored consent allows
    pub fn use_allowed(&self, trigger: Option<Trigger>) -> Vec<ConsentKey> {
        let settings = self.store.load();
        self.dispatch(settings.as_ref(), trigger)
    }

    fn dispatch(
        &self,
        settings: Option<&ConsentSettings>,
        trigger: Option<Trigger>,
    ) -> Vec<ConsentKey> {
        // Callbacks may call back into the manager; don't hold the lock
        let handlers = self.handlers.read().clone();
        let invoked = handlers.dispatch(settings, trigger);

        tracing::debug!(count = invoked.len(), "Consent handlers invoked");
        invoked
    }

    // === Consent actions ===

    pub fn on_page_load(&self) -> Vec<ConsentKey> {
        match self.store.load() {
            Some(settings) => {
                *self.form.write() = ConsentForm::from_settings(Some(&settings));
                self.dispatch(Some(&settings), Some(Trigger::Load))
            }
            None => {
                tracing::info!("No consent decision stored");
                if self.config.show_menu_when_unset {
                    self.show_menu();
                }
                Vec::new()
            }
        }
    }

    /// Save the choices made in the consent form
    pub fn consent_to_selected(&self, form: ConsentForm) -> Result<Vec<ConsentKey>> {
        *self.form.write() = form;
        self.apply(form.to_settings())
    }

    pub fn consent_to_all(&self) -> Result<Vec<ConsentKey>> {
        *self.form.write() = ConsentForm::new(true, true);
        self.apply(ConsentSettings::allow_all())
    }

    fn apply(&self, settings: ConsentSettings) -> Result<Vec<ConsentKey>> {
        self.store.save(&settings)?;
        self.hide_menu();
        Ok(self.use_allowed(Some(Trigger::Load)))
    }

    /// Clear the stored consent
    ///
    /// Once the cookie is gone, handlers registered for `Trigger::Revoke` run
    /// against the consent that was withdrawn. Nothing runs if clearing fails.
    pub fn reset(&self) -> Result<Vec<ConsentKey>> {
        let revoked = self.store.load();
        self.store.clear()?;
        *self.form.write() = ConsentForm::default();

        Ok(self.dispatch(revoked.as_ref(), Some(Trigger::Revoke)))
    }

    // === Menu ===

    pub fn form(&self) -> ConsentForm {
        *self.form.read()
    }

    /// Tick the checkboxes for stored grants
    ///
    /// Boxes are only ever ticked here, never cleared.
    pub fn init_user_selections(&self) -> ConsentForm {
        let stored = ConsentForm::from_settings(self.store.load().as_ref());

        let mut form = self.form.write();
        form.marketing |= stored.marketing;
        form.analytics |= stored.analytics;
        *form
    }

    pub fn show_menu(&self) -> ConsentForm {
        let form = self.init_user_selections();
        *self.menu.write() = MenuState::Visible;
        form
    }

    pub fn hide_menu(&self) {
        *self.menu.write() = MenuState::Hidden;
    }

    pub fn menu_state(&self) -> MenuState {
        *self.menu.read()
    }
}
