//! Consent commands
use serde::Serialize;

use consent_core::{
    ConsentForm, ConsentKey, ConsentSettings, CrmCommand, CrmState, MenuState, MARKETING_CRM,
};

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusInfo {
    pub settings: Option<ConsentSettings>,
    pub summary: String,
    pub menu: MenuState,
    pub form: ConsentForm,
}

#[derive(Debug, Serialize)]
pub struct ConsentInfo {
    /// Consent keys whose handlers ran
    pub invoked: Vec<String>,
    pub settings: Option<ConsentSettings>,
    pub menu: MenuState,
    /// CSS `display` value for the menu container
    pub menu_display: &'static str,
    pub form: ConsentForm,
    /// Markup injected into the page head
    pub head: String,
}

#[derive(Debug, Serialize)]
pub struct TrackInfo {
    pub crm_state: CrmState,
    pub pending: usize,
    pub commands: Vec<CrmCommand>,
    pub head: String,
}

fn keys(invoked: Vec<ConsentKey>) -> Vec<String> {
    invoked.iter().map(ConsentKey::to_string).collect()
}

fn consent_info(state: &AppState, invoked: Vec<ConsentKey>) -> ConsentInfo {
    let manager = state.manager();
    let menu = manager.menu_state();
    ConsentInfo {
        invoked: keys(invoked),
        settings: manager.current_settings(),
        menu,
        menu_display: menu.css_display(),
        form: manager.form(),
        head: state.document().render_head(),
    }
}

pub fn status(state: &AppState) -> CommandResult<StatusInfo> {
    let manager = state.manager();
    let settings = manager.current_settings();

    CommandResult::ok(StatusInfo {
        summary: manager.summary().to_string(),
        settings,
        menu: manager.menu_state(),
        form: manager.init_user_selections(),
    })
}

pub fn page_load(state: &AppState) -> CommandResult<ConsentInfo> {
    let invoked = state.manager().on_page_load();

    // the visitor may accept from the open menu
    if state.manager().menu_state().is_visible() {
        if let Some(crm) = state.crm() {
            crm.preload(state.document());
        }
    }

    CommandResult::ok(consent_info(state, invoked))
}

pub fn accept(state: &AppState, form: ConsentForm) -> CommandResult<ConsentInfo> {
    state
        .manager()
        .consent_to_selected(form)
        .map(|invoked| consent_info(state, invoked))
        .into()
}

/// Accept the choices found in submitted consent menu markup
pub fn accept_form(state: &AppState, html: &str) -> CommandResult<ConsentInfo> {
    match ConsentForm::from_html(html) {
        Ok(form) => accept(state, form),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn accept_all(state: &AppState) -> CommandResult<ConsentInfo> {
    state
        .manager()
        .consent_to_all()
        .map(|invoked| consent_info(state, invoked))
        .into()
}

pub fn reset(state: &AppState) -> CommandResult<ConsentInfo> {
    state
        .manager()
        .reset()
        .map(|invoked| consent_info(state, invoked))
        .into()
}

/// Record a CRM product view
///
/// With `sdk_loaded` the client is started first and queued views are
/// replayed; otherwise the view waits in the queue behind the script request.
pub fn track(state: &AppState, product_id: String, sdk_loaded: bool) -> CommandResult<TrackInfo> {
    let granted = state
        .manager()
        .current_settings()
        .and_then(|settings| settings.flag_at(&ConsentKey::marketing(MARKETING_CRM)))
        .is_some_and(|flag| flag.is_granted());
    if !granted {
        return CommandResult::err("Marketing consent not granted".to_string());
    }

    let Some(crm) = state.crm() else {
        return CommandResult::err("CRM tracking is not configured".to_string());
    };

    if sdk_loaded {
        crm.load(state.document());
        crm.script_loaded();
    }
    crm.track_browse_product(state.document(), product_id);

    CommandResult::ok(TrackInfo {
        crm_state: crm.state(),
        pending: crm.pending_count(),
        commands: crm.commands(),
        head: state.document().render_head(),
    })
}
