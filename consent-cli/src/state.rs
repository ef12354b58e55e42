//! Application state
use std::sync::Arc;

use consent_core::{
    integrations, Config, ConsentHandlers, ConsentManager, CrmTracker, Database, PageDocument,
    Result, SqliteCookieJar,
};

pub struct AppState {
    manager: ConsentManager<SqliteCookieJar>,
    document: Arc<PageDocument>,
    crm: Option<Arc<CrmTracker>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let jar = SqliteCookieJar::new(db);
        jar.purge_expired()?;

        let document = Arc::new(PageDocument::new());
        let mut handlers = ConsentHandlers::new();
        let crm = integrations::register(&mut handlers, &config, Arc::clone(&document))?;

        tracing::debug!(
            db = %config.database_path.display(),
            handlers = handlers.len(),
            "Application state ready"
        );

        Ok(Self {
            manager: ConsentManager::new(config, jar, handlers),
            document,
            crm,
        })
    }

    pub fn manager(&self) -> &ConsentManager<SqliteCookieJar> {
        &self.manager
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn crm(&self) -> Option<&CrmTracker> {
        self.crm.as_deref()
    }
}
