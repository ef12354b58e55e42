//! Consent configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::store::{CONSENT_COOKIE_NAME, EXPIRATION_IN_DAYS};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the cookie database
    pub database_path: PathBuf,
    /// Name of the consent cookie
    pub cookie_name: String,
    /// Cookie lifetime; `None` writes a session cookie
    pub expiry_days: Option<u32>,
    /// Open the consent menu when no decision is stored
    pub show_menu_when_unset: bool,
    /// Tag manager container, e.g. `GTM-XXXXXX`
    pub tag_manager_id: Option<String>,
    pub pixel_id: Option<String>,
    pub crm_company_token: Option<String>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("consent.db"),
            cookie_name: CONSENT_COOKIE_NAME.to_string(),
            expiry_days: Some(EXPIRATION_IN_DAYS),
            show_menu_when_unset: true,
            tag_manager_id: None,
            pixel_id: None,
            crm_company_token: None,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("consent"))
            .unwrap_or_else(|| PathBuf::from(".consent"))
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cookie_name.trim().is_empty() {
            return Err(CoreError::Config("cookie_name cannot be empty".to_string()));
        }
        if self.expiry_days == Some(0) {
            return Err(CoreError::Config(
                "expiry_days must be positive; use null for a session cookie".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/consent"));

        assert_eq!(config.cookie_name, "consent-cookie");
        assert_eq!(config.expiry_days, Some(365));
        assert!(config.show_menu_when_unset);
        assert_eq!(config.database_path, PathBuf::from("/tmp/consent/consent.db"));
    }

    #[test]
    fn test_default_lives_in_data_dir() {
        let dir = Config::data_dir();
        assert!(dir.ends_with("consent") || dir.ends_with(".consent"));
        assert_eq!(Config::default().database_path, dir.join("consent.db"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.json");
        std::fs::write(
            &path,
            r#"{"expiry_days": null, "tag_manager_id": "GTM-ABC123", "show_menu_when_unset": false}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.expiry_days, None);
        assert_eq!(config.tag_manager_id.as_deref(), Some("GTM-ABC123"));
        assert!(!config.show_menu_when_unset);
        assert_eq!(config.cookie_name, "consent-cookie");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.json");

        let mut config = Config::new(dir.path().to_path_buf());
        config.pixel_id = Some("1234".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.pixel_id.as_deref(), Some("1234"));
        assert_eq!(loaded.database_path, config.database_path);
    }

    #[test]
    fn test_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.json");

        std::fs::write(&path, r#"{"cookie_name": " "}"#).unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Config(_))));

        std::fs::write(&path, r#"{"expiry_days": 0}"#).unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Config(_))));

        assert!(matches!(
            Config::load(dir.path().join("missing.json")),
            Err(CoreError::Io(_))
        ));
    }
}
