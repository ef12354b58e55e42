//! Consent flags, categories and dotted keys

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// A single consent decision
///
/// Serialized as the JSON strings `"0"` and `"1"`, never as booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    #[default]
    #[serde(rename = "0")]
    Denied,
    #[serde(rename = "1")]
    Granted,
}

impl Flag {
    pub fn from_bool(granted: bool) -> Self {
        if granted {
            Flag::Granted
        } else {
            Flag::Denied
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Flag::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Denied => "0",
            Flag::Granted => "1",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Flag {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Flag::Denied),
            "1" => Ok(Flag::Granted),
            _ => Err(SettingsError::InvalidFlag(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    /// Cookies the site needs to function
    Basic,
    /// CRM and campaign tracking
    Marketing,
    /// Tag manager and social pixel measurement
    Analytics,
}

impl ConsentCategory {
    pub const ALL: [ConsentCategory; 3] = [
        ConsentCategory::Basic,
        ConsentCategory::Marketing,
        ConsentCategory::Analytics,
    ];

    /// Whether the category holds sub-category flags rather than a single flag
    pub fn is_grouped(&self) -> bool {
        !matches!(self, ConsentCategory::Basic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentCategory::Basic => "basic",
            ConsentCategory::Marketing => "marketing",
            ConsentCategory::Analytics => "analytics",
        }
    }
}

impl std::fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConsentCategory {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ConsentCategory::Basic),
            "marketing" => Ok(ConsentCategory::Marketing),
            "analytics" => Ok(ConsentCategory::Analytics),
            _ => Err(SettingsError::UnknownCategory(s.to_string())),
        }
    }
}

/// Dotted path into the consent settings, e.g. `basic` or `marketing.custobar`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsentKey {
    pub category: ConsentCategory,
    pub sub: Option<String>,
}

impl ConsentKey {
    pub fn category(category: ConsentCategory) -> Self {
        Self {
            category,
            sub: None,
        }
    }

    pub fn sub(category: ConsentCategory, sub: impl Into<String>) -> Self {
        Self {
            category,
            sub: Some(sub.into()),
        }
    }

    pub fn basic() -> Self {
        Self::category(ConsentCategory::Basic)
    }

    pub fn marketing(sub: impl Into<String>) -> Self {
        Self::sub(ConsentCategory::Marketing, sub)
    }

    pub fn analytics(sub: impl Into<String>) -> Self {
        Self::sub(ConsentCategory::Analytics, sub)
    }

    pub fn path(&self) -> String {
        match &self.sub {
            Some(sub) => format!("{}.{}", self.category, sub),
            None => self.category.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ConsentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl std::str::FromStr for ConsentKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let category: ConsentCategory = parts.next().unwrap_or_default().parse()?;
        let sub = parts.next();

        if parts.next().is_some() {
            return Err(SettingsError::InvalidKey(s.to_string()));
        }

        match sub {
            None => Ok(ConsentKey::category(category)),
            Some("") => Err(SettingsError::InvalidKey(s.to_string())),
            // basic is a leaf, it has nothing to select into
            Some(_) if !category.is_grouped() => Err(SettingsError::InvalidKey(s.to_string())),
            Some(sub) => Ok(ConsentKey::sub(category, sub)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wire_format() {
        assert_eq!(serde_json::to_string(&Flag::Granted).unwrap(), "\"1\"");
        assert_eq!(serde_json::to_string(&Flag::Denied).unwrap(), "\"0\"");

        assert!(serde_json::from_str::<Flag>("\"1\"").unwrap().is_granted());
        assert!(serde_json::from_str::<Flag>("true").is_err());
        assert!(serde_json::from_str::<Flag>("1").is_err());
        assert!(serde_json::from_str::<Flag>("\"yes\"").is_err());
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("basic".parse::<ConsentKey>().unwrap(), ConsentKey::basic());
        assert_eq!(
            "marketing.custobar".parse::<ConsentKey>().unwrap(),
            ConsentKey::marketing("custobar")
        );
        assert_eq!(
            "analytics".parse::<ConsentKey>().unwrap(),
            ConsentKey::category(ConsentCategory::Analytics)
        );
    }

    #[test]
    fn test_reject_bad_keys() {
        assert!("tracking".parse::<ConsentKey>().is_err());
        assert!("basic.extra".parse::<ConsentKey>().is_err());
        assert!("analytics.".parse::<ConsentKey>().is_err());
        assert!("analytics.google.tag".parse::<ConsentKey>().is_err());
        assert!("".parse::<ConsentKey>().is_err());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ConsentKey::analytics("google").to_string(), "analytics.google");
        assert_eq!(ConsentKey::basic().to_string(), "basic");
    }
}
