//! Consent menu visibility

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    #[default]
    Hidden,
    Visible,
}

impl MenuState {
    pub fn is_visible(&self) -> bool {
        matches!(self, MenuState::Visible)
    }

    /// CSS `display` value for the menu container
    pub fn css_display(&self) -> &'static str {
        match self {
            MenuState::Hidden => "none",
            MenuState::Visible => "block",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuState::Hidden => "hidden",
            MenuState::Visible => "visible",
        }
    }
}

impl std::fmt::Display for MenuState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hidden() {
        let state = MenuState::default();
        assert!(!state.is_visible());
        assert_eq!(state.css_display(), "none");
    }

    #[test]
    fn test_visible() {
        assert!(MenuState::Visible.is_visible());
        assert_eq!(MenuState::Visible.css_display(), "block");
        assert_eq!(MenuState::Visible.to_string(), "visible");
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&MenuState::Hidden).unwrap(),
            "\"hidden\""
        );
        let state: MenuState = serde_json::from_str("\"visible\"").unwrap();
        assert_eq!(state, MenuState::Visible);
    }
}
