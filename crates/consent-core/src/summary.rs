//! Human-readable view of the stored consent

use serde::Serialize;

use consent_settings::ConsentSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentSummary {
    pub settings: Option<ConsentSettings>,
}

impl ConsentSummary {
    pub fn new(settings: Option<ConsentSettings>) -> Self {
        Self { settings }
    }
}

impl std::fmt::Display for ConsentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(settings) = &self.settings else {
            return write!(f, "Consent cookie not set");
        };

        writeln!(f, "Basic: {}", settings.basic)?;
        writeln!(f, "Marketing")?;
        for (name, flag) in &settings.marketing {
            writeln!(f, "  -{}: {}", name, flag)?;
        }
        writeln!(f, "Analytics")?;
        for (name, flag) in &settings.analytics {
            writeln!(f, "  -{}: {}", name, flag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_unset() {
        assert_eq!(ConsentSummary::new(None).to_string(), "Consent cookie not set");
    }

    #[test]
    fn test_render_settings() {
        let summary = ConsentSummary::new(Some(ConsentSettings::from_selections(true, false)));

        assert_eq!(
            summary.to_string(),
            "Basic: 1\nMarketing\n  -custobar: 1\nAnalytics\n  -facebook: 0\n  -google: 0\n"
        );
    }
}
