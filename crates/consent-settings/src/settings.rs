//! Consent settings structure

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::flag::{ConsentCategory, ConsentKey, Flag};

/// Sub-category fed by the marketing checkbox
pub const MARKETING_CRM: &str = "custobar";
/// Sub-categories fed by the analytics checkbox
pub const ANALYTICS_TAG_MANAGER: &str = "google";
pub const ANALYTICS_PIXEL: &str = "facebook";

/// The full consent state of one visitor
///
/// Every consent action replaces the whole value; there are no partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSettings {
    #[serde(default)]
    pub marketing: BTreeMap<String, Flag>,
    #[serde(default)]
    pub analytics: BTreeMap<String, Flag>,
    pub basic: Flag,
}

impl ConsentSettings {
    /// Build settings from the two consent checkboxes
    pub fn from_selections(marketing: bool, analytics: bool) -> Self {
        let marketing_flag = Flag::from_bool(marketing);
        let analytics_flag = Flag::from_bool(analytics);

        Self {
            marketing: BTreeMap::from([(MARKETING_CRM.to_string(), marketing_flag)]),
            analytics: BTreeMap::from([
                (ANALYTICS_TAG_MANAGER.to_string(), analytics_flag),
                (ANALYTICS_PIXEL.to_string(), analytics_flag),
            ]),
            basic: Flag::Granted,
        }
    }

    /// Every category and sub-category granted
    pub fn allow_all() -> Self {
        Self::from_selections(true, true)
    }

    fn group(&self, category: ConsentCategory) -> Option<&BTreeMap<String, Flag>> {
        match category {
            ConsentCategory::Basic => None,
            ConsentCategory::Marketing => Some(&self.marketing),
            ConsentCategory::Analytics => Some(&self.analytics),
        }
    }

    /// Look up the flag a key points at
    ///
    /// A bare `marketing` or `analytics` key points at a group, not a flag,
    /// and resolves to `None`.
    pub fn flag_at(&self, key: &ConsentKey) -> Option<Flag> {
        match (&key.sub, self.group(key.category)) {
            (None, None) => Some(self.basic),
            (Some(sub), Some(group)) => group.get(sub).copied(),
            _ => None,
        }
    }

    /// Look up a flag by dotted path, e.g. `analytics.google`
    pub fn value_at(&self, path: &str) -> Option<Flag> {
        let key: ConsentKey = path.parse().ok()?;
        self.flag_at(&key)
    }

    pub fn is_granted(&self, path: &str) -> bool {
        self.value_at(path).is_some_and(|flag| flag.is_granted())
    }

    /// All leaves, `basic` first, then marketing and analytics
    pub fn leaves(&self) -> impl Iterator<Item = (ConsentKey, Flag)> + '_ {
        ConsentCategory::ALL
            .into_iter()
            .flat_map(move |category| match self.group(category) {
                Some(group) => group
                    .iter()
                    .map(|(sub, flag)| (ConsentKey::sub(category, sub.clone()), *flag))
                    .collect::<Vec<_>>(),
                None => vec![(ConsentKey::category(category), self.basic)],
            })
    }

    /// Number of granted leaves
    pub fn granted_count(&self) -> usize {
        self.leaves().filter(|(_, flag)| flag.is_granted()).count()
    }
}
