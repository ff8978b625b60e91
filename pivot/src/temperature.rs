//! Temperature detection: how strongly a sentence is voiced.

use crate::lexicon::RuleStore;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    High,
    #[default]
    Medium,
    Low,
}

impl Temperature {
    /// Detection priority
    pub const PRIORITY: [Temperature; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First bucket (high, medium, low) with a matching indicator; medium otherwise.
pub fn detect_temperature(sentence: &str, rules: &RuleStore) -> Temperature {
    rules
        .temperature_buckets()
        .iter()
        .find(|(_, indicators)| indicators.iter().any(|ind| sentence.contains(ind.as_str())))
        .map(|(level, _)| *level)
        .unwrap_or_default()
}
