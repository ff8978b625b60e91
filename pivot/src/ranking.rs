//! Domain-weighted re-ranking
//!
//! ```text
//! rank_key = weight(voice) * |intensity|
//! ```
//!
//! Insights are stably sorted by `rank_key` descending, so equal keys keep
//! sentence order.

use crate::classifier::Insight;
use crate::errors::{PivotError, Result};
use crate::voice::VoiceCode;
use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

/// Per-voice multipliers for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainWeights {
    #[serde(rename = "P", default = "default_weight")]
    pub pain: f64,
    #[serde(rename = "I", default = "default_weight")]
    pub insecurity: f64,
    #[serde(rename = "V", default = "default_weight")]
    pub vision: f64,
    #[serde(rename = "O", default = "default_weight")]
    pub objection: f64,
    #[serde(rename = "T", default = "default_weight")]
    pub traction: f64,
}

impl Default for DomainWeights {
    fn default() -> Self {
        Self::from_array([default_weight(); 5])
    }
}

impl DomainWeights {
    /// Build from weights in P, I, V, O, T order
    pub fn from_array(weights: [f64; 5]) -> Self {
        let [pain, insecurity, vision, objection, traction] = weights;
        Self {
            pain,
            insecurity,
            vision,
            objection,
            traction,
        }
    }

    pub fn weight(&self, voice: VoiceCode) -> f64 {
        match voice {
            VoiceCode::Pain => self.pain,
            VoiceCode::Insecurity => self.insecurity,
            VoiceCode::Vision => self.vision,
            VoiceCode::Objection => self.objection,
            VoiceCode::Traction => self.traction,
        }
    }

    /// Weights must be finite and non-negative
    pub fn validate(&self, domain: &str) -> Result<()> {
        for voice in VoiceCode::ALL {
            let w = self.weight(voice);
            if !w.is_finite() || w < 0.0 {
                return Err(PivotError::lexicon(format!(
                    "domain `{domain}` weight for {voice} must be a non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }

    pub fn rank_key(&self, insight: &Insight) -> f64 {
        self.weight(insight.voice()) * insight.intensity().abs()
    }
}

/// Stable sort by domain-weighted absolute intensity, highest first
pub fn rank_by_domain(items: &mut [Insight], weights: &DomainWeights) {
    items.sort_by(|a, b| weights.rank_key(b).total_cmp(&weights.rank_key(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::InsightSeed;
    use pretty_assertions::assert_eq;

    fn insight(voice: VoiceCode, degree: f64, certainty: f64, sentence: &str) -> Insight {
        let mut seed = InsightSeed::new(voice, 0.8, sentence);
        seed.degree_factor = degree;
        seed.certainty = certainty;
        Insight::from_seed(seed)
    }

    fn sentences(items: &[Insight]) -> Vec<&str> {
        items.iter().map(Insight::body).collect()
    }

    #[test]
    fn test_biz_analysis_pain_outranks_stronger_traction() {
        // Traction |2 * 0.6| = 1.2 comes first in sentence order
        let mut items = vec![
            insight(VoiceCode::Traction, 1.0, 0.6, "traction"),
            insight(VoiceCode::Pain, 1.0, 0.5, "pain"),
        ];
        assert_eq!(items[0].intensity().abs(), 1.2);
        assert_eq!(items[1].intensity().abs(), 1.0);

        let weights = DomainWeights::from_array([2.0, 1.0, 1.0, 1.0, 1.5]);
        rank_by_domain(&mut items, &weights);
        assert_eq!(sentences(&items), vec!["pain", "traction"]);
    }

    #[test]
    fn test_unit_weights_rank_by_magnitude() {
        let mut items = vec![
            insight(VoiceCode::Vision, 1.0, 1.0, "vision"),
            insight(VoiceCode::Pain, 1.0, 1.0, "pain"),
        ];
        rank_by_domain(&mut items, &DomainWeights::default());
        assert_eq!(sentences(&items), vec!["pain", "vision"]);
    }

    #[test]
    fn test_ties_keep_sentence_order() {
        let mut items = vec![
            insight(VoiceCode::Insecurity, 1.0, 1.0, "first"),
            insight(VoiceCode::Vision, 1.0, 1.0, "second"),
            insight(VoiceCode::Objection, 1.0, 1.0, "third"),
        ];
        rank_by_domain(&mut items, &DomainWeights::default());
        assert_eq!(sentences(&items), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = DomainWeights::from_array([1.0, -0.5, 1.0, 1.0, 1.0]);
        let err = weights.validate("broken").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_partial_table_defaults_missing_voices() {
        let weights: DomainWeights = toml::from_str("T = 3.0").unwrap();
        assert_eq!(weights.weight(VoiceCode::Traction), 3.0);
        assert_eq!(weights.weight(VoiceCode::Pain), 1.0);
    }
}
