//! Per-sentence classification pipeline
//!
//! ```text
//! sentence ─► morphology (if enabled) ─ confidence ≥ accept? ─► accept
//!                    │ no / disabled
//!                    ▼
//!                 lexical ─► accept or drop
//! accepted ─ confidence ≥ min? ─► layers, temperature, timestamp, intensity ─► Insight
//! ```

use crate::layers::{LayerBinding, extract_layers};
use crate::lexical::classify_lexical;
use crate::lexicon::RuleStore;
use crate::morphology::{extract_signals, infer_voice};
use crate::temperature::{Temperature, detect_temperature};
use crate::timestamps::TimestampIndex;
use crate::voice::VoiceCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const DEFAULT_TITLE_MAX_CHARS: usize = 50;

/// Which strategy produced the accepted classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Morphology,
    Lexical,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Morphology => write!(f, "morphology"),
            Self::Lexical => write!(f, "lexical"),
        }
    }
}

/// Replace newlines, trim, and cut to `max_chars` characters with `...`
pub fn truncate_title(sentence: &str, max_chars: usize) -> String {
    let flat = sentence.replace('\n', " ");
    let flat = flat.trim();
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        flat.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Insight
// ─────────────────────────────────────────────────────────────────────────────

/// Inputs for building an [`Insight`]; intensity and title are derived.
#[derive(Debug, Clone)]
pub struct InsightSeed {
    pub voice: VoiceCode,
    pub confidence: f64,
    pub sentence: String,
    pub keywords: Vec<String>,
    pub layers: LayerBinding,
    pub temperature: Temperature,
    pub degree_factor: f64,
    pub certainty: f64,
    pub reasoning: String,
    pub strategy: Strategy,
    pub doc_id: Option<String>,
    pub timestamp: Option<f64>,
    pub title_max_chars: usize,
}

impl InsightSeed {
    pub fn new(voice: VoiceCode, confidence: f64, sentence: impl Into<String>) -> Self {
        Self {
            voice,
            confidence,
            sentence: sentence.into(),
            keywords: Vec::new(),
            layers: LayerBinding::default(),
            temperature: Temperature::default(),
            degree_factor: 1.0,
            certainty: 1.0,
            reasoning: String::new(),
            strategy: Strategy::Lexical,
            doc_id: None,
            timestamp: None,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }
}

/// One classified sentence. Immutable once built.
///
/// Serialize-only: the only way in is [`Insight::from_seed`], which derives
/// the intensity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    id: Uuid,
    voice: VoiceCode,
    confidence: f64,
    keywords: Vec<String>,
    layers: LayerBinding,
    temperature: Temperature,
    degree_factor: f64,
    certainty: f64,
    intensity: f64,
    reasoning: String,
    strategy: Strategy,
    title: String,
    body: String,
    doc_id: Option<String>,
    timestamp: Option<f64>,
}

impl Insight {
    /// Build an insight with a fresh id.
    ///
    /// `intensity = base_score × degree_factor × certainty`; confidence is
    /// clamped to [0, 1].
    pub fn from_seed(seed: InsightSeed) -> Self {
        let intensity = f64::from(seed.voice.base_score()) * seed.degree_factor * seed.certainty;
        Self {
            id: Uuid::new_v4(),
            voice: seed.voice,
            confidence: seed.confidence.clamp(0.0, 1.0),
            keywords: seed.keywords,
            layers: seed.layers,
            temperature: seed.temperature,
            degree_factor: seed.degree_factor,
            certainty: seed.certainty,
            intensity,
            reasoning: seed.reasoning,
            strategy: seed.strategy,
            title: truncate_title(&seed.sentence, seed.title_max_chars),
            body: seed.sentence,
            doc_id: seed.doc_id,
            timestamp: seed.timestamp,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn voice(&self) -> VoiceCode {
        self.voice
    }

    pub fn label(&self) -> &'static str {
        self.voice.label()
    }

    pub fn base_score(&self) -> i32 {
        self.voice.base_score()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn layers(&self) -> &LayerBinding {
        &self.layers
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn degree_factor(&self) -> f64 {
        self.degree_factor
    }

    pub fn certainty(&self) -> f64 {
        self.certainty
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Source sentence
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Approximate start offset in seconds
    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classifier
// ─────────────────────────────────────────────────────────────────────────────

/// Sentence classifier bound to a rule store and one set of thresholds
#[derive(Debug, Clone, Copy)]
pub struct SentenceClassifier<'a> {
    rules: &'a RuleStore,
    pub min_confidence: f64,
    pub morphology_enabled: bool,
    pub accept_threshold: f64,
    pub title_max_chars: usize,
}

impl<'a> SentenceClassifier<'a> {
    /// Defaults: min confidence 0.3, morphology on, acceptance 0.6, titles 50
    pub fn new(rules: &'a RuleStore) -> Self {
        Self {
            rules,
            min_confidence: 0.3,
            morphology_enabled: true,
            accept_threshold: 0.6,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }

    /// Classify one sentence; `None` is the normal "no insight" outcome.
    pub fn classify(
        &self,
        sentence: &str,
        doc_id: Option<&str>,
        timestamps: Option<&TimestampIndex>,
    ) -> Option<Insight> {
        let signals = extract_signals(sentence, self.rules);

        let morphology = if self.morphology_enabled {
            infer_voice(&signals).filter(|m| m.confidence >= self.accept_threshold)
        } else {
            None
        };

        let (voice, confidence, keywords, reasoning, strategy) = match morphology {
            Some(m) => (
                m.voice,
                m.confidence,
                signals.surface_terms(),
                m.reasoning,
                Strategy::Morphology,
            ),
            None => {
                let lex = classify_lexical(sentence, self.rules)?;
                (
                    lex.voice,
                    lex.confidence,
                    lex.matched_keywords,
                    lex.reasoning,
                    Strategy::Lexical,
                )
            }
        };

        if confidence < self.min_confidence {
            return None;
        }

        tracing::trace!(
            voice = %voice,
            confidence,
            strategy = %strategy,
            "Sentence classified"
        );

        Some(Insight::from_seed(InsightSeed {
            voice,
            confidence,
            sentence: sentence.to_string(),
            keywords,
            layers: extract_layers(sentence, self.rules),
            temperature: detect_temperature(sentence, self.rules),
            degree_factor: signals.degree_factor,
            certainty: signals.tail.certainty,
            reasoning,
            strategy,
            doc_id: doc_id.map(str::to_string),
            timestamp: timestamps.and_then(|index| index.lookup(sentence)),
            title_max_chars: self.title_max_chars,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamps::TimedSegment;
    use pretty_assertions::assert_eq;

    fn rules() -> RuleStore {
        RuleStore::builtin().expect("builtin lexicon compiles")
    }

    #[test]
    fn test_morphology_accepted() {
        let rules = rules();
        let insight = SentenceClassifier::new(&rules)
            .classify("自動化できたらとても助かる", None, None)
            .unwrap();
        assert_eq!(insight.voice(), VoiceCode::Vision);
        assert_eq!(insight.confidence(), 0.85);
        assert_eq!(insight.strategy(), Strategy::Morphology);
        assert_eq!(insight.degree_factor(), 1.5);
        assert_eq!(insight.intensity(), 1.5);
        assert!(insight.keywords().contains(&"できたら".to_string()));
    }

    #[test]
    fn test_lexical_fallback() {
        let rules = rules();
        let insight = SentenceClassifier::new(&rules)
            .classify("毎回Excelの入力作業でミスが多くて困っている", Some("doc-1"), None)
            .unwrap();
        assert_eq!(insight.voice(), VoiceCode::Pain);
        assert_eq!(insight.strategy(), Strategy::Lexical);
        assert_eq!(insight.temperature(), Temperature::High);
        assert_eq!(insight.doc_id(), Some("doc-1"));
        assert_eq!(insight.intensity(), -2.0);
    }

    #[test]
    fn test_morphology_disabled_uses_lexical() {
        let rules = rules();
        let mut classifier = SentenceClassifier::new(&rules);
        classifier.morphology_enabled = false;

        let insight = classifier
            .classify("自動化できたらとても助かる", None, None)
            .unwrap();
        assert_eq!(insight.strategy(), Strategy::Lexical);
        assert_eq!(insight.voice(), VoiceCode::Vision);
    }

    #[test]
    fn test_below_min_confidence_dropped() {
        let rules = rules();
        let mut classifier = SentenceClassifier::new(&rules);
        classifier.min_confidence = 0.9;
        assert!(
            classifier
                .classify("自動化できたらとても助かる", None, None)
                .is_none()
        );
    }

    #[test]
    fn test_nothing_matched() {
        let rules = rules();
        assert!(
            SentenceClassifier::new(&rules)
                .classify("会議の資料を作成した", None, None)
                .is_none()
        );
    }

    #[test]
    fn test_timestamp_attached() {
        let rules = rules();
        let index = TimestampIndex::build(&[TimedSegment::new(12.0, 4.0, "自動化できたら")], 30);
        let insight = SentenceClassifier::new(&rules)
            .classify("自動化できたらとても助かる", None, Some(&index))
            .unwrap();
        assert_eq!(insight.timestamp(), Some(12.0));
    }

    #[test]
    fn test_title_truncation() {
        assert_eq!(truncate_title(" 改行\nあり ", 50), "改行 あり");
        let long = "あ".repeat(60);
        let title = truncate_title(&long, 50);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
        assert_eq!(truncate_title(&"い".repeat(50), 50), "い".repeat(50));
    }

    #[test]
    fn test_confidence_clamped() {
        let insight = Insight::from_seed(InsightSeed::new(VoiceCode::Traction, 1.4, "テスト文"));
        assert_eq!(insight.confidence(), 1.0);
        assert_eq!(insight.base_score(), 2);
    }

    #[test]
    fn test_serialized_intensity_is_derived() {
        let mut seed = InsightSeed::new(VoiceCode::Pain, 0.9, "入力作業が本当に大変らしい");
        seed.degree_factor = 1.5;
        seed.certainty = 0.5;
        let value = serde_json::to_value(Insight::from_seed(seed)).unwrap();

        assert_eq!(value["intensity"], -1.5);
        assert_eq!(value["degree_factor"], 1.5);
        assert_eq!(value["certainty"], 0.5);
    }
}
