//! PIVOT insight engine
//!
//! Classifies sentences of spoken-transcript text into five voices
//! (Pain, Insecurity, Vision, Objection, Traction) and aggregates them per
//! document:
//!
//! - Splits transcripts into sentences
//! - Classifies each sentence with morphology heuristics, falling back to
//!   keyword/pattern scoring
//! - Binds process / tool / people layers, temperature and timestamps
//! - Re-ranks insights by domain weight and renders mart records
//!
//! The engine is pure computation. Transcript acquisition and persistence
//! belong to the caller.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod document;
pub mod errors;
pub mod export;
pub mod layers;
pub mod lexical;
pub mod lexicon;
pub mod morphology;
pub mod ranking;
pub mod segmenter;
pub mod temperature;
pub mod timestamps;
pub mod voice;

pub use aggregate::{AnalysisResult, CorpusSummary, DocumentAnalysis, LayerTally, PainRanking};
pub use classifier::{Insight, InsightSeed, SentenceClassifier, Strategy};
pub use config::{AnalysisOptions, PivotConfig};
pub use document::TranscriptDocument;
pub use errors::{ErrorCategory, PivotError, Result};
pub use export::{
    CorpusReport, DocumentRecord, MartItem, mart_items_to_jsonl, render_json_report,
    render_mart_jsonl,
};
pub use layers::LayerBinding;
pub use lexicon::{Lexicon, RuleStore};
pub use ranking::DomainWeights;
pub use temperature::Temperature;
pub use timestamps::{TimedSegment, TimestampIndex};
pub use voice::{Layer, VoiceCode};

use chrono::Utc;
use segmenter::split_sentences;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main entry point: configuration plus the compiled rule store
#[derive(Debug)]
pub struct PivotEngine {
    cfg: PivotConfig,
    rules: RuleStore,
}

impl PivotEngine {
    /// Load config from the default location and build the engine
    pub fn new() -> Result<Self> {
        Self::with_config(PivotConfig::load()?)
    }

    /// Build an engine from explicit configuration.
    ///
    /// Fails on invalid configuration or an invalid lexicon.
    pub fn with_config(cfg: PivotConfig) -> Result<Self> {
        cfg.validate()?;

        let (lexicon, source) = match cfg.resolved_lexicon_path() {
            Some(path) => {
                let lexicon = Lexicon::load_from_path(&path)?;
                (lexicon, path.display().to_string())
            }
            None => (Lexicon::builtin(), "builtin".to_string()),
        };
        let rules = RuleStore::compile(&lexicon)?;

        Self::from_parts(cfg, rules, &source)
    }

    /// Build an engine around an already-compiled rule store
    pub fn with_rules(cfg: PivotConfig, rules: RuleStore) -> Result<Self> {
        cfg.validate()?;
        Self::from_parts(cfg, rules, "custom")
    }

    fn from_parts(cfg: PivotConfig, rules: RuleStore, source: &str) -> Result<Self> {
        if let Some(domain) = cfg.domain.as_deref()
            && !rules.has_domain(domain)
        {
            tracing::warn!(domain, "Unknown domain in config, using unit weights");
        }

        tracing::info!(
            version = VERSION,
            lexicon = source,
            domain = cfg.domain.as_deref().unwrap_or("none"),
            morphology = cfg.morphology_enabled,
            "PIVOT engine initialized"
        );

        Ok(Self { cfg, rules })
    }

    pub fn config(&self) -> &PivotConfig {
        &self.cfg
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Options derived from the engine configuration
    pub fn default_options(&self) -> AnalysisOptions {
        AnalysisOptions::from(&self.cfg)
    }

    fn classifier(&self, opts: &AnalysisOptions) -> SentenceClassifier<'_> {
        let mut classifier = SentenceClassifier::new(&self.rules);
        classifier.min_confidence = opts.min_confidence;
        classifier.morphology_enabled = opts.morphology_enabled;
        classifier.accept_threshold = self.cfg.morphology_accept_threshold;
        classifier.title_max_chars = self.cfg.title_max_chars;
        classifier
    }

    /// Classify a single sentence with the configured defaults.
    ///
    /// The sentence is trimmed and held to `min_sentence_chars` like any
    /// segmented sentence.
    pub fn classify_sentence(&self, sentence: &str) -> Option<Insight> {
        let sentence = sentence.trim();
        if sentence.chars().count() < self.cfg.min_sentence_chars {
            return None;
        }
        self.classifier(&self.default_options())
            .classify(sentence, None, None)
    }

    /// Analyze plain text with the configured defaults
    pub fn analyze_text(&self, text: &str) -> AnalysisResult {
        self.analyze_parts(text, &[], None, &self.default_options())
    }

    /// Analyze one transcript document with the configured defaults
    pub fn analyze_document(&self, doc: &TranscriptDocument) -> DocumentAnalysis {
        self.analyze_with(doc, &self.default_options())
    }

    /// Analyze one transcript document with explicit options
    pub fn analyze_with(
        &self,
        doc: &TranscriptDocument,
        opts: &AnalysisOptions,
    ) -> DocumentAnalysis {
        let result = self.analyze_parts(
            &doc.full_text,
            &doc.segments,
            Some(doc.doc_id.as_str()),
            opts,
        );

        tracing::debug!(
            doc_id = %doc.doc_id,
            insights = result.len(),
            total_score = result.total_score(),
            "Document analyzed"
        );

        DocumentAnalysis {
            doc_id: doc.doc_id.clone(),
            title: doc.title.clone(),
            channel: doc.channel.clone(),
            doc_type: doc.doc_type.clone(),
            analyzed_at: Utc::now(),
            result,
        }
    }

    /// Analyze documents in order; a document never affects another
    pub fn analyze_documents(&self, docs: &[TranscriptDocument]) -> Vec<DocumentAnalysis> {
        docs.iter().map(|doc| self.analyze_document(doc)).collect()
    }

    fn analyze_parts(
        &self,
        text: &str,
        segments: &[TimedSegment],
        doc_id: Option<&str>,
        opts: &AnalysisOptions,
    ) -> AnalysisResult {
        let sentences = split_sentences(text, opts.split_by_sentence, self.cfg.min_sentence_chars);
        let index = (!segments.is_empty())
            .then(|| TimestampIndex::build(segments, self.cfg.timestamp_key_chars));
        let classifier = self.classifier(opts);

        let items: Vec<Insight> = sentences
            .iter()
            .filter_map(|s| classifier.classify(s, doc_id, index.as_ref()))
            .collect();

        tracing::debug!(
            sentences = sentences.len(),
            insights = items.len(),
            "Sentences classified"
        );

        let domain = opts.domain.as_deref();
        if let Some(domain) = domain
            && !self.rules.has_domain(domain)
        {
            tracing::warn!(domain, "Unknown domain, using unit weights");
        }

        AnalysisResult::build(items, &self.rules.domain_weights(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PivotEngine>();
        assert_send_sync::<RuleStore>();
    }

    #[test]
    fn test_with_default_config() {
        let engine = PivotEngine::with_config(PivotConfig::default()).unwrap();
        assert_eq!(engine.config().min_sentence_chars, 10);
        assert!(engine.rules().has_domain("biz_analysis"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = PivotConfig {
            min_confidence: 2.0,
            ..PivotConfig::default()
        };
        let err = PivotEngine::with_config(cfg).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ConfigError);
    }

    #[test]
    fn test_missing_lexicon_file_rejected() {
        let cfg = PivotConfig {
            lexicon_path: Some("/nonexistent/pivot/lexicon.toml".to_string()),
            ..PivotConfig::default()
        };
        let err = PivotEngine::with_config(cfg).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::LexiconError);
    }

    #[test]
    fn test_analyze_text() {
        let engine = PivotEngine::with_config(PivotConfig::default()).unwrap();
        let result = engine.analyze_text(
            "毎回Excelの入力作業でミスが多くて困っている。自動化できたらとても助かる。",
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.count(VoiceCode::Pain), 1);
        assert_eq!(result.count(VoiceCode::Vision), 1);
        assert_eq!(result.total_score(), -1);
    }

    #[test]
    fn test_classify_sentence_applies_length_floor() {
        let engine = PivotEngine::with_config(PivotConfig::default()).unwrap();
        assert!(engine.classify_sentence("不安です").is_none());
        assert!(engine.classify_sentence("  困っている  ").is_none());
        assert!(
            engine
                .classify_sentence("来年は担当者が変わるかもしれない")
                .is_some()
        );
    }

    #[test]
    fn test_absent_and_unknown_domain_rank_alike() {
        let engine = PivotEngine::with_config(PivotConfig::default()).unwrap();
        let doc = TranscriptDocument::new(
            "d",
            "自動化できたらとても助かる。毎回Excelの入力作業でミスが多くて困っている。",
        );
        let voices = |opts: &AnalysisOptions| -> Vec<VoiceCode> {
            engine
                .analyze_with(&doc, opts)
                .result
                .items()
                .iter()
                .map(Insight::voice)
                .collect()
        };

        let absent = voices(&AnalysisOptions::default());
        let unknown = voices(&AnalysisOptions::default().with_domain("no_such_domain"));
        // |-2 x 1.0 x 1.0| outranks |1 x 1.5 x 1.0|
        assert_eq!(absent, vec![VoiceCode::Pain, VoiceCode::Vision]);
        assert_eq!(absent, unknown);
    }

    #[test]
    fn test_unknown_domain_keeps_sentence_order_on_ties() {
        let engine = PivotEngine::with_config(PivotConfig::default()).unwrap();
        let doc = TranscriptDocument::new("d", "自動化できたらとても助かる。自動化できたらとても助かる。");
        let opts = engine.default_options().with_domain("no_such_domain");
        let analysis = engine.analyze_with(&doc, &opts);
        assert_eq!(analysis.result.len(), 2);
    }
}
