//! Lexicon tables and the compiled rule store
//!
//! A [`Lexicon`] is plain data: keyword lists, regex sources and lookup
//! tables, either the built-in Japanese tables or a TOML file supplied by the
//! caller. [`RuleStore::compile`] validates it and compiles every pattern
//! once, so a malformed lexicon fails when the engine is built rather than on
//! the first sentence that happens to reach the broken rule.
//!
//! Every table that carries a first-match priority is stored as an ordered
//! `Vec` in that priority order:
//! - voices: P, I, V, O, T
//! - verb categories: Obstacle, Difficulty, Loss, Desire, Rejection, Success
//! - tails: declared order (assertive first)
//! - layers: process, tool, people
//! - temperature: high, medium, low

pub mod builtin;

use crate::errors::{PivotError, Result};
use crate::morphology::{AdjectiveSentiment, VerbCategory};
use crate::ranking::DomainWeights;
use crate::temperature::Temperature;
use crate::voice::{Layer, VoiceCode};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// Raw tables
// ─────────────────────────────────────────────────────────────────────────────

/// Uncompiled lexicon tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    pub voices: Vec<VoiceEntry>,
    pub verbs: Vec<VerbEntry>,
    #[serde(default)]
    pub adjectives: Vec<AdjectiveEntry>,
    #[serde(default)]
    pub adverbs: Vec<AdverbEntry>,
    #[serde(default)]
    pub tails: Vec<TailEntry>,
    pub layers: Vec<LayerEntry>,
    pub temperature: Vec<TemperatureEntry>,
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
}

/// Keywords and patterns for one voice (lexical classifier)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceEntry {
    pub voice: VoiceCode,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Verb phrases belonging to one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerbEntry {
    pub category: VerbCategory,
    pub phrases: Vec<String>,
}

/// Adjectives sharing one sentiment bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjectiveEntry {
    pub sentiment: AdjectiveSentiment,
    pub words: Vec<String>,
}

/// Degree adverb and its multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdverbEntry {
    pub phrase: String,
    pub factor: f64,
}

/// Sentence-ending pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailEntry {
    pub name: String,
    pub pattern: String,
    pub certainty: f64,
    #[serde(default)]
    pub tendency: Option<VoiceCode>,
}

/// Keywords and capture patterns for one subject layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEntry {
    pub layer: Layer,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Indicator words for one temperature bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureEntry {
    pub level: Temperature,
    pub indicators: Vec<String>,
}

/// Named voice-weight table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntry {
    pub name: String,
    #[serde(default)]
    pub weights: DomainWeights,
}

impl Lexicon {
    /// Built-in Japanese tables
    pub fn builtin() -> Self {
        builtin::lexicon()
    }

    /// Parse a lexicon from TOML
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| PivotError::lexicon_with_source("failed to parse lexicon", e))
    }

    /// Load a lexicon TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PivotError::lexicon_with_source(
                format!("failed to read lexicon at {}", path.display()),
                e,
            )
        })?;
        Self::parse(&contents)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled rule store
// ─────────────────────────────────────────────────────────────────────────────

/// Compiled keyword/pattern rules for one voice
#[derive(Debug)]
pub struct VoiceRules {
    pub voice: VoiceCode,
    pub keywords: Vec<String>,
    pub patterns: Vec<Regex>,
}

/// Compiled sentence-tail rule
#[derive(Debug)]
pub struct TailRule {
    pub name: String,
    pub pattern: Regex,
    pub certainty: f64,
    pub tendency: Option<VoiceCode>,
}

/// Compiled subject-layer rules
#[derive(Debug)]
pub struct LayerRules {
    pub layer: Layer,
    pub keywords: Vec<String>,
    pub patterns: Vec<Regex>,
}

/// Immutable, validated rule set shared by every classification call
#[derive(Debug)]
pub struct RuleStore {
    voices: Vec<VoiceRules>,
    verbs: Vec<(VerbCategory, Vec<String>)>,
    adjectives: Vec<(String, AdjectiveSentiment)>,
    adverbs: Vec<(String, f64)>,
    tails: Vec<TailRule>,
    layers: Vec<LayerRules>,
    temperature: Vec<(Temperature, Vec<String>)>,
    domains: Vec<(String, DomainWeights)>,
}

impl RuleStore {
    /// Compile the built-in lexicon
    pub fn builtin() -> Result<Self> {
        Self::compile(&Lexicon::builtin())
    }

    /// Validate and compile a lexicon
    pub fn compile(lexicon: &Lexicon) -> Result<Self> {
        let mut voices = Vec::with_capacity(VoiceCode::ALL.len());
        for voice in VoiceCode::ALL {
            let entry = single(&lexicon.voices, |e| e.voice == voice, "voice", voice.code())?;
            voices.push(VoiceRules {
                voice,
                keywords: entry.keywords.clone(),
                patterns: compile_all(&entry.patterns, voice.label())?,
            });
        }

        let mut verbs = Vec::with_capacity(VerbCategory::ALL.len());
        for category in VerbCategory::ALL {
            let entry = single(
                &lexicon.verbs,
                |e| e.category == category,
                "verb category",
                category.as_str(),
            )?;
            verbs.push((category, entry.phrases.clone()));
        }

        let adjectives = lexicon
            .adjectives
            .iter()
            .flat_map(|e| e.words.iter().map(|w| (w.clone(), e.sentiment)))
            .collect();

        let mut adverbs = Vec::with_capacity(lexicon.adverbs.len());
        for entry in &lexicon.adverbs {
            if !entry.factor.is_finite() || entry.factor <= 0.0 {
                return Err(PivotError::lexicon(format!(
                    "degree factor for `{}` must be positive, got {}",
                    entry.phrase, entry.factor
                )));
            }
            adverbs.push((entry.phrase.clone(), entry.factor));
        }

        let mut tails = Vec::with_capacity(lexicon.tails.len());
        for entry in &lexicon.tails {
            if !(entry.certainty > 0.0 && entry.certainty <= 1.0) {
                return Err(PivotError::lexicon(format!(
                    "tail `{}` certainty must be in (0, 1], got {}",
                    entry.name, entry.certainty
                )));
            }
            tails.push(TailRule {
                name: entry.name.clone(),
                pattern: compile_one(&entry.pattern, &entry.name)?,
                certainty: entry.certainty,
                tendency: entry.tendency,
            });
        }

        let mut layers = Vec::with_capacity(Layer::ALL.len());
        for layer in Layer::ALL {
            let entry = single(&lexicon.layers, |e| e.layer == layer, "layer", layer.as_str())?;
            layers.push(LayerRules {
                layer,
                keywords: entry.keywords.clone(),
                patterns: compile_all(&entry.patterns, layer.as_str())?,
            });
        }

        let mut temperature = Vec::with_capacity(Temperature::PRIORITY.len());
        for level in Temperature::PRIORITY {
            let entry = single(
                &lexicon.temperature,
                |e| e.level == level,
                "temperature bucket",
                level.as_str(),
            )?;
            temperature.push((level, entry.indicators.clone()));
        }

        let mut domains: Vec<(String, DomainWeights)> = Vec::with_capacity(lexicon.domains.len());
        for entry in &lexicon.domains {
            if domains.iter().any(|(name, _)| name == &entry.name) {
                return Err(PivotError::lexicon(format!(
                    "duplicate domain table `{}`",
                    entry.name
                )));
            }
            entry.weights.validate(&entry.name)?;
            domains.push((entry.name.clone(), entry.weights.clone()));
        }

        Ok(Self {
            voices,
            verbs,
            adjectives,
            adverbs,
            tails,
            layers,
            temperature,
            domains,
        })
    }

    /// Voice rules in P, I, V, O, T order
    pub fn voices(&self) -> &[VoiceRules] {
        &self.voices
    }

    /// Verb phrase tables in canonical category order
    pub fn verbs(&self) -> &[(VerbCategory, Vec<String>)] {
        &self.verbs
    }

    pub fn adjectives(&self) -> &[(String, AdjectiveSentiment)] {
        &self.adjectives
    }

    pub fn adverbs(&self) -> &[(String, f64)] {
        &self.adverbs
    }

    /// Tail rules in priority order
    pub fn tails(&self) -> &[TailRule] {
        &self.tails
    }

    /// Layer rules in process, tool, people order
    pub fn layers(&self) -> &[LayerRules] {
        &self.layers
    }

    /// Temperature indicators in high, medium, low order
    pub fn temperature_buckets(&self) -> &[(Temperature, Vec<String>)] {
        &self.temperature
    }

    /// Whether a named domain table exists
    pub fn has_domain(&self, name: &str) -> bool {
        self.domains.iter().any(|(n, _)| n == name)
    }

    /// Weights for a domain; all 1.0 when absent or unknown
    pub fn domain_weights(&self, name: Option<&str>) -> DomainWeights {
        name.and_then(|name| {
            self.domains
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, w)| w.clone())
        })
        .unwrap_or_default()
    }
}

/// Exactly one entry matching `pred`, else a lexicon error
fn single<'a, T>(
    entries: &'a [T],
    pred: impl Fn(&T) -> bool,
    kind: &str,
    name: &str,
) -> Result<&'a T> {
    let mut matching = entries.iter().filter(|e| pred(*e));
    let first = matching
        .next()
        .ok_or_else(|| PivotError::lexicon(format!("missing {kind} table `{name}`")))?;
    if matching.next().is_some() {
        return Err(PivotError::lexicon(format!("duplicate {kind} table `{name}`")));
    }
    Ok(first)
}

fn compile_one(pattern: &str, owner: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        PivotError::lexicon_with_source(format!("invalid pattern `{pattern}` in `{owner}`"), e)
    })
}

fn compile_all(patterns: &[String], owner: &str) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| compile_one(p, owner)).collect()
}
