//! Morphology heuristics
//!
//! Not a part-of-speech tagger: every signal is a literal substring or
//! sentence-ending regex from the rule store. Four independent signals are
//! extracted per sentence:
//!
//! ```text
//! verbs      categories whose phrases occur in the sentence
//! sentiment  clamp((pos - neg - anx) / matched, -1, 1), 0 when nothing matched
//! degree     max amplifier (> 1.0), else strongest attenuator (< 1.0), else 1.0
//! tail       first matching sentence-ending rule -> (certainty, tendency)
//! ```
//!
//! [`infer_voice`] then applies a fixed, ordered rule list to the signals.

use crate::lexicon::RuleStore;
use crate::voice::VoiceCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum tail certainty for the obstacle/difficulty Pain rule
const PAIN_CERTAINTY_FLOOR: f64 = 0.9;
/// Maximum tail certainty for the speculative Insecurity rule
const INSECURITY_CERTAINTY_CEILING: f64 = 0.6;
/// Adjective sentiment magnitude needed when no verb or tail rule fires
const SENTIMENT_ONLY_THRESHOLD: f64 = 0.5;

/// Verb category, declared in canonical inference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbCategory {
    Obstacle,
    Difficulty,
    Loss,
    Desire,
    Rejection,
    Success,
}

impl VerbCategory {
    pub const ALL: [VerbCategory; 6] = [
        Self::Obstacle,
        Self::Difficulty,
        Self::Loss,
        Self::Desire,
        Self::Rejection,
        Self::Success,
    ];

    /// Voice this category points at
    pub fn voice(&self) -> VoiceCode {
        match self {
            Self::Obstacle | Self::Difficulty => VoiceCode::Pain,
            Self::Loss => VoiceCode::Insecurity,
            Self::Desire => VoiceCode::Vision,
            Self::Rejection => VoiceCode::Objection,
            Self::Success => VoiceCode::Traction,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::Difficulty => "difficulty",
            Self::Loss => "loss",
            Self::Desire => "desire",
            Self::Rejection => "rejection",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for VerbCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjectiveSentiment {
    Positive,
    Negative,
    Anxiety,
}

/// Certainty and voice tendency carried by the sentence ending
#[derive(Debug, Clone, PartialEq)]
pub struct TailSignal {
    /// Name of the matching tail rule, `None` when no rule matched
    pub rule: Option<String>,
    pub certainty: f64,
    pub tendency: Option<VoiceCode>,
}

impl Default for TailSignal {
    fn default() -> Self {
        Self {
            rule: None,
            certainty: 1.0,
            tendency: None,
        }
    }
}

/// Everything the morphology pass observed in one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct MorphologySignals {
    /// Matched categories with their first matching phrase, canonical order
    pub verbs: Vec<(VerbCategory, String)>,
    /// Matched adjectives, lexicon order
    pub adjectives: Vec<(String, AdjectiveSentiment)>,
    pub sentiment: f64,
    pub degree_factor: f64,
    pub tail: TailSignal,
}

impl MorphologySignals {
    pub fn has_verb(&self, category: VerbCategory) -> bool {
        self.verbs.iter().any(|(c, _)| *c == category)
    }

    fn verb_phrase(&self, categories: &[VerbCategory]) -> Option<&str> {
        self.verbs
            .iter()
            .find(|(c, _)| categories.contains(c))
            .map(|(_, phrase)| phrase.as_str())
    }

    /// Matched verb phrases followed by matched adjectives
    pub fn surface_terms(&self) -> Vec<String> {
        self.verbs
            .iter()
            .map(|(_, phrase)| phrase.clone())
            .chain(self.adjectives.iter().map(|(word, _)| word.clone()))
            .collect()
    }
}

/// Voice inferred from morphology signals
#[derive(Debug, Clone, PartialEq)]
pub struct MorphologyInference {
    pub voice: VoiceCode,
    pub confidence: f64,
    pub reasoning: String,
}

impl MorphologyInference {
    fn new(voice: VoiceCode, confidence: f64, reasoning: String) -> Self {
        Self {
            voice,
            confidence,
            reasoning,
        }
    }
}

/// Extract verb, adjective, adverb and tail signals from a sentence
pub fn extract_signals(sentence: &str, rules: &RuleStore) -> MorphologySignals {
    let verbs = rules
        .verbs()
        .iter()
        .filter_map(|(category, phrases)| {
            phrases
                .iter()
                .find(|p| sentence.contains(p.as_str()))
                .map(|p| (*category, p.clone()))
        })
        .collect();

    let adjectives: Vec<(String, AdjectiveSentiment)> = rules
        .adjectives()
        .iter()
        .filter(|(word, _)| sentence.contains(word.as_str()))
        .cloned()
        .collect();

    MorphologySignals {
        verbs,
        sentiment: adjective_sentiment(&adjectives),
        adjectives,
        degree_factor: degree_factor(sentence, rules),
        tail: tail_signal(sentence, rules),
    }
}

fn adjective_sentiment(adjectives: &[(String, AdjectiveSentiment)]) -> f64 {
    if adjectives.is_empty() {
        return 0.0;
    }

    let mut pos = 0.0;
    let mut neg = 0.0;
    let mut anx = 0.0;
    for (_, sentiment) in adjectives {
        match sentiment {
            AdjectiveSentiment::Positive => pos += 1.0,
            AdjectiveSentiment::Negative => neg += 1.0,
            AdjectiveSentiment::Anxiety => anx += 1.0,
        }
    }

    let total = adjectives.len() as f64;
    ((pos - neg - anx) / total).clamp(-1.0, 1.0)
}

/// Amplifiers take priority over attenuators when both are present.
fn degree_factor(sentence: &str, rules: &RuleStore) -> f64 {
    let matched: Vec<f64> = rules
        .adverbs()
        .iter()
        .filter(|(phrase, _)| sentence.contains(phrase.as_str()))
        .map(|(_, factor)| *factor)
        .collect();

    let amplifier = matched.iter().copied().filter(|f| *f > 1.0).reduce(f64::max);
    let attenuator = matched.iter().copied().filter(|f| *f < 1.0).reduce(f64::min);

    amplifier.or(attenuator).unwrap_or(1.0)
}

fn tail_signal(sentence: &str, rules: &RuleStore) -> TailSignal {
    let trimmed = sentence.trim_end();
    rules
        .tails()
        .iter()
        .find(|rule| rule.pattern.is_match(trimmed))
        .map(|rule| TailSignal {
            rule: Some(rule.name.clone()),
            certainty: rule.certainty,
            tendency: rule.tendency,
        })
        .unwrap_or_default()
}

/// Apply the ordered inference rules; the first rule that fires wins.
pub fn infer_voice(signals: &MorphologySignals) -> Option<MorphologyInference> {
    use VerbCategory::*;

    let sentiment = signals.sentiment;
    let tail = &signals.tail;

    if let Some(phrase) = signals.verb_phrase(&[Obstacle, Difficulty])
        && sentiment < 0.0
        && tail.certainty >= PAIN_CERTAINTY_FLOOR
    {
        return Some(MorphologyInference::new(
            VoiceCode::Pain,
            0.9,
            format!(
                "obstacle/difficulty verb `{phrase}` with negative adjectives \
                 (sentiment {sentiment:.2}, certainty {:.2})",
                tail.certainty
            ),
        ));
    }

    for (category, voice) in [
        (Loss, VoiceCode::Insecurity),
        (Desire, VoiceCode::Vision),
        (Rejection, VoiceCode::Objection),
    ] {
        if let Some(phrase) = signals.verb_phrase(&[category]) {
            return Some(MorphologyInference::new(
                voice,
                0.85,
                format!("{category} verb `{phrase}`"),
            ));
        }
    }

    if let Some(phrase) = signals.verb_phrase(&[Success]) {
        return Some(if sentiment > 0.0 {
            MorphologyInference::new(
                VoiceCode::Traction,
                0.9,
                format!("success verb `{phrase}` with positive adjectives (sentiment {sentiment:.2})"),
            )
        } else {
            MorphologyInference::new(
                VoiceCode::Traction,
                0.7,
                format!("success verb `{phrase}`"),
            )
        });
    }

    let tail_name = tail.rule.as_deref().unwrap_or("none");
    match tail.tendency {
        Some(VoiceCode::Insecurity) if tail.certainty <= INSECURITY_CERTAINTY_CEILING => {
            return Some(MorphologyInference::new(
                VoiceCode::Insecurity,
                0.75,
                format!("{tail_name} tail (certainty {:.2})", tail.certainty),
            ));
        }
        Some(VoiceCode::Vision) => {
            return Some(MorphologyInference::new(
                VoiceCode::Vision,
                0.8,
                format!("{tail_name} tail"),
            ));
        }
        Some(VoiceCode::Objection) => {
            return Some(MorphologyInference::new(
                VoiceCode::Objection,
                0.8,
                format!("{tail_name} tail"),
            ));
        }
        _ => {}
    }

    if sentiment < -SENTIMENT_ONLY_THRESHOLD {
        return Some(MorphologyInference::new(
            VoiceCode::Pain,
            0.6,
            format!("negative adjectives only (sentiment {sentiment:.2})"),
        ));
    }
    if sentiment > SENTIMENT_ONLY_THRESHOLD {
        return Some(MorphologyInference::new(
            VoiceCode::Traction,
            0.6,
            format!("positive adjectives only (sentiment {sentiment:.2})"),
        ));
    }

    None
}
