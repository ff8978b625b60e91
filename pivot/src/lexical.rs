//! Keyword/pattern classifier
//!
//! Fallback strategy when morphology does not reach its acceptance threshold.
//!
//! ```text
//! keyword_score = min(distinct_keywords * 0.2, 0.6)
//! pattern_score = 0.35 if any pattern matches, else 0.0
//! voice_score   = min(keyword_score + pattern_score, 0.95)
//! ```

use crate::lexicon::{RuleStore, VoiceRules};
use crate::voice::VoiceCode;

const KEYWORD_WEIGHT: f64 = 0.2;
const KEYWORD_CAP: f64 = 0.6;
const PATTERN_BONUS: f64 = 0.35;
const SCORE_CAP: f64 = 0.95;

/// Winning voice from the lexical classifier
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalMatch {
    pub voice: VoiceCode,
    pub confidence: f64,
    /// Distinct keywords of the winning voice, lexicon order
    pub matched_keywords: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug)]
struct VoiceScore {
    score: f64,
    keywords: Vec<String>,
    pattern_hit: bool,
}

fn score_voice(sentence: &str, rules: &VoiceRules) -> VoiceScore {
    let mut keywords: Vec<String> = Vec::new();
    for kw in &rules.keywords {
        if sentence.contains(kw.as_str()) && !keywords.contains(kw) {
            keywords.push(kw.clone());
        }
    }

    let keyword_score = (keywords.len() as f64 * KEYWORD_WEIGHT).min(KEYWORD_CAP);
    let pattern_hit = rules.patterns.iter().any(|re| re.is_match(sentence));
    let pattern_score = if pattern_hit { PATTERN_BONUS } else { 0.0 };

    VoiceScore {
        score: (keyword_score + pattern_score).min(SCORE_CAP),
        keywords,
        pattern_hit,
    }
}

/// Score every voice and return the first one (P, I, V, O, T order) holding
/// the strict maximum, or `None` when nothing scored.
pub fn classify_lexical(sentence: &str, rules: &RuleStore) -> Option<LexicalMatch> {
    let mut best: Option<(VoiceCode, VoiceScore)> = None;

    for voice_rules in rules.voices() {
        let scored = score_voice(sentence, voice_rules);
        if scored.score <= 0.0 {
            continue;
        }
        let better = best
            .as_ref()
            .is_none_or(|(_, current)| scored.score > current.score);
        if better {
            best = Some((voice_rules.voice, scored));
        }
    }

    best.map(|(voice, scored)| {
        let reasoning = format!(
            "lexical: {} keyword(s) [{}]{}",
            scored.keywords.len(),
            scored.keywords.join(", "),
            if scored.pattern_hit { " + pattern" } else { "" }
        );
        LexicalMatch {
            voice,
            confidence: scored.score,
            matched_keywords: scored.keywords,
            reasoning,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Lexicon, RuleStore};
    use pretty_assertions::assert_eq;

    fn rules() -> RuleStore {
        RuleStore::builtin().expect("builtin lexicon compiles")
    }

    #[test]
    fn test_keywords_score_point_two_each() {
        let m = classify_lexical("毎回Excelの入力作業でミスが多くて困っている", &rules()).unwrap();
        assert_eq!(m.voice, VoiceCode::Pain);
        assert!((m.confidence - 0.4).abs() < 1e-12);
        assert_eq!(m.matched_keywords, vec!["困っている", "ミス"]);
        assert!(m.reasoning.starts_with("lexical:"));
    }

    #[test]
    fn test_pattern_adds_bonus() {
        // 困っている + pattern "(.+?)で困っている"
        let m = classify_lexical("月末の集計で困っている", &rules()).unwrap();
        assert_eq!(m.voice, VoiceCode::Pain);
        assert!((m.confidence - 0.55).abs() < 1e-12);
        assert!(m.reasoning.ends_with("+ pattern"));
    }

    #[test]
    fn test_score_is_capped() {
        let m = classify_lexical(
            "問題と課題とトラブルとエラーとバグと不具合で困っている",
            &rules(),
        )
        .unwrap();
        assert_eq!(m.voice, VoiceCode::Pain);
        assert!((m.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_no_keywords_no_match() {
        assert_eq!(classify_lexical("会議の資料を作成した", &rules()), None);
    }

    #[test]
    fn test_tie_goes_to_earlier_voice() {
        let mut lexicon = Lexicon::builtin();
        for entry in &mut lexicon.voices {
            entry.patterns.clear();
            entry.keywords = match entry.voice {
                VoiceCode::Vision => vec!["合言葉".to_string()],
                VoiceCode::Objection => vec!["合言葉".to_string()],
                _ => vec!["使われない語".to_string()],
            };
        }
        let rules = RuleStore::compile(&lexicon).unwrap();

        let m = classify_lexical("合言葉が一致した", &rules).unwrap();
        assert_eq!(m.voice, VoiceCode::Vision);
    }

    #[test]
    fn test_duplicate_keywords_counted_once() {
        let mut lexicon = Lexicon::builtin();
        lexicon.voices[0].keywords = vec!["困る".to_string(), "困る".to_string()];
        lexicon.voices[0].patterns.clear();
        let rules = RuleStore::compile(&lexicon).unwrap();

        let m = classify_lexical("本当に困る話だ", &rules).unwrap();
        assert!((m.confidence - 0.2).abs() < 1e-12);
    }
}
