//! Subject-layer extraction (process / tool / people)

use crate::lexicon::{LayerRules, RuleStore};
use crate::voice::Layer;
use serde::{Deserialize, Serialize};

/// Phrase bound for each layer, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerBinding {
    pub process: Option<String>,
    pub tool: Option<String>,
    pub people: Option<String>,
}

impl LayerBinding {
    pub fn get(&self, layer: Layer) -> Option<&str> {
        match layer {
            Layer::Process => self.process.as_deref(),
            Layer::Tool => self.tool.as_deref(),
            Layer::People => self.people.as_deref(),
        }
    }

    fn set(&mut self, layer: Layer, value: Option<String>) {
        match layer {
            Layer::Process => self.process = value,
            Layer::Tool => self.tool = value,
            Layer::People => self.people = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Layer::ALL.iter().all(|l| self.get(*l).is_none())
    }
}

/// Bind each layer independently.
///
/// Stage one picks the first keyword of the layer found in the sentence.
/// Stage two tries the layer's patterns in order and binds the first
/// capture group; when none match the keyword itself is bound.
pub fn extract_layers(sentence: &str, rules: &RuleStore) -> LayerBinding {
    let mut binding = LayerBinding::default();
    for layer_rules in rules.layers() {
        binding.set(layer_rules.layer, bind_layer(sentence, layer_rules));
    }
    binding
}

fn bind_layer(sentence: &str, rules: &LayerRules) -> Option<String> {
    let keyword = rules
        .keywords
        .iter()
        .find(|kw| sentence.contains(kw.as_str()))?;

    rules
        .patterns
        .iter()
        .find_map(|re| {
            re.captures(sentence)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .or_else(|| Some(keyword.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use pretty_assertions::assert_eq;

    fn rules() -> RuleStore {
        RuleStore::builtin().expect("builtin lexicon compiles")
    }

    #[test]
    fn test_process_and_tool_bound() {
        let b = extract_layers("毎回Excelの入力作業でミスが多くて困っている", &rules());
        assert_eq!(b.process.as_deref(), Some("入力作業"));
        assert_eq!(b.tool.as_deref(), Some("Excel"));
        assert_eq!(b.people, None);
    }

    #[test]
    fn test_people_bound() {
        let b = extract_layers("来年は担当者が変わるかもしれない", &rules());
        assert_eq!(b.people.as_deref(), Some("担当者"));
        assert_eq!(b.process, None);
        assert_eq!(b.tool, None);
    }

    #[test]
    fn test_katakana_tool_compound() {
        let b = extract_layers("勤怠システムが毎朝止まる", &rules());
        assert_eq!(b.tool.as_deref(), Some("勤怠システム"));
    }

    #[test]
    fn test_nothing_bound() {
        let b = extract_layers("来月には落ち着くと思う", &rules());
        assert!(b.is_empty());
    }

    #[test]
    fn test_keyword_fallback_when_no_pattern_matches() {
        let mut lexicon = Lexicon::builtin();
        for entry in &mut lexicon.layers {
            entry.patterns.clear();
        }
        let rules = RuleStore::compile(&lexicon).unwrap();

        let b = extract_layers("上司の承認が遅い", &rules);
        assert_eq!(b.people.as_deref(), Some("上司"));
        assert_eq!(b.process.as_deref(), Some("承認"));
    }
}
