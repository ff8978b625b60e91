//! Per-document and corpus aggregation

use crate::classifier::Insight;
use crate::ranking::{DomainWeights, rank_by_domain};
use crate::voice::{Layer, VoiceCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Documents listed in the corpus summary's Pain ranking
const TOP_PAIN_DOCUMENTS: usize = 5;
/// Title width in the summary text
const SUMMARY_TITLE_CHARS: usize = 40;
const SUMMARY_BAR_MAX: usize = 20;

/// Distinct layer values and how often they were bound
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerTally {
    pub process: BTreeMap<String, usize>,
    pub tool: BTreeMap<String, usize>,
}

/// Insights of one document plus their aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    items: Vec<Insight>,
    by_voice: BTreeMap<VoiceCode, Vec<Insight>>,
    by_layer: LayerTally,
    total_score: i32,
    sentiment_index: f64,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::build(Vec::new(), &DomainWeights::default())
    }
}

impl AnalysisResult {
    /// Aggregate insights given in sentence order.
    ///
    /// Groupings keep sentence order; `items` is stably re-ranked by
    /// `weights`, so unit weights order by |intensity| alone.
    pub fn build(mut items: Vec<Insight>, weights: &DomainWeights) -> Self {
        let mut by_voice: BTreeMap<VoiceCode, Vec<Insight>> =
            VoiceCode::ALL.iter().map(|v| (*v, Vec::new())).collect();
        let mut by_layer = LayerTally::default();

        for insight in &items {
            by_voice.entry(insight.voice()).or_default().push(insight.clone());
            if let Some(process) = insight.layers().get(Layer::Process) {
                *by_layer.process.entry(process.to_string()).or_default() += 1;
            }
            if let Some(tool) = insight.layers().get(Layer::Tool) {
                *by_layer.tool.entry(tool.to_string()).or_default() += 1;
            }
        }

        let total_score: i32 = items.iter().map(Insight::base_score).sum();
        let sentiment_index = if items.is_empty() {
            0.0
        } else {
            f64::from(total_score) / items.len() as f64
        };

        rank_by_domain(&mut items, weights);

        Self {
            items,
            by_voice,
            by_layer,
            total_score,
            sentiment_index,
        }
    }

    pub fn items(&self) -> &[Insight] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insights of one voice in sentence order
    pub fn voice_items(&self, voice: VoiceCode) -> &[Insight] {
        self.by_voice.get(&voice).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, voice: VoiceCode) -> usize {
        self.voice_items(voice).len()
    }

    /// Counts for every voice, all five keys present
    pub fn counts(&self) -> BTreeMap<VoiceCode, usize> {
        VoiceCode::ALL.iter().map(|v| (*v, self.count(*v))).collect()
    }

    pub fn by_layer(&self) -> &LayerTally {
        &self.by_layer
    }

    pub fn total_score(&self) -> i32 {
        self.total_score
    }

    /// `total_score / count`, exactly 0.0 when there are no insights
    pub fn sentiment_index(&self) -> f64 {
        self.sentiment_index
    }
}

/// Analysis of one transcript document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAnalysis {
    pub doc_id: String,
    pub title: String,
    pub channel: String,
    pub doc_type: String,
    pub analyzed_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

impl DocumentAnalysis {
    pub fn count(&self, voice: VoiceCode) -> usize {
        self.result.count(voice)
    }

    pub fn pain_count(&self) -> usize {
        self.count(VoiceCode::Pain)
    }

    pub fn total_score(&self) -> i32 {
        self.result.total_score()
    }

    pub fn sentiment_index(&self) -> f64 {
        self.result.sentiment_index()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Corpus summary
// ─────────────────────────────────────────────────────────────────────────────

/// Document entry in the Pain ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainRanking {
    pub doc_id: String,
    pub title: String,
    pub pain_count: usize,
}

/// Totals across a batch of analyzed documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub documents: usize,
    pub total_insights: usize,
    pub total_score: i32,
    pub by_voice: BTreeMap<VoiceCode, usize>,
    /// Up to five documents, most Pain first; ties keep input order
    pub top_pain: Vec<PainRanking>,
}

impl CorpusSummary {
    pub fn from_documents(documents: &[DocumentAnalysis]) -> Self {
        let mut by_voice: BTreeMap<VoiceCode, usize> =
            VoiceCode::ALL.iter().map(|v| (*v, 0)).collect();
        for doc in documents {
            for voice in VoiceCode::ALL {
                *by_voice.entry(voice).or_default() += doc.count(voice);
            }
        }

        let mut ranked: Vec<&DocumentAnalysis> = documents.iter().collect();
        ranked.sort_by(|a, b| b.pain_count().cmp(&a.pain_count()));
        let top_pain = ranked
            .into_iter()
            .take(TOP_PAIN_DOCUMENTS)
            .map(|doc| PainRanking {
                doc_id: doc.doc_id.clone(),
                title: doc.title.clone(),
                pain_count: doc.pain_count(),
            })
            .collect();

        Self {
            documents: documents.len(),
            total_insights: documents.iter().map(|d| d.result.len()).sum(),
            total_score: documents.iter().map(DocumentAnalysis::total_score).sum(),
            by_voice,
            top_pain,
        }
    }

    /// Human-readable report
    pub fn summary_text(&self) -> String {
        let rule = "=".repeat(60);
        let thin = "-".repeat(40);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "PIVOT分析サマリー");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "分析ドキュメント数: {}", self.documents);
        let _ = writeln!(out, "総インサイト数: {}", self.total_insights);
        let _ = writeln!(out, "総合スコア: {}", self.total_score);

        let _ = writeln!(out);
        let _ = writeln!(out, "PIVOT分布:");
        let _ = writeln!(out, "{thin}");
        for voice in VoiceCode::ALL {
            let count = self.by_voice.get(&voice).copied().unwrap_or(0);
            let label = format!("{} ({})", voice.label(), voice.description());
            let bar = "█".repeat(count.min(SUMMARY_BAR_MAX));
            let _ = writeln!(out, "  {voice} {label:<20} {count:>3}件 {bar}");
        }

        if !self.top_pain.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "課題が多いドキュメント (Top {TOP_PAIN_DOCUMENTS}):");
            let _ = writeln!(out, "{thin}");
            for entry in &self.top_pain {
                let title: String = entry.title.chars().take(SUMMARY_TITLE_CHARS).collect();
                let _ = writeln!(out, "  [{}P] {title}", entry.pain_count);
            }
        }

        let _ = writeln!(out, "{rule}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::InsightSeed;
    use crate::layers::LayerBinding;
    use pretty_assertions::assert_eq;

    fn insight(voice: VoiceCode, process: Option<&str>, sentence: &str) -> Insight {
        with_tool(voice, process, None, sentence)
    }

    fn with_tool(
        voice: VoiceCode,
        process: Option<&str>,
        tool: Option<&str>,
        sentence: &str,
    ) -> Insight {
        let mut seed = InsightSeed::new(voice, 0.8, sentence);
        seed.layers = LayerBinding {
            process: process.map(str::to_string),
            tool: tool.map(str::to_string),
            people: None,
        };
        Insight::from_seed(seed)
    }

    fn document(doc_id: &str, voices: &[VoiceCode]) -> DocumentAnalysis {
        let items = voices.iter().map(|v| insight(*v, None, doc_id)).collect();
        DocumentAnalysis {
            doc_id: doc_id.to_string(),
            title: format!("title {doc_id}"),
            channel: String::new(),
            doc_type: "youtube_transcript".to_string(),
            analyzed_at: Utc::now(),
            result: AnalysisResult::build(items, &DomainWeights::default()),
        }
    }

    #[test]
    fn test_empty_result_is_all_zero() {
        let result = AnalysisResult::default();
        assert!(result.is_empty());
        assert_eq!(result.total_score(), 0);
        assert_eq!(result.sentiment_index(), 0.0);
        assert_eq!(result.counts().len(), 5);
        assert!(result.counts().values().all(|c| *c == 0));
    }

    #[test]
    fn test_scores_and_counts() {
        let items = vec![
            insight(VoiceCode::Pain, Some("入力作業"), "a"),
            insight(VoiceCode::Pain, Some("入力作業"), "b"),
            insight(VoiceCode::Traction, Some("承認フロー"), "c"),
            insight(VoiceCode::Vision, None, "d"),
        ];
        let result = AnalysisResult::build(items, &DomainWeights::default());

        // -2 -2 +2 +1
        assert_eq!(result.total_score(), -1);
        assert_eq!(result.sentiment_index(), -0.25);
        assert_eq!(result.count(VoiceCode::Pain), 2);
        assert_eq!(result.count(VoiceCode::Objection), 0);
        assert_eq!(result.by_layer().process.get("入力作業"), Some(&2));
        assert_eq!(result.by_layer().process.get("承認フロー"), Some(&1));
        assert!(result.by_layer().tool.is_empty());
    }

    #[test]
    fn test_tool_layer_tally() {
        let items = vec![
            with_tool(VoiceCode::Pain, Some("入力作業"), Some("Excel"), "a"),
            with_tool(VoiceCode::Vision, None, Some("kintone"), "b"),
            with_tool(VoiceCode::Pain, None, Some("Excel"), "c"),
            with_tool(VoiceCode::Traction, None, None, "d"),
        ];
        let result = AnalysisResult::build(items, &DomainWeights::default());

        let tools: Vec<(&str, usize)> = result
            .by_layer()
            .tool
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(tools, vec![("Excel", 2), ("kintone", 1)]);
        assert_eq!(result.by_layer().process.get("入力作業"), Some(&1));
    }

    #[test]
    fn test_groupings_keep_sentence_order_after_ranking() {
        let items = vec![
            insight(VoiceCode::Vision, None, "first"),
            insight(VoiceCode::Pain, None, "second"),
            insight(VoiceCode::Vision, None, "third"),
        ];
        let result = AnalysisResult::build(items, &DomainWeights::default());

        let ranked: Vec<&str> = result.items().iter().map(Insight::body).collect();
        assert_eq!(ranked, vec!["second", "first", "third"]);

        let visions: Vec<&str> = result
            .voice_items(VoiceCode::Vision)
            .iter()
            .map(Insight::body)
            .collect();
        assert_eq!(visions, vec!["first", "third"]);
    }

    #[test]
    fn test_corpus_summary() {
        use VoiceCode::*;
        let docs = vec![
            document("a", &[Vision]),
            document("b", &[Pain, Pain, Traction]),
            document("c", &[Pain]),
        ];
        let summary = CorpusSummary::from_documents(&docs);

        assert_eq!(summary.documents, 3);
        assert_eq!(summary.total_insights, 5);
        assert_eq!(summary.total_score, 1 - 4 + 2 - 2);
        assert_eq!(summary.by_voice[&Pain], 3);
        let order: Vec<&str> = summary.top_pain.iter().map(|p| p.doc_id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);

        let text = summary.summary_text();
        assert!(text.contains("総インサイト数: 5"));
        assert!(text.contains("[2P] title b"));
    }

    #[test]
    fn test_top_pain_capped_at_five() {
        let docs: Vec<DocumentAnalysis> = (0..8)
            .map(|i| document(&format!("doc{i}"), &[VoiceCode::Pain]))
            .collect();
        assert_eq!(CorpusSummary::from_documents(&docs).top_pain.len(), 5);
    }
}
