//! Output records: document record, mart items, JSON/JSONL rendering
//!
//! Rendering produces strings; persisting them is the caller's business.

use crate::aggregate::DocumentAnalysis;
use crate::classifier::Insight;
use crate::errors::{PivotError, Result};
use crate::layers::LayerBinding;
use crate::temperature::Temperature;
use crate::voice::VoiceCode;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MART_TYPE: &str = "pivot_insight";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Mart items
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MartKeywords {
    pub surface: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub doc_id: String,
    pub doc_type: String,
    pub channel: String,
    pub title: String,
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTime {
    pub observed_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphologyTrace {
    pub intensity_score: f64,
    pub degree_factor: f64,
    pub certainty: f64,
    pub reasoning: String,
}

/// Flat insight record for the downstream mart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MartItem {
    pub id: String,
    pub mart_type: String,
    pub pivot_voice: VoiceCode,
    pub pivot_label: String,
    pub pivot_score: i32,
    pub target_layers: LayerBinding,
    pub title: String,
    pub body: String,
    pub confidence: f64,
    pub temperature: Temperature,
    pub keywords: MartKeywords,
    pub source_ref: SourceRef,
    pub source_time: SourceTime,
    pub morphology: MorphologyTrace,
}

impl MartItem {
    fn new(doc: &DocumentAnalysis, insight: &Insight, observed_at: NaiveDate) -> Self {
        Self {
            id: format!("pivot_{}", insight.id()),
            mart_type: MART_TYPE.to_string(),
            pivot_voice: insight.voice(),
            pivot_label: insight.label().to_string(),
            pivot_score: insight.base_score(),
            target_layers: insight.layers().clone(),
            title: insight.title().to_string(),
            body: insight.body().to_string(),
            confidence: insight.confidence(),
            temperature: insight.temperature(),
            keywords: MartKeywords {
                surface: insight.keywords().to_vec(),
            },
            source_ref: SourceRef {
                doc_id: doc.doc_id.clone(),
                doc_type: doc.doc_type.clone(),
                channel: doc.channel.clone(),
                title: doc.title.clone(),
                timestamp: insight.timestamp(),
            },
            source_time: SourceTime { observed_at },
            morphology: MorphologyTrace {
                intensity_score: insight.intensity(),
                degree_factor: insight.degree_factor(),
                certainty: insight.certainty(),
                reasoning: insight.reasoning().to_string(),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document record
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_insights: usize,
    pub total_score: i32,
    /// Rounded to two decimals
    pub sentiment_index: f64,
    pub by_pivot: BTreeMap<VoiceCode, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: Uuid,
    pub pivot: VoiceCode,
    pub title: String,
    pub body: String,
    /// Rounded to two decimals
    pub confidence: f64,
    pub temperature: Temperature,
    pub keywords: Vec<String>,
    pub timestamp: Option<f64>,
}

/// Compact per-document record used in JSON reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub title: String,
    pub channel: String,
    pub analyzed_at: DateTime<Utc>,
    pub stats: DocumentStats,
    pub items: Vec<ItemRecord>,
}

/// JSON report over a batch of documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub analyzed_at: DateTime<Utc>,
    pub total_documents: usize,
    pub results: Vec<DocumentRecord>,
}

impl DocumentAnalysis {
    pub fn to_record(&self) -> DocumentRecord {
        let result = &self.result;
        DocumentRecord {
            doc_id: self.doc_id.clone(),
            title: self.title.clone(),
            channel: self.channel.clone(),
            analyzed_at: self.analyzed_at,
            stats: DocumentStats {
                total_insights: result.len(),
                total_score: result.total_score(),
                sentiment_index: round2(result.sentiment_index()),
                by_pivot: result.counts(),
            },
            items: result
                .items()
                .iter()
                .map(|item| ItemRecord {
                    id: item.id(),
                    pivot: item.voice(),
                    title: item.title().to_string(),
                    body: item.body().to_string(),
                    confidence: round2(item.confidence()),
                    temperature: item.temperature(),
                    keywords: item.keywords().to_vec(),
                    timestamp: item.timestamp(),
                })
                .collect(),
        }
    }

    /// Mart items in `items` order; `observed_at` defaults to today (local)
    pub fn to_mart_items(&self, observed_at: Option<NaiveDate>) -> Vec<MartItem> {
        let observed_at = observed_at.unwrap_or_else(|| Local::now().date_naive());
        self.result
            .items()
            .iter()
            .map(|insight| MartItem::new(self, insight, observed_at))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_record()).map_err(|e| {
            PivotError::export_with_source(format!("failed to render document {}", self.doc_id), e)
        })
    }
}

impl CorpusReport {
    pub fn new(documents: &[DocumentAnalysis], analyzed_at: DateTime<Utc>) -> Self {
        Self {
            analyzed_at,
            total_documents: documents.len(),
            results: documents.iter().map(DocumentAnalysis::to_record).collect(),
        }
    }
}

/// Pretty-printed JSON report, non-ASCII left unescaped
pub fn render_json_report(documents: &[DocumentAnalysis], analyzed_at: DateTime<Utc>) -> Result<String> {
    serde_json::to_string_pretty(&CorpusReport::new(documents, analyzed_at))
        .map_err(|e| PivotError::export_with_source("failed to render JSON report", e))
}

/// One JSON object per line, each line newline-terminated
pub fn mart_items_to_jsonl(items: &[MartItem]) -> Result<String> {
    let mut out = String::new();
    for item in items {
        let line = serde_json::to_string(item).map_err(|e| {
            PivotError::export_with_source(format!("failed to render mart item {}", item.id), e)
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// JSONL mart stream for a batch of documents
pub fn render_mart_jsonl(
    documents: &[DocumentAnalysis],
    observed_at: Option<NaiveDate>,
) -> Result<String> {
    let items: Vec<MartItem> = documents
        .iter()
        .flat_map(|doc| doc.to_mart_items(observed_at))
        .collect();
    mart_items_to_jsonl(&items)
}
