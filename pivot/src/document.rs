//! Transcript input record

use crate::timestamps::TimedSegment;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOC_TYPE: &str = "youtube_transcript";

fn default_doc_type() -> String {
    DEFAULT_DOC_TYPE.to_string()
}

/// One transcript as handed over by a collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub doc_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// Concatenated transcript text
    #[serde(default)]
    pub full_text: String,
    /// Timed segments in playback order; may be empty
    #[serde(default)]
    pub segments: Vec<TimedSegment>,
}

impl TranscriptDocument {
    pub fn new(doc_id: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            title: String::new(),
            channel: String::new(),
            doc_type: default_doc_type(),
            full_text: full_text.into(),
            segments: Vec::new(),
        }
    }

    /// Build from timed segments, joining their text with spaces
    pub fn from_segments(doc_id: impl Into<String>, segments: Vec<TimedSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            segments,
            ..Self::new(doc_id, full_text)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }
}
