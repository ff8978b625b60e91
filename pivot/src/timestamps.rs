//! Approximate sentence → timestamp lookup
//!
//! Sentences are re-split from the concatenated transcript, so they rarely
//! line up with caption segments exactly. The index keys each segment by a
//! short prefix of its text and matches by containment in either direction.
//! Best effort only: a sentence spanning two segments resolves to whichever
//! segment's key it contains first, and some sentences resolve to nothing.

use serde::{Deserialize, Serialize};

/// One timed caption segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// Start offset in seconds
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
    pub text: String,
}

impl TimedSegment {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }
}

/// Prefix → start-time entries in segment order
#[derive(Debug, Clone, Default)]
pub struct TimestampIndex {
    entries: Vec<(String, f64)>,
    key_chars: usize,
}

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl TimestampIndex {
    /// Build from segments, keying each by its first `key_chars` characters.
    ///
    /// Empty keys are skipped. A repeated key keeps its first position but
    /// takes the latest segment's start.
    pub fn build(segments: &[TimedSegment], key_chars: usize) -> Self {
        let mut entries: Vec<(String, f64)> = Vec::with_capacity(segments.len());
        for seg in segments {
            let key = prefix(seg.text.trim(), key_chars);
            if key.is_empty() {
                continue;
            }
            match entries.iter_mut().find(|(k, _)| k == key) {
                Some((_, start)) => *start = seg.start,
                None => entries.push((key.to_string(), seg.start)),
            }
        }
        Self { entries, key_chars }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Start of the first entry whose key occurs in the sentence, or which
    /// contains the sentence's own prefix.
    pub fn lookup(&self, sentence: &str) -> Option<f64> {
        let head = prefix(sentence.trim(), self.key_chars);
        if head.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(key, _)| sentence.contains(key.as_str()) || key.contains(head))
            .map(|(_, start)| *start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segments() -> Vec<TimedSegment> {
        vec![
            TimedSegment::new(0.0, 2.5, "こんにちは"),
            TimedSegment::new(2.5, 3.0, "毎回Excelの入力作業で"),
            TimedSegment::new(5.5, 3.0, "ミスが多くて困っている"),
            TimedSegment::new(9.0, 1.0, "   "),
            TimedSegment::new(10.0, 2.0, "こんにちは"),
        ]
    }

    #[test]
    fn test_empty_keys_skipped_and_duplicates_merged() {
        let index = TimestampIndex::build(&segments(), 30);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_duplicate_key_takes_latest_start() {
        let index = TimestampIndex::build(&segments(), 30);
        assert_eq!(index.lookup("こんにちは皆さん今日は"), Some(10.0));
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let segments = vec![
            TimedSegment::new(0.0, 1.0, "ええと"),
            TimedSegment::new(1.0, 1.0, "ええと、それで"),
            TimedSegment::new(4.0, 1.0, "ええと"),
        ];
        let index = TimestampIndex::build(&segments, 30);
        // "ええと" still precedes "ええと、それで", now at 4.0
        assert_eq!(index.lookup("ええと、それで終わり"), Some(4.0));
    }

    #[test]
    fn test_sentence_containing_segment_key() {
        let index = TimestampIndex::build(&segments(), 30);
        assert_eq!(
            index.lookup("毎回Excelの入力作業でミスが多くて困っている"),
            Some(2.5)
        );
    }

    #[test]
    fn test_segment_containing_sentence_prefix() {
        let index = TimestampIndex::build(&segments(), 30);
        assert_eq!(index.lookup("多くて困っている"), Some(5.5));
    }

    #[test]
    fn test_keys_truncated_by_characters() {
        let long = TimedSegment::new(1.0, 1.0, "あいうえおかきくけこさしすせそ");
        let index = TimestampIndex::build(&[long], 5);
        assert_eq!(index.lookup("ここで、あいうえおの話"), Some(1.0));
    }

    #[test]
    fn test_no_match() {
        let index = TimestampIndex::build(&segments(), 30);
        assert_eq!(index.lookup("まったく関係のない文章です"), None);
        assert_eq!(TimestampIndex::default().lookup("何か"), None);
    }
}
