//! PIVOT voice taxonomy and subject layers
//!
//! Five voices classify what a speaker is expressing; three layers name
//! what the speaker is talking about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five PIVOT voices.
///
/// Variant order is the fixed tie-break order P, I, V, O, T; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VoiceCode {
    /// Current negative impact (課題・困りごと)
    #[serde(rename = "P")]
    Pain,
    /// Latent future risk (不安・心配)
    #[serde(rename = "I")]
    Insecurity,
    /// Motivation to improve (要望・理想像)
    #[serde(rename = "V")]
    Vision,
    /// Barrier to execution (摩擦・抵抗)
    #[serde(rename = "O")]
    Objection,
    /// Foundation of success (成功・強み)
    #[serde(rename = "T")]
    Traction,
}

impl VoiceCode {
    /// All voices in tie-break order
    pub const ALL: [VoiceCode; 5] = [
        Self::Pain,
        Self::Insecurity,
        Self::Vision,
        Self::Objection,
        Self::Traction,
    ];

    /// One-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pain => "P",
            Self::Insecurity => "I",
            Self::Vision => "V",
            Self::Objection => "O",
            Self::Traction => "T",
        }
    }

    /// English label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pain => "Pain",
            Self::Insecurity => "Insecurity",
            Self::Vision => "Vision",
            Self::Objection => "Objection",
            Self::Traction => "Traction",
        }
    }

    /// Fixed base score; never set independently of the voice
    pub fn base_score(&self) -> i32 {
        match self {
            Self::Pain => -2,
            Self::Insecurity => -1,
            Self::Vision => 1,
            Self::Objection => -1,
            Self::Traction => 2,
        }
    }

    /// Japanese description used in reports
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pain => "課題・困りごと",
            Self::Insecurity => "不安・心配",
            Self::Vision => "要望・理想像",
            Self::Objection => "摩擦・抵抗",
            Self::Traction => "成功・強み",
        }
    }
}

impl fmt::Display for VoiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for VoiceCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" | "pain" => Ok(Self::Pain),
            "i" | "insecurity" => Ok(Self::Insecurity),
            "v" | "vision" => Ok(Self::Vision),
            "o" | "objection" => Ok(Self::Objection),
            "t" | "traction" => Ok(Self::Traction),
            _ => Err(format!("Unknown PIVOT voice: {s}")),
        }
    }
}

/// Subject layer a sentence can be "about"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Process,
    Tool,
    People,
}

impl Layer {
    /// Extraction order
    pub const ALL: [Layer; 3] = [Self::Process, Self::Tool, Self::People];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Tool => "tool",
            Self::People => "people",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_scores() {
        let scores: Vec<i32> = VoiceCode::ALL.iter().map(VoiceCode::base_score).collect();
        assert_eq!(scores, vec![-2, -1, 1, -1, 2]);
    }

    #[test]
    fn test_order_matches_tie_break() {
        assert!(VoiceCode::Pain < VoiceCode::Insecurity);
        assert!(VoiceCode::Objection < VoiceCode::Traction);
        assert_eq!(VoiceCode::ALL[2], VoiceCode::Vision);
    }

    #[test]
    fn test_from_str_accepts_code_and_label() {
        assert_eq!(VoiceCode::from_str("P").unwrap(), VoiceCode::Pain);
        assert_eq!(VoiceCode::from_str("traction").unwrap(), VoiceCode::Traction);
        assert!(VoiceCode::from_str("X").is_err());
    }

    #[test]
    fn test_serde_uses_one_letter_code() {
        let json = serde_json::to_string(&VoiceCode::Objection).unwrap();
        assert_eq!(json, "\"O\"");
        let back: VoiceCode = serde_json::from_str("\"I\"").unwrap();
        assert_eq!(back, VoiceCode::Insecurity);
    }

    #[test]
    fn test_layer_display() {
        assert_eq!(Layer::Process.to_string(), "process");
        assert_eq!(serde_json::to_string(&Layer::People).unwrap(), "\"people\"");
    }
}
