//! Engine configuration
//!
//! Loaded from `~/.config/pivot/pivot.toml` or the file named by
//! `PIVOT_CONFIG`. Every field has a default, so an empty file is valid.

use crate::errors::{PivotError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    /// Accepted classifications below this confidence produce no insight
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Try morphology inference before the lexical classifier
    #[serde(default = "default_morphology_enabled")]
    pub morphology_enabled: bool,

    /// Morphology results below this confidence fall back to lexical
    #[serde(default = "default_morphology_accept_threshold")]
    pub morphology_accept_threshold: f64,

    #[serde(default = "default_split_by_sentence")]
    pub split_by_sentence: bool,

    /// Minimum sentence length in characters
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,

    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Domain weight table applied when a call does not name one
    #[serde(default)]
    pub domain: Option<String>,

    /// Custom lexicon TOML; built-in tables when unset
    #[serde(default)]
    pub lexicon_path: Option<String>,

    /// Segment prefix length used by the timestamp index
    #[serde(default = "default_timestamp_key_chars")]
    pub timestamp_key_chars: usize,
}

fn default_min_confidence() -> f64 {
    0.3
}

fn default_morphology_enabled() -> bool {
    true
}

fn default_morphology_accept_threshold() -> f64 {
    0.6
}

fn default_split_by_sentence() -> bool {
    true
}

fn default_min_sentence_chars() -> usize {
    10
}

fn default_title_max_chars() -> usize {
    50
}

fn default_timestamp_key_chars() -> usize {
    30
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            morphology_enabled: default_morphology_enabled(),
            morphology_accept_threshold: default_morphology_accept_threshold(),
            split_by_sentence: default_split_by_sentence(),
            min_sentence_chars: default_min_sentence_chars(),
            title_max_chars: default_title_max_chars(),
            domain: None,
            lexicon_path: None,
            timestamp_key_chars: default_timestamp_key_chars(),
        }
    }
}

impl PivotConfig {
    /// Environment variable for config path override
    pub const ENV_CONFIG_PATH: &'static str = "PIVOT_CONFIG";

    /// Default config filename
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "pivot.toml";

    /// Load configuration
    ///
    /// Resolution order:
    /// 1. `PIVOT_CONFIG` environment variable
    /// 2. `~/.config/pivot/pivot.toml`
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::resolve_config_path();

        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "PIVOT config not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PivotError::config_with_source(
                format!("failed to read config at {}", path.display()),
                e,
            )
        })?;

        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: PivotConfig = toml::from_str(contents)
            .map_err(|e| PivotError::config_with_source("failed to parse config", e))?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("pivot")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("morphology_accept_threshold", self.morphology_accept_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PivotError::config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.title_max_chars == 0 {
            return Err(PivotError::config("title_max_chars must be greater than 0"));
        }
        if self.timestamp_key_chars == 0 {
            return Err(PivotError::config(
                "timestamp_key_chars must be greater than 0",
            ));
        }

        if self.morphology_accept_threshold < self.min_confidence {
            tracing::warn!(
                accept = self.morphology_accept_threshold,
                min_confidence = self.min_confidence,
                "Morphology acceptance threshold is below min_confidence; \
                 accepted morphology results may still be dropped"
            );
        }

        Ok(())
    }

    /// Lexicon path with a leading `~/` expanded
    pub fn resolved_lexicon_path(&self) -> Option<PathBuf> {
        let path = self.lexicon_path.as_deref()?;
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return Some(home.join(stripped));
        }
        Some(PathBuf::from(path))
    }
}

/// Per-call analysis switches; defaults come from [`PivotConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub domain: Option<String>,
    pub min_confidence: f64,
    pub morphology_enabled: bool,
    pub split_by_sentence: bool,
}

impl From<&PivotConfig> for AnalysisOptions {
    fn from(cfg: &PivotConfig) -> Self {
        Self {
            domain: cfg.domain.clone(),
            min_confidence: cfg.min_confidence,
            morphology_enabled: cfg.morphology_enabled,
            split_by_sentence: cfg.split_by_sentence,
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from(&PivotConfig::default())
    }
}

impl AnalysisOptions {
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_morphology(mut self, enabled: bool) -> Self {
        self.morphology_enabled = enabled;
        self
    }

    pub fn with_sentence_split(mut self, enabled: bool) -> Self {
        self.split_by_sentence = enabled;
        self
    }
}
