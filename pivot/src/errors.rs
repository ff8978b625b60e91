//! PIVOT engine error types
//!
//! Classification itself never fails: "no insight" is a normal outcome.
//! Errors only surface while loading configuration, compiling the rule
//! store, or rendering export formats.

use thiserror::Error;

/// Error category for structured logging and behavior mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// `pivot.toml` or env misconfigured
    ConfigError,
    /// Lexicon tables incomplete or a pattern failed to compile
    LexiconError,
    /// Rendering JSON / JSONL exports failed
    ExportError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::LexiconError => "LEXICON_ERROR",
            Self::ExportError => "EXPORT_ERROR",
        }
    }

    /// Whether the error happens while building the engine (fail fast)
    pub fn is_construction_time(&self) -> bool {
        matches!(self, Self::ConfigError | Self::LexiconError)
    }
}

/// PIVOT error with category and context
#[derive(Debug, Error)]
pub enum PivotError {
    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("lexicon error: {message}")]
    Lexicon {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("export error: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PivotError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::ConfigError,
            Self::Lexicon { .. } => ErrorCategory::LexiconError,
            Self::Export { .. } => ErrorCategory::ExportError,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a lexicon error
    pub fn lexicon(message: impl Into<String>) -> Self {
        Self::Lexicon {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lexicon error with source
    pub fn lexicon_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Lexicon {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an export error with source
    pub fn export_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Export {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Clone for PivotError {
    fn clone(&self) -> Self {
        match self {
            Self::Config { message, .. } => Self::Config {
                message: message.clone(),
                source: None,
            },
            Self::Lexicon { message, .. } => Self::Lexicon {
                message: message.clone(),
                source: None,
            },
            Self::Export { message, .. } => Self::Export {
                message: message.clone(),
                source: None,
            },
        }
    }
}

/// Result type for PIVOT operations
pub type Result<T> = std::result::Result<T, PivotError>;
