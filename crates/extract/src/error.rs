use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting structure from a source file
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file could not be read
    #[error("File not found: {path}: {reason}")]
    FileNotFound { path: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExtractError {
    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::FileNotFound {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Tag reported alongside a degraded result, if this error has one
    pub fn tag(&self) -> Option<ErrorTag> {
        match self {
            Self::FileNotFound { .. } => Some(ErrorTag::FileNotFound),
            Self::InvalidConfig(_) => None,
        }
    }
}

/// Machine-readable tag attached to a report that carries a degraded result.
///
/// Extraction never fails outright: a report always comes back, and when
/// something went wrong it carries one of these next to whatever partial
/// data could still be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTag {
    FileNotFound,
    UnknownLanguage,
    NoDetector,
    ParseFailed,
    ParseFailedRegexFallback,
    UnsupportedLanguage,
}

impl ErrorTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorTag::FileNotFound => "file_not_found",
            ErrorTag::UnknownLanguage => "unknown_language",
            ErrorTag::NoDetector => "no_detector",
            ErrorTag::ParseFailed => "parse_failed",
            ErrorTag::ParseFailedRegexFallback => "parse_failed_regex_fallback",
            ErrorTag::UnsupportedLanguage => "unsupported_language",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
