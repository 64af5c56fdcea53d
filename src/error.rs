//! Error types for rangelight

use thiserror::Error;

/// Result type alias for highlighting operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Highlight capability missing: {0}")]
    CapabilityMissing(String),

    #[error("Cannot load syntax '{identifier}': {reason}")]
    Load { identifier: String, reason: String },

    #[error("Syntax '{identifier}' not found")]
    NotFound { identifier: String },

    #[error("Invalid rule for category '{category}': {reason}")]
    InvalidRule { category: String, reason: String },

    #[error("Malformed palette: {0}")]
    Parse(String),

    #[error("Expected a text node, got {0}")]
    WrongNodeKind(String),

    #[error("Invalid instance suffix '{0}': use ASCII letters and digits only")]
    InvalidSuffix(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl HighlightError {
    pub(crate) fn load(identifier: &str, reason: impl ToString) -> Self {
        Self::Load {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_found(identifier: &str) -> Self {
        Self::NotFound {
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn invalid_rule(category: &str, reason: impl ToString) -> Self {
        Self::InvalidRule {
            category: category.to_string(),
            reason: reason.to_string(),
        }
    }
}
