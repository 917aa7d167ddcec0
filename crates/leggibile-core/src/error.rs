//! Error types for leggibile-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during text analysis.
///
/// Both variants are client errors: retrying the same input reproduces them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The input text is empty or whitespace only.
    #[error("empty text: nothing to analyze")]
    EmptyInput,

    /// Tokenization produced no alphabetic words or no sentences.
    #[error("invalid text: no alphabetic words or sentences found")]
    InvalidInput,
}

impl AnalysisError {
    /// Stable discriminant for serialized error payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors reported by an external semantic analyzer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// No API credential was configured for the analyzer.
    #[error("semantic analyzer not configured: {0}")]
    NotConfigured(String),

    /// The input text is empty or whitespace only.
    #[error("empty text: nothing to analyze")]
    EmptyInput,

    /// The remote call failed (transport error or non-success status).
    #[error("semantic analysis request failed: {0}")]
    Request(String),

    /// The analyzer answered, but not with the expected JSON document.
    #[error("invalid semantic analysis response: {0}")]
    InvalidResponse(String),
}

impl SemanticError {
    /// Stable discriminant for serialized error payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "configuration_error",
            Self::EmptyInput => "empty_input",
            Self::Request(_) => "request_failed",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Result type alias using [`SemanticError`].
pub type SemanticResult<T> = Result<T, SemanticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_error_kinds_are_distinct() {
        assert_eq!(AnalysisError::EmptyInput.kind(), "empty_input");
        assert_eq!(AnalysisError::InvalidInput.kind(), "invalid_input");
    }

    #[test]
    fn semantic_not_configured_display() {
        let err = SemanticError::NotConfigured("set GEMINI_API_KEY".into());
        assert_eq!(
            err.to_string(),
            "semantic analyzer not configured: set GEMINI_API_KEY"
        );
        assert_eq!(err.kind(), "configuration_error");
    }
}
