//! Error types for the redaction engine.
//!
//! Only failures that terminate a whole document call are surfaced as
//! [`ShieldError`]: opening, the empty-document check and final
//! serialization. Per-page detector, annotation and placeholder failures
//! are recovered inside the pipeline and recorded in the audit log instead
//! of propagating (see the orchestrator state machine).

use std::io;

/// Result type alias for engine operations.
pub type ShieldResult<T> = Result<T, ShieldError>;

/// Terminal errors for a document-processing call.
#[derive(Debug, thiserror::Error)]
pub enum ShieldError {
    /// The input bytes could not be opened as a document.
    #[error("failed to open document: {message}")]
    DocumentOpen {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The document opened but contains no pages.
    #[error("document contains no pages")]
    EmptyDocument,

    /// Producing the final output bytes failed.
    #[error("failed to serialize output document: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Pattern compilation or lookup error.
    #[error("pattern error for '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// Invalid configuration or parameters.
    #[error("invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Backend-specific failure, attributed to the backend by name.
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File-system error (CLI surface only; the core works on bytes).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ShieldError {
    /// Convenience constructor for backend failures.
    pub fn backend(
        backend: &str,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            backend: backend.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for errors that abort the whole call rather than one stage.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DocumentOpen { .. } | Self::EmptyDocument | Self::Serialization { .. }
        )
    }
}

impl From<regex::Error> for ShieldError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern {
            pattern: "<unknown>".to_string(),
            reason: err.to_string(),
        }
    }
}
