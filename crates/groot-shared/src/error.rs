//! Error types for Groot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrootError {
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    /// Raised by `ConversationalBackend` implementations
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GrootError {
    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            GrootError::Knowledge(e) => e.error_code(),
            GrootError::Backend(_) => "backend_error",
            GrootError::Internal(_) => "internal_error",
        }
    }
}

/// Failures reported by the knowledge store.
///
/// All of these are persistence failures: in-memory state is never rolled
/// back when one is returned.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("invalid category name: {0:?}")]
    InvalidCategory(String),

    #[error("knowledge store has no backing directory")]
    NoBackingDir,

    #[error("failed to persist category {category}: {source}")]
    Persist {
        category: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode category {category}: {source}")]
    Encode {
        category: String,
        #[source]
        source: serde_json::Error,
    },
}

impl KnowledgeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            KnowledgeError::InvalidCategory(_) => "invalid_category",
            KnowledgeError::NoBackingDir => "no_backing_dir",
            KnowledgeError::Persist { .. } => "persist_failed",
            KnowledgeError::Encode { .. } => "encode_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GrootError::Backend("timeout".into()).error_code(), "backend_error");
        let err: GrootError = KnowledgeError::NoBackingDir.into();
        assert_eq!(err.error_code(), "no_backing_dir");
        assert_eq!(
            KnowledgeError::InvalidCategory("../x".into()).to_string(),
            "invalid category name: \"../x\""
        );
    }
}
