//! Error types for the TRIZ engine
//!
//! All fallible operations return `Result<T, Error>`.
//! Load failures never escape `KnowledgeBase::load`: they are logged and the
//! affected resource is left empty.

use thiserror::Error;

/// Which side of a contradiction an input belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Improving,
    Worsening,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Improving => write!(f, "improving"),
            Role::Worsening => write!(f, "worsening"),
        }
    }
}

/// TRIZ engine error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A parameter identifier that is not in the knowledge base
    #[error("Invalid input: unknown {role} parameter id {id}")]
    InvalidInput { role: Role, id: u32 },

    /// Free text that matched no parameter keyword
    #[error("No parameter matched the {role} text '{text}'")]
    NoMatch { role: Role, text: String },

    /// An ideality factor that is not `name=weight`
    #[error("Invalid ideality factor '{0}': expected name=weight")]
    InvalidFactor(String),

    /// A knowledge-base resource could not be read or decoded
    #[error("Failed to load {resource} from {path}: {message}")]
    LoadError {
        resource: &'static str,
        path: String,
        message: String,
    },

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type alias for TRIZ operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_role_and_id() {
        let err = Error::InvalidInput {
            role: Role::Worsening,
            id: 77,
        };
        assert_eq!(
            err.to_string(),
            "Invalid input: unknown worsening parameter id 77"
        );
    }

    #[test]
    fn test_no_match_carries_text() {
        let err = Error::NoMatch {
            role: Role::Improving,
            text: "purple".into(),
        };
        assert!(err.to_string().contains("'purple'"));
        assert!(err.to_string().contains("improving"));
    }
}
