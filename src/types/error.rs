//! Errors produced while resolving text through a type.

use thiserror::Error;

/// Why a piece of text could not be turned into a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown type '{type_name}'")]
    UnknownType { type_name: String },

    /// The validator rejected the raw text.
    #[error("'{text}' is not a valid {type_name}")]
    Validation { type_name: String, text: String },

    /// The transform ran and returned an error message.
    #[error("{message}")]
    Transform { type_name: String, message: String },
}

impl ResolveError {
    pub fn type_name(&self) -> &str {
        match self {
            ResolveError::UnknownType { type_name }
            | ResolveError::Validation { type_name, .. }
            | ResolveError::Transform { type_name, .. } => type_name,
        }
    }
}
