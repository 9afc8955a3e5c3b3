//! Errors surfaced by a dispatch.

use thiserror::Error;

use crate::types::ResolveError;

/// Why a dispatch ended in the `Errored` state.
///
/// `Display` is the single user-facing message for the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No command matches the input path.
    #[error("Unknown command: {input}")]
    CommandNotFound { input: String },

    #[error("Missing required argument '{argument}'")]
    MissingArgument { argument: String },

    #[error("Too many arguments (expected {expected}): unexpected '{}'", .extra.join(" "))]
    TooManyArguments { expected: usize, extra: Vec<String> },

    /// An argument failed validation or transformation.
    #[error("Invalid argument '{argument}': {source}")]
    Argument {
        argument: String,
        #[source]
        source: ResolveError,
    },

    /// A guard panicked. The handler did not run.
    #[error("Command '{command}' failed a permission check: {message}")]
    Guard { command: String, message: String },

    /// The handler returned an error or panicked.
    #[error("Command '{command}' failed: {message}")]
    Handler { command: String, message: String },
}

impl DispatchError {
    /// Stable identifier for structured output.
    pub fn error_type(&self) -> &'static str {
        match self {
            DispatchError::CommandNotFound { .. } => "command_not_found",
            DispatchError::MissingArgument { .. } => "missing_argument",
            DispatchError::TooManyArguments { .. } => "too_many_arguments",
            DispatchError::Argument {
                source: ResolveError::UnknownType { .. },
                ..
            } => "unknown_type",
            DispatchError::Argument {
                source: ResolveError::Validation { .. },
                ..
            } => "validation_error",
            DispatchError::Argument {
                source: ResolveError::Transform { .. },
                ..
            } => "transform_error",
            DispatchError::Guard { .. } => "guard_error",
            DispatchError::Handler { .. } => "handler_error",
        }
    }
}
