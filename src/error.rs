//! Configuration errors raised while registering types, groups and commands.

use std::any::Any;

use thiserror::Error;

/// A definition was rejected at registration time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Type '{name}' is already registered")]
    DuplicateType { name: String },

    #[error("Group '{name}' is already registered under {}", scope_label(.root))]
    DuplicateGroup { name: String, root: Option<String> },

    #[error("Group '{name}' references unknown root group '{root}'")]
    UnknownGroup { name: String, root: String },

    /// The requested root is itself a child group.
    #[error("Group '{name}' cannot nest under '{root}': groups are limited to two levels")]
    GroupNestingTooDeep { name: String, root: String },

    #[error("Command '{path}' is already registered")]
    DuplicateCommand { path: String },

    #[error("Command '{name}' has a group path of {len} segments (at most 2)")]
    GroupPathTooLong { name: String, len: usize },

    #[error("Command '{name}' references unknown group path '{path}'")]
    UnknownGroupPath { name: String, path: String },

    #[error("Command '{command}': required argument '{argument}' follows an optional one")]
    OptionalBeforeRequired { command: String, argument: String },

    /// A group with the command's name sits in the same scope and always wins resolution.
    #[error("Command '{path}' can never run: group '{group}' has the same name")]
    ShadowedByGroup { path: String, group: String },

    #[error("Command '{command}': argument '{argument}' uses unknown type '{type_name}'")]
    UnknownArgumentType {
        command: String,
        argument: String,
        type_name: String,
    },
}

/// User-facing text for a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

fn scope_label(root: &Option<String>) -> String {
    match root {
        Some(root) => format!("'{}'", root),
        None => "the root scope".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_group_message_names_scope() {
        let err = RegistrationError::DuplicateGroup {
            name: "user".to_string(),
            root: Some("info".to_string()),
        };
        assert_eq!(err.to_string(), "Group 'user' is already registered under 'info'");

        let err = RegistrationError::DuplicateGroup {
            name: "info".to_string(),
            root: None,
        };
        assert_eq!(err.to_string(), "Group 'info' is already registered under the root scope");
    }
}
