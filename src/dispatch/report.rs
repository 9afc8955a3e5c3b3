//! Dispatch states and the report handed back to the caller.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::commands::CommandPath;
use crate::dispatch::error::DispatchError;
use crate::dispatch::interaction::Reply;

/// States of the dispatch state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    Idle,
    Tokenizing,
    Resolving,
    ArgumentBinding,
    Guarding,
    Executing,
    Done,
    Errored,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchState::Done | DispatchState::Errored)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How a dispatch that reached `Done` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran and returned `Ok`.
    Completed,
    /// A guard stopped the chain. Not an error.
    Halted { message: Option<String> },
}

/// Everything the caller learns about one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub interaction_id: Uuid,
    /// Resolved command, if resolution got that far.
    pub command: Option<CommandPath>,
    pub outcome: Result<Outcome, DispatchError>,
    /// Replies the guards and handler sent to the executor.
    pub replies: Vec<Reply>,
    /// States visited, `Idle` first and a terminal state last.
    pub states: Vec<DispatchState>,
}

impl DispatchReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Ok(Outcome::Completed))
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.outcome, Ok(Outcome::Halted { .. }))
    }

    pub fn error(&self) -> Option<&DispatchError> {
        self.outcome.as_ref().err()
    }

    pub fn final_state(&self) -> DispatchState {
        self.states.last().copied().unwrap_or(DispatchState::Idle)
    }

    /// The one message to show the executor about the outcome, if any.
    pub fn message(&self) -> Option<String> {
        match &self.outcome {
            Ok(Outcome::Completed) => None,
            Ok(Outcome::Halted { message }) => message.clone(),
            Err(err) => Some(err.to_string()),
        }
    }

    /// Structured form for machine consumers.
    pub fn to_json(&self) -> serde_json::Value {
        let (status, error) = match &self.outcome {
            Ok(Outcome::Completed) => ("completed", serde_json::Value::Null),
            Ok(Outcome::Halted { .. }) => ("halted", serde_json::Value::Null),
            Err(err) => (
                "errored",
                serde_json::json!({
                    "type": err.error_type(),
                    "message": err.to_string(),
                }),
            ),
        };

        serde_json::json!({
            "interaction_id": self.interaction_id.to_string(),
            "command": self.command.as_ref().map(ToString::to_string),
            "status": status,
            "message": self.message(),
            "error": error,
            "replies": self.replies,
            "states": self.states,
        })
    }
}
