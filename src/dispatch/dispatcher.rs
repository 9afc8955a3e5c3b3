//! The dispatch state machine.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::commands::{CommandDefinition, CommandPath, CommandRegistry};
use crate::dispatch::error::DispatchError;
use crate::dispatch::interaction::{Arguments, BoundArgument, Interaction, Reply};
use crate::dispatch::report::{DispatchReport, DispatchState, Outcome};
use crate::dispatch::tokenizer::TokenStream;
use crate::error::panic_message;
use crate::guard::{run_chain, ChainOutcome};
use crate::identity::Principal;
use crate::types::TypeRegistry;

/// Runs raw input against read-only registries.
///
/// Holds no per-dispatch state, so one dispatcher serves any number of
/// concurrent [`Dispatcher::run`] calls.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    types: &'a TypeRegistry,
    commands: &'a CommandRegistry,
}

/// States visited by one dispatch.
struct StateTrace {
    states: Vec<DispatchState>,
}

impl StateTrace {
    fn new() -> Self {
        Self {
            states: vec![DispatchState::Idle],
        }
    }

    fn enter(&mut self, state: DispatchState) {
        tracing::debug!(state = %state, "Dispatch state");
        self.states.push(state);
    }
}

impl<'a> Dispatcher<'a> {
    pub fn new(types: &'a TypeRegistry, commands: &'a CommandRegistry) -> Self {
        Self { types, commands }
    }

    /// Dispatch `raw` on behalf of `executor`.
    ///
    /// Never fails: every error is captured in the returned report.
    pub async fn run(&self, raw: &str, executor: &Principal) -> DispatchReport {
        let id = Uuid::new_v4();
        let span = tracing::debug_span!("dispatch", interaction = %id, executor = %executor.display_name);
        self.run_inner(id, raw, executor).instrument(span).await
    }

    async fn run_inner(&self, id: Uuid, raw: &str, executor: &Principal) -> DispatchReport {
        let mut trace = StateTrace::new();

        trace.enter(DispatchState::Tokenizing);
        let stream = TokenStream::new(raw);
        let texts = stream.texts();

        trace.enter(DispatchState::Resolving);
        let Some(resolution) = self.commands.resolve(&texts) else {
            let attempted = texts.len().min(self.commands.match_scope(&texts).len() + 1);
            let err = DispatchError::CommandNotFound {
                input: texts[..attempted].join(" "),
            };
            tracing::debug!(error = %err, "Command not found");
            return errored(id, None, err, Vec::new(), trace);
        };
        let command = resolution.command;
        let path = command.path();

        trace.enter(DispatchState::ArgumentBinding);
        let args = match self.bind(&command, &stream, resolution.consumed).await {
            Ok(args) => args,
            Err(err) => {
                tracing::debug!(command = %path, error = %err, "Argument binding failed");
                return errored(id, Some(path), err, Vec::new(), trace);
            }
        };

        let interaction = Interaction::new(id, executor.clone(), raw, path.clone());

        trace.enter(DispatchState::Guarding);
        let chain = AssertUnwindSafe(run_chain(command.guards(), &interaction))
            .catch_unwind()
            .await;
        match chain {
            Ok(ChainOutcome::Proceed) => {}
            Ok(ChainOutcome::Halted { index, message }) => {
                tracing::info!(command = %path, guard = index, "Command halted by guard");
                trace.enter(DispatchState::Done);
                return DispatchReport {
                    interaction_id: id,
                    command: Some(path),
                    outcome: Ok(Outcome::Halted { message }),
                    replies: interaction.into_replies(),
                    states: trace.states,
                };
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(command = %path, error = %message, "Guard panicked");
                let err = DispatchError::Guard {
                    command: path.to_string(),
                    message,
                };
                return errored(id, Some(path), err, interaction.into_replies(), trace);
            }
        }

        trace.enter(DispatchState::Executing);
        let result = AssertUnwindSafe(command.handler().handle(&interaction, &args))
            .catch_unwind()
            .await;

        let failure = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("{:#}", e)),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        match failure {
            None => {
                tracing::info!(command = %path, "Command completed");
                trace.enter(DispatchState::Done);
                DispatchReport {
                    interaction_id: id,
                    command: Some(path),
                    outcome: Ok(Outcome::Completed),
                    replies: interaction.into_replies(),
                    states: trace.states,
                }
            }
            Some(message) => {
                tracing::warn!(command = %path, error = %message, "Command handler failed");
                let err = DispatchError::Handler {
                    command: path.to_string(),
                    message,
                };
                errored(id, Some(path), err, interaction.into_replies(), trace)
            }
        }
    }

    /// Bind each declared argument to the next token, in order.
    ///
    /// A greedy-typed last argument takes the raw remainder of the input
    /// when more than one token is left.
    async fn bind(
        &self,
        command: &CommandDefinition,
        stream: &TokenStream,
        consumed: usize,
    ) -> Result<Arguments, DispatchError> {
        let specs = command.arguments();
        let tokens = &stream.tokens()[consumed..];
        let mut cursor = 0;
        let mut bound = Vec::with_capacity(specs.len());

        for (i, spec) in specs.iter().enumerate() {
            let remaining = tokens.len() - cursor;
            if remaining == 0 {
                if spec.optional {
                    bound.push(BoundArgument {
                        name: spec.name.clone(),
                        value: None,
                    });
                    continue;
                }
                return Err(DispatchError::MissingArgument {
                    argument: spec.name.clone(),
                });
            }

            let is_last = i + 1 == specs.len();
            let text = if is_last && remaining > 1 && self.types.is_greedy(&spec.type_name) {
                let rest = stream.raw_rest(consumed + cursor);
                cursor = tokens.len();
                rest
            } else {
                let token = tokens[cursor].text.as_str();
                cursor += 1;
                token
            };

            let value = self
                .types
                .resolve(&spec.type_name, text)
                .await
                .map_err(|source| DispatchError::Argument {
                    argument: spec.name.clone(),
                    source,
                })?;
            bound.push(BoundArgument {
                name: spec.name.clone(),
                value: Some(value),
            });
        }

        if cursor < tokens.len() {
            return Err(DispatchError::TooManyArguments {
                expected: specs.len(),
                extra: tokens[cursor..].iter().map(|t| t.text.clone()).collect(),
            });
        }

        Ok(Arguments::new(bound))
    }
}

fn errored(
    id: Uuid,
    command: Option<CommandPath>,
    err: DispatchError,
    replies: Vec<Reply>,
    mut trace: StateTrace,
) -> DispatchReport {
    trace.enter(DispatchState::Errored);
    DispatchReport {
        interaction_id: id,
        command,
        outcome: Err(err),
        replies,
        states: trace.states,
    }
}
