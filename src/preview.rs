//! Live preview of partially typed input.
//!
//! Preview never creates an interaction, never runs guards or handlers, and
//! never consults the suggestion provider of an expensive type.

use serde::Serialize;

use crate::commands::{CommandPath, CommandRegistry};
use crate::dispatch::TokenStream;
use crate::types::{ResolveError, SuggestionMode, TypeRegistry};

/// A completion suggestion
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Completion {
    /// The actual value to insert
    pub value: String,

    /// Optional description for help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Completion {
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(value: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            value: value.into(),
            description: (!description.is_empty()).then_some(description),
        }
    }
}

/// What the word under the cursor is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewTarget {
    /// Past the last declared argument, or nothing resolvable.
    None,
    /// A group or command name.
    Path,
    /// A declared argument of the resolved command.
    Argument { name: String, type_name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    /// Command the input resolves to so far, if any.
    pub command: Option<CommandPath>,
    pub target: PreviewTarget,
    pub completions: Vec<Completion>,
    /// Outcome of resolving the argument being typed. `None` when there is
    /// nothing to check yet.
    pub validation: Option<Result<(), ResolveError>>,
}

impl Preview {
    fn empty(command: Option<CommandPath>) -> Self {
        Self {
            command,
            target: PreviewTarget::None,
            completions: Vec::new(),
            validation: None,
        }
    }
}

pub(crate) async fn preview(
    types: &TypeRegistry,
    commands: &CommandRegistry,
    input: &str,
    limit: usize,
) -> Preview {
    let stream = TokenStream::new(input);
    let texts = stream.texts();

    // The last token is still being typed unless the input ends in whitespace.
    let (context, partial) = match texts.split_last() {
        Some((last, rest)) if !stream.ends_with_whitespace() => (rest, *last),
        _ => (texts.as_slice(), ""),
    };

    let Some(resolution) = commands.resolve(context) else {
        return complete_path(commands, &texts, context, partial);
    };

    let command = resolution.command;
    let path = command.path();
    let specs = command.arguments();
    let mut index = context.len() - resolution.consumed;

    if index >= specs.len() {
        match specs.last() {
            Some(last) if types.is_greedy(&last.type_name) => index = specs.len() - 1,
            _ => return Preview::empty(Some(path)),
        }
    }
    let spec = &specs[index];

    let completions = types
        .list_suggestions(&spec.type_name, partial, SuggestionMode::Live)
        .into_iter()
        .take(limit)
        .map(Completion::simple)
        .collect();

    let typed = if types.is_greedy(&spec.type_name) && index + 1 == specs.len() {
        stream.raw_rest(resolution.consumed + index)
    } else {
        partial
    };

    let validation = if typed.is_empty() {
        None
    } else if types.get(&spec.type_name).is_some_and(|t| t.is_expensive()) {
        Some(types.validate(&spec.type_name, typed))
    } else {
        Some(types.resolve(&spec.type_name, typed).await.map(|_| ()))
    };

    Preview {
        command: Some(path),
        target: PreviewTarget::Argument {
            name: spec.name.clone(),
            type_name: spec.type_name.clone(),
        },
        completions,
        validation,
    }
}

/// Complete a group or command name in the scope named by `context`.
fn complete_path(
    commands: &CommandRegistry,
    texts: &[&str],
    context: &[&str],
    partial: &str,
) -> Preview {
    let scope = commands.match_scope(context);
    if scope.len() != context.len() {
        return Preview::empty(None);
    }

    let prefix = partial.to_lowercase();
    let groups = commands
        .groups_in(&scope)
        .into_iter()
        .map(|g| (g.name.to_lowercase(), g.description.as_str()));
    let names = commands
        .commands_in(&scope)
        .into_iter()
        .map(|c| (c.name().to_lowercase(), c.description()));

    let mut completions: Vec<Completion> = groups
        .chain(names)
        .filter(|(name, _)| name.starts_with(&prefix))
        .map(|(name, description)| Completion::with_description(name, description))
        .collect();
    completions.sort_by(|a, b| a.value.cmp(&b.value));
    completions.dedup_by(|a, b| a.value == b.value);

    Preview {
        command: commands.resolve(texts).map(|r| r.command.path()),
        target: PreviewTarget::Path,
        completions,
        validation: None,
    }
}
