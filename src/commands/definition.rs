//! Command definitions and their builder.

use std::fmt;
use std::sync::Arc;

use crate::commands::handler::Handler;
use crate::commands::path::CommandPath;
use crate::guard::Guard;

/// A declared command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub description: String,
    /// Name of a registered type.
    pub type_name: String,
    pub optional: bool,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            type_name: type_name.into(),
            optional: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// `<name>` for required arguments, `[name]` for optional ones.
    pub fn usage(&self) -> String {
        if self.optional {
            format!("[{}]", self.name)
        } else {
            format!("<{}>", self.name)
        }
    }
}

/// A registered command: name, scope, typed arguments, guards and handler.
#[derive(Clone)]
pub struct CommandDefinition {
    name: String,
    description: String,
    group_path: Vec<String>,
    arguments: Vec<ArgumentSpec>,
    guards: Vec<Arc<dyn Guard>>,
    handler: Arc<dyn Handler>,
}

impl CommandDefinition {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            description: String::new(),
            group_path: Vec::new(),
            arguments: Vec::new(),
            guards: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group_path(&self) -> &[String] {
        &self.group_path
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn guards(&self) -> &[Arc<dyn Guard>] {
        &self.guards
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    /// Registry key for this command.
    pub fn path(&self) -> CommandPath {
        CommandPath::new(&self.group_path, &self.name)
    }

    /// One-line usage, e.g. `info user view <player> [reason]`.
    pub fn usage(&self) -> String {
        let mut parts: Vec<String> = self.group_path.clone();
        parts.push(self.name.clone());
        parts.extend(self.arguments.iter().map(ArgumentSpec::usage));
        parts.join(" ")
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("group_path", &self.group_path)
            .field("arguments", &self.arguments)
            .field("guards", &self.guards.len())
            .finish()
    }
}

/// Builder for [`CommandDefinition`]. Finished by [`CommandBuilder::handler`].
pub struct CommandBuilder {
    name: String,
    description: String,
    group_path: Vec<String>,
    arguments: Vec<ArgumentSpec>,
    guards: Vec<Arc<dyn Guard>>,
}

impl CommandBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Place the command under a group path (root first).
    pub fn group<S: AsRef<str>>(mut self, path: &[S]) -> Self {
        self.group_path = path.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    /// Append a guard. Guards run in the order they were added.
    pub fn guard<G: Guard + 'static>(mut self, guard: G) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn shared_guard(mut self, guard: Arc<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn handler<H: Handler + 'static>(self, handler: H) -> CommandDefinition {
        CommandDefinition {
            name: self.name,
            description: self.description,
            group_path: self.group_path,
            arguments: self.arguments,
            guards: self.guards,
            handler: Arc::new(handler),
        }
    }
}
