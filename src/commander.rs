//! Process-wide command context.
//!
//! Initialization order: types, then groups, then commands, then
//! [`CommanderBuilder::build`]. A built [`Commander`] is immutable; it is
//! cheap to clone and safe to share across tasks.

use std::sync::Arc;
use std::time::Duration;

use crate::commands::{CommandDefinition, CommandRegistry, GroupDefinition};
use crate::config::DispatchConfig;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::error::RegistrationError;
use crate::identity::{Principal, PrincipalProvider};
use crate::preview::{self, Preview};
use crate::types::{builtins, ResolveError, SuggestionMode, TypeDefinition, TypeRegistry};
use crate::value::Value;

/// Something that registers definitions, e.g. a module of related commands.
pub trait Registrar {
    fn register(&self, builder: &mut CommanderBuilder) -> Result<(), RegistrationError>;
}

/// Collects definitions before any dispatch happens.
#[derive(Debug)]
pub struct CommanderBuilder {
    types: TypeRegistry,
    commands: CommandRegistry,
    live_suggestion_limit: usize,
}

impl Default for CommanderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommanderBuilder {
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
            commands: CommandRegistry::new(),
            live_suggestion_limit: DispatchConfig::default().live_suggestion_limit,
        }
    }

    /// Apply dispatch settings (transform timeout, preview limits).
    pub fn with_config(mut self, config: &DispatchConfig) -> Self {
        self.types
            .set_transform_timeout(config.transform_timeout_ms.map(Duration::from_millis));
        self.live_suggestion_limit = config.live_suggestion_limit;
        self
    }

    /// Register the built-in types, resolving principals through `principals`.
    pub fn with_builtin_types(
        mut self,
        principals: Arc<dyn PrincipalProvider>,
    ) -> Result<Self, RegistrationError> {
        builtins::register_builtin_types(&mut self.types, principals)?;
        Ok(self)
    }

    pub fn register_type(&mut self, def: TypeDefinition) -> Result<(), RegistrationError> {
        self.types.register_type(def)
    }

    pub fn register_types(
        &mut self,
        defs: impl IntoIterator<Item = TypeDefinition>,
    ) -> Result<(), RegistrationError> {
        self.types.register_types(defs)
    }

    pub fn register_group(&mut self, def: GroupDefinition) -> Result<(), RegistrationError> {
        self.commands.register_group(def)
    }

    pub fn register_command(&mut self, def: CommandDefinition) -> Result<(), RegistrationError> {
        self.commands.register_command(def)
    }

    pub fn register_with<R: Registrar + ?Sized>(
        &mut self,
        registrar: &R,
    ) -> Result<(), RegistrationError> {
        registrar.register(self)
    }

    /// Freeze the registries.
    ///
    /// # Errors
    /// Fails if any command argument names a type that was never registered.
    pub fn build(self) -> Result<Commander, RegistrationError> {
        for command in self.commands.commands() {
            for arg in command.arguments() {
                if !self.types.contains(&arg.type_name) {
                    return Err(RegistrationError::UnknownArgumentType {
                        command: command.path().to_string(),
                        argument: arg.name.clone(),
                        type_name: arg.type_name.clone(),
                    });
                }
            }
        }

        tracing::info!(
            types = self.types.len(),
            commands = self.commands.len(),
            "Commander initialized"
        );

        Ok(Commander {
            inner: Arc::new(Registries {
                types: self.types,
                commands: self.commands,
                live_suggestion_limit: self.live_suggestion_limit,
            }),
        })
    }
}

#[derive(Debug)]
struct Registries {
    types: TypeRegistry,
    commands: CommandRegistry,
    live_suggestion_limit: usize,
}

/// Frozen registries plus the dispatch entry points.
#[derive(Debug, Clone)]
pub struct Commander {
    inner: Arc<Registries>,
}

impl Commander {
    pub fn builder() -> CommanderBuilder {
        CommanderBuilder::new()
    }

    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.inner.types, &self.inner.commands)
    }

    /// Dispatch `raw` as `executor`. Errors are reported, never raised.
    pub async fn run(&self, raw: &str, executor: &Principal) -> DispatchReport {
        self.dispatcher().run(raw, executor).await
    }

    /// Non-committing resolve of `text` through a type.
    pub async fn resolve(&self, type_name: &str, text: &str) -> Result<Value, ResolveError> {
        self.inner.types.resolve(type_name, text).await
    }

    pub fn list_suggestions(&self, type_name: &str, partial: &str, mode: SuggestionMode) -> Vec<String> {
        self.inner.types.list_suggestions(type_name, partial, mode)
    }

    /// Live feedback for partially typed input.
    pub async fn preview(&self, input: &str) -> Preview {
        preview::preview(
            &self.inner.types,
            &self.inner.commands,
            input,
            self.inner.live_suggestion_limit,
        )
        .await
    }

    /// Usage lines for every command, sorted by path.
    pub fn help(&self) -> Vec<String> {
        self.inner
            .commands
            .commands()
            .into_iter()
            .map(|c| {
                if c.description().is_empty() {
                    c.usage()
                } else {
                    format!("{} - {}", c.usage(), c.description())
                }
            })
            .collect()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.inner.types
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.inner.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{handler_fn, ArgumentSpec};

    struct Moderation;

    impl Registrar for Moderation {
        fn register(&self, builder: &mut CommanderBuilder) -> Result<(), RegistrationError> {
            builder.register_group(GroupDefinition::root("mod", "Moderation"))?;
            builder.register_command(
                CommandDefinition::builder("warn")
                    .group(&["mod"])
                    .description("Warn a player")
                    .argument(ArgumentSpec::new("player", "player"))
                    .argument(ArgumentSpec::new("reason", "text").optional())
                    .handler(handler_fn(|_, _| Ok(()))),
            )
        }
    }

    #[test]
    fn build_rejects_unknown_argument_types() {
        let mut builder = Commander::builder();
        builder.register_with(&Moderation).unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownArgumentType { .. }));
    }

    #[test]
    fn help_lists_usage_with_descriptions() {
        let roster = Arc::new(crate::identity::StaticPrincipals::default());
        let mut builder = Commander::builder().with_builtin_types(roster).unwrap();
        builder.register_with(&Moderation).unwrap();
        let commander = builder.build().unwrap();

        assert_eq!(commander.help(), vec!["mod warn <player> [reason] - Warn a player"]);
    }
}
