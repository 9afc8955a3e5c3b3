//! Sample command set served by the console.

use std::sync::{Arc, OnceLock};

use anyhow::Context;
use async_trait::async_trait;

use crate::commander::{CommanderBuilder, Registrar};
use crate::commands::{handler_fn, ArgumentSpec, CommandDefinition, GroupDefinition};
use crate::dispatch::Interaction;
use crate::error::RegistrationError;
use crate::guard::{Guard, GuardFlow, Next};
use crate::identity::{PrincipalProvider, StaticPrincipals};

/// Lets only the named principals through.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    admins: Vec<String>,
}

impl AdminGuard {
    pub fn new(admins: Vec<String>) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl Guard for AdminGuard {
    async fn check(&self, interaction: &Interaction, next: Next) -> GuardFlow {
        let name = &interaction.executor().display_name;
        if self.admins.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            next.run()
        } else {
            tracing::info!(executor = %name, command = %interaction.command(), "Permission denied");
            GuardFlow::halt_with("You do not have permission to use this command")
        }
    }
}

/// `kick`, `say`, `info user view`, `info server view` and `help`.
pub struct SampleCommands {
    roster: Arc<StaticPrincipals>,
    admins: Vec<String>,
    help: Arc<OnceLock<Vec<String>>>,
}

impl SampleCommands {
    /// `help` is filled in once the commander is built.
    pub fn new(
        roster: Arc<StaticPrincipals>,
        admins: Vec<String>,
        help: Arc<OnceLock<Vec<String>>>,
    ) -> Self {
        Self { roster, admins, help }
    }
}

impl Registrar for SampleCommands {
    fn register(&self, builder: &mut CommanderBuilder) -> Result<(), RegistrationError> {
        builder.register_group(GroupDefinition::root("info", "Look things up"))?;
        builder.register_group(GroupDefinition::child("info", "user", "Player details"))?;
        builder.register_group(GroupDefinition::child("info", "server", "Server details"))?;

        let roster = Arc::clone(&self.roster);
        builder.register_command(
            CommandDefinition::builder("kick")
                .description("Disconnect players")
                .argument(ArgumentSpec::new("player", "player"))
                .argument(ArgumentSpec::new("reason", "text").optional())
                .guard(AdminGuard::new(self.admins.clone()))
                .handler(handler_fn(move |ix, args| {
                    let targets = args.get("player").context("player is required")?;
                    let reason = args.text("reason");
                    for target in targets.principals() {
                        if roster.leave(target.id).is_none() {
                            ix.error(format!("{} already left", target));
                            continue;
                        }
                        match reason {
                            Some(reason) => ix.reply(format!("Kicked {}: {}", target, reason)),
                            None => ix.reply(format!("Kicked {}", target)),
                        }
                    }
                    Ok(())
                })),
        )?;

        builder.register_command(
            CommandDefinition::builder("say")
                .description("Broadcast a message")
                .argument(ArgumentSpec::new("message", "text"))
                .handler(handler_fn(|ix, args| {
                    let message = args.text("message").context("message is required")?;
                    ix.reply(format!("[{}] {}", ix.executor(), message));
                    Ok(())
                })),
        )?;

        builder.register_command(
            CommandDefinition::builder("view")
                .group(&["info", "user"])
                .description("Show a player")
                .argument(ArgumentSpec::new("player", "player"))
                .handler(handler_fn(|ix, args| {
                    let targets = args.get("player").context("player is required")?;
                    for target in targets.principals() {
                        ix.reply(format!("{} (id {})", target, target.id));
                    }
                    Ok(())
                })),
        )?;

        let roster = Arc::clone(&self.roster);
        builder.register_command(
            CommandDefinition::builder("view")
                .group(&["info", "server"])
                .description("Show who is connected")
                .handler(handler_fn(move |ix, _| {
                    let names: Vec<String> = roster
                        .list_principals()
                        .into_iter()
                        .map(|p| p.display_name)
                        .collect();
                    ix.reply(format!("{} connected: {}", names.len(), names.join(", ")));
                    Ok(())
                })),
        )?;

        let help = Arc::clone(&self.help);
        builder.register_command(
            CommandDefinition::builder("help")
                .description("List commands")
                .handler(handler_fn(move |ix, _| {
                    for line in help.get().context("help is not ready")? {
                        ix.reply(line.clone());
                    }
                    Ok(())
                })),
        )
    }
}
