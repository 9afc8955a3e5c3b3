//! Shared test utilities.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use commander::{
    Arguments, CommanderBuilder, Commander, GroupDefinition, Handler, Interaction, Principal,
    PrincipalProvider, StaticPrincipals,
};
use parking_lot::Mutex;

pub fn alice() -> Principal {
    Principal::new(1, "Alice")
}

pub fn bob() -> Principal {
    Principal::new(2, "Bob")
}

pub fn roster() -> Arc<StaticPrincipals> {
    Arc::new(StaticPrincipals::new(vec![alice(), bob()]))
}

/// Builder with built-in types and the `info`, `info user`, `info server` groups.
pub fn builder(roster: Arc<StaticPrincipals>) -> CommanderBuilder {
    let provider: Arc<dyn PrincipalProvider> = roster;
    let mut builder = Commander::builder()
        .with_builtin_types(provider)
        .expect("builtin types register");
    builder
        .register_group(GroupDefinition::root("info", "Look things up"))
        .unwrap();
    builder
        .register_group(GroupDefinition::child("info", "user", "Player details"))
        .unwrap();
    builder
        .register_group(GroupDefinition::child("info", "server", "Server details"))
        .unwrap();
    builder
}

/// Records the arguments of every invocation.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Arguments>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Arguments> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Handler for Recorder {
    async fn handle(&self, interaction: &Interaction, args: &Arguments) -> anyhow::Result<()> {
        interaction.reply(format!("ran {}", interaction.command()));
        self.calls.lock().push(args.clone());
        Ok(())
    }
}
