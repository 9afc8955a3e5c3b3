//! Command handlers.

use async_trait::async_trait;

use crate::dispatch::{Arguments, Interaction};

/// Runs a command once its arguments are bound and every guard has passed.
///
/// Returned errors and panics are reported as handler failures; they never
/// escape the dispatcher.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, interaction: &Interaction, args: &Arguments) -> anyhow::Result<()>;
}

/// Adapter for synchronous closures. See [`handler_fn`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&Interaction, &Arguments) -> anyhow::Result<()> + Send + Sync,
{
    async fn handle(&self, interaction: &Interaction, args: &Arguments) -> anyhow::Result<()> {
        (self.0)(interaction, args)
    }
}

/// Wrap a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Interaction, &Arguments) -> anyhow::Result<()> + Send + Sync,
{
    FnHandler(f)
}
