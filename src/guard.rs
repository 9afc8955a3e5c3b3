//! Guard chain executor.
//!
//! A guard receives the interaction and a single-use continuation. Calling
//! [`Next::run`] is the only way to obtain a flow that lets the chain
//! proceed; returning [`GuardFlow::halt`] (or anything else) stops it.
//!
//! ```text
//! guard 1 ──next──→ guard 2 ──next──→ … ──next──→ handler
//!    │                 │
//!    └── halt ─────────┴──→ Done (handler never runs)
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::Interaction;

/// Continuation handed to each guard. Consumed by [`Next::run`].
#[derive(Debug)]
pub struct Next {
    _private: (),
}

impl Next {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// Let the chain continue with the next guard (or the handler).
    pub fn run(self) -> GuardFlow {
        GuardFlow(Flow::Continue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Halt(Option<String>),
}

/// What a guard decided.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardFlow(Flow);

impl GuardFlow {
    /// Stop silently.
    pub fn halt() -> Self {
        GuardFlow(Flow::Halt(None))
    }

    /// Stop and surface `message` to the executor.
    pub fn halt_with(message: impl Into<String>) -> Self {
        GuardFlow(Flow::Halt(Some(message.into())))
    }

    pub fn is_continue(&self) -> bool {
        self.0 == Flow::Continue
    }
}

/// A pre-execution gate.
///
/// Halting is not an error: it is how permission checks deny a command.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self, interaction: &Interaction, next: Next) -> GuardFlow;
}

/// Adapter for synchronous closures. See [`guard_fn`].
pub struct FnGuard<F>(F);

#[async_trait]
impl<F> Guard for FnGuard<F>
where
    F: Fn(&Interaction, Next) -> GuardFlow + Send + Sync,
{
    async fn check(&self, interaction: &Interaction, next: Next) -> GuardFlow {
        (self.0)(interaction, next)
    }
}

/// Wrap a closure as a [`Guard`].
pub fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&Interaction, Next) -> GuardFlow + Send + Sync,
{
    FnGuard(f)
}

/// Result of running a whole chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every guard called its continuation.
    Proceed,
    /// Guard `index` stopped the chain.
    Halted {
        index: usize,
        message: Option<String>,
    },
}

/// Run `guards` in order, each at most once, stopping at the first halt.
pub async fn run_chain(guards: &[Arc<dyn Guard>], interaction: &Interaction) -> ChainOutcome {
    for (index, guard) in guards.iter().enumerate() {
        match guard.check(interaction, Next::new()).await {
            GuardFlow(Flow::Continue) => {
                tracing::trace!(guard = index, "Guard passed");
            }
            GuardFlow(Flow::Halt(message)) => {
                tracing::debug!(guard = index, message = ?message, "Guard halted chain");
                return ChainOutcome::Halted { index, message };
            }
        }
    }
    ChainOutcome::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandPath;
    use crate::identity::Principal;
    use parking_lot::Mutex;

    fn interaction() -> Interaction {
        Interaction::new(
            uuid::Uuid::new_v4(),
            Principal::new(1, "Alice"),
            "kick Bob",
            CommandPath::new::<&str>(&[], "kick"),
        )
    }

    fn recording(log: &Arc<Mutex<Vec<usize>>>, id: usize, pass: bool) -> Arc<dyn Guard> {
        let log = Arc::clone(log);
        Arc::new(guard_fn(move |_, next| {
            log.lock().push(id);
            if pass {
                next.run()
            } else {
                GuardFlow::halt_with(format!("guard {} says no", id))
            }
        }))
    }

    #[tokio::test]
    async fn runs_in_order_until_halt() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let guards = vec![
            recording(&log, 1, true),
            recording(&log, 2, false),
            recording(&log, 3, true),
        ];

        let outcome = run_chain(&guards, &interaction()).await;
        assert_eq!(
            outcome,
            ChainOutcome::Halted {
                index: 1,
                message: Some("guard 2 says no".to_string())
            }
        );
        assert_eq!(*log.lock(), vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_chain_proceeds() {
        assert_eq!(run_chain(&[], &interaction()).await, ChainOutcome::Proceed);
    }

    #[tokio::test]
    async fn dropping_next_halts_silently() {
        let guards: Vec<Arc<dyn Guard>> = vec![Arc::new(guard_fn(|_, _next| GuardFlow::halt()))];
        assert_eq!(
            run_chain(&guards, &interaction()).await,
            ChainOutcome::Halted {
                index: 0,
                message: None
            }
        );
    }
}
