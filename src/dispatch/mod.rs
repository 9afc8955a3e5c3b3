//! Dispatch: raw input to handler invocation.
//!
//! ```text
//! Idle → Tokenizing → Resolving → ArgumentBinding → Guarding → Executing → Done
//!            └────────────┴──────────────┴─────────────────────────┴──────→ Errored
//! ```
//!
//! A guard halt ends in `Done` without running the handler.

mod dispatcher;
mod error;
mod interaction;
mod report;
mod tokenizer;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use interaction::{Arguments, BoundArgument, Interaction, Reply, ReplyKind};
pub use report::{DispatchReport, DispatchState, Outcome};
pub use tokenizer::{Token, TokenStream};
