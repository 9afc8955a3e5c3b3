//! Commander: typed command definition and dispatch.
//!
//! ```text
//! raw text → Tokenize → Resolve path → Bind arguments → Guards → Handler
//! ```
//!
//! Types, groups and commands are registered on a [`CommanderBuilder`] and
//! frozen into a [`Commander`], which dispatches input for any number of
//! concurrent callers.

pub mod commander;
pub mod commands;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod identity;
pub mod logging;
pub mod preview;
pub mod types;
pub mod value;

pub use commander::{Commander, CommanderBuilder, Registrar};
pub use commands::{
    handler_fn, ArgumentSpec, CommandDefinition, CommandPath, CommandRegistry, GroupDefinition,
    Handler,
};
pub use dispatch::{
    Arguments, DispatchError, DispatchReport, DispatchState, Dispatcher, Interaction, Outcome,
    Reply, ReplyKind,
};
pub use error::RegistrationError;
pub use guard::{guard_fn, Guard, GuardFlow, Next};
pub use identity::{Principal, PrincipalId, PrincipalProvider, StaticPrincipals};
pub use preview::{Completion, Preview, PreviewTarget};
pub use types::{ResolveError, SuggestionMode, Transform, TypeDefinition, TypeRegistry};
pub use value::Value;
