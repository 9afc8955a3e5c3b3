//! Command and group definitions, and the registry that resolves them.
//!
//! Commands live in one of three scopes: the ungrouped root, a root group,
//! or a child group of a root group. Two commands may share a name as long
//! as their group paths differ.

mod definition;
mod group;
mod handler;
mod path;
mod registry;

pub use definition::{ArgumentSpec, CommandBuilder, CommandDefinition};
pub use group::GroupDefinition;
pub use handler::{handler_fn, FnHandler, Handler};
pub use path::CommandPath;
pub use registry::{CommandRegistry, Resolution};
