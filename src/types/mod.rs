//! Type registry and resolver.
//!
//! A type is a named validator + transformer + suggestion triple that turns
//! raw argument text into a [`Value`](crate::value::Value).

pub mod builtins;
mod definition;
mod error;
mod registry;

pub use definition::{SuggestionProvider, Transform, TypeDefinition, Validator};
pub use error::ResolveError;
pub use registry::{SuggestionMode, TypeRegistry};
