//! Line-oriented console front-end over a sample command set.

mod commands;
mod session;

pub use commands::{AdminGuard, SampleCommands};
pub use session::Console;
