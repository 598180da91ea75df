//! redline-cli: the `redline` command.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{run, Status};
