//! Focus tracker CLI: argument parsing, configuration, and commands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod sink;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use sink::DbSink;
