//! CLI subcommand implementations.

pub mod report;
pub mod reset;
pub mod status;
pub mod track;
