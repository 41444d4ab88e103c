//! Subcommand implementations

pub mod profile;
pub mod run;
