//! Subcommand implementations.

pub mod build;
pub mod check_ignore;
pub mod completion;
pub mod list;
