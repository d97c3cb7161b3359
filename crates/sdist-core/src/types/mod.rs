//! Validated value types for sdist builds.
//!
//! Each type checks its invariants on construction, so the archive builder
//! never has to re-validate names or directories it receives.

pub mod identity;
pub mod output_dir;

pub use identity::ProjectIdentity;
pub use output_dir::OutputDir;
