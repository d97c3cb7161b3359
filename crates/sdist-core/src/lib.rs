//! Source distribution builder for Python projects.
//!
//! `sdist-core` turns a project directory into a PEP 517 source distribution:
//! a gzip-compressed PAX tar named `<name>-<version>.tar.gz` whose entries
//! live under `<name>-<version>/`, with a generated `PKG-INFO` appended.
//! Files are selected with gitignore-style rules: a fixed baseline
//! (version control, tool caches, egg-info, `__pycache__`) followed by the
//! project's own `.gitignore`.
//!
//! # Examples
//!
//! ```no_run
//! use sdist_core::BuildOptions;
//! use sdist_core::build_sdist;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let name = build_sdist("path/to/project", "dist", &BuildOptions::new())?;
//! println!("wrote dist/{name}");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod creation;
pub mod error;
pub mod exclusion;
pub mod inspection;
pub mod io;
pub mod metadata;
pub mod options;
pub mod pyproject;
pub mod types;

pub use api::build_sdist;
pub use api::build_sdist_with_report;
pub use creation::SdistBuilder;
pub use creation::SdistConfig;
pub use creation::SdistReport;
pub use error::Result;
pub use error::SdistError;
pub use exclusion::ExclusionMatcher;
pub use exclusion::ExclusionSpec;
pub use metadata::MetadataDocument;
pub use options::BuildOptions;
pub use options::Settings;
pub use types::OutputDir;
pub use types::ProjectIdentity;
