//! Sdist archive creation.
//!
//! Walks a project tree, applies the exclusion rules, and streams the
//! selected files into a gzip-compressed PAX tar followed by `PKG-INFO`.

pub mod compression;
pub mod walker;

pub mod builder;
pub mod config;
pub mod report;
pub mod tar;

pub use builder::PKG_INFO;
pub use builder::SdistBuilder;
pub use config::SdistConfig;
pub use report::SdistReport;
pub use walker::EntryKind;
pub use walker::SourceEntry;
pub use walker::SourceWalker;
