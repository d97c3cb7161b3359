//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sdist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a source distribution from a project directory
    Build(BuildArgs),
    /// List the contents of a built source distribution
    List(ListArgs),
    /// Show whether paths would be left out of the source distribution
    CheckIgnore(CheckIgnoreArgs),
    /// Generate shell completion scripts
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Project directory containing pyproject.toml
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Directory the archive is written to (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = "dist")]
    pub outdir: PathBuf,

    /// Build option as KEY=VALUE (repeatable, like PEP 517 config_settings)
    #[arg(short = 'C', long = "config-setting", value_name = "KEY=VALUE")]
    pub config_settings: Vec<String>,

    /// Gzip compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Clamp timestamps and ownership so rebuilds are byte-identical
    /// (uses SOURCE_DATE_EPOCH when set)
    #[arg(long)]
    pub reproducible: bool,

    /// Write to a temporary file and rename it into place
    #[arg(long)]
    pub atomic: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the .tar.gz archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show mode, size and modification time
    #[arg(short, long)]
    pub long: bool,
}

#[derive(clap::Args)]
pub struct CheckIgnoreArgs {
    /// Project directory whose rules are applied
    #[arg(short, long, value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Paths relative to the project directory
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
