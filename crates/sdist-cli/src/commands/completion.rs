//! Shell completion generation command.

use crate::cli::Cli;
use crate::cli::CompletionArgs;
use clap::CommandFactory;
use std::io;

/// Writes completions for the requested shell to stdout.
pub fn execute(args: &CompletionArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "sdist", &mut io::stdout());
}
