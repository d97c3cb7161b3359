//! sdist CLI - builds and inspects Python source distributions.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use sdist_core::options::LogLevel;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(default_level(&cli));
    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Build(args) => commands::build::execute(args, &*formatter),
        cli::Commands::List(args) => commands::list::execute(args, &*formatter),
        cli::Commands::CheckIgnore(args) => commands::check_ignore::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args);
            Ok(())
        }
    };

    if let Err(err) = &result
        && cli.json
    {
        formatter.format_error(err);
    }
    result
}

/// Level used when `RUST_LOG` is unset: `-v`/`-q` first, then the build's
/// `logging.level` option, then warnings only.
fn default_level(cli: &cli::Cli) -> LogLevel {
    if cli.verbose {
        return LogLevel::Debug;
    }
    if cli.quiet {
        return LogLevel::Error;
    }
    match &cli.command {
        cli::Commands::Build(args) => commands::build::log_level(args).unwrap_or(LogLevel::Warn),
        _ => LogLevel::Warn,
    }
}

/// Logs go to stderr so stdout stays clean for results and JSON.
fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sdist_core={level},sdist={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
