//! Routes build events to stderr for the PEP 517 hooks.

use sdist_core::options::LogLevel;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a stderr subscriber for the rest of the process.
///
/// `RUST_LOG` takes precedence, then `level`, then warnings only. Only the
/// first call in a process installs anything; later calls and hosts that
/// already set a global subscriber are left alone.
pub fn init_logging(level: Option<LogLevel>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level.unwrap_or(LogLevel::Warn))));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn filter_directive(level: LogLevel) -> String {
    format!("sdist_core={level},sdist={level}")
}
