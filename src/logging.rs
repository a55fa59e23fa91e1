use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging, plus a daily-rolling JSON log file when a
/// log directory is configured. The returned guard flushes the file writer
/// when dropped, so the caller holds it until exit.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let directive: Directive = "gwosc_fetcher=info"
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::from_default_env().add_directive(directive);

    // Console layer writes to stderr so operator println! output stays readable
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let mut guard = None;
    let file_layer = config.directory.as_ref().and_then(|dir| {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Could not create log directory {}: {}", dir.display(), e);
            return None;
        }
        let file_appender = tracing_appender::rolling::daily(dir, "gwosc_fetcher.log");
        let (non_blocking_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);
        Some(fmt::layer().json().with_writer(non_blocking_writer))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
