//! Logging utilities for the WhereToMeet application.
//!
//! All crates log through `tracing`. The binary calls [`init_from_config`]
//! once at startup; tests may call [`init`] freely since initialisation is
//! idempotent.

use std::str::FromStr;

use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wheretomeet_config::LoggingConfig;

/// Initialize the tracing subscriber at INFO.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level for the
/// workspace crates. `RUST_LOG` directives are honoured on top of it.
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(build_filter(level))
        .try_init();

    // try_init fails when a global subscriber is already set; that is fine.
    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// When `directory` is set, a daily rolling file layer is added next to the
/// console output. The returned guard flushes the file writer on drop and must
/// be held for the lifetime of the process.
pub fn init_from_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);

    let Some(directory) = config.directory.as_deref() else {
        init_with_level(level);
        return None;
    };

    let appender = tracing_appender::rolling::daily(directory, "wheretomeet.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(build_filter(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {} (files in {})", level, directory);
    }
    Some(guard)
}

fn build_filter(level: Level) -> EnvFilter {
    // Target matching is by prefix, so this covers every wheretomeet_* crate.
    let filter = EnvFilter::from_default_env();
    match format!("wheretomeet={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
