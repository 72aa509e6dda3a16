//! Structured logging configuration
//!
//! Diagnostics go to stderr (or a rolling log file) so stdout stays a clean
//! report document for the downstream renderer. JSON and pretty formats are
//! selectable via configuration or the usual env variables.

use crate::config::get_config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the logging system based on configuration.
///
/// Returns the appender guard when file logging is active; the caller must
/// hold it for the lifetime of the process so buffered lines get flushed.
pub fn init_logging() -> Option<WorkerGuard> {
    let config = get_config();

    let log_level = &config.logging.level;
    let log_output = &config.logging.output;
    let log_format = &config.logging.format;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    match log_output.as_str() {
        "file" => init_file_logging(env_filter, log_format, false),
        "both" => init_file_logging(env_filter, log_format, true),
        _ => {
            init_console_logging(env_filter, log_format);
            None
        }
    }
}

fn init_console_logging(filter: EnvFilter, format: &str) {
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
        _ => {
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_ansi(true),
                )
                .init();
        }
    }
}

fn init_file_logging(filter: EnvFilter, format: &str, mirror_to_stderr: bool) -> Option<WorkerGuard> {
    let config = get_config();
    let file_appender =
        tracing_appender::rolling::daily(&config.paths.log_directory, "claude-recap.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter);

    // The mirror layer is built per arm: its subscriber type parameter has
    // to unify with the stack it is layered onto.
    match format {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_writer(non_blocking))
                .with(mirror_to_stderr.then(|| fmt::layer().with_writer(std::io::stderr)))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .with(mirror_to_stderr.then(|| fmt::layer().with_writer(std::io::stderr)))
                .init();
        }
    }

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    // Global subscriber init is once-per-process, so a single test covers
    // the file+mirror path end to end.
    #[test]
    fn test_file_logging_with_stderr_mirror() {
        let log_dir = TempDir::new().unwrap();
        env::set_var("LOG_OUTPUT", "both");
        env::set_var("LOG_FORMAT", "json");
        env::set_var("CLAUDE_RECAP_LOG_DIR", log_dir.path());

        let guard = init_logging();
        assert!(guard.is_some());
        tracing::warn!("logging smoke line");

        env::remove_var("LOG_OUTPUT");
        env::remove_var("LOG_FORMAT");
        env::remove_var("CLAUDE_RECAP_LOG_DIR");
    }
}
