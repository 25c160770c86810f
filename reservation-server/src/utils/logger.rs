//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level. Output goes to stdout, or to a
//! daily rolling file when a log directory is configured.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "tower_http=info";

/// Initialize the global subscriber
///
/// Calling it a second time is a no-op (tests may race to initialize).
pub fn init_logger(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "reservation_server={level},shared={level},{DEFAULT_DIRECTIVES}"
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_writer = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if let Err(e) = std::fs::create_dir_all(log_path) {
            eprintln!("Cannot create log directory {dir}: {e}; logging to stdout");
            return None;
        }
        Some(tracing_appender::rolling::daily(log_path, "reservation-server"))
    });

    let result = match (file_writer, json.unwrap_or(false)) {
        (Some(writer), true) => builder.json().with_writer(writer).try_init(),
        (Some(writer), false) => builder.with_ansi(false).with_writer(writer).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
