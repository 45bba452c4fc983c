//! Diagnostics for the outliner CLI
//!
//! Console verbosity comes from `OUTLINER_LOG`, then `RUST_LOG`, then `warn`:
//! - `OUTLINER_LOG=debug` shows tolerated anomalies such as unmatched
//!   closing tags or stray `}`
//! - `OUTLINER_LOG=outliner::outline=trace` echoes every finished tree
//!
//! A debug-level copy goes to `logs/outliner.log` in the config directory,
//! rotated daily.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_ENV: &str = "OUTLINER_LOG";
const LOG_FILE: &str = "outliner.log";

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the stderr console layer and, when possible, the log file layer
///
/// Console output goes to stderr so it never mixes with printed outlines.
pub fn init() {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter());

    let file_layer = crate::config_paths::ensure_logs_dir()
        .map_err(|e| eprintln!("outliner: file logging disabled: {}", e))
        .ok()
        .map(|logs| {
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(logs, LOG_FILE))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug"))
        });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
