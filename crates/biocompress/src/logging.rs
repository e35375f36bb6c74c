//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Logs go to stderr; stdout is reserved for the response envelope.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `level` is the default directive (e.g. `info`, `biocompress_core=debug`).
/// The RUST_LOG environment variable takes precedence when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// CLI flags can only raise verbosity or switch to JSON, never the reverse.
pub fn init_from_config(
    config: &biocompress_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = default_directive(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

fn default_directive(configured: &str, verbose: bool) -> &str {
    match configured {
        "trace" => "trace",
        _ if verbose => "debug",
        "" => "info",
        other => other,
    }
}
