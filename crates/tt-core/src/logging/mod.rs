//! Structured logging for tt-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for scripted use
//!
//! # Usage
//!
//! ```ignore
//! use tt_core::logging::{event_names, init_logging, LogConfig, LogContext, Stage};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id());
//! let _run = ctx.span().entered();
//! tracing::info!(event = event_names::RUN_STARTED, stage = %Stage::Init, "starting");
//! ```
//!
//! stdout is reserved for command payloads (JSON/MD output); all log
//! output goes to stderr.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the event filter from the resolved level.
///
/// `RUST_LOG` is folded into [`LogConfig`] by [`LogConfig::from_env`] and is
/// not re-read here, so `TT_LOG` and `-v`/`-q` keep precedence over it.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::new(format!("tt_core={}", config.level))
}

/// Initialize the logging subsystem.
///
/// Returns `false` when a global subscriber was already installed, which
/// happens when tests in one process initialize logging twice.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    result.is_ok()
}

/// Generate a unique run ID for this invocation: `run-<12 hex chars>`.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_filter_follows_resolved_level() {
        let quiet = LogConfig::from_lookup(
            |key| (key == "RUST_LOG").then(|| "debug".to_string()),
            Some(LogLevel::Error),
            None,
        );
        assert_eq!(build_filter(&quiet).to_string(), "tt_core=error");

        let from_rust_log =
            LogConfig::from_lookup(|key| (key == "RUST_LOG").then(|| "debug".to_string()), None, None);
        assert_eq!(build_filter(&from_rust_log).to_string(), "tt_core=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
