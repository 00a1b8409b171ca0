//! ---
//! drc_section: "01-core-functionality"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Shared primitives and utilities for the controller runtime."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "R_DRC_LOG";

static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Available log formats for the controller binary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    StructuredJson,
    Pretty,
}

/// Initialize the tracing subscriber based on configuration and environment variables.
///
/// * `R_DRC_LOG` can be set to override the log filter (e.g. `info`, `debug,foo=trace`).
///   When unset the standard `RUST_LOG` variable is honoured, finally defaulting to
///   `debug` to aid troubleshooting.
/// * Structured JSON is emitted to stdout by default which keeps scheduler-captured
///   logs tidy, while a rolling daily log file is created for post-mortem analysis.
///
/// Stdout is written synchronously: a control step is a short-lived process and
/// must not lose its final lines to an unflushed background writer at exit. Only
/// the file appender goes through the non-blocking worker.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory)?;
    let prefix = config
        .file_prefix
        .clone()
        .unwrap_or_else(|| service_name.to_owned());

    let file_appender = daily(&config.directory, format!("{}.log", prefix));
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let _ = FILE_GUARD.set(file_guard);

    // Honour the custom `R_DRC_LOG` directive first, then `RUST_LOG`, then
    // fall back to `debug` so early bring-up always has verbose diagnostics.
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); defaulting to debug logging",
                LOG_ENV, err
            );
            EnvFilter::new("debug")
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
    };

    let fmt_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .with_writer(std::io::stdout)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(std::io::stdout)
            .boxed(),
    };

    let file_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .with_writer(file_writer)
        .boxed();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .ok();

    info!(service = %service_name, log_dir = %config.directory.display(), format = ?config.format, "tracing initialised");
    Ok(())
}
