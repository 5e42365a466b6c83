//! ---
//! sl_section: "01-core-functionality"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Tracing subscriber setup: console output plus a rolling JSON run log."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "SKYLAPSE_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Writer guards; dropping them would lose buffered lines at exit.
static GUARDS: OnceCell<[WorkerGuard; 2]> = OnceCell::new();

/// Console log format. The run-history file is always JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    StructuredJson,
    #[default]
    Pretty,
}

/// Install the global subscriber: console output in the configured format
/// plus a daily-rolling JSON file under `config.directory`.
///
/// The filter comes from `SKYLAPSE_LOG`, then `RUST_LOG`, then `info`.
/// Calling this twice keeps the first subscriber.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory)?;
    let prefix = config.file_prefix.as_deref().unwrap_or(service_name);

    let (file_writer, file_guard) =
        tracing_appender::non_blocking(daily(&config.directory, format!("{}.log", prefix)));
    let (console_writer, console_guard) = tracing_appender::non_blocking(std::io::stdout());
    let _ = GUARDS.set([file_guard, console_guard]);

    let directive = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();

    tracing_subscriber::registry()
        .with(env_filter(directive.as_deref()))
        .with(console_layer(config.format, console_writer))
        .with(
            fmt::layer()
                .with_timer(UtcTime::rfc_3339())
                .json()
                .with_writer(file_writer),
        )
        .try_init()
        .ok();

    info!(service = %service_name, log_dir = %config.directory.display(), format = ?config.format, "tracing initialised");
    Ok(())
}

fn console_layer<S>(format: LogFormat, writer: NonBlocking) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let layer = fmt::layer()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(writer);
    match format {
        LogFormat::StructuredJson => layer.json().boxed(),
        LogFormat::Pretty => layer.compact().boxed(),
    }
}

/// Filter for `directive`, falling back to `info` when it is missing or
/// does not parse.
fn env_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|directive| match EnvFilter::try_new(directive) {
            Ok(filter) => Some(filter),
            Err(err) => {
                eprintln!(
                    "invalid log filter {:?} ({}); defaulting to {}",
                    directive, err, DEFAULT_DIRECTIVE
                );
                None
            }
        })
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directive_defaults_to_info() {
        assert_eq!(env_filter(None).to_string(), "info");
    }

    #[test]
    fn valid_directive_is_used() {
        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
    }

    #[test]
    fn unparsable_directive_falls_back() {
        assert_eq!(env_filter(Some("skylapse=loudest")).to_string(), "info");
    }
}
