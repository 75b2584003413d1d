//! Logging setup for the apm-config CLI.
//!
//! Supports configuration via:
//! - Environment variables (APM_LOG, RUST_LOG, APM_LOG_FORMAT)
//! - CLI flags (--log-level, --log-format)
//!
//! stdout is reserved for command payloads; all log output goes to stderr.

use clap::ValueEnum;
use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    #[value(alias = "pretty")]
    Human,
    /// Machine-parseable JSON lines.
    #[value(alias = "json")]
    Jsonl,
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Default; keeps stderr quiet unless a config is rejected.
    #[default]
    #[value(alias = "warning")]
    Warn,
    Error,
    /// Completely silent.
    #[value(aliases = ["none", "quiet"])]
    Off,
}

impl LogLevel {
    /// Directive name understood by `EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Case-insensitive lookup of a clap value, aliases included.
fn parse_value<T: ValueEnum>(raw: &str) -> Option<T> {
    T::from_str(raw.trim(), true).ok()
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Minimum log level.
    pub level: LogLevel,
}

impl LogConfig {
    /// Create config from environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(cli_level, cli_format, |key| std::env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with an injectable environment lookup.
    pub fn from_lookup<F>(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        // APM_LOG takes precedence over RUST_LOG
        if let Some(val) = env("APM_LOG") {
            if let Some(level) = parse_value(&val) {
                config.level = level;
            }
        } else if let Some(val) = env("RUST_LOG") {
            // Most verbose level named anywhere in the directive.
            let named = [LogLevel::Trace, LogLevel::Debug, LogLevel::Info, LogLevel::Error]
                .into_iter()
                .find(|level| val.contains(level.as_str()));
            if let Some(level) = named {
                config.level = level;
            }
        }

        if let Some(format) = env("APM_LOG_FORMAT").as_deref().and_then(parse_value) {
            config.format = format;
        }

        // CLI overrides take final precedence
        if let Some(level) = cli_level {
            config.level = level;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    /// Directive string for the env filter.
    pub fn filter_directive(&self) -> String {
        format!("apm_config={level},apm_cli={level}", level = self.level.as_str())
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::new(config.filter_directive());

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}
