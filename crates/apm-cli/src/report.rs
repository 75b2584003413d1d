//! Command payloads and their rendering.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use apm_config::env::apply_env_overrides;
use apm_config::resolve::{resolve_config, system_config_dir, xdg_config_dir};
use apm_config::{
    validate, validate_all, AgentConfig, ConfigError, ConfigPath, ConfigSnapshot, ConfigSource,
    ValidationError,
};

use crate::exit_codes::ExitCode;

/// Payload output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Render any payload in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, RenderError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Toml => toml::to_string_pretty(value)?,
    })
}

/// One rejection reason in a check report.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub code: u32,
    pub kind: &'static str,
    pub message: String,
}

impl From<&ValidationError> for Violation {
    fn from(err: &ValidationError) -> Self {
        Violation {
            code: err.code(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result of `apm-config check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    pub env_overrides: usize,
    pub violations: Vec<Violation>,
    pub snapshot: ConfigSnapshot,
}

impl CheckReport {
    pub fn exit_code(&self) -> ExitCode {
        if self.valid {
            ExitCode::Clean
        } else {
            ExitCode::ConfigRejected
        }
    }
}

/// Options for [`check`].
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Explicit file; must exist when given.
    pub config: Option<PathBuf>,
    /// Apply APM_* environment overrides.
    pub use_env: bool,
    /// Report every violation instead of the first.
    pub all: bool,
}

/// Load, override, and validate a configuration.
pub fn check(opts: &CheckOptions) -> Result<CheckReport, ConfigError> {
    let origin = match &opts.config {
        Some(path) => ConfigPath {
            path: Some(path.clone()),
            source: ConfigSource::CliArgument,
        },
        None => resolve_config(None),
    };
    let mut config = origin.load()?;

    let env_overrides = if opts.use_env {
        apply_env_overrides(&mut config)?
    } else {
        0
    };

    let violations: Vec<Violation> = if opts.all {
        validate_all(&config).iter().map(Violation::from).collect()
    } else {
        validate(&config)
            .err()
            .iter()
            .map(Violation::from)
            .collect()
    };

    Ok(CheckReport {
        valid: violations.is_empty(),
        env_overrides,
        violations,
        snapshot: ConfigSnapshot::new(&config, &origin),
    })
}

/// Result of `apm-config paths`.
#[derive(Debug, Clone, Serialize)]
pub struct PathsReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xdg_dir: Option<PathBuf>,
    pub system_dir: PathBuf,
}

pub fn paths(cli_path: Option<&Path>) -> PathsReport {
    let resolved = resolve_config(cli_path);
    PathsReport {
        source: resolved.source.to_string(),
        path: resolved.path,
        xdg_dir: xdg_config_dir(),
        system_dir: system_config_dir(),
    }
}

/// Default configuration for the given identity.
pub fn defaults(app_name: &str, license: &str) -> AgentConfig {
    AgentConfig::new(app_name, license)
}
