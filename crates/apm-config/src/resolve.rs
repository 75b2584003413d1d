//! Configuration file discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths →
//! system config → built-in defaults.

use std::path::{Path, PathBuf};

use crate::agent::{AgentConfig, ConfigError, ValidatedConfig};

/// A discovered configuration file path and where it came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to the config file (or None if not found).
    pub path: Option<PathBuf>,

    /// Source of the config (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/apm-agent/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "APM_AGENT_CONFIG";
pub const ENV_CONFIG_DIR: &str = "APM_AGENT_CONFIG_DIR";

/// Standard config file names, in lookup order.
const CONFIG_FILENAMES: [&str; 2] = ["agent.toml", "agent.json"];

/// Application name for XDG directories.
const APP_NAME: &str = "apm-agent";

/// Resolve the configuration file path using the standard resolution order.
///
/// 1. Explicit CLI path (if it exists)
/// 2. APM_AGENT_CONFIG
/// 3. APM_AGENT_CONFIG_DIR + agent.toml / agent.json
/// 4. XDG config directory (~/.config/apm-agent/)
/// 5. System config (/etc/apm-agent/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    resolve_with(cli_path, |key| std::env::var(key).ok())
}

/// Same as [`resolve_config`] with an injectable environment lookup.
pub fn resolve_with<F>(cli_path: Option<&Path>, env: F) -> ConfigPath
where
    F: Fn(&str) -> Option<String>,
{
    // 1. CLI argument
    if let Some(path) = cli_path {
        if path.exists() {
            return found(path.to_path_buf(), ConfigSource::CliArgument);
        }
        tracing::debug!(path = %path.display(), "CLI config path does not exist");
    }

    // 2. Environment variable (direct path)
    if let Some(env_path) = env(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Some(config_dir) = env(ENV_CONFIG_DIR) {
        if let Some(path) = first_config_in(Path::new(&config_dir)) {
            return found(path, ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = first_config_in(&dir) {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    // 5. System config
    if let Some(path) = first_config_in(&system_config_dir()) {
        return found(path, ConfigSource::SystemConfig);
    }

    // 6. Built-in default (None)
    ConfigPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    tracing::debug!(path = %path.display(), %source, "resolved agent config path");
    ConfigPath {
        path: Some(path),
        source,
    }
}

fn first_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

impl ConfigPath {
    /// Load the resolved file, or built-in defaults when nothing was found.
    pub fn load(&self) -> Result<AgentConfig, ConfigError> {
        match &self.path {
            Some(path) => AgentConfig::from_file(path),
            None => Ok(AgentConfig::default()),
        }
    }

    /// Load and validate in one step. Rejections surface as
    /// [`ConfigError::Invalid`].
    pub fn load_validated(&self) -> Result<ValidatedConfig, ConfigError> {
        Ok(self.load()?.validated()?)
    }
}

/// Get the XDG config directory for the agent.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
