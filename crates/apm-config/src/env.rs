//! Environment variable overrides.
//!
//! Applied on top of a file-loaded or default configuration, before
//! validation. License values are never logged.

use tracing::debug;

use crate::agent::{AgentConfig, ConfigError};

pub const ENV_APP_NAME: &str = "APM_APP_NAME";
pub const ENV_LICENSE_KEY: &str = "APM_LICENSE_KEY";
pub const ENV_ENABLED: &str = "APM_ENABLED";
pub const ENV_HIGH_SECURITY: &str = "APM_HIGH_SECURITY";
pub const ENV_SECURITY_POLICIES_TOKEN: &str = "APM_SECURITY_POLICIES_TOKEN";
pub const ENV_DISTRIBUTED_TRACING: &str = "APM_DISTRIBUTED_TRACING_ENABLED";
pub const ENV_CROSS_APPLICATION_TRACER: &str = "APM_CROSS_APPLICATION_TRACER_ENABLED";
pub const ENV_HOST_DISPLAY_NAME: &str = "APM_HOST_DISPLAY_NAME";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut AgentConfig) -> Result<usize, ConfigError> {
    apply_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary lookup. Returns how many were applied.
///
/// On error `config` is left exactly as it was.
pub fn apply_overrides_with<F>(config: &mut AgentConfig, lookup: F) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut next = config.clone();
    let mut applied = 0;

    if let Some(name) = lookup(ENV_APP_NAME) {
        debug!(var = ENV_APP_NAME, value = %name, "env override");
        next.app_name = name;
        applied += 1;
    }
    if let Some(key) = lookup(ENV_LICENSE_KEY) {
        debug!(var = ENV_LICENSE_KEY, len = key.len(), "env override");
        next.license = key.into();
        applied += 1;
    }
    if let Some(token) = lookup(ENV_SECURITY_POLICIES_TOKEN) {
        debug!(var = ENV_SECURITY_POLICIES_TOKEN, "env override");
        next.security_policies_token = token;
        applied += 1;
    }
    if let Some(name) = lookup(ENV_HOST_DISPLAY_NAME) {
        debug!(var = ENV_HOST_DISPLAY_NAME, value = %name, "env override");
        next.host_display_name = name;
        applied += 1;
    }

    let flags: [(&str, &mut bool); 4] = [
        (ENV_ENABLED, &mut next.enabled),
        (ENV_HIGH_SECURITY, &mut next.high_security),
        (ENV_DISTRIBUTED_TRACING, &mut next.distributed_tracer.enabled),
        (
            ENV_CROSS_APPLICATION_TRACER,
            &mut next.cross_application_tracer.enabled,
        ),
    ];
    for (var, slot) in flags {
        if let Some(raw) = lookup(var) {
            *slot = parse_bool(var, &raw)?;
            debug!(var, value = *slot, "env override");
            applied += 1;
        }
    }

    // Only commit once every value parsed.
    *config = next;
    Ok(applied)
}

/// Parse a boolean environment value.
pub fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}
