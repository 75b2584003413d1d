//! Configuration validation errors and semantic validation.

use thiserror::Error;
use tracing::{debug, warn};

use crate::agent::AgentConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Exact license length in bytes required while the agent is enabled.
pub const LICENSE_LENGTH: usize = 40;

/// The app name must contain fewer than this many rollup delimiters.
pub const APP_NAME_LIMIT: usize = 3;

/// Separates rollup application names inside `app_name`.
pub const ROLLUP_DELIMITER: char = ';';

/// Reasons a configuration is rejected.
///
/// Variants are listed in the order [`validate`] checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("license length is not {}", LICENSE_LENGTH)]
    LicenseLength,

    #[error("string AppName required")]
    AppNameMissing,

    #[error(
        "SecurityPoliciesToken and HighSecurity are incompatible; please ensure HighSecurity is set to false if SecurityPoliciesToken is a non-empty string and a security policy has been set for your account"
    )]
    HighSecurityWithSecurityPolicies,

    #[error(
        "CrossApplicationTracer and DistributedTracer cannot be enabled simultaneously; please choose CrossApplicationTracer (available since v1.11) or DistributedTracer (available since v2.1)"
    )]
    MixedTracers,

    #[error("max of {} rollup application names", APP_NAME_LIMIT)]
    AppNameLimit,
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::LicenseLength => 70,
            ValidationError::AppNameMissing => 71,
            ValidationError::HighSecurityWithSecurityPolicies => 72,
            ValidationError::MixedTracers => 73,
            ValidationError::AppNameLimit => 74,
        }
    }

    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::LicenseLength => "license_length",
            ValidationError::AppNameMissing => "app_name_missing",
            ValidationError::HighSecurityWithSecurityPolicies => "security_policy_conflict",
            ValidationError::MixedTracers => "tracing_strategy_conflict",
            ValidationError::AppNameLimit => "too_many_rollup_names",
        }
    }
}

type Check = fn(&AgentConfig) -> ValidationResult<()>;

/// Checks in evaluation order.
const CHECKS: [Check; 5] = [
    check_license,
    check_app_name_present,
    check_security_posture,
    check_tracers,
    check_rollup_names,
];

/// Validate a configuration, stopping at the first violation.
pub fn validate(config: &AgentConfig) -> ValidationResult<()> {
    for check in CHECKS {
        if let Err(err) = check(config) {
            warn!(kind = err.kind(), code = err.code(), "agent config rejected: {err}");
            return Err(err);
        }
    }
    debug!(app_name = %config.app_name, enabled = config.enabled, "agent config accepted");
    Ok(())
}

/// Validate a configuration and report every violation, in check order.
pub fn validate_all(config: &AgentConfig) -> Vec<ValidationError> {
    let errors: Vec<ValidationError> = CHECKS
        .iter()
        .filter_map(|check| check(config).err())
        .collect();
    if !errors.is_empty() {
        warn!(count = errors.len(), "agent config has violations");
    }
    errors
}

fn check_license(config: &AgentConfig) -> ValidationResult<()> {
    let len = config.license.len();
    // An empty license is acceptable only while the agent is disabled.
    let acceptable = len == LICENSE_LENGTH || (!config.enabled && len == 0);
    if acceptable {
        Ok(())
    } else {
        Err(ValidationError::LicenseLength)
    }
}

fn check_app_name_present(config: &AgentConfig) -> ValidationResult<()> {
    if config.enabled && config.app_name.is_empty() {
        return Err(ValidationError::AppNameMissing);
    }
    Ok(())
}

fn check_security_posture(config: &AgentConfig) -> ValidationResult<()> {
    if config.high_security && !config.security_policies_token.is_empty() {
        return Err(ValidationError::HighSecurityWithSecurityPolicies);
    }
    Ok(())
}

fn check_tracers(config: &AgentConfig) -> ValidationResult<()> {
    if config.cross_application_tracer.enabled && config.distributed_tracer.enabled {
        return Err(ValidationError::MixedTracers);
    }
    Ok(())
}

fn check_rollup_names(config: &AgentConfig) -> ValidationResult<()> {
    let delimiters = config.app_name.matches(ROLLUP_DELIMITER).count();
    if delimiters >= APP_NAME_LIMIT {
        return Err(ValidationError::AppNameLimit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license() -> String {
        "0123456789012345678901234567890123456789".to_string()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AgentConfig::new("svc", license());
        assert!(validate(&config).is_ok());
        assert!(validate_all(&config).is_empty());
    }

    #[test]
    fn test_license_length() {
        let config = AgentConfig::new("svc", "short");
        assert_eq!(validate(&config), Err(ValidationError::LicenseLength));

        let mut disabled = AgentConfig::new("svc", "");
        disabled.enabled = false;
        assert!(validate(&disabled).is_ok());

        disabled.license = "short".into();
        assert_eq!(validate(&disabled), Err(ValidationError::LicenseLength));
    }

    #[test]
    fn test_license_checked_before_app_name() {
        let config = AgentConfig::new("", "");
        assert_eq!(validate(&config), Err(ValidationError::LicenseLength));
    }

    #[test]
    fn test_app_name_required_only_when_enabled() {
        let mut config = AgentConfig::new("", license());
        assert_eq!(validate(&config), Err(ValidationError::AppNameMissing));
        config.enabled = false;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rollup_limit_boundary() {
        let config = AgentConfig::new("a;b;c", license());
        assert!(validate(&config).is_ok());

        let config = AgentConfig::new("a;b;c;d", license());
        assert_eq!(validate(&config), Err(ValidationError::AppNameLimit));
    }

    #[test]
    fn test_validate_all_preserves_check_order() {
        let mut config = AgentConfig::new("a;b;c;d", "bad");
        config.high_security = true;
        config.security_policies_token = "token".to_string();
        config.distributed_tracer.enabled = true;

        assert_eq!(
            validate_all(&config),
            vec![
                ValidationError::LicenseLength,
                ValidationError::HighSecurityWithSecurityPolicies,
                ValidationError::MixedTracers,
                ValidationError::AppNameLimit,
            ]
        );
        assert_eq!(validate(&config), Err(ValidationError::LicenseLength));
    }

    #[test]
    fn test_error_codes_unique() {
        let all = [
            ValidationError::LicenseLength,
            ValidationError::AppNameMissing,
            ValidationError::HighSecurityWithSecurityPolicies,
            ValidationError::MixedTracers,
            ValidationError::AppNameLimit,
        ];
        let mut codes: Vec<u32> = all.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::LicenseLength.to_string(),
            "license length is not 40"
        );
        assert_eq!(
            ValidationError::AppNameLimit.to_string(),
            "max of 3 rollup application names"
        );
        assert_eq!(
            ValidationError::AppNameMissing.to_string(),
            "string AppName required"
        );
        assert_eq!(
            ValidationError::MixedTracers.to_string(),
            "CrossApplicationTracer and DistributedTracer cannot be enabled simultaneously; \
             please choose CrossApplicationTracer (available since v1.11) or DistributedTracer \
             (available since v2.1)"
        );
    }
}
