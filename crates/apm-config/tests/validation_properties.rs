//! Property-based tests for agent config validation.
//!
//! Uses proptest to check the acceptance rules across many random names,
//! licenses, and toggles.

use apm_config::validate::{APP_NAME_LIMIT, LICENSE_LENGTH};
use apm_config::{validate, validate_all, AgentConfig, ValidationError};
use proptest::prelude::*;

/// A license of exactly the required length.
fn valid_license() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-f0-9]{40}").expect("license regex")
}

/// An app name with at most two rollup delimiters.
fn valid_app_name() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..=APP_NAME_LIMIT)
        .prop_map(|parts| parts.join(";"))
}

/// Any license whose byte length is not the required one.
fn wrong_length_license() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,80}".prop_filter("must not be exact length", |s| s.len() != LICENSE_LENGTH)
}

// ============================================================================
// Acceptance
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Defaults built from a valid name and license always validate.
    #[test]
    fn defaults_validate(name in valid_app_name(), license in valid_license()) {
        let config = AgentConfig::new(name, license);
        prop_assert_eq!(validate(&config), Ok(()));
        prop_assert!(validate_all(&config).is_empty());
    }

    /// Disabled agents accept an empty or exact-length license.
    #[test]
    fn disabled_accepts_empty_or_exact(name in valid_app_name(), license in valid_license(), empty in any::<bool>()) {
        let key = if empty { String::new() } else { license };
        let mut config = AgentConfig::new(name, key);
        config.enabled = false;
        prop_assert_eq!(validate(&config), Ok(()));
    }
}

// ============================================================================
// Rejection
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Enabled agents reject every other license length, empty included.
    #[test]
    fn enabled_rejects_wrong_length(name in valid_app_name(), license in wrong_length_license()) {
        let config = AgentConfig::new(name, license);
        prop_assert_eq!(validate(&config), Err(ValidationError::LicenseLength));
    }

    /// Disabled agents still reject non-empty licenses of the wrong length.
    #[test]
    fn disabled_rejects_wrong_nonempty_length(license in wrong_length_license()) {
        prop_assume!(!license.is_empty());
        let mut config = AgentConfig::new("svc", license);
        config.enabled = false;
        prop_assert_eq!(validate(&config), Err(ValidationError::LicenseLength));
    }

    /// High security plus any policy token is rejected whatever else is set.
    #[test]
    fn high_security_with_token_rejected(
        name in valid_app_name(),
        license in valid_license(),
        token in "[a-z0-9-]{1,32}",
        distributed in any::<bool>(),
        spans in any::<bool>(),
    ) {
        let mut config = AgentConfig::new(name, license);
        config.high_security = true;
        config.security_policies_token = token;
        config.distributed_tracer.enabled = distributed;
        config.span_events.enabled = spans;
        prop_assert_eq!(validate(&config), Err(ValidationError::HighSecurityWithSecurityPolicies));
    }

    /// Both tracing strategies on is rejected even with otherwise valid defaults.
    #[test]
    fn mixed_tracers_rejected(name in valid_app_name(), license in valid_license()) {
        let mut config = AgentConfig::new(name, license);
        config.distributed_tracer.enabled = true;
        prop_assert_eq!(validate(&config), Err(ValidationError::MixedTracers));
    }

    /// Three or more delimiters exceed the rollup limit.
    #[test]
    fn rollup_limit_rejected(parts in proptest::collection::vec("[a-z]{1,8}", (APP_NAME_LIMIT + 1)..8), license in valid_license()) {
        let config = AgentConfig::new(parts.join(";"), license);
        prop_assert_eq!(validate(&config), Err(ValidationError::AppNameLimit));
    }

    /// The short-circuit result is always the first collected violation.
    #[test]
    fn first_violation_matches_collected(
        name in "[a-z;]{0,12}",
        license in "[a-z0-9]{0,45}",
        enabled in any::<bool>(),
        high_security in any::<bool>(),
        token in "[a-z]{0,4}",
        distributed in any::<bool>(),
    ) {
        let mut config = AgentConfig::new(name, license);
        config.enabled = enabled;
        config.high_security = high_security;
        config.security_policies_token = token;
        config.distributed_tracer.enabled = distributed;

        let all = validate_all(&config);
        match validate(&config) {
            Ok(()) => prop_assert!(all.is_empty()),
            Err(first) => prop_assert_eq!(Some(&first), all.first()),
        }
    }
}

#[test]
fn concrete_rollup_scenarios() {
    let license = "0".repeat(LICENSE_LENGTH);
    assert!(validate(&AgentConfig::new("svc", license.as_str())).is_ok());
    assert!(validate(&AgentConfig::new("a;b;c", license.as_str())).is_ok());
    assert_eq!(
        validate(&AgentConfig::new("a;b;c;d", license.as_str())),
        Err(ValidationError::AppNameLimit)
    );
}

#[test]
fn empty_name_enabled_rejected() {
    let config = AgentConfig::new("", "0".repeat(LICENSE_LENGTH));
    assert_eq!(validate(&config), Err(ValidationError::AppNameMissing));
}
