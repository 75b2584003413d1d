//! Fuzz target driving validation with structured, arbitrary configurations.

#![no_main]

use apm_config::validate::{APP_NAME_LIMIT, LICENSE_LENGTH, ROLLUP_DELIMITER};
use apm_config::{validate, AgentConfig, ValidationError};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    app_name: String,
    license: String,
    enabled: bool,
    high_security: bool,
    security_policies_token: String,
    cross_application: bool,
    distributed: bool,
}

fuzz_target!(|input: Input| {
    let license_len = input.license.len();
    let mut config = AgentConfig::new(input.app_name, input.license);
    config.enabled = input.enabled;
    config.high_security = input.high_security;
    config.security_policies_token = input.security_policies_token;
    config.cross_application_tracer.enabled = input.cross_application;
    config.distributed_tracer.enabled = input.distributed;

    let license_ok = license_len == LICENSE_LENGTH || (!config.enabled && license_len == 0);
    let name_ok = !(config.enabled && config.app_name.is_empty());
    let security_ok = !(config.high_security && !config.security_policies_token.is_empty());
    let tracers_ok = !(input.cross_application && input.distributed);
    let rollup_ok = config.app_name.matches(ROLLUP_DELIMITER).count() < APP_NAME_LIMIT;

    let expected = if !license_ok {
        Err(ValidationError::LicenseLength)
    } else if !name_ok {
        Err(ValidationError::AppNameMissing)
    } else if !security_ok {
        Err(ValidationError::HighSecurityWithSecurityPolicies)
    } else if !tracers_ok {
        Err(ValidationError::MixedTracers)
    } else if !rollup_ok {
        Err(ValidationError::AppNameLimit)
    } else {
        Ok(())
    };

    assert_eq!(validate(&config), expected);
});
