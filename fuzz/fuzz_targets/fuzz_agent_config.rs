//! Fuzz target for agent configuration parsing and validation.
//!
//! Arbitrary bytes go through both the JSON and TOML parsers; anything that
//! parses must validate without panicking, and the collected violations must
//! agree with the first-violation result.

#![no_main]

use apm_config::{validate, validate_all, AgentConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = [AgentConfig::parse_json(text), AgentConfig::parse_toml(text)];
    for config in parsed.into_iter().flatten() {
        let first = validate(&config).err();
        let all = validate_all(&config);
        assert_eq!(first.as_ref(), all.first());
    }
});
