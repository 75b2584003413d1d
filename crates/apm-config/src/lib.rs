//! APM agent configuration schema and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the agent configuration, one per feature group
//! - Documented defaults via [`AgentConfig::new`]
//! - Validation that rejects inconsistent or unsafe configurations
//! - Config file resolution (CLI → env → XDG → system → defaults)
//! - Environment variable overrides
//! - Config snapshots for diagnostics

pub mod agent;
pub mod attributes;
pub mod duration;
pub mod env;
pub mod features;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use agent::{AgentConfig, ConfigError, License, ValidatedConfig};
pub use attributes::AttributeFilter;
pub use features::TraceThreshold;
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate, validate_all, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
