//! Root agent configuration.
//!
//! [`AgentConfig::new`] produces a fully populated configuration from the two
//! required inputs. Callers mutate fields as needed and then call
//! [`AgentConfig::validated`] before handing the result to the agent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::attributes::AttributeFilter;
use crate::features::{
    CrossApplicationTracer, CustomInsightsEvents, DatastoreTracer, DistributedTracer,
    ErrorCollector, RuntimeSampler, SpanEvents, TracingStrategy, TransactionEvents,
    TransactionTracer, Utilization,
};
use crate::validate::{self, ValidationError, ROLLUP_DELIMITER};

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for environment variable {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::Io { .. } => 60,
            ConfigError::Parse(_) => 61,
            ConfigError::InvalidEnv { .. } => 62,
            ConfigError::Invalid(inner) => inner.code(),
        }
    }
}

/// Account license key.
///
/// `Debug` never prints the key itself.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct License(String);

impl License {
    pub fn new(key: impl Into<String>) -> Self {
        License(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "License(<redacted, {} bytes>)", self.0.len())
    }
}

impl From<&str> for License {
    fn from(s: &str) -> Self {
        License(s.to_string())
    }
}

impl From<String> for License {
    fn from(s: String) -> Self {
        License(s)
    }
}

/// Complete agent configuration.
///
/// Absent fields in a config file fall back to the values produced by
/// [`AgentConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Links data across servers. Up to three names separated by `;` roll up
    /// into several applications.
    pub app_name: String,

    pub license: License,

    /// When false the agent neither contacts the collector nor spawns
    /// background work, and an empty license is allowed.
    pub enabled: bool,

    /// Guarantees certain settings cannot be made more permissive. Must match
    /// the account setting.
    pub high_security: bool,

    /// Enables security policies when non-empty. Incompatible with
    /// `high_security`.
    pub security_policies_token: String,

    /// Recognizable server name for the UI; optional.
    pub host_display_name: String,

    /// Key/value pairs used to roll applications up into categories.
    pub labels: BTreeMap<String, String>,

    pub custom_insights_events: CustomInsightsEvents,
    pub transaction_events: TransactionEvents,
    pub error_collector: ErrorCollector,
    pub transaction_tracer: TransactionTracer,
    pub utilization: Utilization,
    pub cross_application_tracer: CrossApplicationTracer,
    pub distributed_tracer: DistributedTracer,
    pub span_events: SpanEvents,
    pub datastore_tracer: DatastoreTracer,

    /// Attributes included with errors and transaction events.
    pub attributes: AttributeFilter,

    pub runtime_sampler: RuntimeSampler,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig::new("", "")
    }
}

impl AgentConfig {
    /// Build a configuration with every documented default applied.
    ///
    /// Inputs are not checked here; see [`AgentConfig::validate`].
    pub fn new(app_name: impl Into<String>, license: impl Into<License>) -> Self {
        AgentConfig {
            app_name: app_name.into(),
            license: license.into(),
            enabled: true,
            high_security: false,
            security_policies_token: String::new(),
            host_display_name: String::new(),
            labels: BTreeMap::new(),
            custom_insights_events: CustomInsightsEvents::default(),
            transaction_events: TransactionEvents::default(),
            error_collector: ErrorCollector::default(),
            transaction_tracer: TransactionTracer::default(),
            utilization: Utilization::default(),
            cross_application_tracer: CrossApplicationTracer::default(),
            distributed_tracer: DistributedTracer::default(),
            span_events: SpanEvents::default(),
            datastore_tracer: DatastoreTracer::default(),
            attributes: AttributeFilter::default(),
            runtime_sampler: RuntimeSampler::default(),
        }
    }

    /// Load a configuration file; `.toml` files are parsed as TOML, anything
    /// else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        tracing::debug!(path = %path.display(), toml = is_toml, "loading agent config");

        if is_toml {
            Self::parse_toml(&content)
        } else {
            Self::parse_json(&content)
        }
    }

    /// Parse a configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(format!("Invalid JSON: {}", e)))
    }

    /// Parse a configuration from a TOML string.
    pub fn parse_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(format!("Invalid TOML: {}", e)))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// The individual rollup names encoded in `app_name`.
    pub fn app_names(&self) -> Vec<&str> {
        if self.app_name.is_empty() {
            return Vec::new();
        }
        self.app_name.split(ROLLUP_DELIMITER).collect()
    }

    pub fn tracing_strategy(&self) -> TracingStrategy {
        TracingStrategy::from_flags(
            self.cross_application_tracer.enabled,
            self.distributed_tracer.enabled,
        )
    }

    /// Check this configuration, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::validate(self)
    }

    /// Validate and freeze.
    pub fn validated(self) -> Result<ValidatedConfig, ValidationError> {
        self.validate()?;
        Ok(ValidatedConfig(self))
    }
}

/// A configuration that passed validation. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedConfig(AgentConfig);

impl ValidatedConfig {
    /// Give up the guarantee and get the mutable value back.
    pub fn into_inner(self) -> AgentConfig {
        self.0
    }
}

impl Deref for ValidatedConfig {
    type Target = AgentConfig;

    fn deref(&self) -> &AgentConfig {
        &self.0
    }
}

impl TryFrom<AgentConfig> for ValidatedConfig {
    type Error = ValidationError;

    fn try_from(config: AgentConfig) -> Result<Self, Self::Error> {
        config.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TraceThreshold;
    use std::time::Duration;

    const LICENSE: &str = "0123456789012345678901234567890123456789";

    #[test]
    fn test_new_applies_defaults() {
        let c = AgentConfig::new("svc", LICENSE);
        assert_eq!(c.app_name, "svc");
        assert_eq!(c.license.as_str(), LICENSE);
        assert!(c.enabled);
        assert!(!c.high_security);
        assert!(c.security_policies_token.is_empty());
        assert!(c.labels.is_empty());
        assert!(c.custom_insights_events.enabled);
        assert!(c.transaction_events.enabled);
        assert!(c.transaction_events.attributes.enabled);
        assert!(c.error_collector.enabled);
        assert!(c.error_collector.capture_events);
        assert_eq!(c.error_collector.ignore_status_codes, vec![404]);
        assert!(c.transaction_tracer.enabled);
        assert_eq!(c.transaction_tracer.threshold, TraceThreshold::ApdexFailing);
        assert_eq!(c.transaction_tracer.segment_threshold, Duration::from_millis(2));
        assert_eq!(
            c.transaction_tracer.stack_trace_threshold,
            Duration::from_millis(500)
        );
        assert!(c.cross_application_tracer.enabled);
        assert!(!c.distributed_tracer.enabled);
        assert!(c.span_events.enabled);
        assert!(c.runtime_sampler.enabled);
        assert!(c.attributes.enabled);
        assert_eq!(
            c.datastore_tracer.slow_query.threshold,
            Duration::from_millis(10)
        );
        assert_eq!(c.utilization.enabled_providers().len(), 6);
    }

    #[test]
    fn test_default_is_new_with_empty_identity() {
        assert_eq!(AgentConfig::default(), AgentConfig::new("", ""));
    }

    #[test]
    fn test_license_debug_redacted() {
        let c = AgentConfig::new("svc", LICENSE);
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains(LICENSE));
        assert!(dbg.contains("redacted, 40 bytes"));
    }

    #[test]
    fn test_parse_partial_json_fills_defaults() {
        let json = r#"{
            "app_name": "checkout;payments",
            "license": "0123456789012345678901234567890123456789",
            "distributed_tracer": {"enabled": true},
            "cross_application_tracer": {"enabled": false},
            "error_collector": {"ignore_status_codes": [404, 401]}
        }"#;
        let c = AgentConfig::parse_json(json).unwrap();
        assert_eq!(c.app_names(), vec!["checkout", "payments"]);
        assert_eq!(c.tracing_strategy(), TracingStrategy::Distributed);
        assert_eq!(c.error_collector.ignore_status_codes, vec![404, 401]);
        assert!(c.error_collector.capture_events);
        assert!(c.span_events.enabled);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
app_name = "svc"
license = "0123456789012345678901234567890123456789"
high_security = true

[transaction_tracer]
segment_threshold_ms = 5

[transaction_tracer.threshold]
mode = "fixed"
duration_ms = 1500

[labels]
team = "payments"
"#;
        let c = AgentConfig::parse_toml(text).unwrap();
        assert!(c.high_security);
        assert_eq!(c.transaction_tracer.segment_threshold, Duration::from_millis(5));
        assert_eq!(
            c.transaction_tracer.threshold,
            TraceThreshold::Fixed {
                duration: Duration::from_millis(1500)
            }
        );
        assert_eq!(c.labels.get("team").map(String::as_str), Some("payments"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = AgentConfig::parse_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert_eq!(err.code(), 61);
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let mut c = AgentConfig::new("svc", LICENSE);
        c.utilization.billing_hostname = Some("billing-01".to_string());
        c.transaction_events.attributes.exclude = vec!["password".to_string()];
        let json = c.to_json().unwrap();
        assert_eq!(AgentConfig::parse_json(&json).unwrap(), c);
    }

    #[test]
    fn test_toml_output_parses_back() {
        let c = AgentConfig::new("svc", LICENSE);
        let text = c.to_toml().unwrap();
        assert_eq!(AgentConfig::parse_toml(&text).unwrap(), c);
    }

    #[test]
    fn test_app_names_empty() {
        assert!(AgentConfig::new("", LICENSE).app_names().is_empty());
    }

    #[test]
    fn test_validated_freezes() {
        let frozen = AgentConfig::new("svc", LICENSE).validated().unwrap();
        assert_eq!(frozen.app_name, "svc");
        let back = frozen.into_inner();
        assert!(back.enabled);
    }

    #[test]
    fn test_validated_rejects() {
        let mut c = AgentConfig::new("svc", LICENSE);
        c.distributed_tracer.enabled = true;
        assert_eq!(
            ValidatedConfig::try_from(c).unwrap_err(),
            ValidationError::MixedTracers
        );
    }

    #[test]
    fn test_from_file_missing() {
        let err = AgentConfig::from_file(Path::new("/nonexistent/agent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
