//! Configuration snapshots for diagnostics and reproducibility.
//!
//! A snapshot captures the effective configuration at agent start so it can
//! be audited and compared later. The license never enters a snapshot or its
//! hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::agent::AgentConfig;
use crate::resolve::ConfigPath;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Hostname where snapshot was taken.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the configuration was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Source of the configuration.
    pub source: String,

    /// SHA-256 of the configuration with the license removed.
    pub config_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub app_names: Vec<String>,
    pub enabled: bool,
    pub license_present: bool,
    pub high_security: bool,
    pub security_policies: bool,
    pub tracing_strategy: String,
    /// Feature groups that are switched on.
    pub features: Vec<String>,
    pub detected_providers: Vec<String>,
}

impl ConfigSnapshot {
    /// Create a new snapshot of a loaded configuration.
    pub fn new(config: &AgentConfig, origin: &ConfigPath) -> Self {
        let hostname = hostname::get()
            .ok()
            .map(|h| h.to_string_lossy().to_string());

        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname,
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            path: origin.path.as_ref().map(|p| p.display().to_string()),
            source: origin.source.to_string(),
            config_hash: config_hash(config),
            summary: ConfigSummary::from_config(config),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same effective config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        match self.config_hash.char_indices().nth(12) {
            Some((end, _)) => &self.config_hash[..end],
            None => &self.config_hash,
        }
    }
}

impl ConfigSummary {
    pub fn from_config(config: &AgentConfig) -> Self {
        let features = [
            ("custom_insights_events", config.custom_insights_events.enabled),
            ("transaction_events", config.transaction_events.enabled),
            ("error_collector", config.error_collector.enabled),
            ("transaction_tracer", config.transaction_tracer.enabled),
            ("span_events", config.span_events.enabled),
            (
                "datastore_slow_query",
                config.datastore_tracer.slow_query.enabled,
            ),
            ("runtime_sampler", config.runtime_sampler.enabled),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then(|| name.to_string()))
        .collect();

        ConfigSummary {
            app_names: config.app_names().into_iter().map(String::from).collect(),
            enabled: config.enabled,
            license_present: !config.license.is_empty(),
            high_security: config.high_security,
            security_policies: !config.security_policies_token.is_empty(),
            tracing_strategy: config.tracing_strategy().to_string(),
            features,
            detected_providers: config
                .utilization
                .enabled_providers()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Hash the configuration with the license blanked out.
fn config_hash(config: &AgentConfig) -> String {
    let mut redacted = config.clone();
    redacted.license = Default::default();
    // Serializing a plain struct of strings, bools, and integers cannot fail.
    let canonical = serde_json::to_string(&redacted).unwrap_or_default();
    hash_content(&canonical)
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
