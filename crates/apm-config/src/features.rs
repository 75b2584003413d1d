//! Feature group configuration types.
//!
//! Each group is an independent on/off switch with its own tunables and its
//! own `Default`. [`crate::AgentConfig`] composes them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::attributes::AttributeFilter;

/// Multiplier applied to the apdex target when the trace threshold is
/// apdex-relative.
pub const APDEX_FAILING_MULTIPLIER: u32 = 4;

/// Fixed transaction trace threshold used when switching away from the
/// apdex-relative mode.
pub const DEFAULT_TRACE_THRESHOLD: Duration = Duration::from_millis(500);

/// Segments shorter than this are not added to a transaction trace.
pub const DEFAULT_SEGMENT_THRESHOLD: Duration = Duration::from_millis(2);

/// Segments slower than this get a stack trace.
pub const DEFAULT_STACK_TRACE_THRESHOLD: Duration = Duration::from_millis(500);

/// Datastore segments slower than this are captured as slow queries.
pub const DEFAULT_SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(10);

/// HTTP "not found"; the only status code ignored by default.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Custom event recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomInsightsEvents {
    /// High security mode overrides this setting.
    pub enabled: bool,
}

impl Default for CustomInsightsEvents {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Transaction analytics events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionEvents {
    pub enabled: bool,
    pub attributes: AttributeFilter,
}

impl Default for TransactionEvents {
    fn default() -> Self {
        Self {
            enabled: true,
            attributes: AttributeFilter::default(),
        }
    }
}

/// Error capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorCollector {
    /// Affects both traced errors and error events.
    pub enabled: bool,
    pub capture_events: bool,
    /// Response codes >= 400 become errors unless listed here.
    pub ignore_status_codes: Vec<u16>,
    pub attributes: AttributeFilter,
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self {
            enabled: true,
            capture_events: true,
            ignore_status_codes: vec![STATUS_NOT_FOUND],
            attributes: AttributeFilter::default(),
        }
    }
}

impl ErrorCollector {
    /// Whether a response with this status code is turned into an error.
    pub fn is_error_status(&self, code: u16) -> bool {
        code >= 400 && !self.ignore_status_codes.contains(&code)
    }
}

/// When a transaction becomes a trace candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TraceThreshold {
    /// Four times the apdex target.
    #[default]
    ApdexFailing,
    /// A fixed duration.
    Fixed {
        #[serde(rename = "duration_ms", with = "crate::duration::millis")]
        duration: Duration,
    },
}

impl TraceThreshold {
    /// Resolve to a concrete duration given the configured apdex target.
    pub fn effective(&self, apdex: Duration) -> Duration {
        match self {
            TraceThreshold::ApdexFailing => apdex.saturating_mul(APDEX_FAILING_MULTIPLIER),
            TraceThreshold::Fixed { duration } => *duration,
        }
    }

    pub fn is_apdex_failing(&self) -> bool {
        matches!(self, TraceThreshold::ApdexFailing)
    }
}

/// Transaction trace capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionTracer {
    pub enabled: bool,
    /// Lowering this increases overhead.
    #[serde(rename = "segment_threshold_ms", with = "crate::duration::millis")]
    pub segment_threshold: Duration,
    /// Lowering this drastically increases overhead.
    #[serde(rename = "stack_trace_threshold_ms", with = "crate::duration::millis")]
    pub stack_trace_threshold: Duration,
    pub threshold: TraceThreshold,
    pub attributes: AttributeFilter,
}

impl Default for TransactionTracer {
    fn default() -> Self {
        Self {
            enabled: true,
            segment_threshold: DEFAULT_SEGMENT_THRESHOLD,
            stack_trace_threshold: DEFAULT_STACK_TRACE_THRESHOLD,
            threshold: TraceThreshold::default(),
            attributes: AttributeFilter::default(),
        }
    }
}

/// Span events. These are only produced while distributed tracing is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEvents {
    pub enabled: bool,
}

impl Default for SpanEvents {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A single on/off switch inside the datastore tracer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Slow datastore query capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowQuery {
    pub enabled: bool,
    #[serde(rename = "threshold_ms", with = "crate::duration::millis")]
    pub threshold: Duration,
}

impl Default for SlowQuery {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_SLOW_QUERY_THRESHOLD,
        }
    }
}

/// Datastore segment behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatastoreTracer {
    pub instance_reporting: Toggle,
    pub database_name_reporting: Toggle,
    pub query_parameters: Toggle,
    pub slow_query: SlowQuery,
}

/// Runtime statistics sampling (CPU, memory, GC pauses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSampler {
    pub enabled: bool,
}

impl Default for RuntimeSampler {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Host environment detection, one switch per provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Utilization {
    pub detect_aws: bool,
    pub detect_azure: bool,
    pub detect_pcf: bool,
    pub detect_gcp: bool,
    pub detect_docker: bool,
    pub detect_kubernetes: bool,

    /// Manual values for when detection gets it wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_processors: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ram_mib: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_hostname: Option<String>,
}

impl Default for Utilization {
    fn default() -> Self {
        Self {
            detect_aws: true,
            detect_azure: true,
            detect_pcf: true,
            detect_gcp: true,
            detect_docker: true,
            detect_kubernetes: true,
            logical_processors: None,
            total_ram_mib: None,
            billing_hostname: None,
        }
    }
}

impl Utilization {
    /// Names of the providers with detection switched on.
    pub fn enabled_providers(&self) -> Vec<&'static str> {
        [
            ("aws", self.detect_aws),
            ("azure", self.detect_azure),
            ("pcf", self.detect_pcf),
            ("gcp", self.detect_gcp),
            ("docker", self.detect_docker),
            ("kubernetes", self.detect_kubernetes),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

/// Cross-application tracing. Cannot be combined with distributed tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossApplicationTracer {
    pub enabled: bool,
}

impl Default for CrossApplicationTracer {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Distributed tracing. Off by default since cross-application tracing is on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributedTracer {
    pub enabled: bool,
}

/// Which tracing strategy a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracingStrategy {
    None,
    CrossApplication,
    Distributed,
    /// Both enabled; rejected by validation.
    Conflicting,
}

impl TracingStrategy {
    pub fn from_flags(cross_application: bool, distributed: bool) -> Self {
        match (cross_application, distributed) {
            (false, false) => TracingStrategy::None,
            (true, false) => TracingStrategy::CrossApplication,
            (false, true) => TracingStrategy::Distributed,
            (true, true) => TracingStrategy::Conflicting,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TracingStrategy::None => "none",
            TracingStrategy::CrossApplication => "cross_application",
            TracingStrategy::Distributed => "distributed",
            TracingStrategy::Conflicting => "conflicting",
        }
    }
}

impl std::fmt::Display for TracingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
