//! Attribute destination filters.

use serde::{Deserialize, Serialize};

/// Controls which attributes accompany a reported event.
///
/// The same filter shape is attached independently to transaction events,
/// errors, transaction traces, and the agent root. Include and exclude lists
/// keep their declared order; matching itself happens in the collection
/// subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeFilter {
    pub enabled: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for AttributeFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl AttributeFilter {
    /// True when the filter is on but adds no rules beyond the built-in set.
    pub fn is_passthrough(&self) -> bool {
        self.enabled && self.include.is_empty() && self.exclude.is_empty()
    }
}
