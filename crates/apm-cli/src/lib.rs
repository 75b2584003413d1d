//! Library side of the `apm-config` operator tool.
//!
//! - Exit codes shared with scripts
//! - Logging initialisation
//! - Command payloads (check reports, path resolution, defaults)

pub mod exit_codes;
pub mod logging;
pub mod report;

pub use exit_codes::ExitCode;
pub use report::{check, CheckOptions, CheckReport, OutputFormat};
