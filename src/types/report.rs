//! Report artifact types
//!
//! The reporter aggregates a finished (or previewed) operation sequence into
//! a [`BatchSummary`]. Everything here is `Serialize` so the CLI can emit
//! the summary as JSON for downstream tooling.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-operation-type counters in the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Detail block for one failed operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedOperation {
    pub operation_type: String,
    pub line_number: Option<u64>,
    pub error_message: Option<String>,
    pub parameters: Value,
}

/// Aggregated outcome of one batch run
///
/// `operations_by_type` uses a `BTreeMap` so serialized output is
/// deterministic. Execution times are in seconds of wall-clock latency;
/// they are zero for preview runs, where nothing executes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_operations: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Successful operations as a percentage of the total, 0.0 when empty
    pub success_rate: f64,
    /// Sum of per-operation wall-clock latencies, in seconds
    pub total_execution_time: f64,
    /// Mean per-operation latency over operations that executed, in seconds
    pub average_execution_time: f64,
    pub operations_by_type: BTreeMap<String, TypeBreakdown>,
    pub failed_operations: Vec<FailedOperation>,
}
