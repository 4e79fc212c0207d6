//! Batch reporting
//!
//! Aggregates a finished operation sequence into a [`BatchSummary`] and can
//! render a multi-line detailed report. Both are read-only over the
//! operation list; no operation's failure message is ever dropped.

use crate::types::{BatchOperation, BatchSummary, FailedOperation, OperationStatus, TypeBreakdown};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Aggregate operations into a summary artifact
pub fn summarize(operations: &[BatchOperation]) -> BatchSummary {
    let total = operations.len();
    let successful = operations
        .iter()
        .filter(|op| op.status == OperationStatus::Success)
        .count();
    let failed = operations
        .iter()
        .filter(|op| op.status == OperationStatus::Failed)
        .count();
    let skipped = operations
        .iter()
        .filter(|op| op.status == OperationStatus::Skipped)
        .count();

    let success_rate = if total == 0 {
        0.0
    } else {
        successful as f64 / total as f64 * 100.0
    };

    let executed: Vec<f64> = operations
        .iter()
        .filter_map(|op| op.execution_time)
        .map(|d| d.as_secs_f64())
        .collect();
    let total_execution_time: f64 = executed.iter().sum();
    let average_execution_time = if executed.is_empty() {
        0.0
    } else {
        total_execution_time / executed.len() as f64
    };

    let mut operations_by_type: BTreeMap<String, TypeBreakdown> = BTreeMap::new();
    for operation in operations {
        let entry = operations_by_type
            .entry(operation.kind.label().to_string())
            .or_default();
        entry.total += 1;
        match operation.status {
            OperationStatus::Success => entry.successful += 1,
            OperationStatus::Failed => entry.failed += 1,
            _ => {}
        }
    }

    let failed_operations = operations
        .iter()
        .filter(|op| op.status == OperationStatus::Failed)
        .map(|op| FailedOperation {
            operation_type: op.kind.label().to_string(),
            line_number: op.line_number,
            error_message: op.error_message.clone(),
            parameters: op.kind.parameters(),
        })
        .collect();

    BatchSummary {
        total_operations: total,
        successful,
        failed,
        skipped,
        success_rate,
        total_execution_time,
        average_execution_time,
        operations_by_type,
        failed_operations,
    }
}

/// Render a multi-line report listing every operation's outcome
pub fn detailed_report(operations: &[BatchOperation]) -> String {
    let summary = summarize(operations);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Batch report: {} operations, {} succeeded, {} failed",
        summary.total_operations, summary.successful, summary.failed
    );
    let _ = writeln!(out, "{}", "-".repeat(64));

    for (index, operation) in operations.iter().enumerate() {
        let position = match operation.line_number {
            Some(line) => format!("line {}", line),
            None => format!("#{}", index + 1),
        };
        let timing = match operation.execution_time {
            Some(duration) => format!("{:.6}s", duration.as_secs_f64()),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "[{}] {:<16} {:<10} {}",
            position,
            operation.kind.label(),
            operation.status,
            timing
        );
        if let Some(result) = &operation.result {
            let _ = writeln!(out, "    {}", result);
        }
        if let Some(error) = &operation.error_message {
            let _ = writeln!(out, "    error: {}", error);
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(64));
    for (label, breakdown) in &summary.operations_by_type {
        let _ = writeln!(
            out,
            "{:<16} total {:<4} ok {:<4} failed {}",
            label, breakdown.total, breakdown.successful, breakdown.failed
        );
    }

    out
}
