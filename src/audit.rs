//! Collaborator ports: audit sink and clock
//!
//! This module defines the trait seams the pipeline consumes but does not
//! implement: an [`AuditSink`] that receives one structured event per
//! executed operation, and a [`Clock`] for timestamps. Defaults log through
//! `tracing` and read the system clock; tests substitute recording and
//! fixed implementations.

use crate::types::{BatchOperation, OperationStatus};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Structured record of one executed operation's outcome
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub operation_type: String,
    pub status: OperationStatus,
    pub line_number: Option<u64>,
    pub detail: Option<String>,
    pub parameters: Value,
    pub at: DateTime<Utc>,
}

impl AuditEvent {
    /// Build an event from an operation's post-execution state
    pub fn from_operation(operation: &BatchOperation, at: DateTime<Utc>) -> Self {
        let detail = match operation.status {
            OperationStatus::Failed => operation.error_message.clone(),
            _ => operation.result.clone(),
        };
        AuditEvent {
            operation_type: operation.kind.label().to_string(),
            status: operation.status,
            line_number: operation.line_number,
            detail,
            parameters: operation.kind.parameters(),
            at,
        }
    }
}

/// Receiver for per-operation audit events
///
/// Storage and rotation are external concerns; the executor only promises
/// to emit exactly one event per executed operation.
pub trait AuditSink {
    fn record(&mut self, event: AuditEvent);
}

/// Audit sink that emits events as `tracing` log records
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        match event.status {
            OperationStatus::Failed => tracing::warn!(
                operation = %event.operation_type,
                status = %event.status,
                line = ?event.line_number,
                detail = event.detail.as_deref().unwrap_or(""),
                "batch operation failed"
            ),
            _ => tracing::info!(
                operation = %event.operation_type,
                status = %event.status,
                line = ?event.line_number,
                detail = event.detail.as_deref().unwrap_or(""),
                "batch operation executed"
            ),
        }
    }
}

/// Sink that retains every event in memory, for tests and previews
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    pub events: Vec<AuditEvent>,
}

impl AuditSink for RecordingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        self.events.push(event);
    }
}

/// Source of wall-clock timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// System UTC clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
