//! Batch pipeline
//!
//! The four sequential stages over one ordered operation sequence:
//! parse → validate → execute → report. No stage begins before the prior
//! stage has finished for the whole batch, and everything runs on the
//! calling thread.
//!
//! - `parser` - CSV/JSON ingestion with per-row failure isolation
//! - `validator` - pre-flight snapshot checks against the committed ledger
//! - `executor` - ordered replay with per-operation outcome capture
//! - `reporter` - summary aggregation and detailed text rendering

pub mod executor;
pub mod parser;
pub mod reporter;
pub mod validator;

pub use executor::{execute, ProgressCallback};
pub use parser::{parse_csv, parse_file, parse_json};
pub use reporter::{detailed_report, summarize};
pub use validator::validate;

use crate::audit::{AuditSink, Clock, SystemClock, TracingAuditSink};
use crate::core::Ledger;
use crate::types::{BatchError, BatchOperation, BatchSummary};
use std::path::Path;

/// Options for one batch run
#[derive(Default)]
pub struct BatchRunOptions<'a> {
    /// Validate only; the ledger is left untouched
    pub preview: bool,
    /// Inline progress hook, invoked after each executed operation
    pub progress: Option<ProgressCallback<'a>>,
}

/// Outcome of one batch run: the annotated operations plus their summary
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub operations: Vec<BatchOperation>,
    pub summary: BatchSummary,
}

/// Drives the parse → validate → execute → report pipeline
///
/// Owns the collaborator ports (clock and audit sink); the ledger is
/// borrowed per run so one runner can serve many batches.
pub struct BatchRunner<C = SystemClock, A = TracingAuditSink> {
    clock: C,
    audit: A,
}

impl BatchRunner {
    /// Runner with the system clock and the tracing audit sink
    pub fn new() -> Self {
        BatchRunner {
            clock: SystemClock,
            audit: TracingAuditSink,
        }
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, A: AuditSink> BatchRunner<C, A> {
    /// Runner with explicit collaborator ports
    pub fn with_parts(clock: C, audit: A) -> Self {
        BatchRunner { clock, audit }
    }

    /// The audit sink, for callers that need to inspect recorded events
    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Run one batch file against the ledger
    ///
    /// In preview mode the executor is skipped entirely and the ledger is
    /// guaranteed unchanged; operations then report their validation
    /// verdicts only.
    ///
    /// # Errors
    ///
    /// Only whole-file failures (unreadable file, malformed JSON document)
    /// propagate; every per-operation failure is captured in the returned
    /// operation list.
    pub fn run(
        &mut self,
        path: &Path,
        ledger: &mut Ledger,
        options: BatchRunOptions<'_>,
    ) -> Result<BatchRun, BatchError> {
        tracing::debug!(path = %path.display(), preview = options.preview, "starting batch run");

        let mut operations = parser::parse_file(path)?;
        validator::validate(ledger, &mut operations);

        if !options.preview {
            executor::execute(
                ledger,
                &mut operations,
                &self.clock,
                &mut self.audit,
                options.progress,
            );
        }

        let summary = reporter::summarize(&operations);
        tracing::debug!(
            total = summary.total_operations,
            successful = summary.successful,
            failed = summary.failed,
            "batch run finished"
        );
        Ok(BatchRun {
            operations,
            summary,
        })
    }
}
