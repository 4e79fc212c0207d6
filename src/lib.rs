//! Banking Batch Engine
//!
//! # Overview
//!
//! This library processes a file of banking operations (deposit, withdraw,
//! transfer, account creation, nickname update) through a strictly
//! sequential parse → validate → execute → report pipeline over an
//! in-memory, single-user ledger.
//!
//! # Architecture
//!
//! - [`types`] - core data types (accounts, ledger entries, batch
//!   operations, reports, errors)
//! - [`core`] - business logic:
//!   - [`core::ledger`] - the user's account aggregate and balance
//!     operations, including the single type-or-nickname resolution
//!     function shared by validation and execution
//!   - [`core::transfer`] - the atomic dual-entry transfer engine
//! - [`batch`] - the pipeline stages (parser, validator, executor,
//!   reporter) and the [`batch::BatchRunner`] that drives them
//! - [`audit`] - collaborator ports: audit sink and clock
//! - [`cli`] - command-line argument parsing
//!
//! # Failure model
//!
//! Only whole-file failures (unreadable input, malformed JSON document)
//! propagate to the caller. Every per-operation failure — a malformed row,
//! a business-rule violation, a fault while applying a mutation — is
//! captured on that operation and reported; it never aborts the rest of
//! the batch, and nothing is rolled back across operations.

pub mod audit;
pub mod batch;
pub mod cli;
pub mod core;
pub mod types;

pub use crate::audit::{
    AuditEvent, AuditSink, Clock, RecordingAuditSink, SystemClock, TracingAuditSink,
};
pub use crate::batch::{BatchRun, BatchRunOptions, BatchRunner};
pub use crate::core::{Ledger, TransferReceipt};
pub use crate::types::{
    Account, AccountType, BatchError, BatchOperation, BatchSummary, EntryKind, LedgerEntry,
    LedgerError, OperationKind, OperationStatus, TransferId,
};
