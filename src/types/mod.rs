//! Types module
//!
//! Core data structures used throughout the engine:
//! - `account`: account state, ledger entries and account types
//! - `operation`: batch operations and their lifecycle status
//! - `report`: summary artifacts produced by the reporter
//! - `error`: whole-run and per-operation error types

pub mod account;
pub mod error;
pub mod operation;
pub mod report;

pub use account::{Account, AccountType, EntryKind, LedgerEntry, TransferId};
pub use error::{BatchError, LedgerError};
pub use operation::{BatchOperation, OperationKind, OperationStatus};
pub use report::{BatchSummary, FailedOperation, TypeBreakdown};
