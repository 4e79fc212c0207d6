//! Core business logic
//!
//! - `ledger` - the user's account aggregate and balance operations
//! - `transfer` - the atomic dual-entry transfer engine

pub mod ledger;
pub mod transfer;

pub use ledger::Ledger;
pub use transfer::{check_transfer, transfer, TransferReceipt};
