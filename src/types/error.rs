//! Error types for the batch banking engine
//!
//! Two layers, matching the propagation policy of the pipeline:
//!
//! - [`BatchError`]: whole-call failures (unreadable file, malformed JSON
//!   document). These abort the batch run before any operation exists and
//!   surface to the caller.
//! - [`LedgerError`]: per-operation business failures (unknown account,
//!   insufficient funds, duplicate account type, ...). These are captured
//!   into the owning `BatchOperation` and never abort the run.

use crate::types::account::AccountType;
use rust_decimal::Decimal;
use thiserror::Error;

/// Fatal error for a whole batch run
#[derive(Debug, Error)]
pub enum BatchError {
    /// Input file does not exist at the given path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O failure while reading the input file
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The JSON document itself is not well-formed
    ///
    /// A single bad entry inside a well-formed document is a per-operation
    /// failure, not this.
    #[error("Malformed JSON document: {message}")]
    MalformedJson { message: String },

    /// The CSV header row is missing or unreadable
    #[error("Invalid CSV header: {message}")]
    InvalidHeader { message: String },
}

impl From<std::io::Error> for BatchError {
    fn from(error: std::io::Error) -> Self {
        BatchError::Io {
            message: error.to_string(),
        }
    }
}

/// Business-rule failure for a single operation
///
/// Struct variants carry enough context to render a self-contained
/// user-facing message; helper constructors keep call sites terse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No account matches the given type name or nickname
    #[error("Account '{identifier}' not found")]
    UnknownAccount { identifier: String },

    /// The account exists but is deactivated
    #[error("Account '{identifier}' is inactive")]
    InactiveAccount { identifier: String },

    /// Deposits, withdrawals and transfers require a strictly positive amount
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    /// The debit would push the account below its allowed floor
    #[error("Insufficient funds in '{identifier}': available {available}, requested {requested}")]
    InsufficientFunds {
        identifier: String,
        available: Decimal,
        requested: Decimal,
    },

    /// The user already holds an account of this type
    #[error("A {account_type} account already exists")]
    DuplicateAccountType { account_type: AccountType },

    /// Another account of the same user already carries this nickname
    #[error("Nickname '{nickname}' is already in use")]
    DuplicateNickname { nickname: String },

    /// Nicknames may not equal an account type name
    #[error("Nickname '{nickname}' would shadow an account type name")]
    NicknameShadowsType { nickname: String },

    /// Transfers require two distinct accounts
    #[error("Cannot transfer from '{identifier}' to itself")]
    SameAccountTransfer { identifier: String },

    /// Opening balances may not be negative
    #[error("Opening balance must not be negative, got {amount}")]
    NegativeOpeningBalance { amount: Decimal },

    /// Overdraft limits may not be negative
    #[error("Overdraft limit must not be negative, got {amount}")]
    NegativeOverdraftLimit { amount: Decimal },

    /// The create_account type name is not savings, current or salary
    #[error("Unknown account type '{raw}' (expected savings, current or salary)")]
    UnknownAccountType { raw: String },

    /// Checked decimal arithmetic overflowed
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },
}

impl LedgerError {
    pub fn unknown_account(identifier: &str) -> Self {
        LedgerError::UnknownAccount {
            identifier: identifier.to_string(),
        }
    }

    pub fn inactive_account(identifier: &str) -> Self {
        LedgerError::InactiveAccount {
            identifier: identifier.to_string(),
        }
    }

    pub fn non_positive_amount(amount: Decimal) -> Self {
        LedgerError::NonPositiveAmount { amount }
    }

    pub fn insufficient_funds(identifier: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            identifier: identifier.to_string(),
            available,
            requested,
        }
    }

    pub fn duplicate_account_type(account_type: AccountType) -> Self {
        LedgerError::DuplicateAccountType { account_type }
    }

    pub fn duplicate_nickname(nickname: &str) -> Self {
        LedgerError::DuplicateNickname {
            nickname: nickname.to_string(),
        }
    }

    pub fn same_account_transfer(identifier: &str) -> Self {
        LedgerError::SameAccountTransfer {
            identifier: identifier.to_string(),
        }
    }

    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unknown_account(
        LedgerError::unknown_account("vacation"),
        "Account 'vacation' not found"
    )]
    #[case::inactive(
        LedgerError::inactive_account("salary"),
        "Account 'salary' is inactive"
    )]
    #[case::non_positive(
        LedgerError::non_positive_amount(Decimal::new(-500, 2)),
        "Amount must be positive, got -5.00"
    )]
    #[case::insufficient(
        LedgerError::insufficient_funds("savings", Decimal::new(1000, 2), Decimal::new(150000, 2)),
        "Insufficient funds in 'savings': available 10.00, requested 1500.00"
    )]
    #[case::duplicate_type(
        LedgerError::duplicate_account_type(AccountType::Savings),
        "A savings account already exists"
    )]
    #[case::same_account(
        LedgerError::same_account_transfer("current"),
        "Cannot transfer from 'current' to itself"
    )]
    fn test_ledger_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case(
        BatchError::FileNotFound { path: "ops.csv".into() },
        "File not found: ops.csv"
    )]
    #[case(
        BatchError::MalformedJson { message: "expected value at line 1".into() },
        "Malformed JSON document: expected value at line 1"
    )]
    fn test_batch_error_display(#[case] error: BatchError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: BatchError = io_error.into();
        assert!(matches!(error, BatchError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: denied");
    }
}
