//! Batch operation types
//!
//! A batch file parses into an ordered sequence of [`BatchOperation`]s. Each
//! carries a typed [`OperationKind`] rather than a string-keyed parameter
//! bag, so validation and execution dispatch through one exhaustive match
//! and adding an operation type is a compile-time checked change.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// One banking operation parsed from a batch file
///
/// Required fields are enforced structurally: a deposit without an amount
/// cannot be represented, so rows that fail field coercion become
/// [`OperationKind::Invalid`] at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    /// Credit `amount` to the addressed account
    Deposit { account: String, amount: Decimal },
    /// Debit `amount` from the addressed account, overdraft permitting
    Withdraw { account: String, amount: Decimal },
    /// Move `amount` between two accounts of the same user
    Transfer {
        account: String,
        to_account: String,
        amount: Decimal,
        memo: Option<String>,
    },
    /// Open a new account of `account_type` (at most one per type)
    CreateAccount {
        account_type: String,
        amount: Option<Decimal>,
        nickname: Option<String>,
        overdraft_limit: Option<Decimal>,
    },
    /// Set or replace an account's nickname
    UpdateNickname { account: String, nickname: String },
    /// Placeholder for a row that could not be parsed; always failed
    Invalid { raw_type: String },
}

impl OperationKind {
    /// Lowercase type label used in reports and per-type breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Deposit { .. } => "deposit",
            OperationKind::Withdraw { .. } => "withdraw",
            OperationKind::Transfer { .. } => "transfer",
            OperationKind::CreateAccount { .. } => "create_account",
            OperationKind::UpdateNickname { .. } => "update_nickname",
            OperationKind::Invalid { .. } => "invalid",
        }
    }

    /// Named parameters as a JSON object, for report output
    pub fn parameters(&self) -> Value {
        match self {
            OperationKind::Deposit { account, amount } => json!({
                "account": account,
                "amount": amount,
            }),
            OperationKind::Withdraw { account, amount } => json!({
                "account": account,
                "amount": amount,
            }),
            OperationKind::Transfer {
                account,
                to_account,
                amount,
                memo,
            } => json!({
                "account": account,
                "to_account": to_account,
                "amount": amount,
                "memo": memo,
            }),
            OperationKind::CreateAccount {
                account_type,
                amount,
                nickname,
                overdraft_limit,
            } => json!({
                "account": account_type,
                "amount": amount,
                "nickname": nickname,
                "overdraft_limit": overdraft_limit,
            }),
            OperationKind::UpdateNickname { account, nickname } => json!({
                "account": account,
                "nickname": nickname,
            }),
            OperationKind::Invalid { raw_type } => json!({
                "operation_type": raw_type,
            }),
        }
    }
}

/// Lifecycle status of a batch operation
///
/// `Pending → Processing → Success | Failed`; parse and validation failures
/// jump straight to `Failed`. `Skipped` is reserved for a future
/// stop-on-first-failure mode and is never set today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Processing,
    Success,
    Failed,
    Skipped,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::Processing => "PROCESSING",
            OperationStatus::Success => "SUCCESS",
            OperationStatus::Failed => "FAILED",
            OperationStatus::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

/// One operation flowing through the parse → validate → execute pipeline
///
/// Created by the parser, annotated in place by the validator and executor,
/// and read by the reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperation {
    /// Unique per run
    pub id: Uuid,
    pub kind: OperationKind,
    /// 1-based source line for CSV input; array index for JSON input
    pub line_number: Option<u64>,
    pub status: OperationStatus,
    pub error_message: Option<String>,
    pub result: Option<String>,
    /// Wall-clock execution latency, recorded for success and failure alike
    pub execution_time: Option<Duration>,
}

impl BatchOperation {
    /// Create a pending operation awaiting validation
    pub fn pending(kind: OperationKind, line_number: Option<u64>) -> Self {
        BatchOperation {
            id: Uuid::new_v4(),
            kind,
            line_number,
            status: OperationStatus::Pending,
            error_message: None,
            result: None,
            execution_time: None,
        }
    }

    /// Create an operation that already failed during parsing
    pub fn parse_failed(raw_type: &str, line_number: Option<u64>, message: String) -> Self {
        BatchOperation {
            id: Uuid::new_v4(),
            kind: OperationKind::Invalid {
                raw_type: raw_type.to_string(),
            },
            line_number,
            status: OperationStatus::Failed,
            error_message: Some(message),
            result: None,
            execution_time: None,
        }
    }

    /// Whether this operation is still eligible for the next pipeline stage
    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }

    /// Mark the operation failed with a reason
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = OperationStatus::Failed;
        self.error_message = Some(message.into());
    }

    /// Mark the operation successful with a result description
    pub fn succeed(&mut self, result: impl Into<String>) {
        self.status = OperationStatus::Success;
        self.result = Some(result.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn deposit(amount: i64) -> OperationKind {
        OperationKind::Deposit {
            account: "savings".to_string(),
            amount: Decimal::new(amount, 2),
        }
    }

    #[rstest]
    #[case(deposit(100), "deposit")]
    #[case(OperationKind::Withdraw { account: "current".into(), amount: Decimal::ONE }, "withdraw")]
    #[case(OperationKind::Invalid { raw_type: "teleport".into() }, "invalid")]
    fn test_labels(#[case] kind: OperationKind, #[case] expected: &str) {
        assert_eq!(kind.label(), expected);
    }

    #[test]
    fn test_pending_starts_clean() {
        let op = BatchOperation::pending(deposit(100), Some(2));
        assert!(op.is_pending());
        assert_eq!(op.line_number, Some(2));
        assert!(op.error_message.is_none());
        assert!(op.result.is_none());
        assert!(op.execution_time.is_none());
    }

    #[test]
    fn test_parse_failed_is_terminal() {
        let op = BatchOperation::parse_failed("teleport", Some(7), "Unknown operation".into());
        assert_eq!(op.status, OperationStatus::Failed);
        assert!(!op.is_pending());
        assert_eq!(op.kind.label(), "invalid");
        assert_eq!(op.error_message.as_deref(), Some("Unknown operation"));
    }

    #[test]
    fn test_fail_and_succeed_transitions() {
        let mut op = BatchOperation::pending(deposit(100), None);
        op.fail("insufficient funds");
        assert_eq!(op.status, OperationStatus::Failed);

        let mut op = BatchOperation::pending(deposit(100), None);
        op.succeed("balance now 1.00");
        assert_eq!(op.status, OperationStatus::Success);
        assert_eq!(op.result.as_deref(), Some("balance now 1.00"));
    }

    #[test]
    fn test_transfer_parameters_include_all_fields() {
        let kind = OperationKind::Transfer {
            account: "savings".into(),
            to_account: "current".into(),
            amount: Decimal::new(5000, 2),
            memo: Some("rent".into()),
        };
        let params = kind.parameters();
        assert_eq!(params["account"], "savings");
        assert_eq!(params["to_account"], "current");
        assert_eq!(params["memo"], "rent");
    }
}
