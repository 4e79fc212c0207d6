//! Batch validation
//!
//! Annotates each pending operation with a pass/fail verdict before
//! anything executes. Validation is a pre-flight snapshot check: every
//! operation is judged against the ledger's committed state as it stands
//! before the whole batch, independent of what earlier operations in the
//! same file would do. A deposit earlier in the file therefore does not
//! make a later withdrawal "provably fundable" here; the withdrawal's real
//! outcome is decided at execution time. This keeps preview mode and
//! validation meaning the same thing.
//!
//! The checks themselves live on [`Ledger`] and in [`core::transfer`] and
//! are the same ones execution re-runs, so the two phases can never
//! disagree.
//!
//! [`core::transfer`]: crate::core::transfer

use crate::core::{check_transfer, Ledger};
use crate::types::{BatchOperation, OperationKind};

/// Validate every pending operation in place
///
/// Already-failed entries (parse failures) are left untouched. On failure
/// the operation becomes `FAILED` with the business-rule message and is
/// thereby excluded from execution; on success it stays `PENDING`. The
/// ledger is never mutated.
pub fn validate(ledger: &Ledger, operations: &mut [BatchOperation]) {
    for operation in operations.iter_mut().filter(|op| op.is_pending()) {
        if let Err(message) = validate_one(ledger, &operation.kind) {
            operation.fail(message);
        }
    }
}

fn validate_one(ledger: &Ledger, kind: &OperationKind) -> Result<(), String> {
    match kind {
        OperationKind::Deposit { account, amount } => ledger
            .check_deposit(account, *amount)
            .map_err(|e| e.to_string()),
        OperationKind::Withdraw { account, amount } => ledger
            .check_withdraw(account, *amount)
            .map_err(|e| e.to_string()),
        OperationKind::Transfer {
            account,
            to_account,
            amount,
            ..
        } => check_transfer(ledger, account, to_account, *amount)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        OperationKind::CreateAccount {
            account_type,
            amount,
            nickname,
            overdraft_limit,
        } => ledger
            .check_create_account(
                account_type,
                *amount,
                nickname.as_deref(),
                *overdraft_limit,
            )
            .map(|_| ())
            .map_err(|e| e.to_string()),
        OperationKind::UpdateNickname { account, nickname } => ledger
            .check_nickname_update(account, nickname)
            .map_err(|e| e.to_string()),
        // Parse failures never reach here (they are not pending), but the
        // match stays exhaustive.
        OperationKind::Invalid { raw_type } => {
            Err(format!("Unknown operation type '{}'", raw_type))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationStatus;
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn funded_ledger() -> Ledger {
        let mut ledger = Ledger::new("alice");
        ledger
            .create_account("savings", Some(dec(100000)), None, None, Utc::now())
            .unwrap();
        ledger
            .create_account("current", Some(dec(50000)), None, Some(dec(20000)), Utc::now())
            .unwrap();
        ledger
    }

    fn pending(kind: OperationKind) -> BatchOperation {
        BatchOperation::pending(kind, Some(2))
    }

    #[test]
    fn test_valid_operations_stay_pending() {
        let ledger = funded_ledger();
        let mut ops = vec![
            pending(OperationKind::Deposit {
                account: "savings".into(),
                amount: dec(100),
            }),
            pending(OperationKind::Withdraw {
                account: "current".into(),
                amount: dec(60000), // within overdraft headroom
            }),
            pending(OperationKind::Transfer {
                account: "savings".into(),
                to_account: "current".into(),
                amount: dec(1000),
                memo: None,
            }),
        ];
        validate(&ledger, &mut ops);
        assert!(ops.iter().all(BatchOperation::is_pending));
    }

    #[rstest]
    #[case::non_positive_deposit(
        OperationKind::Deposit { account: "savings".into(), amount: dec(0) },
        "positive"
    )]
    #[case::unknown_account(
        OperationKind::Deposit { account: "vacation".into(), amount: dec(100) },
        "not found"
    )]
    #[case::insufficient(
        OperationKind::Withdraw { account: "savings".into(), amount: dec(100001) },
        "Insufficient funds"
    )]
    #[case::transfer_overdrawn(
        OperationKind::Transfer {
            account: "savings".into(),
            to_account: "current".into(),
            amount: dec(150000),
            memo: None,
        },
        "Insufficient funds"
    )]
    #[case::duplicate_account(
        OperationKind::CreateAccount {
            account_type: "savings".into(),
            amount: None,
            nickname: None,
            overdraft_limit: None,
        },
        "already exists"
    )]
    #[case::bad_account_type(
        OperationKind::CreateAccount {
            account_type: "checking".into(),
            amount: None,
            nickname: None,
            overdraft_limit: None,
        },
        "Unknown account type"
    )]
    #[case::nickname_on_missing_account(
        OperationKind::UpdateNickname { account: "vacation".into(), nickname: "x".into() },
        "not found"
    )]
    fn test_invalid_operations_fail_with_reason(
        #[case] kind: OperationKind,
        #[case] expected: &str,
    ) {
        let ledger = funded_ledger();
        let mut ops = vec![pending(kind)];
        validate(&ledger, &mut ops);
        assert_eq!(ops[0].status, OperationStatus::Failed);
        assert!(
            ops[0].error_message.as_deref().unwrap().contains(expected),
            "message was {:?}",
            ops[0].error_message
        );
    }

    #[test]
    fn test_validation_is_snapshot_not_sequential() {
        // savings holds 1000.00; the withdrawal of 1500.00 is judged against
        // that committed balance, not against the deposit earlier in the
        // same batch.
        let ledger = funded_ledger();
        let mut ops = vec![
            pending(OperationKind::Deposit {
                account: "savings".into(),
                amount: dec(100000),
            }),
            pending(OperationKind::Withdraw {
                account: "savings".into(),
                amount: dec(150000),
            }),
        ];
        validate(&ledger, &mut ops);
        assert!(ops[0].is_pending());
        assert_eq!(ops[1].status, OperationStatus::Failed);
    }

    #[test]
    fn test_already_failed_entries_are_skipped() {
        let ledger = funded_ledger();
        let mut ops = vec![BatchOperation::parse_failed(
            "teleport",
            Some(2),
            "Unknown operation type 'teleport'".into(),
        )];
        let original_message = ops[0].error_message.clone();
        validate(&ledger, &mut ops);
        assert_eq!(ops[0].error_message, original_message);
    }

    #[test]
    fn test_validation_never_mutates_the_ledger() {
        let ledger = funded_ledger();
        let snapshot = ledger.clone();
        let mut ops = vec![
            pending(OperationKind::Deposit {
                account: "savings".into(),
                amount: dec(5000),
            }),
            pending(OperationKind::CreateAccount {
                account_type: "salary".into(),
                amount: Some(dec(100)),
                nickname: None,
                overdraft_limit: None,
            }),
        ];
        validate(&ledger, &mut ops);
        assert_eq!(ledger, snapshot);
    }
}
