//! Batch execution
//!
//! Replays validated operations against the ledger, in original file order.
//! Each eligible operation is marked `PROCESSING`, dispatched through one
//! exhaustive match, and lands on `SUCCESS` or `FAILED` — any failure
//! raised during the attempt is captured into the operation, never
//! propagated out of the run. There is no batch-level rollback: the ledger
//! after a partially failing batch reflects every operation that
//! individually succeeded.
//!
//! Wall-clock latency is recorded for every executed operation, success or
//! failure. After each operation, one audit event is emitted and the
//! optional progress callback is invoked inline on the calling thread;
//! it is a plain function reference, not a concurrency primitive.

use crate::audit::{AuditEvent, AuditSink, Clock};
use crate::core::{transfer, Ledger};
use crate::types::{BatchOperation, LedgerError, OperationKind, OperationStatus};
use std::time::Instant;

/// Inline progress hook: `(completed, total_eligible, operation)`
pub type ProgressCallback<'a> = &'a mut dyn FnMut(usize, usize, &BatchOperation);

/// Execute every pending operation, annotating each in place
///
/// Operations already `FAILED` by the parser or validator are skipped.
/// Individual failures never block or roll back other operations.
pub fn execute(
    ledger: &mut Ledger,
    operations: &mut [BatchOperation],
    clock: &dyn Clock,
    audit: &mut dyn AuditSink,
    mut progress: Option<ProgressCallback<'_>>,
) {
    let total_eligible = operations.iter().filter(|op| op.is_pending()).count();
    let mut completed = 0usize;

    for operation in operations.iter_mut() {
        if !operation.is_pending() {
            continue;
        }

        operation.status = OperationStatus::Processing;
        let started = Instant::now();

        match apply(ledger, &operation.kind, clock) {
            Ok(result) => operation.succeed(result),
            Err(error) => operation.fail(error.to_string()),
        }
        operation.execution_time = Some(started.elapsed());

        audit.record(AuditEvent::from_operation(operation, clock.now()));

        completed += 1;
        if let Some(callback) = progress.as_mut() {
            callback(completed, total_eligible, operation);
        }
    }
}

/// Apply one operation's mutation, returning its result text
fn apply(
    ledger: &mut Ledger,
    kind: &OperationKind,
    clock: &dyn Clock,
) -> Result<String, LedgerError> {
    let now = clock.now();
    match kind {
        OperationKind::Deposit { account, amount } => {
            let balance = ledger.deposit(account, *amount, None, now)?;
            Ok(format!(
                "Deposited {} to '{}'; balance now {}",
                amount, account, balance
            ))
        }
        OperationKind::Withdraw { account, amount } => {
            let balance = ledger.withdraw(account, *amount, None, now)?;
            Ok(format!(
                "Withdrew {} from '{}'; balance now {}",
                amount, account, balance
            ))
        }
        OperationKind::Transfer {
            account,
            to_account,
            amount,
            memo,
        } => {
            let receipt = transfer(ledger, account, to_account, *amount, memo.clone(), now)?;
            Ok(format!(
                "Transferred {} from '{}' to '{}' (transfer {})",
                amount, account, to_account, receipt.transfer_id
            ))
        }
        OperationKind::CreateAccount {
            account_type,
            amount,
            nickname,
            overdraft_limit,
        } => {
            let account =
                ledger.create_account(account_type, *amount, nickname.clone(), *overdraft_limit, now)?;
            Ok(format!(
                "Created {} account with balance {}",
                account.account_type, account.balance
            ))
        }
        OperationKind::UpdateNickname { account, nickname } => {
            ledger.set_nickname(account, nickname, now)?;
            Ok(format!("Nickname for '{}' set to '{}'", account, nickname))
        }
        // Invalid operations are terminal at parse time and never pending.
        OperationKind::Invalid { raw_type } => Err(LedgerError::UnknownAccountType {
            raw: raw_type.clone(),
        }),
    }
}
