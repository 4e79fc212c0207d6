//! Dual-entry transfer engine
//!
//! Moves a balance between two accounts of the same user, producing two
//! linked ledger entries (debit leg on the source, credit leg on the
//! destination) that share one freshly generated [`TransferId`].
//!
//! The transfer is a single transactional unit. Every fallible step —
//! resolution, the available-balance check, and both checked balance
//! computations — happens before the first write. The commit itself is a
//! fixed sequence of infallible assignments and appends, so the ledger can
//! never be left holding only one leg: either both legs land or neither
//! does, and total ledger value is conserved.

use crate::core::ledger::Ledger;
use crate::types::{EntryKind, LedgerEntry, LedgerError, TransferId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A validated-and-applied transfer's outcome
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    pub source_balance: Decimal,
    pub destination_balance: Decimal,
}

/// Check a transfer without applying it
///
/// Shared by the batch validator (pre-flight) and [`transfer`] itself
/// (re-validation at execution time). Returns the resolved source and
/// destination positions on success.
pub fn check_transfer(
    ledger: &Ledger,
    from: &str,
    to: &str,
    amount: Decimal,
) -> Result<(usize, usize), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::non_positive_amount(amount));
    }

    let source = ledger
        .position_of(from)
        .ok_or_else(|| LedgerError::unknown_account(from))?;
    let destination = ledger
        .position_of(to)
        .ok_or_else(|| LedgerError::unknown_account(to))?;
    if source == destination {
        return Err(LedgerError::same_account_transfer(from));
    }

    let source_account = &ledger.accounts()[source];
    let destination_account = &ledger.accounts()[destination];
    if !source_account.active {
        return Err(LedgerError::inactive_account(from));
    }
    if !destination_account.active {
        return Err(LedgerError::inactive_account(to));
    }
    if source_account.available() < amount {
        return Err(LedgerError::insufficient_funds(
            from,
            source_account.available(),
            amount,
        ));
    }

    Ok((source, destination))
}

/// Execute a transfer between two accounts of the same user
///
/// # Errors
///
/// Fails, leaving both accounts untouched, if:
/// - the amount is not strictly positive
/// - either identifier does not resolve, or both resolve to one account
/// - either account is inactive
/// - the source's available balance is below the amount
/// - either post-balance computation overflows
pub fn transfer(
    ledger: &mut Ledger,
    from: &str,
    to: &str,
    amount: Decimal,
    memo: Option<String>,
    at: DateTime<Utc>,
) -> Result<TransferReceipt, LedgerError> {
    let (source, destination) = check_transfer(ledger, from, to, amount)?;

    // Stage: compute both post-balances and build both legs up front.
    // Nothing below this block may fail.
    let new_source_balance = ledger.accounts()[source]
        .balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("transfer debit"))?;
    let new_destination_balance = ledger.accounts()[destination]
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("transfer credit"))?;

    let transfer_id: TransferId = Uuid::new_v4();
    let debit_leg =
        LedgerEntry::transfer_leg(EntryKind::TransferOut, -amount, memo.clone(), transfer_id, at);
    let credit_leg = LedgerEntry::transfer_leg(EntryKind::TransferIn, amount, memo, transfer_id, at);

    // Commit: plain assignments and appends only.
    {
        let source_account = ledger.account_mut(source);
        source_account.balance = new_source_balance;
        source_account.record(debit_leg);
    }
    {
        let destination_account = ledger.account_mut(destination);
        destination_account.balance = new_destination_balance;
        destination_account.record(credit_leg);
    }

    Ok(TransferReceipt {
        transfer_id,
        source_balance: new_source_balance,
        destination_balance: new_destination_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

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

    #[test]
    fn test_transfer_conserves_total_value() {
        let mut ledger = funded_ledger();
        let before: Decimal = ledger.accounts().iter().map(|a| a.balance).sum();

        let receipt =
            transfer(&mut ledger, "savings", "current", dec(25000), None, Utc::now()).unwrap();

        let after: Decimal = ledger.accounts().iter().map(|a| a.balance).sum();
        assert_eq!(before, after);
        assert_eq!(receipt.source_balance, dec(75000));
        assert_eq!(receipt.destination_balance, dec(75000));
    }

    #[test]
    fn test_transfer_legs_are_linked() {
        let mut ledger = funded_ledger();
        let receipt = transfer(
            &mut ledger,
            "savings",
            "current",
            dec(10000),
            Some("rent".into()),
            Utc::now(),
        )
        .unwrap();

        let out = ledger.resolve("savings").unwrap().entries.last().unwrap().clone();
        let incoming = ledger.resolve("current").unwrap().entries.last().unwrap().clone();

        assert_eq!(out.kind, EntryKind::TransferOut);
        assert_eq!(out.amount, dec(-10000));
        assert_eq!(incoming.kind, EntryKind::TransferIn);
        assert_eq!(incoming.amount, dec(10000));
        assert_eq!(out.transfer_id, Some(receipt.transfer_id));
        assert_eq!(incoming.transfer_id, Some(receipt.transfer_id));
        assert_eq!(out.memo.as_deref(), Some("rent"));
    }

    #[test]
    fn test_transfer_can_draw_on_source_overdraft() {
        let mut ledger = funded_ledger();
        // current holds 500.00 with a 200.00 overdraft: 700.00 available
        let receipt =
            transfer(&mut ledger, "current", "savings", dec(60000), None, Utc::now()).unwrap();
        assert_eq!(receipt.source_balance, dec(-10000));
    }

    #[rstest]
    #[case::zero(dec(0))]
    #[case::negative(dec(-1))]
    fn test_transfer_rejects_non_positive_amount(#[case] amount: Decimal) {
        let mut ledger = funded_ledger();
        let err =
            transfer(&mut ledger, "savings", "current", amount, None, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_transfer_rejects_insufficient_funds_without_mutation() {
        let mut ledger = funded_ledger();
        let err = transfer(
            &mut ledger,
            "savings",
            "current",
            dec(150000),
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        // failed transfer leaves no trace on either side
        assert_eq!(ledger.resolve("savings").unwrap().balance, dec(100000));
        assert_eq!(ledger.resolve("current").unwrap().balance, dec(50000));
        assert_eq!(ledger.resolve("savings").unwrap().entries.len(), 1);
        assert_eq!(ledger.resolve("current").unwrap().entries.len(), 1);
    }

    #[test]
    fn test_transfer_rejects_same_account() {
        let mut ledger = funded_ledger();
        ledger.set_nickname("savings", "stash", Utc::now()).unwrap();
        // "savings" and "stash" resolve to one account
        let err = transfer(&mut ledger, "savings", "stash", dec(100), None, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::SameAccountTransfer { .. }));
    }

    #[test]
    fn test_transfer_rejects_unknown_destination() {
        let mut ledger = funded_ledger();
        let err =
            transfer(&mut ledger, "savings", "vacation", dec(100), None, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount { .. }));
    }

    #[test]
    fn test_transfer_rejects_inactive_destination() {
        let mut ledger = funded_ledger();
        ledger.set_active("current", false, Utc::now()).unwrap();
        let err =
            transfer(&mut ledger, "savings", "current", dec(100), None, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::InactiveAccount { .. }));
    }
}
