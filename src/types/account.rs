//! Account and ledger-entry types
//!
//! This module defines the account primitives the batch pipeline operates on:
//! the `Account` state (balance, overdraft, nickname, active flag), the
//! append-only `LedgerEntry` records attached to it, and the `AccountType`
//! taxonomy (one account per type per user).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier shared by the two legs of a transfer
pub type TransferId = Uuid;

/// The three account types a user may hold
///
/// A user holds at most one account of each type; batch operations address
/// accounts by type name or by nickname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Interest-bearing account; balance may never go negative
    Savings,
    /// Day-to-day account; may run negative down to its overdraft limit
    Current,
    /// Salary-credit account; balance may never go negative
    Salary,
}

impl AccountType {
    /// All account types, in display order
    pub const ALL: [AccountType; 3] = [
        AccountType::Savings,
        AccountType::Current,
        AccountType::Salary,
    ];

    /// Lowercase name as it appears in batch files
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
            AccountType::Salary => "salary",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "current" => Ok(AccountType::Current),
            "salary" => Ok(AccountType::Salary),
            other => Err(format!(
                "Unknown account type '{}' (expected savings, current or salary)",
                other
            )),
        }
    }
}

/// Kind of a single ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Deposit,
    Withdrawal,
    Interest,
    /// Outgoing leg of a transfer (debit side)
    TransferOut,
    /// Incoming leg of a transfer (credit side)
    TransferIn,
}

/// One record in an account's append-only ledger
///
/// Amounts are signed: credits (deposit, interest, incoming transfer leg)
/// are positive, debits (withdrawal, outgoing transfer leg) are negative.
/// The two legs of a transfer carry the same `transfer_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub amount: Decimal,
    pub memo: Option<String>,
    pub transfer_id: Option<TransferId>,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create an entry with no transfer linkage
    pub fn new(kind: EntryKind, amount: Decimal, memo: Option<String>, at: DateTime<Utc>) -> Self {
        LedgerEntry {
            kind,
            amount,
            memo,
            transfer_id: None,
            timestamp: at,
        }
    }

    /// Create one leg of a transfer, tagged with the shared transfer id
    pub fn transfer_leg(
        kind: EntryKind,
        amount: Decimal,
        memo: Option<String>,
        transfer_id: TransferId,
        at: DateTime<Utc>,
    ) -> Self {
        LedgerEntry {
            kind,
            amount,
            memo,
            transfer_id: Some(transfer_id),
            timestamp: at,
        }
    }
}

/// State of one account owned by the user
///
/// Invariants maintained by `core::ledger` and `core::transfer`:
/// - `balance >= -overdraft_limit` for current accounts, `balance >= 0`
///   for all others, after every committed operation
/// - inactive accounts reject deposits and withdrawals but remain readable
/// - `entries` is append-only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub account_type: AccountType,
    pub balance: Decimal,
    /// Non-negative; only current accounts draw against it
    pub overdraft_limit: Decimal,
    /// Optional unique-per-user alias, matched case-insensitively
    pub nickname: Option<String>,
    pub active: bool,
    pub entries: Vec<LedgerEntry>,
    pub last_activity: DateTime<Utc>,
}

impl Account {
    /// Create an active account with a zero balance and no entries
    pub fn new(account_type: AccountType, at: DateTime<Utc>) -> Self {
        Account {
            account_type,
            balance: Decimal::ZERO,
            overdraft_limit: Decimal::ZERO,
            nickname: None,
            active: true,
            entries: Vec::new(),
            last_activity: at,
        }
    }

    /// Funds the account can pay out right now
    ///
    /// Current accounts may draw into their overdraft, so their available
    /// balance is `balance + overdraft_limit`; every other type is limited
    /// to the balance itself.
    pub fn available(&self) -> Decimal {
        match self.account_type {
            AccountType::Current => self.balance + self.overdraft_limit,
            _ => self.balance,
        }
    }

    /// Lowest balance this account is allowed to reach
    pub fn floor(&self) -> Decimal {
        match self.account_type {
            AccountType::Current => -self.overdraft_limit,
            _ => Decimal::ZERO,
        }
    }

    /// Append an entry and refresh the activity timestamp
    pub fn record(&mut self, entry: LedgerEntry) {
        self.last_activity = entry.timestamp;
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("savings", AccountType::Savings)]
    #[case("current", AccountType::Current)]
    #[case("salary", AccountType::Salary)]
    #[case("SAVINGS", AccountType::Savings)]
    #[case("  Current  ", AccountType::Current)]
    fn test_account_type_from_str(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(input.parse::<AccountType>().unwrap(), expected);
    }

    #[test]
    fn test_account_type_from_str_rejects_unknown() {
        let err = "checking".parse::<AccountType>().unwrap_err();
        assert!(err.contains("Unknown account type"));
    }

    #[rstest]
    #[case(AccountType::Savings, Decimal::new(1000, 2), Decimal::new(5000, 2), Decimal::new(1000, 2))]
    #[case(AccountType::Current, Decimal::new(1000, 2), Decimal::new(5000, 2), Decimal::new(6000, 2))]
    #[case(AccountType::Salary, Decimal::ZERO, Decimal::new(5000, 2), Decimal::ZERO)]
    fn test_available_balance(
        #[case] account_type: AccountType,
        #[case] balance: Decimal,
        #[case] overdraft: Decimal,
        #[case] expected: Decimal,
    ) {
        let mut account = Account::new(account_type, Utc::now());
        account.balance = balance;
        account.overdraft_limit = overdraft;
        assert_eq!(account.available(), expected);
    }

    #[test]
    fn test_record_appends_and_touches_activity() {
        let created = Utc::now();
        let mut account = Account::new(AccountType::Savings, created);
        let later = created + chrono::Duration::seconds(5);

        account.record(LedgerEntry::new(
            EntryKind::Deposit,
            Decimal::new(10000, 2),
            None,
            later,
        ));

        assert_eq!(account.entries.len(), 1);
        assert_eq!(account.last_activity, later);
    }

    #[test]
    fn test_transfer_legs_share_id() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let out = LedgerEntry::transfer_leg(
            EntryKind::TransferOut,
            Decimal::new(-2500, 2),
            None,
            id,
            now,
        );
        let incoming =
            LedgerEntry::transfer_leg(EntryKind::TransferIn, Decimal::new(2500, 2), None, id, now);
        assert_eq!(out.transfer_id, incoming.transfer_id);
    }
}
