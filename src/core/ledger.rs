//! User ledger: the account aggregate and its balance operations
//!
//! The [`Ledger`] owns every account of one user and is the single authority
//! for account resolution and balance mutation. Validation and execution
//! both go through the same checks here, so the two phases can never
//! disagree about what an identifier resolves to or what would overdraw an
//! account.
//!
//! Resolution order is fixed: nickname first (case-insensitive), then
//! account type name. Nicknames that would shadow a type name are rejected
//! when set, which keeps the order unambiguous.

use crate::types::{Account, AccountType, EntryKind, LedgerEntry, LedgerError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// All accounts of one user
///
/// Mutated in place by the batch executor and the transfer engine. The
/// pipeline is strictly single-threaded; callers embedding this in a
/// multi-request service must serialize batch runs per user externally.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    owner: String,
    accounts: Vec<Account>,
}

impl Ledger {
    /// Create an empty ledger for the named owner
    pub fn new(owner: impl Into<String>) -> Self {
        Ledger {
            owner: owner.into(),
            accounts: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// All accounts, in creation order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Resolve an identifier to an account position
    ///
    /// Tries nicknames first, then account type names, both
    /// case-insensitively. This is the one resolution function shared by
    /// the validator and the executor.
    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        let needle = identifier.trim();
        if let Some(index) = self.accounts.iter().position(|account| {
            account
                .nickname
                .as_deref()
                .is_some_and(|nick| nick.eq_ignore_ascii_case(needle))
        }) {
            return Some(index);
        }
        let account_type = AccountType::from_str(needle).ok()?;
        self.accounts
            .iter()
            .position(|account| account.account_type == account_type)
    }

    /// Resolve an identifier to an account
    pub fn resolve(&self, identifier: &str) -> Option<&Account> {
        self.position_of(identifier).map(|i| &self.accounts[i])
    }

    /// The account of the given type, if it exists
    pub fn account_of_type(&self, account_type: AccountType) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.account_type == account_type)
    }

    fn require(&self, identifier: &str) -> Result<usize, LedgerError> {
        self.position_of(identifier)
            .ok_or_else(|| LedgerError::unknown_account(identifier))
    }

    fn require_active(&self, identifier: &str) -> Result<usize, LedgerError> {
        let index = self.require(identifier)?;
        if !self.accounts[index].active {
            return Err(LedgerError::inactive_account(identifier));
        }
        Ok(index)
    }

    fn check_nickname_free(
        &self,
        nickname: &str,
        exclude: Option<usize>,
    ) -> Result<(), LedgerError> {
        if AccountType::from_str(nickname).is_ok() {
            return Err(LedgerError::NicknameShadowsType {
                nickname: nickname.to_string(),
            });
        }
        let taken = self.accounts.iter().enumerate().any(|(index, account)| {
            Some(index) != exclude
                && account
                    .nickname
                    .as_deref()
                    .is_some_and(|nick| nick.eq_ignore_ascii_case(nickname))
        });
        if taken {
            return Err(LedgerError::duplicate_nickname(nickname));
        }
        Ok(())
    }

    // ---- pre-flight checks (read-only, shared with the validator) ----

    /// Check a deposit without applying it
    pub fn check_deposit(&self, identifier: &str, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::non_positive_amount(amount));
        }
        self.require_active(identifier)?;
        Ok(())
    }

    /// Check a withdrawal without applying it
    ///
    /// Applies the available-balance rule: current accounts may draw into
    /// their overdraft, everything else is limited to the balance.
    pub fn check_withdraw(&self, identifier: &str, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::non_positive_amount(amount));
        }
        let index = self.require_active(identifier)?;
        let account = &self.accounts[index];
        if account.available() < amount {
            return Err(LedgerError::insufficient_funds(
                identifier,
                account.available(),
                amount,
            ));
        }
        Ok(())
    }

    /// Check a create_account without applying it
    pub fn check_create_account(
        &self,
        raw_type: &str,
        opening_balance: Option<Decimal>,
        nickname: Option<&str>,
        overdraft_limit: Option<Decimal>,
    ) -> Result<AccountType, LedgerError> {
        let account_type =
            AccountType::from_str(raw_type).map_err(|_| LedgerError::UnknownAccountType {
                raw: raw_type.trim().to_string(),
            })?;
        if self.account_of_type(account_type).is_some() {
            return Err(LedgerError::duplicate_account_type(account_type));
        }
        if let Some(amount) = opening_balance {
            if amount < Decimal::ZERO {
                return Err(LedgerError::NegativeOpeningBalance { amount });
            }
        }
        if let Some(limit) = overdraft_limit {
            if limit < Decimal::ZERO {
                return Err(LedgerError::NegativeOverdraftLimit { amount: limit });
            }
        }
        if let Some(nick) = nickname {
            self.check_nickname_free(nick, None)?;
        }
        Ok(account_type)
    }

    /// Check a nickname update without applying it
    pub fn check_nickname_update(
        &self,
        identifier: &str,
        nickname: &str,
    ) -> Result<(), LedgerError> {
        let index = self.require(identifier)?;
        self.check_nickname_free(nickname, Some(index))
    }

    // ---- mutations ----

    /// Open a new account
    ///
    /// At most one account per type. A positive opening balance is recorded
    /// as an initial deposit entry. The overdraft limit only applies to
    /// current accounts; it is forced to zero for the other types.
    pub fn create_account(
        &mut self,
        raw_type: &str,
        opening_balance: Option<Decimal>,
        nickname: Option<String>,
        overdraft_limit: Option<Decimal>,
        at: DateTime<Utc>,
    ) -> Result<&Account, LedgerError> {
        let account_type = self.check_create_account(
            raw_type,
            opening_balance,
            nickname.as_deref(),
            overdraft_limit,
        )?;

        let mut account = Account::new(account_type, at);
        if account_type == AccountType::Current {
            account.overdraft_limit = overdraft_limit.unwrap_or(Decimal::ZERO);
        }
        account.nickname = nickname;
        if let Some(amount) = opening_balance {
            if amount > Decimal::ZERO {
                account.balance = amount;
                account.record(LedgerEntry::new(
                    EntryKind::Deposit,
                    amount,
                    Some("opening balance".to_string()),
                    at,
                ));
            }
        }

        let index = self.accounts.len();
        self.accounts.push(account);
        Ok(&self.accounts[index])
    }

    /// Credit an account, returning the new balance
    pub fn deposit(
        &mut self,
        identifier: &str,
        amount: Decimal,
        memo: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        self.check_deposit(identifier, amount)?;
        let index = self.require_active(identifier)?;
        let account = &mut self.accounts[index];

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit"))?;

        account.balance = new_balance;
        account.record(LedgerEntry::new(EntryKind::Deposit, amount, memo, at));
        Ok(new_balance)
    }

    /// Debit an account, returning the new balance
    ///
    /// Fails if the debit would push the balance below the account's floor
    /// (`-overdraft_limit` for current accounts, zero otherwise).
    pub fn withdraw(
        &mut self,
        identifier: &str,
        amount: Decimal,
        memo: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        self.check_withdraw(identifier, amount)?;
        let index = self.require_active(identifier)?;
        let account = &mut self.accounts[index];

        let new_balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("withdraw"))?;

        account.balance = new_balance;
        account.record(LedgerEntry::new(EntryKind::Withdrawal, -amount, memo, at));
        Ok(new_balance)
    }

    /// Set or replace an account's nickname
    pub fn set_nickname(
        &mut self,
        identifier: &str,
        nickname: &str,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        self.check_nickname_update(identifier, nickname)?;
        let index = self.require(identifier)?;
        let account = &mut self.accounts[index];
        account.nickname = Some(nickname.trim().to_string());
        account.last_activity = at;
        Ok(())
    }

    /// Activate or deactivate an account
    ///
    /// Inactive accounts reject deposits and withdrawals but remain
    /// readable and reportable.
    pub fn set_active(
        &mut self,
        identifier: &str,
        active: bool,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let index = self.require(identifier)?;
        let account = &mut self.accounts[index];
        account.active = active;
        account.last_activity = at;
        Ok(())
    }

    /// Credit interest on the savings account at `annual_rate_percent`
    ///
    /// Returns the interest amount credited (rounded to two decimal
    /// places), or zero when there is no active savings balance to pay
    /// interest on.
    pub fn apply_interest(
        &mut self,
        annual_rate_percent: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        let index = match self
            .accounts
            .iter()
            .position(|a| a.account_type == AccountType::Savings)
        {
            Some(index) => index,
            None => return Ok(Decimal::ZERO),
        };
        let account = &mut self.accounts[index];
        if !account.active || account.balance <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let hundred = Decimal::new(100, 0);
        let interest = (account.balance * annual_rate_percent / hundred).round_dp(2);
        if interest <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let new_balance = account
            .balance
            .checked_add(interest)
            .ok_or_else(|| LedgerError::arithmetic_overflow("interest"))?;
        account.balance = new_balance;
        account.record(LedgerEntry::new(
            EntryKind::Interest,
            interest,
            Some(format!("interest at {}%", annual_rate_percent)),
            at,
        ));
        Ok(interest)
    }

    /// Internal: direct mutable access for the transfer engine
    pub(crate) fn account_mut(&mut self, index: usize) -> &mut Account {
        &mut self.accounts[index]
    }
}
