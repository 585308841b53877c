//! Account types for the chart of accounts
//!
//! Accounts are identified by a hierarchical string code (parent prefix
//! plus a 3-digit sequence, e.g. "2108001") and carry both an opening
//! balance and a cached current balance. The cached balance is a
//! performance optimisation: it must always equal the opening balance
//! plus the signed sum of posted entries, and is only ever mutated by
//! the ledger poster inside the posting transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Currency, Money};

use crate::error::LedgerError;

/// Types of accounts in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
    /// Revenue accounts (credit normal balance)
    Revenue,
    /// Expense accounts (debit normal balance)
    Expense,
}

impl AccountType {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }

    /// Returns the storage string for this account type
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
            AccountType::Equity => "EQUITY",
            AccountType::Revenue => "REVENUE",
            AccountType::Expense => "EXPENSE",
        }
    }

    /// Parses a storage string into an account type
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "ASSET" => Ok(AccountType::Asset),
            "LIABILITY" => Ok(AccountType::Liability),
            "EQUITY" => Ok(AccountType::Equity),
            "REVENUE" => Ok(AccountType::Revenue),
            "EXPENSE" => Ok(AccountType::Expense),
            other => Err(LedgerError::validation(format!(
                "Unknown account type: {other}"
            ))),
        }
    }
}

/// An account in the chart of accounts
///
/// Accounts referenced by ledger entries are never deleted, only
/// deactivated, so audit history stays intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Storage identifier
    pub id: AccountId,
    /// Business code, unique and hierarchical by convention
    pub code: String,
    /// Display name
    pub name: String,
    /// Account type, fixing the normal balance side
    pub account_type: AccountType,
    /// Account currency
    pub currency: Currency,
    /// Balance at onboarding
    pub opening_balance: Money,
    /// Cached running balance, maintained by the poster
    pub current_balance: Money,
    /// Soft-delete flag
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account with a zero opening balance
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new_v7(),
            code: code.into(),
            name: name.into(),
            account_type,
            currency,
            opening_balance: Money::zero(currency),
            current_balance: Money::zero(currency),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the opening balance (and seeds the cached balance from it)
    pub fn with_opening_balance(mut self, opening: Money) -> Self {
        self.opening_balance = opening;
        self.current_balance = opening;
        self
    }

    /// Soft-deactivates the account
    ///
    /// Deactivated accounts reject new postings but keep their history.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Returns an error if the account cannot accept postings
    pub fn ensure_postable(&self) -> Result<(), LedgerError> {
        if !self.is_active {
            return Err(LedgerError::AccountInactive(self.code.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_sides() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Equity.is_debit_normal());
        assert!(!AccountType::Revenue.is_debit_normal());
    }

    #[test]
    fn test_account_type_round_trip() {
        for t in [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Revenue,
            AccountType::Expense,
        ] {
            assert_eq!(AccountType::parse(t.as_str()).unwrap(), t);
        }
        assert!(AccountType::parse("INCOME").is_err());
    }

    #[test]
    fn test_opening_balance_seeds_cached_balance() {
        let account = Account::new("CASH001", "Cash in hand", AccountType::Asset, Currency::INR)
            .with_opening_balance(Money::new(dec!(500.00), Currency::INR));

        assert_eq!(account.current_balance, account.opening_balance);
    }

    #[test]
    fn test_deactivated_account_rejects_postings() {
        let mut account =
            Account::new("2108001", "Vendor - Acme", AccountType::Liability, Currency::INR);
        assert!(account.ensure_postable().is_ok());

        account.deactivate();
        assert!(matches!(
            account.ensure_postable(),
            Err(LedgerError::AccountInactive(_))
        ));
    }
}
