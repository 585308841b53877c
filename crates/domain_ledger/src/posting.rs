//! Posting arithmetic and posted-batch types
//!
//! In double-entry accounting the signed effect of an entry on an
//! account's running balance depends on the account's normal side:
//! - Asset & Expense accounts: debits increase, credits decrease
//! - Liability, Equity & Revenue accounts: credits increase, debits decrease
//!
//! The durable poster applies `balance_delta` to each referenced account
//! inside the same transaction that persists the entries, under a row
//! lock, so two concurrent batches touching one account never lose an
//! update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BatchId, Currency, LedgerEntryId, Money};

use crate::account::{Account, AccountType};
use crate::entry::{DocumentRef, EntrySide};

/// Signed change to an account's cached balance for one entry
pub fn balance_delta(account_type: AccountType, side: EntrySide, amount: Money) -> Money {
    match (account_type.is_debit_normal(), side) {
        (true, EntrySide::Debit) => amount,
        (true, EntrySide::Credit) => -amount,
        (false, EntrySide::Debit) => -amount,
        (false, EntrySide::Credit) => amount,
    }
}

/// A ledger entry that has been committed
///
/// Posted entries are immutable; corrections go through reversal batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedEntry {
    /// Storage identifier
    pub id: LedgerEntryId,
    /// Account the entry belongs to
    pub account_code: String,
    /// Debit or credit
    pub side: EntrySide,
    /// Amount (always positive)
    pub amount: Money,
    /// Transaction date
    pub transaction_date: NaiveDate,
    /// Narration
    pub narration: Option<String>,
    /// Reconciliation flag
    pub reconciled: bool,
    /// Reconciliation date, set when reconciled
    pub reconciled_on: Option<NaiveDate>,
}

/// A committed batch with its entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedBatch {
    /// Storage identifier
    pub id: BatchId,
    /// Business batch number (e.g. BATCH0042)
    pub number: String,
    /// Description
    pub description: String,
    /// Currency every entry in the batch posts in
    pub currency: Currency,
    /// Source document reference
    pub document_ref: Option<DocumentRef>,
    /// Batch this one reverses, if any
    pub reversal_of: Option<BatchId>,
    /// Caller-supplied idempotency key
    pub idempotency_key: String,
    /// Entries committed with this batch
    pub entries: Vec<PostedEntry>,
    /// Commit timestamp
    pub posted_at: DateTime<Utc>,
}

/// An account code with its balance after posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub code: String,
    pub balance: Money,
}

/// Result returned to the caller after a batch commits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Storage identifier of the committed batch
    pub batch_id: BatchId,
    /// Business batch number
    pub batch_number: String,
    /// New balance of every account the batch touched
    pub balances: Vec<AccountBalance>,
    /// True when an idempotency-key match returned the prior result
    pub replayed: bool,
}

/// A single row in the trial balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_code: String,
    pub account_name: String,
    pub debit: Money,
    pub credit: Money,
}

/// Trial balance report built from cached account balances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: Money,
    pub total_credits: Money,
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Builds a trial balance from a chart of accounts
    ///
    /// Each non-zero balance is placed on its account's normal side.
    pub fn from_accounts(accounts: &[Account], currency: Currency) -> Self {
        let zero = Money::zero(currency);
        let mut rows = Vec::new();
        let mut total_debits = zero;
        let mut total_credits = zero;

        for account in accounts {
            if account.current_balance.is_zero() {
                continue;
            }

            let magnitude = account.current_balance.abs();

            // A positive balance sits on the account's normal side; a
            // negative balance flips to the opposite column.
            let debit_side =
                account.account_type.is_debit_normal() == account.current_balance.is_positive();

            let (debit, credit) = if debit_side {
                (magnitude, zero)
            } else {
                (zero, magnitude)
            };

            total_debits = total_debits + debit;
            total_credits = total_credits + credit;

            rows.push(TrialBalanceRow {
                account_code: account.code.clone(),
                account_name: account.name.clone(),
                debit,
                credit,
            });
        }

        let is_balanced = total_debits == total_credits;
        Self {
            rows,
            total_debits,
            total_credits,
            is_balanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn inr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    #[test]
    fn test_debit_normal_accounts_grow_with_debits() {
        let delta = balance_delta(AccountType::Asset, EntrySide::Debit, inr(dec!(1000.00)));
        assert_eq!(delta.amount(), dec!(1000.00));

        let delta = balance_delta(AccountType::Asset, EntrySide::Credit, inr(dec!(1000.00)));
        assert_eq!(delta.amount(), dec!(-1000.00));
    }

    #[test]
    fn test_credit_normal_accounts_grow_with_credits() {
        let delta = balance_delta(AccountType::Revenue, EntrySide::Credit, inr(dec!(1000.00)));
        assert_eq!(delta.amount(), dec!(1000.00));

        let delta = balance_delta(AccountType::Liability, EntrySide::Debit, inr(dec!(250.00)));
        assert_eq!(delta.amount(), dec!(-250.00));
    }

    #[test]
    fn test_trial_balance_balances_after_symmetric_posting() {
        let currency = Currency::INR;
        let mut cash = Account::new("CASH001", "Cash", AccountType::Asset, currency);
        let mut sales = Account::new("SALES001", "Sales", AccountType::Revenue, currency);

        // Simulate a posted sale: debit cash, credit sales
        cash.current_balance = cash.current_balance
            + balance_delta(AccountType::Asset, EntrySide::Debit, inr(dec!(1000.00)));
        sales.current_balance = sales.current_balance
            + balance_delta(AccountType::Revenue, EntrySide::Credit, inr(dec!(1000.00)));

        let tb = TrialBalance::from_accounts(&[cash, sales], currency);
        assert!(tb.is_balanced);
        assert_eq!(tb.total_debits.amount(), dec!(1000.00));
        assert_eq!(tb.total_credits.amount(), dec!(1000.00));
    }
}
