//! Entry batches for double-entry posting
//!
//! Ledger entries are always created in balanced groups ("batches").
//! A batch is built with the fluent API here, validated, and handed to
//! the poster as one atomic unit. Each entry carries exactly one side:
//! a debit amount or a credit amount, never both.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Currency, Money};
use rust_decimal::Decimal;

use crate::error::LedgerError;

/// The side of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySide {
    /// Debit entry
    Debit,
    /// Credit entry
    Credit,
}

impl EntrySide {
    /// Returns the opposite side, used when building reversals
    pub fn flipped(&self) -> Self {
        match self {
            EntrySide::Debit => EntrySide::Credit,
            EntrySide::Credit => EntrySide::Debit,
        }
    }

    /// Returns the storage string for this side
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySide::Debit => "DEBIT",
            EntrySide::Credit => "CREDIT",
        }
    }

    /// Parses a storage string into a side
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "DEBIT" => Ok(EntrySide::Debit),
            "CREDIT" => Ok(EntrySide::Credit),
            other => Err(LedgerError::validation(format!("Unknown entry side: {other}"))),
        }
    }
}

/// Reference to the source document that produced a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Document kind (e.g. "sales_bill", "payment", "reversal")
    pub kind: String,
    /// Document storage identifier
    pub id: Uuid,
}

impl DocumentRef {
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// A draft ledger entry awaiting posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Business code of the account to post to
    pub account_code: String,
    /// Debit or credit
    pub side: EntrySide,
    /// Amount (always positive)
    pub amount: Money,
    /// Optional narration for this line
    pub narration: Option<String>,
}

impl EntryDraft {
    /// Creates a debit entry
    pub fn debit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            side: EntrySide::Debit,
            amount,
            narration: None,
        }
    }

    /// Creates a credit entry
    pub fn credit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            side: EntrySide::Credit,
            amount,
            narration: None,
        }
    }

    /// Adds a narration to the entry
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// A balanced group of entries posted atomically as one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Batch description
    pub description: String,
    /// Transaction date; defaults to today when omitted
    pub transaction_date: Option<NaiveDate>,
    /// Source document reference
    pub document_ref: Option<DocumentRef>,
    /// Entries in this batch
    pub entries: Vec<EntryDraft>,
}

impl Batch {
    /// Creates an empty batch
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            transaction_date: None,
            document_ref: None,
            entries: Vec::new(),
        }
    }

    /// Sets the transaction date
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.transaction_date = Some(date);
        self
    }

    /// Sets the source document reference
    pub fn with_reference(mut self, kind: impl Into<String>, id: Uuid) -> Self {
        self.document_ref = Some(DocumentRef::new(kind, id));
        self
    }

    /// Adds a debit entry
    pub fn debit(mut self, account_code: impl Into<String>, amount: Money) -> Self {
        self.entries.push(EntryDraft::debit(account_code, amount));
        self
    }

    /// Adds a credit entry
    pub fn credit(mut self, account_code: impl Into<String>, amount: Money) -> Self {
        self.entries.push(EntryDraft::credit(account_code, amount));
        self
    }

    /// Adds a prepared entry
    pub fn entry(mut self, entry: EntryDraft) -> Self {
        self.entries.push(entry);
        self
    }

    /// Returns the total debit and credit amounts
    pub fn totals(&self) -> (Decimal, Decimal) {
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for entry in &self.entries {
            match entry.side {
                EntrySide::Debit => debits += entry.amount.amount(),
                EntrySide::Credit => credits += entry.amount.amount(),
            }
        }
        (debits, credits)
    }

    /// Checks whether total debits equal total credits
    pub fn is_balanced(&self) -> bool {
        let (debits, credits) = self.totals();
        debits == credits
    }

    /// Returns the single currency this batch posts in
    ///
    /// `None` for an empty batch; validation guarantees all entries
    /// share one currency.
    pub fn currency(&self) -> Option<Currency> {
        self.entries.first().map(|e| e.amount.currency())
    }

    /// Returns the distinct account codes referenced by this batch
    pub fn account_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.iter().map(|e| e.account_code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Validates the batch before posting
    ///
    /// # Errors
    ///
    /// - `EmptyBatch` when no entries are present
    /// - `Validation` when the transaction date lies in the future; a
    ///   future-dated batch would move the cached account balance ahead
    ///   of every as-of query until that date arrives
    /// - `InvalidEntry` when any amount is zero or negative, or when the
    ///   entries mix currencies
    /// - `UnbalancedBatch` when debits do not equal credits; nothing may
    ///   be persisted in that case
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.entries.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }

        if let Some(date) = self.transaction_date {
            let today = Utc::now().date_naive();
            if date > today {
                return Err(LedgerError::validation(format!(
                    "Transaction date {date} is in the future"
                )));
            }
        }

        let currency = self.entries[0].amount.currency();
        for entry in &self.entries {
            if !entry.amount.is_positive() {
                return Err(LedgerError::invalid_entry(format!(
                    "Entry on {} has non-positive amount {}",
                    entry.account_code,
                    entry.amount.amount()
                )));
            }
            if entry.amount.currency() != currency {
                return Err(LedgerError::invalid_entry(format!(
                    "Entry on {} is in {}, batch is in {}",
                    entry.account_code,
                    entry.amount.currency().code(),
                    currency.code()
                )));
            }
        }

        let (debits, credits) = self.totals();
        if debits != credits {
            return Err(LedgerError::UnbalancedBatch { debits, credits });
        }

        Ok(())
    }

    /// Builds the reversal of this batch
    ///
    /// Every entry is re-stated with its side swapped. Cancelling a posted
    /// document never deletes its entries; it posts the reversal instead,
    /// preserving the audit trail.
    pub fn reversal(&self, reason: &str) -> Batch {
        Batch {
            description: format!("Reversal: {reason}"),
            transaction_date: None,
            document_ref: self.document_ref.clone(),
            entries: self
                .entries
                .iter()
                .map(|e| EntryDraft {
                    account_code: e.account_code.clone(),
                    side: e.side.flipped(),
                    amount: e.amount,
                    narration: Some(format!("Reversal: {reason}")),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    #[test]
    fn test_balanced_batch_validates() {
        let batch = Batch::new("Sale")
            .debit("CASH001", inr(dec!(1000.00)))
            .credit("SALES001", inr(dec!(1000.00)));

        assert!(batch.is_balanced());
        assert!(batch.validate().is_ok());
        assert_eq!(batch.currency(), Some(Currency::INR));
    }

    #[test]
    fn test_unbalanced_batch_reports_both_sides() {
        let batch = Batch::new("Bad sale")
            .debit("CASH001", inr(dec!(1000.00)))
            .credit("SALES001", inr(dec!(900.00)));

        match batch.validate() {
            Err(LedgerError::UnbalancedBatch { debits, credits }) => {
                assert_eq!(debits, dec!(1000.00));
                assert_eq!(credits, dec!(900.00));
            }
            other => panic!("Expected UnbalancedBatch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            Batch::new("Nothing").validate(),
            Err(LedgerError::EmptyBatch)
        ));
    }

    #[test]
    fn test_zero_amount_entry_rejected() {
        let batch = Batch::new("Zero")
            .debit("CASH001", inr(dec!(0)))
            .credit("SALES001", inr(dec!(0)));

        assert!(matches!(
            batch.validate(),
            Err(LedgerError::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_mixed_currency_batch_rejected() {
        let batch = Batch::new("Cross-currency sale")
            .debit("CASH001", inr(dec!(1000.00)))
            .credit("SALES001", Money::new(dec!(1000.00), Currency::USD));

        assert!(matches!(
            batch.validate(),
            Err(LedgerError::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_future_dated_batch_rejected() {
        let tomorrow = Utc::now().date_naive() + chrono::Days::new(1);
        let batch = Batch::new("Post-dated sale")
            .dated(tomorrow)
            .debit("CASH001", inr(dec!(500.00)))
            .credit("SALES001", inr(dec!(500.00)));

        assert!(matches!(
            batch.validate(),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_today_and_past_dates_accepted() {
        let today = Utc::now().date_naive();
        for date in [today, today - chrono::Days::new(30)] {
            let batch = Batch::new("Sale")
                .dated(date)
                .debit("CASH001", inr(dec!(500.00)))
                .credit("SALES001", inr(dec!(500.00)));
            assert!(batch.validate().is_ok(), "date {date} must be accepted");
        }
    }

    #[test]
    fn test_reversal_swaps_sides_and_stays_balanced() {
        let batch = Batch::new("Sale")
            .debit("CASH001", inr(dec!(750.00)))
            .credit("SALES001", inr(dec!(750.00)));

        let reversal = batch.reversal("bill cancelled");
        assert!(reversal.is_balanced());
        assert_eq!(reversal.entries[0].side, EntrySide::Credit);
        assert_eq!(reversal.entries[1].side, EntrySide::Debit);
        assert_eq!(reversal.entries[0].amount, batch.entries[0].amount);
    }

    #[test]
    fn test_account_codes_deduplicated() {
        let batch = Batch::new("Split")
            .debit("CASH001", inr(dec!(600.00)))
            .debit("CASH001", inr(dec!(400.00)))
            .credit("SALES001", inr(dec!(1000.00)));

        assert_eq!(batch.account_codes(), vec!["CASH001", "SALES001"]);
    }
}
