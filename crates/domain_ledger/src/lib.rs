//! Ledger Domain - Double-Entry Bookkeeping Rules
//!
//! This crate implements the pure half of the financial core: account
//! types and their normal balance sides, balanced entry batches, the
//! three-mode tax calculator, and the signed-balance arithmetic applied
//! when a batch posts. It performs no I/O; the durable poster lives in
//! the database layer and calls into these rules.
//!
//! # Double-Entry Principles
//!
//! Every batch of ledger entries must balance:
//! - Debits increase asset/expense accounts
//! - Credits increase liability/equity/revenue accounts
//! - The sum of all debits must equal the sum of all credits
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{Batch, balance_delta};
//!
//! let batch = Batch::new("Sales bill SB0001")
//!     .debit("CASH001", amount)
//!     .credit("SALES001", amount);
//!
//! batch.validate()?;
//! ```

pub mod account;
pub mod entry;
pub mod tax;
pub mod posting;
pub mod error;

pub use account::{Account, AccountType};
pub use entry::{Batch, DocumentRef, EntryDraft, EntrySide};
pub use tax::{compute_line, sum_lines, BillTotals, LineAmounts, LineInput, TaxMode};
pub use posting::{
    balance_delta, AccountBalance, BatchResult, PostedBatch, PostedEntry, TrialBalance,
    TrialBalanceRow,
};
pub use error::LedgerError;
