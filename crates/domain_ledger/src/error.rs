//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account exists but is deactivated
    #[error("Account is inactive: {0}")]
    AccountInactive(String),

    /// Account already exists
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    /// Batch contains no entries
    #[error("Batch contains no entries")]
    EmptyBatch,

    /// Batch debits and credits do not match
    #[error("Unbalanced batch: debits={debits}, credits={credits}, difference={diff}", diff = .debits - .credits)]
    UnbalancedBatch { debits: Decimal, credits: Decimal },

    /// A single entry is malformed (zero or negative amount)
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Batch not found
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    /// Malformed input rejected before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arithmetic failure during amount computation
    #[error("Calculation error: {0}")]
    Calculation(String),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn invalid_entry(message: impl Into<String>) -> Self {
        LedgerError::InvalidEntry(message.into())
    }
}
