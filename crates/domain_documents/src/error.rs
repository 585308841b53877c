//! Document domain errors

use thiserror::Error;

use domain_ledger::LedgerError;

use crate::document::DocumentStatus;

/// Errors that can occur in the document domain
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The requested status change is not allowed from the current status
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// Financial fields may only change while the document is a draft
    #[error("Document is locked: {0}")]
    DocumentLocked(String),

    /// Confirmation requires at least one line item
    #[error("Document has no line items")]
    NoItems,

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A confirmed document must carry a business number
    #[error("Document has no number assigned")]
    MissingNumber,

    /// Payment documents must state their direction before confirmation
    #[error("Payment document has no direction (receipt or disbursement)")]
    MissingPaymentDirection,

    /// Stock could not be deducted for a line item
    #[error("Stock deduction failed for SKU {sku}: {reason}")]
    StockDeductionFailed { sku: String, reason: String },

    /// Malformed input rejected before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying ledger rule violation
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl DocumentError {
    pub fn validation(message: impl Into<String>) -> Self {
        DocumentError::Validation(message.into())
    }

    pub fn locked(message: impl Into<String>) -> Self {
        DocumentError::DocumentLocked(message.into())
    }
}
