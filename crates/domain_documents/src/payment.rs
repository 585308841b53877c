//! Payments applied against documents
//!
//! A document's payment status is a derived field: the sum of its
//! received (non-cancelled, non-bounced) payments against its total.
//! Overpayment is accepted and flagged, never silently clamped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, DocumentId, Money, PaymentId};

use crate::error::DocumentError;

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Cheque,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Cheque => "CHEQUE",
            PaymentMethod::Card => "CARD",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s {
            "CASH" => Ok(PaymentMethod::Cash),
            "BANK_TRANSFER" => Ok(PaymentMethod::BankTransfer),
            "CHEQUE" => Ok(PaymentMethod::Cheque),
            "CARD" => Ok(PaymentMethod::Card),
            other => Err(DocumentError::validation(format!(
                "Unknown payment method: {other}"
            ))),
        }
    }
}

/// Status of an individual payment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRecordStatus {
    /// Payment received and counted toward the document
    Received,
    /// Cheque bounced; does not count
    Bounced,
    /// Payment cancelled; does not count
    Cancelled,
}

impl PaymentRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Received => "RECEIVED",
            PaymentRecordStatus::Bounced => "BOUNCED",
            PaymentRecordStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s {
            "RECEIVED" => Ok(PaymentRecordStatus::Received),
            "BOUNCED" => Ok(PaymentRecordStatus::Bounced),
            "CANCELLED" => Ok(PaymentRecordStatus::Cancelled),
            other => Err(DocumentError::validation(format!(
                "Unknown payment status: {other}"
            ))),
        }
    }
}

/// A payment applied to a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Storage identifier
    pub id: PaymentId,
    /// Document the payment applies to
    pub document_id: DocumentId,
    /// Amount paid
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// Record status
    pub status: PaymentRecordStatus,
    /// External reference (cheque number, transfer id)
    pub reference: Option<String>,
    /// Value date of the payment
    pub received_on: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Creates a received payment dated today
    pub fn new(document_id: DocumentId, amount: Money, method: PaymentMethod) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new_v7(),
            document_id,
            amount,
            method,
            status: PaymentRecordStatus::Received,
            reference: None,
            received_on: now.date_naive(),
            created_at: now,
        }
    }

    /// Sets an external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Derived payment status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    /// No money received yet
    Pending,
    /// Some, but not all, of the total received
    Partial,
    /// Fully paid (or more)
    Paid,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Pending => "PENDING",
            PaymentState::Partial => "PARTIAL",
            PaymentState::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s {
            "PENDING" => Ok(PaymentState::Pending),
            "PARTIAL" => Ok(PaymentState::Partial),
            "PAID" => Ok(PaymentState::Paid),
            other => Err(DocumentError::validation(format!(
                "Unknown payment state: {other}"
            ))),
        }
    }
}

/// Sums the payments that count toward a document
pub fn paid_amount(payments: &[PaymentRecord], currency: Currency) -> Money {
    payments
        .iter()
        .filter(|p| p.status == PaymentRecordStatus::Received)
        .fold(Money::zero(currency), |acc, p| acc + p.amount)
}

/// Derives the payment state and overpayment flag
///
/// Returns `(state, is_overpaid)`. Overpayment yields `Paid` with the
/// flag set; the surplus is never clamped away.
pub fn payment_state(total: Money, paid: Money) -> (PaymentState, bool) {
    if !paid.is_positive() {
        return (PaymentState::Pending, false);
    }
    if paid.amount() >= total.amount() {
        (PaymentState::Paid, paid.amount() > total.amount())
    } else {
        (PaymentState::Partial, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    #[test]
    fn test_payment_state_thresholds() {
        let total = inr(dec!(1000.00));

        assert_eq!(payment_state(total, inr(dec!(0))), (PaymentState::Pending, false));
        assert_eq!(payment_state(total, inr(dec!(400.00))), (PaymentState::Partial, false));
        assert_eq!(payment_state(total, inr(dec!(1000.00))), (PaymentState::Paid, false));
    }

    #[test]
    fn test_overpayment_flagged_not_clamped() {
        let (state, overpaid) = payment_state(inr(dec!(1000.00)), inr(dec!(1200.00)));
        assert_eq!(state, PaymentState::Paid);
        assert!(overpaid);
    }

    #[test]
    fn test_bounced_and_cancelled_payments_do_not_count() {
        let doc = DocumentId::new();
        let mut p1 = PaymentRecord::new(doc, inr(dec!(500.00)), PaymentMethod::Cheque);
        p1.status = PaymentRecordStatus::Bounced;
        let p2 = PaymentRecord::new(doc, inr(dec!(300.00)), PaymentMethod::Cash);
        let mut p3 = PaymentRecord::new(doc, inr(dec!(200.00)), PaymentMethod::Card);
        p3.status = PaymentRecordStatus::Cancelled;

        assert_eq!(paid_amount(&[p1, p2, p3], Currency::INR).amount(), dec!(300.00));
    }
}
