//! Document aggregate and status state machine
//!
//! Life cycle:
//!
//! ```text
//! Draft ──confirm──► Confirmed ──ship──► Shipped ──complete──► Completed
//!   │                    │                  │                  (terminal)
//!   └────────────────────┴──────cancel──────┘
//!                     Cancelled (terminal)
//! ```
//!
//! Shipping and completion exist for sales bills only. Once a document
//! leaves Draft its financial fields are frozen; corrections go through
//! cancellation (a ledger reversal) and a fresh document, never an
//! in-place edit.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::sequence::SequenceScope;
use core_kernel::{Currency, DocumentId, DocumentItemId, Money};
use domain_ledger::{sum_lines, BillTotals, TaxMode};

use crate::error::DocumentError;
use crate::item::LineItem;
use crate::payment::{paid_amount, payment_state, PaymentRecord, PaymentState};

/// The kind of business document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    SalesBill,
    PurchaseOrder,
    Payment,
}

impl DocumentKind {
    /// Returns the sequence scope that numbers documents of this kind
    pub fn sequence_scope(&self) -> SequenceScope {
        match self {
            DocumentKind::SalesBill => SequenceScope::SalesBill,
            DocumentKind::PurchaseOrder => SequenceScope::PurchaseOrder,
            DocumentKind::Payment => SequenceScope::PaymentVoucher,
        }
    }

    /// Returns the reference kind recorded on ledger batches
    pub fn reference_kind(&self) -> &'static str {
        match self {
            DocumentKind::SalesBill => "sales_bill",
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::Payment => "payment",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::SalesBill => "SALES_BILL",
            DocumentKind::PurchaseOrder => "PURCHASE_ORDER",
            DocumentKind::Payment => "PAYMENT",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s {
            "SALES_BILL" => Ok(DocumentKind::SalesBill),
            "PURCHASE_ORDER" => Ok(DocumentKind::PurchaseOrder),
            "PAYMENT" => Ok(DocumentKind::Payment),
            other => Err(DocumentError::validation(format!(
                "Unknown document kind: {other}"
            ))),
        }
    }
}

/// Document status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Draft,
    Confirmed,
    Shipped,
    Completed,
    Cancelled,
}

impl DocumentStatus {
    /// Returns true when no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Cancelled)
    }

    /// Returns true while financial fields may still change
    pub fn is_editable(&self) -> bool {
        matches!(self, DocumentStatus::Draft)
    }

    /// Returns true when the document has a posted ledger batch
    pub fn has_ledger_effect(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Confirmed | DocumentStatus::Shipped | DocumentStatus::Completed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::Confirmed => "CONFIRMED",
            DocumentStatus::Shipped => "SHIPPED",
            DocumentStatus::Completed => "COMPLETED",
            DocumentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s {
            "DRAFT" => Ok(DocumentStatus::Draft),
            "CONFIRMED" => Ok(DocumentStatus::Confirmed),
            "SHIPPED" => Ok(DocumentStatus::Shipped),
            "COMPLETED" => Ok(DocumentStatus::Completed),
            "CANCELLED" => Ok(DocumentStatus::Cancelled),
            other => Err(DocumentError::validation(format!(
                "Unknown document status: {other}"
            ))),
        }
    }
}

/// Direction of a payment voucher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDirection {
    /// Money in from a customer
    Receipt,
    /// Money out to a supplier or vendor
    Disbursement,
}

impl PaymentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentDirection::Receipt => "RECEIPT",
            PaymentDirection::Disbursement => "DISBURSEMENT",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s {
            "RECEIPT" => Ok(PaymentDirection::Receipt),
            "DISBURSEMENT" => Ok(PaymentDirection::Disbursement),
            other => Err(DocumentError::validation(format!(
                "Unknown payment direction: {other}"
            ))),
        }
    }
}

/// A business document: sales bill, purchase order, or payment voucher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Storage identifier
    pub id: DocumentId,
    /// Kind of document
    pub kind: DocumentKind,
    /// Human-readable number, assigned at confirmation
    pub number: Option<String>,
    /// Current status
    pub status: DocumentStatus,
    /// Tax handling mode, copied from the bill book at creation
    pub tax_mode: TaxMode,
    /// Document currency
    pub currency: Currency,
    /// Customer or supplier control account code
    pub party_account: String,
    /// Direction, meaningful for payment vouchers only
    pub direction: Option<PaymentDirection>,
    /// Business date of the document
    pub document_date: NaiveDate,
    /// Line items
    pub items: Vec<LineItem>,
    /// Manual bill-level adjustment amount
    pub adjustment: Money,
    /// Computed totals
    pub totals: BillTotals,
    /// Derived: amount received against this document
    pub paid_amount: Money,
    /// Derived: payment status
    pub payment_state: PaymentState,
    /// Derived: payments exceed the total
    pub is_overpaid: bool,
    /// Free-text notes
    pub notes: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Creates a new draft document
    pub fn draft(
        kind: DocumentKind,
        tax_mode: TaxMode,
        party_account: impl Into<String>,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new_v7(),
            kind,
            number: None,
            status: DocumentStatus::Draft,
            tax_mode,
            currency,
            party_account: party_account.into(),
            direction: None,
            document_date: now.date_naive(),
            items: Vec::new(),
            adjustment: Money::zero(currency),
            totals: BillTotals::zero(currency),
            paid_amount: Money::zero(currency),
            payment_state: PaymentState::Pending,
            is_overpaid: false,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the payment direction (payment vouchers)
    pub fn with_direction(mut self, direction: PaymentDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Sets the business date
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.document_date = date;
        self
    }

    /// Returns an error unless the document is still editable
    fn ensure_editable(&self) -> Result<(), DocumentError> {
        if !self.status.is_editable() {
            return Err(DocumentError::locked(format!(
                "{} is {}; financial fields are frozen",
                self.number.as_deref().unwrap_or("draft document"),
                self.status.as_str()
            )));
        }
        Ok(())
    }

    /// Adds a line item (Draft only)
    pub fn add_item(&mut self, item: LineItem) -> Result<(), DocumentError> {
        self.ensure_editable()?;
        self.items.push(item);
        self.touch();
        Ok(())
    }

    /// Removes a line item by id (Draft only)
    pub fn remove_item(&mut self, id: DocumentItemId) -> Result<(), DocumentError> {
        self.ensure_editable()?;
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            return Err(DocumentError::NotFound(format!("line item {id}")));
        }
        self.touch();
        Ok(())
    }

    /// Sets the bill-level adjustment amount (Draft only)
    pub fn set_adjustment(&mut self, adjustment: Money) -> Result<(), DocumentError> {
        self.ensure_editable()?;
        self.adjustment = adjustment;
        self.touch();
        Ok(())
    }

    /// Recomputes every line and the bill totals
    pub fn recompute_totals(&mut self) -> Result<(), DocumentError> {
        let mode = self.tax_mode;
        let currency = self.currency;
        let mut lines = Vec::with_capacity(self.items.len());
        for item in &mut self.items {
            item.recompute(mode, currency)?;
            if let Some(amounts) = item.amounts {
                lines.push((item.quantity, amounts));
            }
        }
        self.totals = sum_lines(&lines, self.adjustment, currency)?;
        self.touch();
        Ok(())
    }

    /// Confirms the document, freezing its financial fields
    ///
    /// Requires Draft status and at least one line item; recomputes all
    /// totals and records the assigned business number. The caller posts
    /// the derived ledger batch in the same unit of work.
    pub fn confirm(&mut self, number: String) -> Result<(), DocumentError> {
        if self.status != DocumentStatus::Draft {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                to: DocumentStatus::Confirmed,
            });
        }
        if self.items.is_empty() {
            return Err(DocumentError::NoItems);
        }
        if self.kind == DocumentKind::Payment && self.direction.is_none() {
            return Err(DocumentError::MissingPaymentDirection);
        }

        self.recompute_totals()?;
        if self.number.is_none() {
            self.number = Some(number);
        }
        self.status = DocumentStatus::Confirmed;
        self.touch();
        Ok(())
    }

    /// Marks a confirmed sales bill as shipped
    pub fn ship(&mut self) -> Result<(), DocumentError> {
        if self.kind != DocumentKind::SalesBill || self.status != DocumentStatus::Confirmed {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                to: DocumentStatus::Shipped,
            });
        }
        self.status = DocumentStatus::Shipped;
        self.touch();
        Ok(())
    }

    /// Marks a shipped sales bill as completed
    pub fn complete(&mut self) -> Result<(), DocumentError> {
        if self.kind != DocumentKind::SalesBill || self.status != DocumentStatus::Shipped {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                to: DocumentStatus::Completed,
            });
        }
        self.status = DocumentStatus::Completed;
        self.touch();
        Ok(())
    }

    /// Cancels the document
    ///
    /// Allowed from any non-terminal state. Returns the status the
    /// document held before cancellation so the caller knows whether a
    /// ledger reversal must be posted (`has_ledger_effect`).
    pub fn cancel(&mut self) -> Result<DocumentStatus, DocumentError> {
        if self.status.is_terminal() {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                to: DocumentStatus::Cancelled,
            });
        }
        let previous = self.status;
        self.status = DocumentStatus::Cancelled;
        self.touch();
        Ok(previous)
    }

    /// Recomputes the derived payment fields from the payment records
    pub fn apply_payments(&mut self, payments: &[PaymentRecord]) {
        self.paid_amount = paid_amount(payments, self.currency);
        let (state, overpaid) = payment_state(self.totals.net, self.paid_amount);
        self.payment_state = state;
        self.is_overpaid = overpaid;
        if overpaid {
            tracing::warn!(
                document = %self.id,
                total = %self.totals.net,
                paid = %self.paid_amount,
                "document is overpaid"
            );
        }
        self.touch();
    }

    /// Sum of quantities across lines
    pub fn total_quantity(&self) -> Decimal {
        self.items.iter().map(|i| i.quantity).sum()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft_sale() -> Document {
        let mut doc = Document::draft(
            DocumentKind::SalesBill,
            TaxMode::IncludeTax,
            "CUST001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("TSHIRT-M", dec!(1), dec!(118.00)).tax_percent(dec!(18)))
            .unwrap();
        doc
    }

    #[test]
    fn test_confirm_assigns_number_and_totals() {
        let mut doc = draft_sale();
        doc.confirm("SB0001".to_string()).unwrap();

        assert_eq!(doc.status, DocumentStatus::Confirmed);
        assert_eq!(doc.number.as_deref(), Some("SB0001"));
        assert_eq!(doc.totals.taxable.amount(), dec!(100.00));
        assert_eq!(doc.totals.tax.amount(), dec!(18.00));
        assert_eq!(doc.totals.net.amount(), dec!(118.00));
    }

    #[test]
    fn test_confirm_requires_items() {
        let mut doc = Document::draft(
            DocumentKind::SalesBill,
            TaxMode::WithoutTax,
            "CUST001",
            Currency::INR,
        );
        assert!(matches!(
            doc.confirm("SB0001".to_string()),
            Err(DocumentError::NoItems)
        ));
        assert_eq!(doc.status, DocumentStatus::Draft);
    }

    #[test]
    fn test_edits_rejected_after_confirmation() {
        let mut doc = draft_sale();
        doc.confirm("SB0001".to_string()).unwrap();

        let result = doc.add_item(LineItem::new("KURTA-L", dec!(1), dec!(500.00)));
        assert!(matches!(result, Err(DocumentError::DocumentLocked(_))));
    }

    #[test]
    fn test_sales_lifecycle_is_one_directional() {
        let mut doc = draft_sale();
        doc.confirm("SB0001".to_string()).unwrap();
        doc.ship().unwrap();
        doc.complete().unwrap();

        assert_eq!(doc.status, DocumentStatus::Completed);
        // Completed is terminal; cancellation is no longer possible
        assert!(matches!(
            doc.cancel(),
            Err(DocumentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_purchase_orders_cannot_ship() {
        let mut doc = Document::draft(
            DocumentKind::PurchaseOrder,
            TaxMode::ExcludeTax,
            "2108001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("FABRIC-ROLL", dec!(10), dec!(200.00)))
            .unwrap();
        doc.confirm("PO0001".to_string()).unwrap();

        assert!(matches!(
            doc.ship(),
            Err(DocumentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_reports_prior_status() {
        let mut draft = draft_sale();
        assert_eq!(draft.cancel().unwrap(), DocumentStatus::Draft);
        assert!(!DocumentStatus::Draft.has_ledger_effect());

        let mut confirmed = draft_sale();
        confirmed.confirm("SB0002".to_string()).unwrap();
        let previous = confirmed.cancel().unwrap();
        assert_eq!(previous, DocumentStatus::Confirmed);
        assert!(previous.has_ledger_effect());
    }

    #[test]
    fn test_payment_voucher_requires_direction() {
        let mut doc = Document::draft(
            DocumentKind::Payment,
            TaxMode::WithoutTax,
            "CUST001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("ON-ACCOUNT", dec!(1), dec!(500.00)))
            .unwrap();

        assert!(matches!(
            doc.confirm("PV0001".to_string()),
            Err(DocumentError::MissingPaymentDirection)
        ));

        doc.direction = Some(PaymentDirection::Receipt);
        doc.confirm("PV0001".to_string()).unwrap();
        assert_eq!(doc.status, DocumentStatus::Confirmed);
    }

    #[test]
    fn test_overpayment_flagged() {
        let mut doc = draft_sale();
        doc.confirm("SB0003".to_string()).unwrap();

        let payment = PaymentRecord::new(
            doc.id,
            Money::new(dec!(150.00), Currency::INR),
            crate::payment::PaymentMethod::Cash,
        );
        doc.apply_payments(&[payment]);

        assert_eq!(doc.payment_state, PaymentState::Paid);
        assert!(doc.is_overpaid);
        assert_eq!(doc.paid_amount.amount(), dec!(150.00));
    }
}
