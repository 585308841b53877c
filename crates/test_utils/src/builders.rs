//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_documents::{Document, DocumentKind, LineItem, PaymentDirection};
use domain_ledger::{Batch, TaxMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{account_codes, DateFixtures, StringFixtures};

/// Builder for constructing draft documents
///
/// Defaults to a single-line retail sales bill in INR with 18% tax
/// included in the rate.
pub struct TestDocumentBuilder {
    kind: DocumentKind,
    tax_mode: TaxMode,
    currency: Currency,
    party_account: String,
    direction: Option<PaymentDirection>,
    document_date: NaiveDate,
    adjustment: Option<Money>,
    items: Vec<LineItem>,
}

impl Default for TestDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDocumentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            kind: DocumentKind::SalesBill,
            tax_mode: TaxMode::IncludeTax,
            currency: Currency::INR,
            party_account: account_codes::CUSTOMER.to_string(),
            direction: None,
            document_date: DateFixtures::fiscal_year_start(),
            adjustment: None,
            items: vec![LineItem::new(StringFixtures::sku(), dec!(2), dec!(590.00))
                .tax_percent(dec!(18))],
        }
    }

    /// Switches the document to a purchase order against the supplier
    pub fn purchase(mut self) -> Self {
        self.kind = DocumentKind::PurchaseOrder;
        self.party_account = account_codes::SUPPLIER.to_string();
        self
    }

    /// Switches the document to a payment voucher
    pub fn payment(mut self, direction: PaymentDirection) -> Self {
        self.kind = DocumentKind::Payment;
        self.direction = Some(direction);
        self.items = vec![LineItem::new("PAYMENT", dec!(1), dec!(1000.00))];
        self.tax_mode = TaxMode::WithoutTax;
        self
    }

    /// Sets the tax mode
    pub fn with_tax_mode(mut self, mode: TaxMode) -> Self {
        self.tax_mode = mode;
        self
    }

    /// Sets the party account code
    pub fn with_party(mut self, code: impl Into<String>) -> Self {
        self.party_account = code.into();
        self
    }

    /// Sets the document date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.document_date = date;
        self
    }

    /// Sets the adjustment (round-off) amount
    pub fn with_adjustment(mut self, amount: Decimal) -> Self {
        self.adjustment = Some(Money::new(amount, self.currency));
        self
    }

    /// Replaces the default line items
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Appends a line item
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Builds the draft with totals recomputed
    pub fn build(self) -> Document {
        let mut document =
            Document::draft(self.kind, self.tax_mode, self.party_account, self.currency)
                .dated(self.document_date);
        if let Some(direction) = self.direction {
            document = document.with_direction(direction);
        }
        if let Some(adjustment) = self.adjustment {
            document.set_adjustment(adjustment).expect("draft accepts adjustment");
        }
        for item in self.items {
            document.add_item(item).expect("draft accepts items");
        }
        document.recompute_totals().expect("fixture lines compute");
        document
    }
}

/// Builder for constructing balanced ledger batches
pub struct TestBatchBuilder {
    description: String,
    transaction_date: NaiveDate,
    currency: Currency,
    legs: Vec<(String, String, Decimal)>,
}

impl Default for TestBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBatchBuilder {
    /// Creates a builder with no legs
    pub fn new() -> Self {
        Self {
            description: "Test batch".to_string(),
            transaction_date: DateFixtures::fiscal_year_start(),
            currency: Currency::INR,
            legs: Vec::new(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the transaction date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.transaction_date = date;
        self
    }

    /// Adds a debit leg
    pub fn debit(mut self, account_code: impl Into<String>, amount: Decimal) -> Self {
        self.legs.push(("DEBIT".to_string(), account_code.into(), amount));
        self
    }

    /// Adds a credit leg
    pub fn credit(mut self, account_code: impl Into<String>, amount: Decimal) -> Self {
        self.legs.push(("CREDIT".to_string(), account_code.into(), amount));
        self
    }

    /// A balanced cash-sale batch for quick posting tests
    pub fn cash_sale(amount: Decimal) -> Self {
        Self::new()
            .with_description("Cash sale")
            .debit(account_codes::CASH, amount)
            .credit(account_codes::SALES, amount)
    }

    /// Builds the batch without validating; tests exercise validation
    pub fn build(self) -> Batch {
        let mut batch = Batch::new(self.description).dated(self.transaction_date);
        for (side, code, amount) in self.legs {
            let money = Money::new(amount, self.currency);
            batch = match side.as_str() {
                "DEBIT" => batch.debit(code, money),
                _ => batch.credit(code, money),
            };
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_confirmable() {
        let document = TestDocumentBuilder::new().build();

        assert_eq!(document.kind, DocumentKind::SalesBill);
        assert!(!document.items.is_empty());
        assert!(document.totals.net.is_positive());
    }

    #[test]
    fn test_cash_sale_batch_balances() {
        let batch = TestBatchBuilder::cash_sale(dec!(1180.00)).build();
        assert!(batch.is_balanced());
    }
}
