//! Derivation of ledger batches and stock movements from documents
//!
//! Confirming a document posts exactly one balanced batch:
//!
//! - Sales bill: debit the customer account for the net total; credit
//!   the trading account for the taxable base and the tax account for
//!   the tax collected.
//! - Purchase order: debit the trading account for the taxable base and
//!   the tax account for the tax paid; credit the supplier account for
//!   the net total.
//! - Payment voucher: a two-entry transfer between the cash account and
//!   the party account, direction depending on receipt vs disbursement.
//!
//! Cancellation posts the reversal of the original batch; entries are
//! never deleted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::DocumentId;
use domain_ledger::Batch;

use crate::document::{Document, DocumentKind, PaymentDirection};
use crate::error::DocumentError;

/// The account codes a document posts against
///
/// The party account comes from the document; the rest come from the
/// bill book configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingAccounts {
    /// Sales or purchase trading account
    pub trading_account: String,
    /// Tax collected / tax paid account
    pub tax_account: String,
    /// Cash or bank account for payment vouchers
    pub cash_account: String,
}

/// A stock decrement derived from a confirmed sales bill line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Stock-keeping unit to decrement
    pub sku: String,
    /// Quantity to remove from stock
    pub quantity: Decimal,
    /// Document the movement belongs to
    pub document_id: DocumentId,
}

/// Builds the idempotency key for a document action
///
/// The key is derived from the document's storage identifier, which is
/// stable across retries; the business number is not assigned until the
/// confirming transaction commits and cannot serve as the key.
pub fn idempotency_key(document_id: DocumentId, action: &str) -> String {
    format!("{document_id}:{action}")
}

/// Derives the balanced ledger batch for a confirmed document
///
/// # Errors
///
/// - `MissingNumber` when the document has not been numbered yet
/// - `MissingPaymentDirection` for a payment voucher with no direction
/// - `Ledger` when the derived batch fails validation
pub fn ledger_batch(
    document: &Document,
    accounts: &PostingAccounts,
) -> Result<Batch, DocumentError> {
    let number = document
        .number
        .as_deref()
        .ok_or(DocumentError::MissingNumber)?;

    let totals = &document.totals;
    let batch = match document.kind {
        DocumentKind::SalesBill => {
            let mut batch = Batch::new(format!("Sales bill {number}"))
                .debit(document.party_account.clone(), totals.net);
            // Adjustment folds into the trading line so the batch balances
            let trading = totals.taxable + totals.adjustment;
            batch = batch.credit(accounts.trading_account.clone(), trading);
            if totals.tax.is_positive() {
                batch = batch.credit(accounts.tax_account.clone(), totals.tax);
            }
            batch
        }
        DocumentKind::PurchaseOrder => {
            let trading = totals.taxable + totals.adjustment;
            let mut batch = Batch::new(format!("Purchase order {number}"))
                .debit(accounts.trading_account.clone(), trading);
            if totals.tax.is_positive() {
                batch = batch.debit(accounts.tax_account.clone(), totals.tax);
            }
            batch.credit(document.party_account.clone(), totals.net)
        }
        DocumentKind::Payment => {
            let direction = document
                .direction
                .ok_or(DocumentError::MissingPaymentDirection)?;
            match direction {
                PaymentDirection::Receipt => Batch::new(format!("Receipt {number}"))
                    .debit(accounts.cash_account.clone(), totals.net)
                    .credit(document.party_account.clone(), totals.net),
                PaymentDirection::Disbursement => Batch::new(format!("Payment {number}"))
                    .debit(document.party_account.clone(), totals.net)
                    .credit(accounts.cash_account.clone(), totals.net),
            }
        }
    };

    let batch = batch
        .dated(document.document_date)
        .with_reference(document.kind.reference_kind(), *document.id.as_uuid());
    batch.validate()?;
    Ok(batch)
}

/// Derives the stock decrements for a confirmed sales bill
///
/// Purchase orders and payment vouchers move no stock. Lines already
/// marked deducted are skipped so a retried confirmation does not
/// decrement twice.
pub fn stock_movements(document: &Document) -> Vec<StockMovement> {
    if document.kind != DocumentKind::SalesBill {
        return Vec::new();
    }
    document
        .items
        .iter()
        .filter(|item| !item.stock_deducted)
        .map(|item| StockMovement {
            sku: item.sku.clone(),
            quantity: item.quantity,
            document_id: document.id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use domain_ledger::{EntrySide, TaxMode};
    use rust_decimal_macros::dec;

    use crate::item::LineItem;

    fn accounts() -> PostingAccounts {
        PostingAccounts {
            trading_account: "SALES001".to_string(),
            tax_account: "GST001".to_string(),
            cash_account: "CASH001".to_string(),
        }
    }

    fn confirmed_sale() -> Document {
        let mut doc = Document::draft(
            DocumentKind::SalesBill,
            TaxMode::ExcludeTax,
            "CUST001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("TSHIRT-M", dec!(10), dec!(100.00)).tax_percent(dec!(18)))
            .unwrap();
        doc.confirm("SB0042".to_string()).unwrap();
        doc
    }

    #[test]
    fn test_sales_batch_debits_customer_for_net_total() {
        let doc = confirmed_sale();
        let batch = ledger_batch(&doc, &accounts()).unwrap();

        assert!(batch.is_balanced());
        assert_eq!(batch.entries.len(), 3);

        let debit = &batch.entries[0];
        assert_eq!(debit.account_code, "CUST001");
        assert_eq!(debit.side, EntrySide::Debit);
        assert_eq!(debit.amount.amount(), dec!(1180.00));

        let trading = &batch.entries[1];
        assert_eq!(trading.account_code, "SALES001");
        assert_eq!(trading.amount.amount(), dec!(1000.00));

        let tax = &batch.entries[2];
        assert_eq!(tax.account_code, "GST001");
        assert_eq!(tax.amount.amount(), dec!(180.00));
    }

    #[test]
    fn test_untaxed_sale_omits_tax_entry() {
        let mut doc = Document::draft(
            DocumentKind::SalesBill,
            TaxMode::WithoutTax,
            "CUST001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("KURTA-L", dec!(2), dec!(450.00)))
            .unwrap();
        doc.confirm("SB0043".to_string()).unwrap();

        let batch = ledger_batch(&doc, &accounts()).unwrap();
        assert_eq!(batch.entries.len(), 2);
        assert!(batch.is_balanced());
    }

    #[test]
    fn test_purchase_batch_credits_supplier() {
        let mut doc = Document::draft(
            DocumentKind::PurchaseOrder,
            TaxMode::ExcludeTax,
            "2108001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("FABRIC-ROLL", dec!(5), dec!(200.00)).tax_percent(dec!(12)))
            .unwrap();
        doc.confirm("PO0007".to_string()).unwrap();

        let batch = ledger_batch(&doc, &accounts()).unwrap();
        assert!(batch.is_balanced());

        let credit = batch.entries.last().unwrap();
        assert_eq!(credit.account_code, "2108001");
        assert_eq!(credit.side, EntrySide::Credit);
        assert_eq!(credit.amount.amount(), dec!(1120.00));
    }

    #[test]
    fn test_receipt_and_disbursement_mirror_each_other() {
        let mut receipt = Document::draft(
            DocumentKind::Payment,
            TaxMode::WithoutTax,
            "CUST001",
            Currency::INR,
        )
        .with_direction(PaymentDirection::Receipt);
        receipt
            .add_item(LineItem::new("ON-ACCOUNT", dec!(1), dec!(500.00)))
            .unwrap();
        receipt.confirm("PV0001".to_string()).unwrap();

        let batch = ledger_batch(&receipt, &accounts()).unwrap();
        assert_eq!(batch.entries[0].account_code, "CASH001");
        assert_eq!(batch.entries[0].side, EntrySide::Debit);
        assert_eq!(batch.entries[1].account_code, "CUST001");
        assert_eq!(batch.entries[1].side, EntrySide::Credit);

        let mut disbursement = Document::draft(
            DocumentKind::Payment,
            TaxMode::WithoutTax,
            "2108001",
            Currency::INR,
        )
        .with_direction(PaymentDirection::Disbursement);
        disbursement
            .add_item(LineItem::new("SUPPLIER-DUE", dec!(1), dec!(800.00)))
            .unwrap();
        disbursement.confirm("PV0002".to_string()).unwrap();

        let batch = ledger_batch(&disbursement, &accounts()).unwrap();
        assert_eq!(batch.entries[0].account_code, "2108001");
        assert_eq!(batch.entries[0].side, EntrySide::Debit);
        assert_eq!(batch.entries[1].account_code, "CASH001");
        assert_eq!(batch.entries[1].side, EntrySide::Credit);
    }

    #[test]
    fn test_unnumbered_document_cannot_post() {
        let mut doc = Document::draft(
            DocumentKind::SalesBill,
            TaxMode::WithoutTax,
            "CUST001",
            Currency::INR,
        );
        doc.add_item(LineItem::new("TSHIRT-M", dec!(1), dec!(100.00)))
            .unwrap();
        doc.recompute_totals().unwrap();

        assert!(matches!(
            ledger_batch(&doc, &accounts()),
            Err(DocumentError::MissingNumber)
        ));
    }

    #[test]
    fn test_idempotency_key_is_stable_per_action() {
        let id = DocumentId::new();
        assert_eq!(
            idempotency_key(id, "confirm"),
            idempotency_key(id, "confirm")
        );
        assert_ne!(
            idempotency_key(id, "confirm"),
            idempotency_key(id, "cancel")
        );
    }

    #[test]
    fn test_stock_movements_skip_deducted_lines() {
        let mut doc = confirmed_sale();
        doc.items[0].stock_deducted = true;
        assert!(stock_movements(&doc).is_empty());

        let purchase = {
            let mut p = Document::draft(
                DocumentKind::PurchaseOrder,
                TaxMode::WithoutTax,
                "2108001",
                Currency::INR,
            );
            p.add_item(LineItem::new("FABRIC-ROLL", dec!(3), dec!(150.00)))
                .unwrap();
            p
        };
        assert!(stock_movements(&purchase).is_empty());
    }
}
