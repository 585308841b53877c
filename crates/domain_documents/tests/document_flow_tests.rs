//! End-to-end document life cycle scenarios

use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_documents::{
    idempotency_key, ledger_batch, stock_movements, Document, DocumentKind, DocumentStatus,
    LineItem, PaymentMethod, PaymentRecord, PaymentState,
};
use domain_ledger::{EntrySide, TaxMode};
use test_utils::assertions::{assert_batch_balanced, assert_document_totals_consistent};
use test_utils::builders::TestDocumentBuilder;
use test_utils::fixtures::{account_codes, ChartFixtures, StringFixtures};

/// A tax-inclusive retail sale: draft, confirm, post, ship, complete,
/// and settle in two payments.
#[test]
fn test_retail_sale_from_draft_to_settled() {
    let mut bill = TestDocumentBuilder::new()
        .with_items(vec![
            LineItem::new(StringFixtures::sku(), dec!(2), dec!(590.00))
                .described("Cotton t-shirt, medium, blue")
                .tax_percent(dec!(18)),
            LineItem::new(StringFixtures::sku_alt(), dec!(1), dec!(1180.00))
                .tax_percent(dec!(18)),
        ])
        .build();

    bill.confirm("SB0101".to_string()).unwrap();

    // 2360 inclusive of 18% tax backs out to a 2000 base
    assert_eq!(bill.totals.net.amount(), dec!(2360.00));
    assert_eq!(bill.totals.taxable.amount(), dec!(2000.00));
    assert_eq!(bill.totals.tax.amount(), dec!(360.00));
    assert_document_totals_consistent(&bill);

    let batch = ledger_batch(&bill, &ChartFixtures::sales_posting_accounts()).unwrap();
    assert_batch_balanced(&batch);
    assert_eq!(batch.entries[0].account_code, account_codes::CUSTOMER);
    assert_eq!(batch.entries[0].side, EntrySide::Debit);
    assert_eq!(batch.entries[0].amount.amount(), dec!(2360.00));

    let movements = stock_movements(&bill);
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].sku, StringFixtures::sku());
    assert_eq!(movements[0].quantity, dec!(2));

    bill.ship().unwrap();
    bill.complete().unwrap();
    assert_eq!(bill.status, DocumentStatus::Completed);

    let p1 = PaymentRecord::new(
        bill.id,
        Money::new(dec!(1000.00), Currency::INR),
        PaymentMethod::Cash,
    );
    bill.apply_payments(std::slice::from_ref(&p1));
    assert_eq!(bill.payment_state, PaymentState::Partial);

    let p2 = PaymentRecord::new(
        bill.id,
        Money::new(dec!(1360.00), Currency::INR),
        PaymentMethod::BankTransfer,
    )
    .with_reference("NEFT-8812");
    bill.apply_payments(&[p1, p2]);
    assert_eq!(bill.payment_state, PaymentState::Paid);
    assert!(!bill.is_overpaid);
}

/// Cancelling a confirmed bill must reverse its batch; the reversal has
/// the same amounts with every side flipped.
#[test]
fn test_cancellation_produces_exact_reversal() {
    let mut bill = TestDocumentBuilder::new()
        .with_tax_mode(TaxMode::ExcludeTax)
        .with_items(vec![
            LineItem::new("SAREE-SILK", dec!(1), dec!(4500.00)).tax_percent(dec!(5)),
        ])
        .build();
    bill.confirm("SB0102".to_string()).unwrap();

    let original = ledger_batch(&bill, &ChartFixtures::sales_posting_accounts()).unwrap();
    let previous = bill.cancel().unwrap();
    assert!(previous.has_ledger_effect());

    let reversal = original.reversal("bill SB0102 cancelled");
    assert_batch_balanced(&reversal);
    assert_eq!(reversal.entries.len(), original.entries.len());
    for (orig, rev) in original.entries.iter().zip(&reversal.entries) {
        assert_eq!(orig.account_code, rev.account_code);
        assert_eq!(orig.amount, rev.amount);
        assert_eq!(orig.side.flipped(), rev.side);
    }
}

/// A purchase order posts the mirror image of a sale: the expense is
/// debited and the supplier credited.
#[test]
fn test_purchase_order_posts_against_supplier() {
    let mut order = TestDocumentBuilder::new()
        .purchase()
        .with_tax_mode(TaxMode::ExcludeTax)
        .with_items(vec![
            LineItem::new("FABRIC-COTTON", dec!(50), dec!(120.00)).tax_percent(dec!(5)),
        ])
        .build();
    order.confirm("PO0051".to_string()).unwrap();
    assert_document_totals_consistent(&order);

    let batch = ledger_batch(&order, &ChartFixtures::purchase_posting_accounts()).unwrap();
    assert_batch_balanced(&batch);
    let supplier = batch
        .entries
        .iter()
        .find(|e| e.account_code == account_codes::SUPPLIER)
        .unwrap();
    assert_eq!(supplier.side, EntrySide::Credit);
    assert_eq!(supplier.amount.amount(), order.totals.net.amount());
}

/// Cancelling a draft needs no reversal; there is nothing posted.
#[test]
fn test_draft_cancellation_has_no_ledger_effect() {
    let mut bill = Document::draft(
        DocumentKind::SalesBill,
        TaxMode::WithoutTax,
        account_codes::CUSTOMER,
        Currency::INR,
    );
    bill.add_item(LineItem::new("TSHIRT-M", dec!(1), dec!(250.00)))
        .unwrap();

    let previous = bill.cancel().unwrap();
    assert_eq!(previous, DocumentStatus::Draft);
    assert!(!previous.has_ledger_effect());
}

/// The idempotency key pairs the stable document id with the action, so
/// a replayed confirmation finds the batch already posted.
#[test]
fn test_confirm_and_cancel_use_distinct_keys() {
    let bill = Document::draft(
        DocumentKind::SalesBill,
        TaxMode::WithoutTax,
        account_codes::CUSTOMER,
        Currency::INR,
    );

    let confirm_key = idempotency_key(bill.id, "confirm");
    let cancel_key = idempotency_key(bill.id, "cancel");
    assert_ne!(confirm_key, cancel_key);
    assert!(confirm_key.starts_with(&bill.id.to_string()));
}

/// An absolute discount wins over the percentage and flows through the
/// bill totals and the posted batch.
#[test]
fn test_absolute_discount_takes_precedence() {
    let mut bill = TestDocumentBuilder::new()
        .with_tax_mode(TaxMode::ExcludeTax)
        .with_items(vec![
            LineItem::new("JEANS-32", dec!(2), dec!(1000.00))
                .discount_percent(dec!(10))
                .discount_absolute(dec!(500.00))
                .tax_percent(dec!(12)),
        ])
        .build();
    bill.confirm("SB0103".to_string()).unwrap();

    // 2000 gross, 500 absolute discount (not 200), 12% on 1500
    assert_eq!(bill.totals.discount.amount(), dec!(500.00));
    assert_eq!(bill.totals.taxable.amount(), dec!(1500.00));
    assert_eq!(bill.totals.tax.amount(), dec!(180.00));
    assert_eq!(bill.totals.net.amount(), dec!(1680.00));

    let batch = ledger_batch(&bill, &ChartFixtures::sales_posting_accounts()).unwrap();
    assert_batch_balanced(&batch);
}
