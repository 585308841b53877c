//! Document DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_documents::{Document, LineItem, PaymentRecord, PostingAccounts};

#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    pub sku: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub rate: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    pub discount_amount: Option<Decimal>,
    #[serde(default)]
    pub tax_percentage: Decimal,
}

impl LineItemRequest {
    pub fn into_line_item(self) -> LineItem {
        let mut item = LineItem::new(self.sku, self.quantity, self.rate)
            .discount_percent(self.discount_percentage)
            .tax_percent(self.tax_percentage);
        if let Some(description) = self.description {
            item = item.described(description);
        }
        if let Some(amount) = self.discount_amount {
            item = item.discount_absolute(amount);
        }
        item
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    /// SALES_BILL, PURCHASE_ORDER, or PAYMENT
    pub kind: String,
    /// WITHOUT_TAX, EXCLUDE_TAX, or INCLUDE_TAX
    pub tax_mode: String,
    /// ISO currency code; defaults to INR
    pub currency: Option<String>,
    /// Customer or supplier control account code
    pub party_account: String,
    /// RECEIPT or DISBURSEMENT; payment vouchers only
    pub direction: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub adjustment: Option<Decimal>,
    pub notes: Option<String>,
    pub items: Vec<LineItemRequest>,
}

/// Replaces the financial fields of a draft; the kind and currency are
/// fixed at creation
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    /// WITHOUT_TAX, EXCLUDE_TAX, or INCLUDE_TAX
    pub tax_mode: String,
    /// Customer or supplier control account code
    pub party_account: String,
    /// RECEIPT or DISBURSEMENT; payment vouchers only
    pub direction: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub adjustment: Option<Decimal>,
    pub notes: Option<String>,
    pub items: Vec<LineItemRequest>,
}

/// Account codes the confirmation posts against, from the bill book
#[derive(Debug, Deserialize)]
pub struct ConfirmDocumentRequest {
    pub trading_account: String,
    pub tax_account: String,
    pub cash_account: String,
}

impl ConfirmDocumentRequest {
    pub fn into_posting_accounts(self) -> PostingAccounts {
        PostingAccounts {
            trading_account: self.trading_account,
            tax_account: self.tax_account,
            cash_account: self.cash_account,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelDocumentRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    /// CASH, BANK_TRANSFER, CHEQUE, or CARD
    pub method: String,
    pub reference: Option<String>,
    pub received_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub sku: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub discount_percentage: Decimal,
    pub discount_amount: Option<Decimal>,
    pub tax_percentage: Decimal,
    pub taxable: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            id: *item.id.as_uuid(),
            sku: item.sku.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            rate: item.rate,
            discount_percentage: item.discount_percentage,
            discount_amount: item.discount_amount,
            tax_percentage: item.tax_percentage,
            taxable: item.amounts.map(|a| a.taxable.amount()),
            tax: item.amounts.map(|a| a.tax.amount()),
            total: item.amounts.map(|a| a.total.amount()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub kind: String,
    pub number: Option<String>,
    pub status: String,
    pub tax_mode: String,
    pub currency: String,
    pub party_account: String,
    pub direction: Option<String>,
    pub document_date: NaiveDate,
    pub items: Vec<LineItemResponse>,
    pub gross: Decimal,
    pub discount: Decimal,
    pub taxable: Decimal,
    pub tax: Decimal,
    pub adjustment: Decimal,
    pub net: Decimal,
    pub paid_amount: Decimal,
    pub payment_state: String,
    pub is_overpaid: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Batch number of the posted ledger batch, when one was posted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
}

impl DocumentResponse {
    pub fn from_document(document: &Document, batch_number: Option<String>) -> Self {
        Self {
            id: *document.id.as_uuid(),
            kind: document.kind.as_str().to_string(),
            number: document.number.clone(),
            status: document.status.as_str().to_string(),
            tax_mode: document.tax_mode.as_str().to_string(),
            currency: document.currency.code().to_string(),
            party_account: document.party_account.clone(),
            direction: document.direction.map(|d| d.as_str().to_string()),
            document_date: document.document_date,
            items: document.items.iter().map(LineItemResponse::from).collect(),
            gross: document.totals.gross.amount(),
            discount: document.totals.discount.amount(),
            taxable: document.totals.taxable.amount(),
            tax: document.totals.tax.amount(),
            adjustment: document.totals.adjustment.amount(),
            net: document.totals.net.amount(),
            paid_amount: document.paid_amount.amount(),
            payment_state: document.payment_state.as_str().to_string(),
            is_overpaid: document.is_overpaid,
            notes: document.notes.clone(),
            created_at: document.created_at,
            updated_at: document.updated_at,
            batch_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub received_on: NaiveDate,
}

impl From<&PaymentRecord> for PaymentResponse {
    fn from(payment: &PaymentRecord) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            document_id: *payment.document_id.as_uuid(),
            amount: payment.amount.amount(),
            method: payment.method.as_str().to_string(),
            status: payment.status.as_str().to_string(),
            reference: payment.reference.clone(),
            received_on: payment.received_on,
        }
    }
}
