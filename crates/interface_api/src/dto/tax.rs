//! Tax calculation preview DTOs
//!
//! The preview endpoint runs the same calculator a confirmation uses,
//! without touching any document, so a client can show live totals
//! while a bill is being keyed in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_ledger::{BillTotals, LineAmounts};

use crate::dto::documents::LineItemRequest;

#[derive(Debug, Deserialize)]
pub struct TaxPreviewRequest {
    /// WITHOUT_TAX, EXCLUDE_TAX, or INCLUDE_TAX
    pub tax_mode: String,
    /// ISO currency code; defaults to INR
    pub currency: Option<String>,
    pub adjustment: Option<Decimal>,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct LineAmountsResponse {
    pub gross: Decimal,
    pub discount: Decimal,
    pub taxable: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl From<LineAmounts> for LineAmountsResponse {
    fn from(amounts: LineAmounts) -> Self {
        Self {
            gross: amounts.gross.amount(),
            discount: amounts.discount.amount(),
            taxable: amounts.taxable.amount(),
            tax: amounts.tax.amount(),
            total: amounts.total.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaxPreviewResponse {
    pub lines: Vec<LineAmountsResponse>,
    pub item_count: u32,
    pub total_quantity: Decimal,
    pub gross: Decimal,
    pub discount: Decimal,
    pub taxable: Decimal,
    pub tax: Decimal,
    pub adjustment: Decimal,
    pub net: Decimal,
}

impl TaxPreviewResponse {
    pub fn new(lines: Vec<LineAmounts>, totals: BillTotals) -> Self {
        Self {
            lines: lines.into_iter().map(LineAmountsResponse::from).collect(),
            item_count: totals.item_count,
            total_quantity: totals.total_quantity,
            gross: totals.gross.amount(),
            discount: totals.discount.amount(),
            taxable: totals.taxable.amount(),
            tax: totals.tax.amount(),
            adjustment: totals.adjustment.amount(),
            net: totals.net.amount(),
        }
    }
}
