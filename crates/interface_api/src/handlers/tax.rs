//! Tax calculation preview handler

use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;

use core_kernel::Money;
use domain_ledger::{compute_line, sum_lines, TaxMode};

use crate::dto::tax::{TaxPreviewRequest, TaxPreviewResponse};
use crate::error::ApiError;
use crate::handlers::accounts::parse_currency;
use crate::AppState;

/// Computes line amounts and bill totals without saving anything
pub async fn preview(
    State(_state): State<AppState>,
    Json(request): Json<TaxPreviewRequest>,
) -> Result<Json<TaxPreviewResponse>, ApiError> {
    let mode = TaxMode::parse(&request.tax_mode)?;
    let currency = parse_currency(request.currency.as_deref())?;
    let adjustment = Money::new(request.adjustment.unwrap_or(Decimal::ZERO), currency);

    let mut lines = Vec::with_capacity(request.items.len());
    let mut computed = Vec::with_capacity(request.items.len());
    for item in request.items {
        let line_item = item.into_line_item();
        let amounts = compute_line(mode, &line_item.line_input(), currency)?;
        lines.push((line_item.quantity, amounts));
        computed.push(amounts);
    }

    let totals = sum_lines(&lines, adjustment, currency)?;
    Ok(Json(TaxPreviewResponse::new(computed, totals)))
}
