//! Document lifecycle handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use core_kernel::{DocumentId, Money};
use domain_documents::{
    Document, DocumentKind, PaymentDirection, PaymentMethod, PaymentRecord,
};
use domain_ledger::TaxMode;
use infra_db::{with_retry, DocumentRepository, RetryPolicy};

use crate::dto::documents::{
    CancelDocumentRequest, ConfirmDocumentRequest, CreateDocumentRequest, DocumentResponse,
    PaymentResponse, RecordPaymentRequest, UpdateDocumentRequest,
};
use crate::error::ApiError;
use crate::handlers::accounts::parse_currency;
use crate::AppState;

/// Creates a draft document
pub async fn create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let kind = DocumentKind::parse(&request.kind)?;
    let tax_mode = TaxMode::parse(&request.tax_mode)?;
    let currency = parse_currency(request.currency.as_deref())?;

    let mut document = Document::draft(kind, tax_mode, request.party_account, currency);
    if let Some(direction) = request.direction.as_deref() {
        document = document.with_direction(PaymentDirection::parse(direction)?);
    }
    if let Some(date) = request.document_date {
        document = document.dated(date);
    }
    document.notes = request.notes;
    if let Some(adjustment) = request.adjustment {
        document.set_adjustment(Money::new(adjustment, currency))?;
    }
    for item in request.items {
        document.add_item(item.into_line_item())?;
    }
    document.recompute_totals()?;

    DocumentRepository::new(state.pool.clone())
        .save_draft(&document)
        .await?;
    Ok(Json(DocumentResponse::from_document(&document, None)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub kind: String,
    pub limit: Option<i64>,
}

/// Lists documents of a kind, newest first
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let kind = DocumentKind::parse(&query.kind)?;
    let documents = DocumentRepository::new(state.pool.clone())
        .list(kind, query.limit.unwrap_or(50).clamp(1, 500))
        .await?;
    Ok(Json(
        documents
            .iter()
            .map(|d| DocumentResponse::from_document(d, None))
            .collect(),
    ))
}

/// Gets a document by id
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = DocumentRepository::new(state.pool.clone())
        .get(DocumentId::from_uuid(id))
        .await?;
    Ok(Json(DocumentResponse::from_document(&document, None)))
}

/// Replaces the financial fields of a draft document
///
/// Rejected with a conflict once the document has left Draft.
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let repo = DocumentRepository::new(state.pool.clone());
    let mut document = repo.get(DocumentId::from_uuid(id)).await?;

    document.tax_mode = TaxMode::parse(&request.tax_mode)?;
    document.party_account = request.party_account;
    if let Some(direction) = request.direction.as_deref() {
        document.direction = Some(PaymentDirection::parse(direction)?);
    }
    if let Some(date) = request.document_date {
        document.document_date = date;
    }
    document.notes = request.notes;
    document.items.clear();
    document.set_adjustment(Money::new(
        request.adjustment.unwrap_or_default(),
        document.currency,
    ))?;
    for item in request.items {
        document.add_item(item.into_line_item())?;
    }
    document.recompute_totals()?;

    repo.save_draft(&document).await?;
    Ok(Json(DocumentResponse::from_document(&document, None)))
}

/// Hard-deletes a draft document
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    DocumentRepository::new(state.pool.clone())
        .delete_draft(DocumentId::from_uuid(id))
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Confirms a document, posting its ledger batch
///
/// Retried under the bounded policy when the confirming transaction
/// loses a lock race; the idempotency key makes the retry safe.
pub async fn confirm_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let repo = DocumentRepository::new(state.pool.clone());
    let accounts = request.into_posting_accounts();
    let document_id = DocumentId::from_uuid(id);

    let outcome = with_retry(RetryPolicy::default(), "confirm_document", || {
        repo.confirm(document_id, &accounts)
    })
    .await?;

    let batch_number = outcome.batch.as_ref().map(|b| b.batch_number.clone());
    Ok(Json(DocumentResponse::from_document(
        &outcome.document,
        batch_number,
    )))
}

/// Marks a confirmed sales bill as shipped
pub async fn ship_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = DocumentRepository::new(state.pool.clone())
        .ship(DocumentId::from_uuid(id))
        .await?;
    Ok(Json(DocumentResponse::from_document(&document, None)))
}

/// Marks a shipped sales bill as completed
pub async fn complete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = DocumentRepository::new(state.pool.clone())
        .complete(DocumentId::from_uuid(id))
        .await?;
    Ok(Json(DocumentResponse::from_document(&document, None)))
}

/// Cancels a document, reversing its ledger batch if one was posted
pub async fn cancel_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let repo = DocumentRepository::new(state.pool.clone());
    let document_id = DocumentId::from_uuid(id);

    let outcome = with_retry(RetryPolicy::default(), "cancel_document", || {
        repo.cancel(document_id, &request.reason)
    })
    .await?;

    let batch_number = outcome.batch.as_ref().map(|b| b.batch_number.clone());
    Ok(Json(DocumentResponse::from_document(
        &outcome.document,
        batch_number,
    )))
}

/// Records a payment against a document
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let repo = DocumentRepository::new(state.pool.clone());
    let document_id = DocumentId::from_uuid(id);
    let document = repo.get(document_id).await?;

    let method = PaymentMethod::parse(&request.method)?;
    let mut payment = PaymentRecord::new(
        document_id,
        Money::new(request.amount, document.currency),
        method,
    );
    if let Some(reference) = request.reference {
        payment = payment.with_reference(reference);
    }
    if let Some(received_on) = request.received_on {
        payment.received_on = received_on;
    }
    let document = repo.record_payment(&payment).await?;
    Ok(Json(DocumentResponse::from_document(&document, None)))
}

/// Lists the payments recorded against a document
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = DocumentRepository::new(state.pool.clone())
        .payments(DocumentId::from_uuid(id))
        .await?;
    Ok(Json(payments.iter().map(PaymentResponse::from).collect()))
}
