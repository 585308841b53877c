//! Document repository and confirmation orchestration
//!
//! Confirmation is the one place where numbering, posting, and stock all
//! meet. The whole sequence runs in a single transaction under a row
//! lock on the document:
//!
//! 1. lock and hydrate the document, replaying if already confirmed
//! 2. claim the document number from its sequence scope
//! 3. run the domain state machine (`Document::confirm`)
//! 4. post the derived ledger batch under the confirm idempotency key
//! 5. deduct stock for sales bill lines
//! 6. persist the new status, number, and totals
//!
//! A failure at any step rolls everything back, including the claimed
//! number (leaving a gap, which is acceptable; duplicates are not).
//! Cancellation mirrors this: it reverses the posted batch and restores
//! deducted stock in one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use core_kernel::{Currency, DocumentId, DocumentItemId, Money, PaymentId};
use domain_documents::{
    idempotency_key, ledger_batch, stock_movements, Document, DocumentError, DocumentKind,
    DocumentStatus, LineItem, PaymentDirection, PaymentMethod, PaymentRecord,
    PaymentRecordStatus, PostingAccounts, StockMovement,
};
use domain_ledger::{BatchResult, BillTotals, LineAmounts, TaxMode};

use crate::error::DatabaseError;
use crate::repositories::ledger::{LedgerRepository, PostingError};
use crate::repositories::sequences::SequenceRepository;
use crate::repositories::stock::StockRepository;

/// Errors from document storage and orchestration
#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error(transparent)]
    Domain(#[from] DocumentError),
    #[error(transparent)]
    Posting(#[from] PostingError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for DocumentStoreError {
    fn from(error: sqlx::Error) -> Self {
        DocumentStoreError::Database(DatabaseError::from_sqlx(error))
    }
}

impl crate::retry::Retryable for DocumentStoreError {
    fn is_retryable(&self) -> bool {
        match self {
            DocumentStoreError::Database(e) => e.is_retryable(),
            DocumentStoreError::Posting(PostingError::Database(e)) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Outcome of a confirmation or cancellation
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    /// The document after the transition
    pub document: Document,
    /// The posted (or replayed) ledger batch, when one was involved
    pub batch: Option<BatchResult>,
}

/// Repository for business documents
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces a draft document with its items
    ///
    /// # Errors
    ///
    /// Returns `Domain(DocumentLocked)` when the stored document has
    /// already left Draft.
    pub async fn save_draft(&self, document: &Document) -> Result<(), DocumentStoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::lock_row(&mut tx, document.id).await?;
        if let Some(row) = &existing {
            let status = DocumentStatus::parse(&row.status)?;
            if !status.is_editable() {
                return Err(DocumentError::locked(format!(
                    "{} is {}; financial fields are frozen",
                    row.number.as_deref().unwrap_or("draft document"),
                    status.as_str()
                ))
                .into());
            }
        }

        Self::upsert_document(&mut tx, document).await?;
        sqlx::query("DELETE FROM document_items WHERE document_id = $1")
            .bind(document.id.as_uuid())
            .execute(&mut *tx)
            .await?;
        for item in &document.items {
            Self::insert_item(&mut tx, document.id, item).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Hard-deletes a draft document and its items
    ///
    /// Drafts have no ledger footprint, so deletion is safe. Anything
    /// past Draft is frozen and can only be cancelled.
    pub async fn delete_draft(&self, id: DocumentId) -> Result<(), DocumentStoreError> {
        let mut tx = self.pool.begin().await?;
        let row = Self::lock_row(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", id))?;
        let status = DocumentStatus::parse(&row.status)?;
        if status != DocumentStatus::Draft {
            return Err(DocumentError::locked(format!(
                "{} is {}; cancel it instead of deleting",
                row.number.as_deref().unwrap_or("document"),
                status.as_str()
            ))
            .into());
        }

        sqlx::query("DELETE FROM payments WHERE document_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM document_items WHERE document_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(document_id = %id, "Draft document deleted");
        Ok(())
    }

    /// Fetches a document with its items and derived payment fields
    pub async fn get(&self, id: DocumentId) -> Result<Document, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;
        let row = Self::lock_row(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", id))?;
        let mut document = Self::hydrate(&mut tx, row).await?;
        let payments = Self::payments_in_tx(&mut tx, id, document.currency).await?;
        tx.commit().await?;

        document.apply_payments(&payments);
        Ok(document)
    }

    /// Confirms a document: numbers it, posts its batch, deducts stock
    ///
    /// Safe to call twice: a repeat on an already-confirmed document
    /// replays the stored outcome instead of posting again.
    #[instrument(skip(self, accounts), fields(document_id = %id))]
    pub async fn confirm(
        &self,
        id: DocumentId,
        accounts: &PostingAccounts,
    ) -> Result<WorkflowOutcome, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;

        let row = Self::lock_row(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", id))?;
        let mut document = Self::hydrate(&mut tx, row).await?;
        let key = idempotency_key(id, "confirm");

        // Replay path: the document already went through confirmation.
        if document.status.has_ledger_effect() {
            let batch = ledger_batch(&document, accounts)?;
            let result = LedgerRepository::post_batch_in_tx(&mut tx, &batch, &key, None).await?;
            tx.commit().await?;
            info!(number = ?document.number, "Confirmation replayed");
            return Ok(WorkflowOutcome {
                document,
                batch: Some(result),
            });
        }

        let number =
            SequenceRepository::next_in_tx(&mut tx, document.kind.sequence_scope()).await?;
        document.confirm(number)?;

        let batch = ledger_batch(&document, accounts)?;
        let result = LedgerRepository::post_batch_in_tx(&mut tx, &batch, &key, None).await?;

        let movements = stock_movements(&document);
        if !movements.is_empty() {
            StockRepository::deduct_in_tx(&mut tx, &movements).await?;
            for item in &mut document.items {
                item.stock_deducted = true;
            }
        }

        Self::upsert_document(&mut tx, &document).await?;
        for item in &document.items {
            Self::update_item_amounts(&mut tx, item).await?;
        }

        tx.commit().await?;
        info!(number = ?document.number, batch = %result.batch_number, "Document confirmed");
        Ok(WorkflowOutcome {
            document,
            batch: Some(result),
        })
    }

    /// Moves a confirmed sales bill to Shipped
    pub async fn ship(&self, id: DocumentId) -> Result<Document, DocumentStoreError> {
        self.transition(id, |document| document.ship()).await
    }

    /// Moves a shipped sales bill to Completed
    pub async fn complete(&self, id: DocumentId) -> Result<Document, DocumentStoreError> {
        self.transition(id, |document| document.complete()).await
    }

    /// Cancels a document, reversing its batch and restoring stock
    #[instrument(skip(self), fields(document_id = %id))]
    pub async fn cancel(
        &self,
        id: DocumentId,
        reason: &str,
    ) -> Result<WorkflowOutcome, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;

        let row = Self::lock_row(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", id))?;
        let mut document = Self::hydrate(&mut tx, row).await?;

        if document.status == DocumentStatus::Cancelled {
            tx.commit().await?;
            return Ok(WorkflowOutcome {
                document,
                batch: None,
            });
        }

        let previous = document.cancel()?;

        let mut batch = None;
        if previous.has_ledger_effect() {
            let posted = sqlx::query_as::<_, PostedBatchIdRow>(
                r#"
                SELECT batch_id FROM ledger_batches
                WHERE document_id = $1 AND reversal_of IS NULL
                ORDER BY posted_at DESC
                LIMIT 1
                "#,
            )
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Ledger batch for document", id))?;

            let key = idempotency_key(id, "cancel");
            let result = LedgerRepository::reverse_batch_in_tx(
                &mut tx,
                core_kernel::BatchId::from_uuid(posted.batch_id),
                reason,
                &key,
            )
            .await?;
            batch = Some(result);

            let restored: Vec<StockMovement> = document
                .items
                .iter()
                .filter(|i| i.stock_deducted)
                .map(|i| StockMovement {
                    sku: i.sku.clone(),
                    quantity: i.quantity,
                    document_id: document.id,
                })
                .collect();
            if !restored.is_empty() {
                StockRepository::restore_in_tx(&mut tx, &restored).await?;
                for item in &mut document.items {
                    item.stock_deducted = false;
                }
            }
        }

        Self::upsert_document(&mut tx, &document).await?;
        for item in &document.items {
            Self::update_item_amounts(&mut tx, item).await?;
        }

        tx.commit().await?;
        info!(previous = previous.as_str(), "Document cancelled");
        Ok(WorkflowOutcome { document, batch })
    }

    /// Records a payment and refreshes the document's derived fields
    pub async fn record_payment(
        &self,
        payment: &PaymentRecord,
    ) -> Result<Document, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;

        let row = Self::lock_row(&mut tx, payment.document_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", payment.document_id))?;
        let mut document = Self::hydrate(&mut tx, row).await?;

        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, document_id, amount, method, status,
                reference, received_on, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.document_id.as_uuid())
        .bind(payment.amount.amount())
        .bind(payment.method.as_str())
        .bind(payment.status.as_str())
        .bind(payment.reference.as_deref())
        .bind(payment.received_on)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        let payments =
            Self::payments_in_tx(&mut tx, payment.document_id, document.currency).await?;
        document.apply_payments(&payments);
        Self::upsert_document(&mut tx, &document).await?;

        tx.commit().await?;
        Ok(document)
    }

    /// Updates the status of an existing payment (e.g. a bounced cheque)
    pub async fn set_payment_status(
        &self,
        payment_id: PaymentId,
        status: PaymentRecordStatus,
    ) -> Result<Document, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;

        let document_id: (Uuid,) = sqlx::query_as(
            "UPDATE payments SET status = $2 WHERE payment_id = $1 RETURNING document_id",
        )
        .bind(payment_id.as_uuid())
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Payment", payment_id))?;

        let document_id = DocumentId::from_uuid(document_id.0);
        let row = Self::lock_row(&mut tx, document_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", document_id))?;
        let mut document = Self::hydrate(&mut tx, row).await?;
        let payments = Self::payments_in_tx(&mut tx, document_id, document.currency).await?;
        document.apply_payments(&payments);
        Self::upsert_document(&mut tx, &document).await?;

        tx.commit().await?;
        Ok(document)
    }

    /// Lists the payments recorded against a document
    pub async fn payments(
        &self,
        id: DocumentId,
    ) -> Result<Vec<PaymentRecord>, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;
        let row = Self::lock_row(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", id))?;
        let currency = Currency::parse(&row.currency)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let payments = Self::payments_in_tx(&mut tx, id, currency).await?;
        tx.commit().await?;
        Ok(payments)
    }

    /// Lists documents of a kind, newest first
    pub async fn list(
        &self,
        kind: DocumentKind,
        limit: i64,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT * FROM documents
            WHERE kind = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(kind.as_str())
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            documents.push(Self::hydrate(&mut tx, row).await?);
        }
        tx.commit().await?;
        Ok(documents)
    }

    async fn transition<F>(
        &self,
        id: DocumentId,
        apply: F,
    ) -> Result<Document, DocumentStoreError>
    where
        F: FnOnce(&mut Document) -> Result<(), DocumentError>,
    {
        let mut tx = self.pool.begin().await?;
        let row = Self::lock_row(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Document", id))?;
        let mut document = Self::hydrate(&mut tx, row).await?;
        apply(&mut document)?;
        Self::upsert_document(&mut tx, &document).await?;
        tx.commit().await?;
        Ok(document)
    }

    async fn lock_row(
        tx: &mut Transaction<'_, Postgres>,
        id: DocumentId,
    ) -> Result<Option<DocumentRow>, DocumentStoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT * FROM documents WHERE document_id = $1 FOR UPDATE",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }

    async fn hydrate(
        tx: &mut Transaction<'_, Postgres>,
        row: DocumentRow,
    ) -> Result<Document, DocumentStoreError> {
        let item_rows = sqlx::query_as::<_, ItemRow>(
            "SELECT * FROM document_items WHERE document_id = $1 ORDER BY created_at, item_id",
        )
        .bind(row.document_id)
        .fetch_all(&mut **tx)
        .await?;

        let currency = Currency::parse(&row.currency)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let items = item_rows
            .into_iter()
            .map(|i| i.into_line_item(currency))
            .collect::<Result<Vec<_>, _>>()?;
        row.into_document(items, currency)
    }

    async fn payments_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DocumentId,
        currency: Currency,
    ) -> Result<Vec<PaymentRecord>, DocumentStoreError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT * FROM payments WHERE document_id = $1 ORDER BY created_at",
        )
        .bind(id.as_uuid())
        .fetch_all(&mut **tx)
        .await?;

        rows.into_iter()
            .map(|row| row.into_payment(currency))
            .collect()
    }

    async fn upsert_document(
        tx: &mut Transaction<'_, Postgres>,
        document: &Document,
    ) -> Result<(), DocumentStoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                document_id, kind, number, status, tax_mode, currency,
                party_account, direction, document_date, adjustment,
                gross, discount, taxable, tax, net,
                paid_amount, payment_state, is_overpaid, notes,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            ON CONFLICT (document_id) DO UPDATE SET
                number = EXCLUDED.number,
                status = EXCLUDED.status,
                adjustment = EXCLUDED.adjustment,
                gross = EXCLUDED.gross,
                discount = EXCLUDED.discount,
                taxable = EXCLUDED.taxable,
                tax = EXCLUDED.tax,
                net = EXCLUDED.net,
                paid_amount = EXCLUDED.paid_amount,
                payment_state = EXCLUDED.payment_state,
                is_overpaid = EXCLUDED.is_overpaid,
                notes = EXCLUDED.notes,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.kind.as_str())
        .bind(document.number.as_deref())
        .bind(document.status.as_str())
        .bind(document.tax_mode.as_str())
        .bind(document.currency.code())
        .bind(&document.party_account)
        .bind(document.direction.map(|d| d.as_str()))
        .bind(document.document_date)
        .bind(document.adjustment.amount())
        .bind(document.totals.gross.amount())
        .bind(document.totals.discount.amount())
        .bind(document.totals.taxable.amount())
        .bind(document.totals.tax.amount())
        .bind(document.totals.net.amount())
        .bind(document.paid_amount.amount())
        .bind(document.payment_state.as_str())
        .bind(document.is_overpaid)
        .bind(document.notes.as_deref())
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn insert_item(
        tx: &mut Transaction<'_, Postgres>,
        document_id: DocumentId,
        item: &LineItem,
    ) -> Result<(), DocumentStoreError> {
        sqlx::query(
            r#"
            INSERT INTO document_items (
                item_id, document_id, sku, description, quantity, rate,
                discount_percentage, discount_amount, tax_percentage,
                line_gross, line_discount, line_taxable, line_tax, line_total,
                stock_deducted, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9,
                $10, $11, $12, $13, $14, $15, $16
            )
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(document_id.as_uuid())
        .bind(&item.sku)
        .bind(item.description.as_deref())
        .bind(item.quantity)
        .bind(item.rate)
        .bind(item.discount_percentage)
        .bind(item.discount_amount)
        .bind(item.tax_percentage)
        .bind(item.amounts.map(|a| a.gross.amount()))
        .bind(item.amounts.map(|a| a.discount.amount()))
        .bind(item.amounts.map(|a| a.taxable.amount()))
        .bind(item.amounts.map(|a| a.tax.amount()))
        .bind(item.amounts.map(|a| a.total.amount()))
        .bind(item.stock_deducted)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn update_item_amounts(
        tx: &mut Transaction<'_, Postgres>,
        item: &LineItem,
    ) -> Result<(), DocumentStoreError> {
        sqlx::query(
            r#"
            UPDATE document_items SET
                line_gross = $2, line_discount = $3, line_taxable = $4,
                line_tax = $5, line_total = $6, stock_deducted = $7
            WHERE item_id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.amounts.map(|a| a.gross.amount()))
        .bind(item.amounts.map(|a| a.discount.amount()))
        .bind(item.amounts.map(|a| a.taxable.amount()))
        .bind(item.amounts.map(|a| a.tax.amount()))
        .bind(item.amounts.map(|a| a.total.amount()))
        .bind(item.stock_deducted)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
struct PostedBatchIdRow {
    batch_id: Uuid,
}

/// Database row for a document
#[derive(Debug, Clone, FromRow)]
struct DocumentRow {
    document_id: Uuid,
    kind: String,
    number: Option<String>,
    status: String,
    tax_mode: String,
    currency: String,
    party_account: String,
    direction: Option<String>,
    document_date: NaiveDate,
    adjustment: Decimal,
    gross: Decimal,
    discount: Decimal,
    taxable: Decimal,
    tax: Decimal,
    net: Decimal,
    paid_amount: Decimal,
    payment_state: String,
    is_overpaid: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(
        self,
        items: Vec<LineItem>,
        currency: Currency,
    ) -> Result<Document, DocumentStoreError> {
        let kind = DocumentKind::parse(&self.kind)?;
        let status = DocumentStatus::parse(&self.status)?;
        let tax_mode =
            TaxMode::parse(&self.tax_mode).map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let direction = self
            .direction
            .as_deref()
            .map(PaymentDirection::parse)
            .transpose()?;
        let payment_state = domain_documents::PaymentState::parse(&self.payment_state)?;

        let item_count = items.len() as u32;
        let total_quantity = items.iter().map(|i| i.quantity).sum();
        let totals = BillTotals {
            item_count,
            total_quantity,
            gross: Money::new(self.gross, currency),
            discount: Money::new(self.discount, currency),
            taxable: Money::new(self.taxable, currency),
            tax: Money::new(self.tax, currency),
            adjustment: Money::new(self.adjustment, currency),
            net: Money::new(self.net, currency),
        };

        Ok(Document {
            id: DocumentId::from_uuid(self.document_id),
            kind,
            number: self.number,
            status,
            tax_mode,
            currency,
            party_account: self.party_account,
            direction,
            document_date: self.document_date,
            items,
            adjustment: Money::new(self.adjustment, currency),
            totals,
            paid_amount: Money::new(self.paid_amount, currency),
            payment_state,
            is_overpaid: self.is_overpaid,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for a document line item
#[derive(Debug, Clone, FromRow)]
struct ItemRow {
    item_id: Uuid,
    sku: String,
    description: Option<String>,
    quantity: Decimal,
    rate: Decimal,
    discount_percentage: Decimal,
    discount_amount: Option<Decimal>,
    tax_percentage: Decimal,
    line_gross: Option<Decimal>,
    line_discount: Option<Decimal>,
    line_taxable: Option<Decimal>,
    line_tax: Option<Decimal>,
    line_total: Option<Decimal>,
    stock_deducted: bool,
}

impl ItemRow {
    fn into_line_item(self, currency: Currency) -> Result<LineItem, DocumentStoreError> {
        let amounts = match (
            self.line_gross,
            self.line_discount,
            self.line_taxable,
            self.line_tax,
            self.line_total,
        ) {
            (Some(gross), Some(discount), Some(taxable), Some(tax), Some(total)) => {
                Some(LineAmounts {
                    gross: Money::new(gross, currency),
                    discount: Money::new(discount, currency),
                    taxable: Money::new(taxable, currency),
                    tax: Money::new(tax, currency),
                    total: Money::new(total, currency),
                })
            }
            _ => None,
        };

        Ok(LineItem {
            id: DocumentItemId::from_uuid(self.item_id),
            sku: self.sku,
            description: self.description,
            quantity: self.quantity,
            rate: self.rate,
            discount_percentage: self.discount_percentage,
            discount_amount: self.discount_amount,
            tax_percentage: self.tax_percentage,
            amounts,
            stock_deducted: self.stock_deducted,
        })
    }
}

/// Database row for a payment
#[derive(Debug, Clone, FromRow)]
struct PaymentRow {
    payment_id: Uuid,
    document_id: Uuid,
    amount: Decimal,
    method: String,
    status: String,
    reference: Option<String>,
    received_on: NaiveDate,
    created_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self, currency: Currency) -> Result<PaymentRecord, DocumentStoreError> {
        Ok(PaymentRecord {
            id: PaymentId::from_uuid(self.payment_id),
            document_id: DocumentId::from_uuid(self.document_id),
            amount: Money::new(self.amount, currency),
            method: PaymentMethod::parse(&self.method)?,
            status: PaymentRecordStatus::parse(&self.status)?,
            reference: self.reference,
            received_on: self.received_on,
            created_at: self.created_at,
        })
    }
}
