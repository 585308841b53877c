//! Infrastructure Database Layer
//!
//! This crate provides the durable half of the financial core on
//! PostgreSQL using SQLx: the sequence counters behind business
//! numbering, the ledger poster with its idempotency and row-locking
//! guarantees, and the document store that orchestrates confirmation
//! and cancellation as single transactions.
//!
//! # Concurrency
//!
//! Writes serialize on row locks (documents by primary key, accounts in
//! code order) rather than advisory locks. Transient conflicts map to
//! [`DatabaseError::ConcurrencyConflict`] and can be replayed with
//! [`retry::with_retry`].
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, DocumentRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/garments")).await?;
//! let documents = DocumentRepository::new(pool);
//! let outcome = documents.confirm(document_id, &posting_accounts).await?;
//! ```

pub mod error;
pub mod pool;
pub mod repositories;
pub mod retry;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{
    AccountRepository, DocumentRepository, DocumentStoreError, LedgerRepository, PostingError,
    SequenceRepository, StockRepository, WorkflowOutcome,
};
pub use retry::{with_retry, Retryable, RetryPolicy};
