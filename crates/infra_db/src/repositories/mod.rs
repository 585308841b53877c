//! Repository implementations
//!
//! Each repository wraps the connection pool and exposes the durable
//! operations for one aggregate. Cross-aggregate orchestration (a
//! confirmation that numbers, posts, and deducts stock) lives in the
//! document repository, which drives the others through their
//! `*_in_tx` entry points so everything commits as one unit.

pub mod accounts;
pub mod documents;
pub mod ledger;
pub mod sequences;
pub mod stock;

pub use accounts::AccountRepository;
pub use documents::{DocumentRepository, DocumentStoreError, WorkflowOutcome};
pub use ledger::{LedgerRepository, PostingError};
pub use sequences::SequenceRepository;
pub use stock::StockRepository;
