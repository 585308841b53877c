//! Document Domain - Bill Lifecycle and Workflow
//!
//! Sales bills, purchase orders, and payment vouchers share one life
//! cycle: created in Draft, confirmed (which numbers them, freezes their
//! financial fields, and posts a balanced ledger batch), and cancellable
//! from any non-terminal state via a ledger reversal. Sales bills
//! additionally move Confirmed → Shipped → Completed.
//!
//! This crate holds the pure state machine and the derivation of ledger
//! batches and stock movements from a document; the transactional
//! orchestration (row locks, idempotent replay, stock decrement) lives
//! in the database layer.

pub mod document;
pub mod item;
pub mod payment;
pub mod workflow;
pub mod error;

pub use document::{Document, DocumentKind, DocumentStatus, PaymentDirection};
pub use item::LineItem;
pub use payment::{
    paid_amount, payment_state, PaymentMethod, PaymentRecord, PaymentRecordStatus, PaymentState,
};
pub use workflow::{idempotency_key, ledger_batch, stock_movements, PostingAccounts, StockMovement};
pub use error::DocumentError;
