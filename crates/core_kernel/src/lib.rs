//! Core Kernel - Foundational types and utilities for the garments ERP
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Business identifier sequence formatting (bill numbers, account codes)

pub mod money;
pub mod identifiers;
pub mod sequence;
pub mod error;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::{
    AccountId, BatchId, LedgerEntryId, DocumentId, DocumentItemId, PaymentId,
};
pub use sequence::{account_scope_key, format_identifier, numeric_suffix, SequenceScope};
pub use error::CoreError;
