//! Request handlers

pub mod accounts;
pub mod documents;
pub mod health;
pub mod ledger;
pub mod tax;
