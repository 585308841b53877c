//! Request/response data transfer objects

pub mod accounts;
pub mod documents;
pub mod ledger;
pub mod tax;
