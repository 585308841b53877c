//! Business identifier formatting
//!
//! Sales bills, vouchers, account codes and employee categories all carry
//! human-readable numbers of the form `prefix + zero-padded counter`
//! (`CAT001`, `SB0042`, `2108001`). This module holds the pure formatting
//! and parsing half of the sequencer; the durable, concurrency-safe counter
//! lives in the database layer.
//!
//! Policy on unparseable legacy numbers: the scope restarts at 1 and a
//! warning is logged. This is fixed behaviour - it never alternates with
//! fail-hard between calls. Counters for scopes with historical data should
//! be seeded explicitly so the restart path is only ever hit for corrupt
//! suffixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default zero-padding width when a scope does not specify one
pub const DEFAULT_WIDTH: usize = 3;

/// A known identifier scope with its canonical prefix and padding width
///
/// The scope is the namespace within which values are unique and strictly
/// increasing; two scopes never share a counter even if their prefixes
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceScope {
    /// Employee categories: CAT001, CAT002, ...
    EmployeeCategory,
    /// Sales bill numbers: SB0001, ...
    SalesBill,
    /// Purchase order numbers: PO0001, ...
    PurchaseOrder,
    /// Payment voucher numbers: PV0001, ...
    PaymentVoucher,
    /// Ledger batch numbers: BATCH0001, ...
    LedgerBatch,
}

impl SequenceScope {
    /// Returns the scope key used in the durable counter table
    pub fn key(&self) -> &'static str {
        match self {
            SequenceScope::EmployeeCategory => "employee_category",
            SequenceScope::SalesBill => "sales_bill",
            SequenceScope::PurchaseOrder => "purchase_order",
            SequenceScope::PaymentVoucher => "payment_voucher",
            SequenceScope::LedgerBatch => "ledger_batch",
        }
    }

    /// Returns the canonical string prefix for identifiers in this scope
    pub fn prefix(&self) -> &'static str {
        match self {
            SequenceScope::EmployeeCategory => "CAT",
            SequenceScope::SalesBill => "SB",
            SequenceScope::PurchaseOrder => "PO",
            SequenceScope::PaymentVoucher => "PV",
            SequenceScope::LedgerBatch => "BATCH",
        }
    }

    /// Returns the zero-padding width for this scope
    pub fn width(&self) -> usize {
        match self {
            SequenceScope::EmployeeCategory => 3,
            SequenceScope::SalesBill => 4,
            SequenceScope::PurchaseOrder => 4,
            SequenceScope::PaymentVoucher => 4,
            SequenceScope::LedgerBatch => 4,
        }
    }

    /// Formats a counter value as a full identifier in this scope
    pub fn format(&self, value: u64) -> String {
        format_identifier(self.prefix(), value, self.width())
    }
}

impl fmt::Display for SequenceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Returns the counter-table key for account codes under a parent prefix
///
/// Party and employee-advance accounts are numbered under a parent
/// control-account prefix (`2108` yields `2108001`, `2108002`, ...).
/// Each parent owns its own counter, so onboarding under one parent
/// never contends with another.
pub fn account_scope_key(parent: &str) -> String {
    format!("account:{parent}")
}

/// Formats a business identifier as `prefix + zero-padded value`
///
/// Values wider than `width` are rendered without truncation, so a scope
/// that outgrows its padding keeps producing unique, increasing numbers
/// (`CAT999` is followed by `CAT1000`).
pub fn format_identifier(prefix: &str, value: u64, width: usize) -> String {
    format!("{prefix}{value:0width$}")
}

/// Parses the numeric suffix of an existing identifier
///
/// Returns `None` when the identifier does not start with `prefix` or the
/// remainder is not a plain decimal number. Callers seeding a counter from
/// legacy data treat `None` as "restart at 1" after logging a warning.
pub fn numeric_suffix(identifier: &str, prefix: &str) -> Option<u64> {
    let suffix = identifier.strip_prefix(prefix)?;
    if suffix.is_empty() {
        return None;
    }
    suffix.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_width() {
        assert_eq!(format_identifier("CAT", 1, 3), "CAT001");
        assert_eq!(format_identifier("CAT", 2, 3), "CAT002");
        assert_eq!(format_identifier("BATCH", 17, 4), "BATCH0017");
    }

    #[test]
    fn test_format_does_not_truncate_overflow() {
        assert_eq!(format_identifier("CAT", 1000, 3), "CAT1000");
    }

    #[test]
    fn test_numeric_suffix_round_trip() {
        let id = SequenceScope::SalesBill.format(42);
        assert_eq!(id, "SB0042");
        assert_eq!(numeric_suffix(&id, "SB"), Some(42));
    }

    #[test]
    fn test_numeric_suffix_rejects_garbage() {
        assert_eq!(numeric_suffix("CAT-OLD", "CAT"), None);
        assert_eq!(numeric_suffix("CAT", "CAT"), None);
        assert_eq!(numeric_suffix("XYZ001", "CAT"), None);
    }

    #[test]
    fn test_account_scope_key_is_namespaced_per_parent() {
        assert_eq!(account_scope_key("2108"), "account:2108");
        assert_ne!(account_scope_key("2108"), account_scope_key("2109"));
        // Generated codes read as parent prefix plus padded counter
        assert_eq!(format_identifier("2108", 1, DEFAULT_WIDTH), "2108001");
        assert_eq!(format_identifier("2108", 12, DEFAULT_WIDTH), "2108012");
    }

    #[test]
    fn test_scope_table() {
        assert_eq!(SequenceScope::EmployeeCategory.key(), "employee_category");
        assert_eq!(SequenceScope::EmployeeCategory.prefix(), "CAT");
        assert_eq!(SequenceScope::EmployeeCategory.format(1), "CAT001");
        assert_eq!(SequenceScope::LedgerBatch.format(3), "BATCH0003");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn format_parse_round_trip(value in 1u64..10_000_000, width in 1usize..8) {
            let id = format_identifier("SB", value, width);
            prop_assert_eq!(numeric_suffix(&id, "SB"), Some(value));
        }

        #[test]
        fn formatting_preserves_ordering(a in 1u64..1_000_000, b in 1u64..1_000_000) {
            // Within one padding width, lexicographic order matches numeric order
            let (a, b) = (a.min(b), a.max(b));
            let fa = format_identifier("PO", a, 9);
            let fb = format_identifier("PO", b, 9);
            prop_assert!(fa <= fb);
        }
    }
}
