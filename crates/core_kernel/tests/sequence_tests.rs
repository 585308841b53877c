//! Integration tests for business identifier formatting

use core_kernel::sequence::{format_identifier, numeric_suffix, SequenceScope};

#[test]
fn employee_category_numbers_start_at_one() {
    // First two issued values in an empty scope
    assert_eq!(SequenceScope::EmployeeCategory.format(1), "CAT001");
    assert_eq!(SequenceScope::EmployeeCategory.format(2), "CAT002");
}

#[test]
fn account_codes_use_parent_prefix_convention() {
    // Chart-of-accounts codes: parent prefix "2108" plus 3-digit sequence
    assert_eq!(format_identifier("2108", 1, 3), "2108001");
    assert_eq!(format_identifier("2108", 57, 3), "2108057");
    assert_eq!(numeric_suffix("2108057", "2108"), Some(57));
}

#[test]
fn legacy_numbers_with_non_numeric_suffix_do_not_parse() {
    // Orphaned historical values fall back to the restart-at-1 policy
    assert_eq!(numeric_suffix("SB-MIGRATED-7", "SB"), None);
}
