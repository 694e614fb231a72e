//! Classification and aggregation passes over the fetched invoice set.
//!
//! The three partitions are independent views, not a three-way split:
//! usage and base are complementary over paid invoices, while the paid
//! view is a superset of both.

use crate::types::Invoice;

/// Paid invoices with more than one line item (usage-billed).
#[must_use]
pub fn usage_invoices(invoices: &[Invoice]) -> Vec<&Invoice> {
    invoices
        .iter()
        .filter(|invoice| invoice.line_count() > 1 && invoice.is_paid())
        .collect()
}

/// Paid invoices with exactly one line item (base subscription).
#[must_use]
pub fn base_invoices(invoices: &[Invoice]) -> Vec<&Invoice> {
    invoices
        .iter()
        .filter(|invoice| invoice.line_count() == 1 && invoice.is_paid())
        .collect()
}

/// Every paid invoice, regardless of line count.
#[must_use]
pub fn paid_invoices(invoices: &[Invoice]) -> Vec<&Invoice> {
    invoices
        .iter()
        .filter(|invoice| invoice.is_paid())
        .collect()
}

/// Sum of pre-credit totals, in minor units.
#[must_use]
pub fn sum_total(invoices: &[&Invoice]) -> i64 {
    invoices.iter().map(|invoice| invoice.total).sum()
}

/// Sum of post-credit amounts paid, in minor units.
#[must_use]
pub fn sum_amount_paid(invoices: &[&Invoice]) -> i64 {
    invoices.iter().map(|invoice| invoice.amount_paid).sum()
}

/// Minor units to whole major units, rounding half up.
/// `(minor + 50).div_euclid(100)` is `floor(minor / 100 + 0.5)`.
#[must_use]
pub const fn to_major_units(minor: i64) -> i64 {
    (minor + 50).div_euclid(100)
}
