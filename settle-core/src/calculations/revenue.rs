//! Monthly revenue aggregation over payment facts.

use rust_decimal::Decimal;

use crate::models::PaymentRecord;

/// Sums payment amounts, keeping only payments whose member name contains
/// `search` case-insensitively. An empty search string matches everything.
///
/// This is step 1 of the settlement derivation and is also used on its own
/// by the table views upstream, so it lives here rather than inside the
/// worksheet.
pub fn total_revenue(payments: &[PaymentRecord], search: &str) -> Decimal {
    let needle = search.to_lowercase();
    payments
        .iter()
        .filter(|p| needle.is_empty() || p.member_name.to_lowercase().contains(&needle))
        .map(|p| p.payment_amount)
        .sum()
}
