//! Shared helpers for settlement calculations.

use rust_decimal::Decimal;

/// Rounds a monetary value to whole currency units (won have no sub-unit),
/// half away from zero.
///
/// Applied after multiplication, never before, so percentage terms like the
/// withholding tax round exactly once.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use settle_core::calculations::common::round_to_won;
///
/// assert_eq!(round_to_won(dec!(33000.4)), dec!(33000));
/// assert_eq!(round_to_won(dec!(33000.5)), dec!(33001));
/// ```
pub fn round_to_won(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value to zero from below.
///
/// Monetary results of subtractions (e.g. team revenue minus the leader's
/// own share) must never be reported negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use settle_core::calculations::common::clamp_non_negative;
///
/// assert_eq!(clamp_non_negative(dec!(-150.00)), dec!(0));
/// assert_eq!(clamp_non_negative(dec!(150.00)), dec!(150.00));
/// ```
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        Decimal::ZERO
    } else {
        value
    }
}
