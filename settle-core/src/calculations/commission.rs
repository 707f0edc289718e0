//! Commission policy lookup.
//!
//! Policies are revenue brackets, optionally scoped to a position and/or a
//! center. The lookup mirrors the policy table's query semantics: a rate is
//! a candidate when the revenue falls in its bracket and its scoping columns
//! either match or are unset, and the most specific bracket (highest
//! `min_revenue`) wins.

use rust_decimal::Decimal;

use crate::models::CommissionRate;

/// Finds the commission rate applying to `revenue` (total revenue including
/// carryover) for the given position and center.
///
/// Returns `None` when no bracket matches; the settlement worksheet treats
/// that as zero commission, not as a failure.
pub fn find_commission_rate<'a>(
    rates: &'a [CommissionRate],
    revenue: Decimal,
    position_id: Option<i64>,
    center_id: Option<i64>,
) -> Option<&'a CommissionRate> {
    rates
        .iter()
        .filter(|rate| rate.min_revenue <= revenue)
        .filter(|rate| rate.max_revenue.is_none_or(|max| max >= revenue))
        .filter(|rate| scope_matches(rate.position_id, position_id))
        .filter(|rate| scope_matches(rate.center_id, center_id))
        .max_by_key(|rate| rate.min_revenue)
}

/// A rate's scoping column matches when it is unset (default policy) or
/// equal to the requested value.
fn scope_matches(rate_scope: Option<i64>, requested: Option<i64>) -> bool {
    match (rate_scope, requested) {
        (None, _) => true,
        (Some(scope), Some(requested)) => scope == requested,
        (Some(_), None) => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bracket(
        min: Decimal,
        max: Option<Decimal>,
        per_session: Decimal,
    ) -> CommissionRate {
        CommissionRate {
            min_revenue: min,
            max_revenue: max,
            commission_per_session: per_session,
            monthly_commission: dec!(0),
            position_id: None,
            center_id: None,
        }
    }

    fn standard_brackets() -> Vec<CommissionRate> {
        vec![
            bracket(dec!(0), Some(dec!(3000000)), dec!(18000)),
            bracket(dec!(3000000), Some(dec!(5000000)), dec!(21000)),
            bracket(dec!(5000000), None, dec!(24000)),
        ]
    }

    #[test]
    fn revenue_selects_matching_bracket() {
        let rates = standard_brackets();

        let rate = find_commission_rate(&rates, dec!(4000000), None, None).unwrap();

        assert_eq!(rate.commission_per_session, dec!(21000));
    }

    #[test]
    fn boundary_revenue_prefers_higher_bracket() {
        // 3000000 falls in both the first and second brackets; the higher
        // min_revenue wins, matching the policy table's ordering.
        let rates = standard_brackets();

        let rate = find_commission_rate(&rates, dec!(3000000), None, None).unwrap();

        assert_eq!(rate.commission_per_session, dec!(21000));
    }

    #[test]
    fn open_ended_top_bracket_matches_any_high_revenue() {
        let rates = standard_brackets();

        let rate = find_commission_rate(&rates, dec!(99000000), None, None).unwrap();

        assert_eq!(rate.commission_per_session, dec!(24000));
    }

    #[test]
    fn no_bracket_for_revenue_returns_none() {
        let rates = vec![bracket(dec!(1000000), Some(dec!(2000000)), dec!(18000))];

        assert_eq!(find_commission_rate(&rates, dec!(500000), None, None), None);
    }

    #[test]
    fn position_scoped_rate_beats_nothing_for_other_positions() {
        let mut scoped = bracket(dec!(0), None, dec!(30000));
        scoped.position_id = Some(7);
        let rates = vec![scoped];

        assert!(find_commission_rate(&rates, dec!(100000), Some(7), None).is_some());
        assert_eq!(find_commission_rate(&rates, dec!(100000), Some(3), None), None);
        assert_eq!(find_commission_rate(&rates, dec!(100000), None, None), None);
    }

    #[test]
    fn unscoped_rate_applies_to_any_position_and_center() {
        let rates = vec![bracket(dec!(0), None, dec!(18000))];

        assert!(find_commission_rate(&rates, dec!(100000), Some(3), Some(2)).is_some());
    }

    #[test]
    fn center_scoped_rate_requires_matching_center() {
        let mut scoped = bracket(dec!(0), None, dec!(25000));
        scoped.center_id = Some(2);
        let rates = vec![scoped];

        assert!(find_commission_rate(&rates, dec!(100000), None, Some(2)).is_some());
        assert_eq!(find_commission_rate(&rates, dec!(100000), None, Some(9)), None);
    }

    #[test]
    fn empty_rate_table_returns_none() {
        assert_eq!(find_commission_rate(&[], dec!(100000), None, None), None);
    }
}
