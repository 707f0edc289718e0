//! Bonus rule evaluation over a month of payments.
//!
//! Rules reward revenue spikes: a daily rule is achieved when any single
//! day's revenue reaches its threshold, a weekly rule when enough calendar
//! weeks of the month do. Weeks are counted from the 1st of the month in
//! fixed seven-day blocks (week 1 = days 1–7, week 2 = days 8–14, …).
//!
//! An `early_month_only` weekly rule only counts weeks that start on or
//! before the 11th, matching the source system's "before the 11th" payout
//! condition.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{BonusDetail, BonusResult, BonusRule, BonusTarget, PaymentRecord};

/// Last day of the month a week may start on to count for
/// `early_month_only` rules.
const EARLY_MONTH_CUTOFF_DAY: u32 = 11;

/// Evaluates bonus rules against one month of payments.
#[derive(Debug, Clone)]
pub struct BonusEvaluator<'a> {
    rules: &'a [BonusRule],
}

impl<'a> BonusEvaluator<'a> {
    pub fn new(rules: &'a [BonusRule]) -> Self {
        Self { rules }
    }

    /// Evaluates every rule, in order, against the payments of the given
    /// month. Payments dated outside the month are ignored.
    ///
    /// Daily rules are achieved by any single qualifying day; their
    /// `achievement_count` is informational only, which matches the source
    /// system's behavior.
    pub fn evaluate(&self, payments: &[PaymentRecord], year: i32, month: u32) -> BonusResult {
        let daily = daily_revenue(payments, year, month);
        let weekly = weekly_revenue(&daily);

        let mut total_bonus = Decimal::ZERO;
        let mut bonus_details = Vec::new();

        for rule in self.rules {
            let achieved = match rule.target_type {
                BonusTarget::Daily => daily.values().any(|&amount| amount >= rule.threshold_amount),
                BonusTarget::Weekly => {
                    let qualifying = weekly
                        .iter()
                        .filter(|&(&week, _)| {
                            !rule.early_month_only || week_start_day(week) <= EARLY_MONTH_CUTOFF_DAY
                        })
                        .filter(|&(_, &amount)| amount >= rule.threshold_amount)
                        .count() as u32;
                    qualifying >= rule.achievement_count
                }
            };

            if achieved {
                total_bonus += rule.bonus_amount;
                bonus_details.push(BonusDetail {
                    rule_name: rule.name.clone(),
                    threshold_amount: rule.threshold_amount,
                    target_type: rule.target_type,
                    achievement_count: rule.achievement_count,
                    bonus_amount: rule.bonus_amount,
                });
            }
        }

        BonusResult {
            total_bonus,
            bonus_details,
        }
    }
}

/// Revenue per calendar day, restricted to the given month.
fn daily_revenue(
    payments: &[PaymentRecord],
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, Decimal> {
    let mut daily = BTreeMap::new();
    for payment in payments {
        let date = payment.payment_date;
        if date.year() == year && date.month() == month {
            *daily.entry(date).or_insert(Decimal::ZERO) += payment.payment_amount;
        }
    }
    daily
}

/// Revenue per week number (1-based), weeks being fixed seven-day blocks
/// counted from the 1st.
fn weekly_revenue(daily: &BTreeMap<NaiveDate, Decimal>) -> BTreeMap<u32, Decimal> {
    let mut weekly = BTreeMap::new();
    for (date, &amount) in daily {
        let week = (date.day() - 1) / 7 + 1;
        *weekly.entry(week).or_insert(Decimal::ZERO) += amount;
    }
    weekly
}

/// Day of the month a week number starts on (week 1 → 1, week 2 → 8, …).
fn week_start_day(week: u32) -> u32 {
    (week - 1) * 7 + 1
}
