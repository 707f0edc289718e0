use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Output of one settlement computation.
///
/// Derived, never persisted as-is: the worksheet recomputes it whenever any
/// input fact changes. [`MonthlySettlement`] is the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Revenue from this month's (optionally filtered) payments.
    pub total_revenue: Decimal,

    /// Carryover brought in from the previous month.
    pub carryover_amount: Decimal,

    /// `total_revenue + carryover_amount`; the basis for commission lookup.
    pub total_revenue_with_carryover: Decimal,

    /// Per-session pay: regular sessions at the commission rate, free
    /// sessions at the fixed event rate.
    pub session_revenue: Decimal,

    /// Team revenue excluding the leader's own share; zero for non-leaders.
    pub team_pt_revenue: Decimal,

    /// Incentive paid on `team_pt_revenue`.
    pub team_pt_incentive: Decimal,

    /// Base salary + session revenue + bonus + monthly commission + team
    /// incentive.
    pub gross_salary: Decimal,

    /// Flat-rate withholding on the gross salary.
    pub withholding_tax: Decimal,

    /// `gross_salary - withholding_tax`.
    pub net_salary: Decimal,
}

/// A persisted monthly settlement snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySettlement {
    pub id: i64,
    pub trainer_id: i64,
    pub center_id: i64,
    pub settlement_year: i32,
    pub settlement_month: u32,

    pub actual_revenue: Decimal,
    pub carryover_from_prev: Decimal,
    pub total_revenue: Decimal,
    pub session_revenue: Decimal,
    pub team_pt_incentive: Decimal,
    pub base_salary: Decimal,
    pub gross_salary: Decimal,
    pub withholding_tax: Decimal,
    pub net_salary: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new settlement snapshots (no id or timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMonthlySettlement {
    pub trainer_id: i64,
    pub center_id: i64,
    pub settlement_year: i32,
    pub settlement_month: u32,

    pub actual_revenue: Decimal,
    pub carryover_from_prev: Decimal,
    pub total_revenue: Decimal,
    pub session_revenue: Decimal,
    pub team_pt_incentive: Decimal,
    pub base_salary: Decimal,
    pub gross_salary: Decimal,
    pub withholding_tax: Decimal,
    pub net_salary: Decimal,
}
