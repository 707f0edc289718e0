use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the commission policy table.
///
/// A rate applies to total revenue (including carryover) in
/// `min_revenue..=max_revenue`, where `max_revenue = None` means unbounded.
/// `position_id` / `center_id` of `None` mark a default policy that applies
/// to any position or center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRate {
    pub min_revenue: Decimal,
    pub max_revenue: Option<Decimal>,
    pub commission_per_session: Decimal,
    pub monthly_commission: Decimal,
    pub position_id: Option<i64>,
    pub center_id: Option<i64>,
}
