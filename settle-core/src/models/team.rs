use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Revenue attributed to one member of a team for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberRevenue {
    pub id: i64,
    pub total_revenue: Decimal,
}

/// Aggregated team revenue for one month, as reported by the team
/// statistics provider.
///
/// `total_revenue` covers the whole team; `members` carries the per-member
/// breakdown so a team leader's own share can be excluded from the team
/// incentive base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRevenueStats {
    pub total_revenue: Decimal,
    pub members: Vec<TeamMemberRevenue>,
}

impl TeamRevenueStats {
    /// Revenue of one member, zero when the member has no entry.
    pub fn member_revenue(&self, member_id: i64) -> Decimal {
        self.members
            .iter()
            .find(|m| m.id == member_id)
            .map(|m| m.total_revenue)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn member_revenue_finds_matching_entry() {
        let stats = TeamRevenueStats {
            total_revenue: dec!(900000),
            members: vec![
                TeamMemberRevenue {
                    id: 1,
                    total_revenue: dec!(400000),
                },
                TeamMemberRevenue {
                    id: 2,
                    total_revenue: dec!(500000),
                },
            ],
        };

        assert_eq!(stats.member_revenue(2), dec!(500000));
    }

    #[test]
    fn member_revenue_defaults_to_zero_for_unknown_member() {
        let stats = TeamRevenueStats::default();

        assert_eq!(stats.member_revenue(42), dec!(0));
    }
}
