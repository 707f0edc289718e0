use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a bonus rule is judged against daily or weekly revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTarget {
    Daily,
    Weekly,
}

impl BonusTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

/// A configurable bonus rule, e.g. "weekly revenue over 5,000,000 twice".
///
/// `early_month_only` restricts a weekly rule to weeks starting on or before
/// the 11th of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRule {
    pub name: String,
    pub target_type: BonusTarget,
    pub threshold_amount: Decimal,
    pub achievement_count: u32,
    pub bonus_amount: Decimal,
    pub early_month_only: bool,
}

/// One achieved rule inside a [`BonusResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDetail {
    pub rule_name: String,
    pub threshold_amount: Decimal,
    pub target_type: BonusTarget,
    pub achievement_count: u32,
    pub bonus_amount: Decimal,
}

/// The bonus fact consumed by the settlement worksheet.
///
/// `bonus_details` is ordered the way the rules were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusResult {
    pub total_bonus: Decimal,
    pub bonus_details: Vec<BonusDetail>,
}
