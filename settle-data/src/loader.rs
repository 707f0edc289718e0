use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use settle_core::{
    BonusRule, BonusTarget, CommissionRate, RepositoryError, SettlementRepository,
};
use thiserror::Error;

/// Errors that can occur when loading settlement policy data.
#[derive(Debug, Error)]
pub enum PolicyLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid bonus target type: {0}")]
    InvalidTargetType(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for PolicyLoaderError {
    fn from(err: csv::Error) -> Self {
        PolicyLoaderError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A single record from the commission rates CSV file.
///
/// Columns:
/// - `min_revenue`: lower revenue bound of the bracket (inclusive)
/// - `max_revenue`: upper bound (empty for open-ended)
/// - `commission_per_session`: per-session pay inside the bracket
/// - `monthly_commission`: flat monthly payout inside the bracket
/// - `position_id`: restrict the bracket to one position (empty for any)
/// - `center_id`: restrict the bracket to one center (empty for any)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommissionRateRecord {
    pub min_revenue: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_revenue: Option<Decimal>,
    pub commission_per_session: Decimal,
    pub monthly_commission: Decimal,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub position_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub center_id: Option<i64>,
}

impl From<CommissionRateRecord> for CommissionRate {
    fn from(record: CommissionRateRecord) -> Self {
        CommissionRate {
            min_revenue: record.min_revenue,
            max_revenue: record.max_revenue,
            commission_per_session: record.commission_per_session,
            monthly_commission: record.monthly_commission,
            position_id: record.position_id,
            center_id: record.center_id,
        }
    }
}

/// Loader for commission rate brackets from CSV files.
///
/// Loading is idempotent: existing rates are deleted and the file's rates
/// inserted in one pass, so re-running the same load produces the same table.
pub struct CommissionRateLoader;

impl CommissionRateLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CommissionRateRecord>, PolicyLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CommissionRateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub async fn load<R: SettlementRepository + ?Sized>(
        repo: &R,
        records: &[CommissionRateRecord],
    ) -> Result<usize, PolicyLoaderError> {
        repo.delete_commission_rates().await?;

        for record in records {
            let rate: CommissionRate = record.clone().into();
            repo.insert_commission_rate(&rate).await?;
        }

        Ok(records.len())
    }
}

/// A single record from the bonus rules CSV file.
///
/// Columns:
/// - `name`: human-readable rule name
/// - `target_type`: `daily` or `weekly`
/// - `threshold_amount`: revenue the day/week must reach
/// - `achievement_count`: required number of qualifying weeks (weekly rules)
/// - `bonus_amount`: payout when the rule is achieved
/// - `early_month_only`: `true` restricts weekly rules to weeks starting on
///   or before the 11th
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BonusRuleRecord {
    pub name: String,
    pub target_type: String,
    pub threshold_amount: Decimal,
    pub achievement_count: u32,
    pub bonus_amount: Decimal,
    pub early_month_only: bool,
}

impl TryFrom<BonusRuleRecord> for BonusRule {
    type Error = PolicyLoaderError;

    fn try_from(record: BonusRuleRecord) -> Result<Self, Self::Error> {
        let target_type = BonusTarget::parse(&record.target_type)
            .ok_or_else(|| PolicyLoaderError::InvalidTargetType(record.target_type.clone()))?;
        Ok(BonusRule {
            name: record.name,
            target_type,
            threshold_amount: record.threshold_amount,
            achievement_count: record.achievement_count,
            bonus_amount: record.bonus_amount,
            early_month_only: record.early_month_only,
        })
    }
}

/// Loader for bonus rules from CSV files.  Idempotent like
/// [`CommissionRateLoader`].
pub struct BonusRuleLoader;

impl BonusRuleLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BonusRuleRecord>, PolicyLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BonusRuleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub async fn load<R: SettlementRepository + ?Sized>(
        repo: &R,
        records: &[BonusRuleRecord],
    ) -> Result<usize, PolicyLoaderError> {
        // Validate every record before touching the table.
        let rules: Vec<BonusRule> = records
            .iter()
            .map(|r| BonusRule::try_from(r.clone()))
            .collect::<Result<_, _>>()?;

        repo.delete_bonus_rules().await?;

        for rule in &rules {
            repo.insert_bonus_rule(rule).await?;
        }

        Ok(rules.len())
    }
}
