use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    BonusRule, CommissionRate, MonthlySettlement, NewMonthlySettlement, PaymentRecord, PtType,
    SessionStats, Staff, TeamRevenueStats, TrainerMonthKey,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The fact store behind the settlement engine.
///
/// The getters mirror the upstream collaborator interfaces: each returns
/// already-aggregated facts for one trainer-month. Absent facts come back
/// as `None`, zero or empty — never as `NotFound` — because the worksheet
/// treats them as zero-valued terms. `NotFound` is reserved for entity
/// lookups (staff, persisted settlements).
#[async_trait]
pub trait SettlementRepository: Send + Sync {
    // Staff
    async fn get_staff(&self, trainer_id: i64) -> Result<Staff, RepositoryError>;
    async fn upsert_staff(&self, staff: &Staff) -> Result<(), RepositoryError>;

    // Monthly facts
    async fn get_payments(
        &self,
        key: &TrainerMonthKey,
    ) -> Result<Vec<PaymentRecord>, RepositoryError>;

    async fn get_base_salary(&self, trainer_id: i64)
        -> Result<Option<Decimal>, RepositoryError>;

    async fn set_base_salary(
        &self,
        trainer_id: i64,
        base_salary: Decimal,
    ) -> Result<(), RepositoryError>;

    /// Carryover inherited from the month before `key`: the previous
    /// month's persisted `carryover_from_prev`, zero when that settlement
    /// does not exist. (Observed source behavior, preserved as-is.)
    async fn get_carryover(&self, key: &TrainerMonthKey) -> Result<Decimal, RepositoryError>;

    async fn get_session_stats(
        &self,
        key: &TrainerMonthKey,
    ) -> Result<SessionStats, RepositoryError>;

    async fn get_team_revenue_stats(
        &self,
        team_id: i64,
        year: i32,
        month: u32,
    ) -> Result<TeamRevenueStats, RepositoryError>;

    // Policy tables
    async fn get_bonus_rules(&self) -> Result<Vec<BonusRule>, RepositoryError>;
    async fn insert_bonus_rule(&self, rule: &BonusRule) -> Result<(), RepositoryError>;
    async fn delete_bonus_rules(&self) -> Result<(), RepositoryError>;

    async fn get_commission_rates(&self) -> Result<Vec<CommissionRate>, RepositoryError>;
    async fn insert_commission_rate(&self, rate: &CommissionRate)
        -> Result<(), RepositoryError>;
    async fn delete_commission_rates(&self) -> Result<(), RepositoryError>;

    // Fact ingest (used by loaders and tests)
    async fn insert_payment(
        &self,
        trainer_id: i64,
        payment: &PaymentRecord,
    ) -> Result<(), RepositoryError>;

    async fn record_pt_session(
        &self,
        trainer_id: i64,
        session_date: chrono::NaiveDate,
        pt_type: PtType,
    ) -> Result<(), RepositoryError>;

    // Settlement snapshots
    async fn create_settlement(
        &self,
        settlement: NewMonthlySettlement,
    ) -> Result<MonthlySettlement, RepositoryError>;

    async fn get_settlement(
        &self,
        key: &TrainerMonthKey,
    ) -> Result<MonthlySettlement, RepositoryError>;

    async fn list_settlements(
        &self,
        trainer_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<MonthlySettlement>, RepositoryError>;

    async fn delete_settlement(&self, id: i64) -> Result<(), RepositoryError>;
}
