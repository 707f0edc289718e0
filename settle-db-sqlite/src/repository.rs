use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use settle_core::{
    BonusRule, BonusTarget, CommissionRate, MonthlySettlement, NewMonthlySettlement,
    PaymentRecord, PtType, RepositoryError, SessionStats, SettlementRepository, Staff,
    StaffRole, TeamMemberRevenue, TeamRevenueStats, TrainerMonthKey,
};
use sqlx::{FromRow, sqlite::SqlitePool};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn get_settlement_by_id(&self, id: i64) -> Result<MonthlySettlement, RepositoryError> {
        let row: MonthlySettlementRow = sqlx::query_as(
            "SELECT id, trainer_id, center_id, settlement_year, settlement_month,
                    actual_revenue, carryover_from_prev, total_revenue, session_revenue,
                    team_pt_incentive, base_salary, gross_salary, withholding_tax, net_salary,
                    created_at, updated_at
             FROM monthly_settlements WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}

/// Inclusive ISO date bounds of one calendar month, for range queries over
/// TEXT date columns.
fn month_bounds(year: i32, month: u32) -> Result<(String, String), RepositoryError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RepositoryError::Database(format!("invalid month {year}-{month}")))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| RepositoryError::Database(format!("invalid month {year}-{month}")))?;
    let last = next_first.pred_opt().unwrap_or(first);

    Ok((first.to_string(), last.to_string()))
}

#[derive(FromRow)]
struct StaffRow {
    id: i64,
    name: String,
    role: String,
    center_id: i64,
    team_id: Option<i64>,
}

impl TryFrom<StaffRow> for Staff {
    type Error = RepositoryError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let role = StaffRole::parse(&row.role)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid staff role: {}", row.role)))?;
        Ok(Staff {
            id: row.id,
            name: row.name,
            role,
            center_id: row.center_id,
            team_id: row.team_id,
        })
    }
}

#[derive(FromRow)]
struct PaymentRow {
    member_name: String,
    pt_type: String,
    payment_amount: String,
    payment_date: String,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let pt_type = PtType::parse(&row.pt_type)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid pt type: {}", row.pt_type)))?;
        Ok(PaymentRecord {
            member_name: row.member_name,
            pt_type,
            payment_amount: parse_decimal(&row.payment_amount)?,
            payment_date: parse_date(&row.payment_date)?,
        })
    }
}

#[derive(FromRow)]
struct BonusRuleRow {
    name: String,
    target_type: String,
    threshold_amount: String,
    achievement_count: i64,
    bonus_amount: String,
    early_month_only: i64,
}

impl TryFrom<BonusRuleRow> for BonusRule {
    type Error = RepositoryError;

    fn try_from(row: BonusRuleRow) -> Result<Self, Self::Error> {
        let target_type = BonusTarget::parse(&row.target_type).ok_or_else(|| {
            RepositoryError::Database(format!("Invalid bonus target: {}", row.target_type))
        })?;
        Ok(BonusRule {
            name: row.name,
            target_type,
            threshold_amount: parse_decimal(&row.threshold_amount)?,
            achievement_count: parse_count(row.achievement_count, "achievement_count")?,
            bonus_amount: parse_decimal(&row.bonus_amount)?,
            early_month_only: row.early_month_only != 0,
        })
    }
}

#[derive(FromRow)]
struct CommissionRateRow {
    min_revenue: String,
    max_revenue: Option<String>,
    commission_per_session: String,
    monthly_commission: String,
    position_id: Option<i64>,
    center_id: Option<i64>,
}

impl TryFrom<CommissionRateRow> for CommissionRate {
    type Error = RepositoryError;

    fn try_from(row: CommissionRateRow) -> Result<Self, Self::Error> {
        Ok(CommissionRate {
            min_revenue: parse_decimal(&row.min_revenue)?,
            max_revenue: row
                .max_revenue
                .as_ref()
                .map(|s| parse_decimal(s))
                .transpose()?,
            commission_per_session: parse_decimal(&row.commission_per_session)?,
            monthly_commission: parse_decimal(&row.monthly_commission)?,
            position_id: row.position_id,
            center_id: row.center_id,
        })
    }
}

#[derive(FromRow)]
struct MonthlySettlementRow {
    id: i64,
    trainer_id: i64,
    center_id: i64,
    settlement_year: i32,
    settlement_month: i64,
    actual_revenue: String,
    carryover_from_prev: String,
    total_revenue: String,
    session_revenue: String,
    team_pt_incentive: String,
    base_salary: String,
    gross_salary: String,
    withholding_tax: String,
    net_salary: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MonthlySettlementRow> for MonthlySettlement {
    type Error = RepositoryError;

    fn try_from(row: MonthlySettlementRow) -> Result<Self, Self::Error> {
        Ok(MonthlySettlement {
            id: row.id,
            trainer_id: row.trainer_id,
            center_id: row.center_id,
            settlement_year: row.settlement_year,
            settlement_month: parse_count(row.settlement_month, "settlement_month")?,
            actual_revenue: parse_decimal(&row.actual_revenue)?,
            carryover_from_prev: parse_decimal(&row.carryover_from_prev)?,
            total_revenue: parse_decimal(&row.total_revenue)?,
            session_revenue: parse_decimal(&row.session_revenue)?,
            team_pt_incentive: parse_decimal(&row.team_pt_incentive)?,
            base_salary: parse_decimal(&row.base_salary)?,
            gross_salary: parse_decimal(&row.gross_salary)?,
            withholding_tax: parse_decimal(&row.withholding_tax)?,
            net_salary: parse_decimal(&row.net_salary)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

fn parse_count(value: i64, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::Database(format!("Invalid {column} value: {value}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Database(format!("Failed to parse date '{}': {}", s, e)))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    // SQLite stores timestamps in various formats, try common ones
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Database(format!("Failed to parse datetime '{}': {}", s, e)))
}

#[async_trait]
impl SettlementRepository for SqliteRepository {
    async fn get_staff(&self, trainer_id: i64) -> Result<Staff, RepositoryError> {
        let row: StaffRow = sqlx::query_as(
            "SELECT id, name, role, center_id, team_id FROM staff WHERE id = ?",
        )
        .bind(trainer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn upsert_staff(&self, staff: &Staff) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO staff (id, name, role, center_id, team_id)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name, role = excluded.role,
                center_id = excluded.center_id, team_id = excluded.team_id",
        )
        .bind(staff.id)
        .bind(&staff.name)
        .bind(staff.role.as_str())
        .bind(staff.center_id)
        .bind(staff.team_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_payments(
        &self,
        key: &TrainerMonthKey,
    ) -> Result<Vec<PaymentRecord>, RepositoryError> {
        let (first, last) = month_bounds(key.year(), key.month())?;

        let rows: Vec<PaymentRow> = sqlx::query_as(
            "SELECT member_name, pt_type, payment_amount, payment_date
             FROM payments
             WHERE trainer_id = ? AND payment_date BETWEEN ? AND ?
             ORDER BY payment_date, id",
        )
        .bind(key.trainer_id())
        .bind(&first)
        .bind(&last)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_base_salary(
        &self,
        trainer_id: i64,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT base_salary FROM base_salaries WHERE trainer_id = ?")
                .bind(trainer_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(|(s,)| parse_decimal(&s)).transpose()
    }

    async fn set_base_salary(
        &self,
        trainer_id: i64,
        base_salary: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO base_salaries (trainer_id, base_salary) VALUES (?, ?)
             ON CONFLICT (trainer_id) DO UPDATE SET base_salary = excluded.base_salary",
        )
        .bind(trainer_id)
        .bind(base_salary.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_carryover(&self, key: &TrainerMonthKey) -> Result<Decimal, RepositoryError> {
        let prev = key.previous();

        let row: Option<(String,)> = sqlx::query_as(
            "SELECT carryover_from_prev FROM monthly_settlements
             WHERE trainer_id = ? AND settlement_year = ? AND settlement_month = ?",
        )
        .bind(prev.trainer_id())
        .bind(prev.year())
        .bind(prev.month() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(|(s,)| parse_decimal(&s))
            .transpose()
            .map(|opt| opt.unwrap_or_default())
    }

    async fn get_session_stats(
        &self,
        key: &TrainerMonthKey,
    ) -> Result<SessionStats, RepositoryError> {
        let (first, last) = month_bounds(key.year(), key.month())?;

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT pt_type, COUNT(*)
             FROM pt_sessions
             WHERE trainer_id = ? AND session_date BETWEEN ? AND ?
             GROUP BY pt_type",
        )
        .bind(key.trainer_id())
        .bind(&first)
        .bind(&last)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut stats = SessionStats::default();
        for (pt_type, count) in rows {
            let count = parse_count(count, "session count")?;
            match PtType::parse(&pt_type) {
                Some(PtType::Regular) => stats.regular_sessions = count,
                Some(PtType::Free) => stats.free_sessions = count,
                None => {
                    return Err(RepositoryError::Database(format!(
                        "Invalid pt type: {pt_type}"
                    )));
                }
            }
        }

        Ok(stats)
    }

    async fn get_team_revenue_stats(
        &self,
        team_id: i64,
        year: i32,
        month: u32,
    ) -> Result<TeamRevenueStats, RepositoryError> {
        let (first, last) = month_bounds(year, month)?;

        // Amounts are summed in Rust: SQLite would coerce the TEXT decimal
        // columns to floats.
        let rows: Vec<(i64, Option<String>)> = sqlx::query_as(
            "SELECT s.id, p.payment_amount
             FROM staff s
             LEFT JOIN payments p
                ON p.trainer_id = s.id AND p.payment_date BETWEEN ? AND ?
             WHERE s.team_id = ?
             ORDER BY s.id",
        )
        .bind(&first)
        .bind(&last)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut members: Vec<TeamMemberRevenue> = Vec::new();
        let mut total_revenue = Decimal::ZERO;
        for (trainer_id, amount) in rows {
            let amount = amount
                .as_deref()
                .map(parse_decimal)
                .transpose()?
                .unwrap_or_default();
            total_revenue += amount;
            match members.iter_mut().find(|m| m.id == trainer_id) {
                Some(member) => member.total_revenue += amount,
                None => members.push(TeamMemberRevenue {
                    id: trainer_id,
                    total_revenue: amount,
                }),
            }
        }

        Ok(TeamRevenueStats {
            total_revenue,
            members,
        })
    }

    async fn get_bonus_rules(&self) -> Result<Vec<BonusRule>, RepositoryError> {
        let rows: Vec<BonusRuleRow> = sqlx::query_as(
            "SELECT name, target_type, threshold_amount, achievement_count, bonus_amount,
                    early_month_only
             FROM bonus_rules ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn insert_bonus_rule(&self, rule: &BonusRule) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO bonus_rules
                (name, target_type, threshold_amount, achievement_count, bonus_amount,
                 early_month_only)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&rule.name)
        .bind(rule.target_type.as_str())
        .bind(rule.threshold_amount.to_string())
        .bind(rule.achievement_count as i64)
        .bind(rule.bonus_amount.to_string())
        .bind(rule.early_month_only as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_bonus_rules(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM bonus_rules")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_commission_rates(&self) -> Result<Vec<CommissionRate>, RepositoryError> {
        let rows: Vec<CommissionRateRow> = sqlx::query_as(
            "SELECT min_revenue, max_revenue, commission_per_session, monthly_commission,
                    position_id, center_id
             FROM commission_rates ORDER BY min_revenue",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn insert_commission_rate(
        &self,
        rate: &CommissionRate,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO commission_rates
                (min_revenue, max_revenue, commission_per_session, monthly_commission,
                 position_id, center_id)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(rate.min_revenue.to_string())
        .bind(rate.max_revenue.map(|d| d.to_string()))
        .bind(rate.commission_per_session.to_string())
        .bind(rate.monthly_commission.to_string())
        .bind(rate.position_id)
        .bind(rate.center_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_commission_rates(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM commission_rates")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn insert_payment(
        &self,
        trainer_id: i64,
        payment: &PaymentRecord,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO payments (trainer_id, member_name, pt_type, payment_amount, payment_date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(trainer_id)
        .bind(&payment.member_name)
        .bind(payment.pt_type.as_str())
        .bind(payment.payment_amount.to_string())
        .bind(payment.payment_date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn record_pt_session(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
        pt_type: PtType,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO pt_sessions (trainer_id, session_date, pt_type) VALUES (?, ?, ?)",
        )
        .bind(trainer_id)
        .bind(session_date.to_string())
        .bind(pt_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn create_settlement(
        &self,
        settlement: NewMonthlySettlement,
    ) -> Result<MonthlySettlement, RepositoryError> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "INSERT INTO monthly_settlements (
                trainer_id, center_id, settlement_year, settlement_month,
                actual_revenue, carryover_from_prev, total_revenue, session_revenue,
                team_pt_incentive, base_salary, gross_salary, withholding_tax, net_salary,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(settlement.trainer_id)
        .bind(settlement.center_id)
        .bind(settlement.settlement_year)
        .bind(settlement.settlement_month as i64)
        .bind(settlement.actual_revenue.to_string())
        .bind(settlement.carryover_from_prev.to_string())
        .bind(settlement.total_revenue.to_string())
        .bind(settlement.session_revenue.to_string())
        .bind(settlement.team_pt_incentive.to_string())
        .bind(settlement.base_salary.to_string())
        .bind(settlement.gross_salary.to_string())
        .bind(settlement.withholding_tax.to_string())
        .bind(settlement.net_salary.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_settlement_by_id(id).await
    }

    async fn get_settlement(
        &self,
        key: &TrainerMonthKey,
    ) -> Result<MonthlySettlement, RepositoryError> {
        let row: MonthlySettlementRow = sqlx::query_as(
            "SELECT id, trainer_id, center_id, settlement_year, settlement_month,
                    actual_revenue, carryover_from_prev, total_revenue, session_revenue,
                    team_pt_incentive, base_salary, gross_salary, withholding_tax, net_salary,
                    created_at, updated_at
             FROM monthly_settlements
             WHERE trainer_id = ? AND settlement_year = ? AND settlement_month = ?",
        )
        .bind(key.trainer_id())
        .bind(key.year())
        .bind(key.month() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn list_settlements(
        &self,
        trainer_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<MonthlySettlement>, RepositoryError> {
        let rows: Vec<MonthlySettlementRow> = match year {
            Some(year) => {
                sqlx::query_as(
                    "SELECT id, trainer_id, center_id, settlement_year, settlement_month,
                            actual_revenue, carryover_from_prev, total_revenue, session_revenue,
                            team_pt_incentive, base_salary, gross_salary, withholding_tax,
                            net_salary, created_at, updated_at
                     FROM monthly_settlements
                     WHERE trainer_id = ? AND settlement_year = ?
                     ORDER BY settlement_year DESC, settlement_month DESC",
                )
                .bind(trainer_id)
                .bind(year)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, trainer_id, center_id, settlement_year, settlement_month,
                            actual_revenue, carryover_from_prev, total_revenue, session_revenue,
                            team_pt_incentive, base_salary, gross_salary, withholding_tax,
                            net_salary, created_at, updated_at
                     FROM monthly_settlements
                     WHERE trainer_id = ?
                     ORDER BY settlement_year DESC, settlement_month DESC",
                )
                .bind(trainer_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn delete_settlement(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM monthly_settlements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool);
        repo.run_migrations().await.expect("Failed to run migrations");
        repo
    }

    fn staff(id: i64, role: StaffRole, team_id: Option<i64>) -> Staff {
        Staff {
            id,
            name: format!("Trainer {id}"),
            role,
            center_id: 1,
            team_id,
        }
    }

    fn payment(member: &str, amount: Decimal, date: &str) -> PaymentRecord {
        PaymentRecord {
            member_name: member.to_string(),
            pt_type: PtType::Regular,
            payment_amount: amount,
            payment_date: date.parse().unwrap(),
        }
    }

    fn new_settlement(trainer_id: i64, year: i32, month: u32) -> NewMonthlySettlement {
        NewMonthlySettlement {
            trainer_id,
            center_id: 1,
            settlement_year: year,
            settlement_month: month,
            actual_revenue: dec!(500000),
            carryover_from_prev: dec!(120000),
            total_revenue: dec!(620000),
            session_revenue: dec!(230000),
            team_pt_incentive: dec!(0),
            base_salary: dec!(700000),
            gross_salary: dec!(930000),
            withholding_tax: dec!(30690),
            net_salary: dec!(899310),
        }
    }

    #[tokio::test]
    async fn upsert_and_get_staff() {
        let repo = setup_test_db().await;

        repo.upsert_staff(&staff(1, StaffRole::TeamLeader, Some(10)))
            .await
            .expect("Should upsert staff");

        let fetched = repo.get_staff(1).await.expect("Should fetch staff");
        assert_eq!(fetched.role, StaffRole::TeamLeader);
        assert_eq!(fetched.team_id, Some(10));
    }

    #[tokio::test]
    async fn upsert_staff_replaces_existing_row() {
        let repo = setup_test_db().await;

        repo.upsert_staff(&staff(1, StaffRole::Trainer, None)).await.unwrap();
        repo.upsert_staff(&staff(1, StaffRole::TeamLeader, Some(3))).await.unwrap();

        let fetched = repo.get_staff(1).await.unwrap();
        assert_eq!(fetched.role, StaffRole::TeamLeader);
    }

    #[tokio::test]
    async fn get_staff_not_found() {
        let repo = setup_test_db().await;

        let result = repo.get_staff(99).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn payments_are_scoped_to_the_month() {
        let repo = setup_test_db().await;
        repo.insert_payment(1, &payment("Kim", dec!(50000), "2025-06-01")).await.unwrap();
        repo.insert_payment(1, &payment("Lee", dec!(30000), "2025-06-30")).await.unwrap();
        repo.insert_payment(1, &payment("Park", dec!(70000), "2025-07-01")).await.unwrap();
        repo.insert_payment(2, &payment("Choi", dec!(90000), "2025-06-15")).await.unwrap();

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
        let payments = repo.get_payments(&key).await.expect("Should fetch payments");

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].member_name, "Kim");
        assert_eq!(payments[1].member_name, "Lee");
        assert_eq!(payments[1].payment_amount, dec!(30000));
    }

    #[tokio::test]
    async fn base_salary_round_trips() {
        let repo = setup_test_db().await;

        repo.set_base_salary(1, dec!(700000)).await.unwrap();

        assert_eq!(repo.get_base_salary(1).await.unwrap(), Some(dec!(700000)));
    }

    #[tokio::test]
    async fn base_salary_upsert_overwrites() {
        let repo = setup_test_db().await;

        repo.set_base_salary(1, dec!(700000)).await.unwrap();
        repo.set_base_salary(1, dec!(800000)).await.unwrap();

        assert_eq!(repo.get_base_salary(1).await.unwrap(), Some(dec!(800000)));
    }

    #[tokio::test]
    async fn missing_base_salary_is_none() {
        let repo = setup_test_db().await;

        assert_eq!(repo.get_base_salary(9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn carryover_reads_previous_month_settlement() {
        let repo = setup_test_db().await;
        repo.create_settlement(new_settlement(1, 2025, 5)).await.unwrap();

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
        let carryover = repo.get_carryover(&key).await.unwrap();

        assert_eq!(carryover, dec!(120000));
    }

    #[tokio::test]
    async fn carryover_rolls_back_across_year_boundary() {
        let repo = setup_test_db().await;
        repo.create_settlement(new_settlement(1, 2024, 12)).await.unwrap();

        let key = TrainerMonthKey::new(1, 2025, 1).unwrap();

        assert_eq!(repo.get_carryover(&key).await.unwrap(), dec!(120000));
    }

    #[tokio::test]
    async fn carryover_defaults_to_zero() {
        let repo = setup_test_db().await;

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();

        assert_eq!(repo.get_carryover(&key).await.unwrap(), dec!(0));
    }

    #[tokio::test]
    async fn session_stats_count_by_type_within_month() {
        let repo = setup_test_db().await;
        let june = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        for day in 1..=10 {
            repo.record_pt_session(1, june(day), PtType::Regular).await.unwrap();
        }
        repo.record_pt_session(1, june(11), PtType::Free).await.unwrap();
        repo.record_pt_session(1, june(12), PtType::Free).await.unwrap();
        // Different month and different trainer must not count.
        repo.record_pt_session(1, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), PtType::Regular)
            .await
            .unwrap();
        repo.record_pt_session(2, june(5), PtType::Regular).await.unwrap();

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
        let stats = repo.get_session_stats(&key).await.unwrap();

        assert_eq!(stats.regular_sessions, 10);
        assert_eq!(stats.free_sessions, 2);
    }

    #[tokio::test]
    async fn session_stats_are_zero_without_sessions() {
        let repo = setup_test_db().await;

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();

        assert_eq!(repo.get_session_stats(&key).await.unwrap(), SessionStats::default());
    }

    #[tokio::test]
    async fn team_revenue_stats_aggregate_member_payments() {
        let repo = setup_test_db().await;
        repo.upsert_staff(&staff(1, StaffRole::TeamLeader, Some(10))).await.unwrap();
        repo.upsert_staff(&staff(2, StaffRole::Trainer, Some(10))).await.unwrap();
        repo.upsert_staff(&staff(3, StaffRole::Trainer, None)).await.unwrap();
        repo.insert_payment(1, &payment("Kim", dec!(400000), "2025-06-02")).await.unwrap();
        repo.insert_payment(2, &payment("Lee", dec!(300000), "2025-06-03")).await.unwrap();
        repo.insert_payment(2, &payment("Park", dec!(200000), "2025-06-20")).await.unwrap();
        // Not on the team.
        repo.insert_payment(3, &payment("Choi", dec!(900000), "2025-06-04")).await.unwrap();

        let stats = repo.get_team_revenue_stats(10, 2025, 6).await.unwrap();

        assert_eq!(stats.total_revenue, dec!(900000));
        assert_eq!(stats.member_revenue(1), dec!(400000));
        assert_eq!(stats.member_revenue(2), dec!(500000));
    }

    #[tokio::test]
    async fn team_members_without_payments_appear_with_zero_revenue() {
        let repo = setup_test_db().await;
        repo.upsert_staff(&staff(1, StaffRole::TeamLeader, Some(10))).await.unwrap();
        repo.upsert_staff(&staff(2, StaffRole::Trainer, Some(10))).await.unwrap();

        let stats = repo.get_team_revenue_stats(10, 2025, 6).await.unwrap();

        assert_eq!(stats.total_revenue, dec!(0));
        assert_eq!(stats.members.len(), 2);
    }

    #[tokio::test]
    async fn bonus_rules_round_trip_in_insertion_order() {
        let repo = setup_test_db().await;
        let daily = BonusRule {
            name: "daily spike".to_string(),
            target_type: BonusTarget::Daily,
            threshold_amount: dec!(500000),
            achievement_count: 1,
            bonus_amount: dec!(50000),
            early_month_only: false,
        };
        let weekly = BonusRule {
            name: "early weekly".to_string(),
            target_type: BonusTarget::Weekly,
            threshold_amount: dec!(5000000),
            achievement_count: 2,
            bonus_amount: dec!(200000),
            early_month_only: true,
        };

        repo.insert_bonus_rule(&daily).await.unwrap();
        repo.insert_bonus_rule(&weekly).await.unwrap();

        let rules = repo.get_bonus_rules().await.unwrap();
        assert_eq!(rules, vec![daily, weekly]);
    }

    #[tokio::test]
    async fn delete_bonus_rules_empties_the_table() {
        let repo = setup_test_db().await;
        repo.insert_bonus_rule(&BonusRule {
            name: "daily spike".to_string(),
            target_type: BonusTarget::Daily,
            threshold_amount: dec!(500000),
            achievement_count: 1,
            bonus_amount: dec!(50000),
            early_month_only: false,
        })
        .await
        .unwrap();

        repo.delete_bonus_rules().await.unwrap();

        assert!(repo.get_bonus_rules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn commission_rates_round_trip_ordered_by_min_revenue() {
        let repo = setup_test_db().await;
        let high = CommissionRate {
            min_revenue: dec!(5000000),
            max_revenue: None,
            commission_per_session: dec!(24000),
            monthly_commission: dec!(200000),
            position_id: None,
            center_id: None,
        };
        let low = CommissionRate {
            min_revenue: dec!(0),
            max_revenue: Some(dec!(5000000)),
            commission_per_session: dec!(21000),
            monthly_commission: dec!(0),
            position_id: Some(7),
            center_id: Some(1),
        };

        repo.insert_commission_rate(&high).await.unwrap();
        repo.insert_commission_rate(&low).await.unwrap();

        let rates = repo.get_commission_rates().await.unwrap();
        assert_eq!(rates, vec![low, high]);
    }

    #[tokio::test]
    async fn delete_commission_rates_empties_the_table() {
        let repo = setup_test_db().await;
        repo.insert_commission_rate(&CommissionRate {
            min_revenue: dec!(0),
            max_revenue: None,
            commission_per_session: dec!(21000),
            monthly_commission: dec!(0),
            position_id: None,
            center_id: None,
        })
        .await
        .unwrap();

        repo.delete_commission_rates().await.unwrap();

        assert!(repo.get_commission_rates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_and_get_settlement() {
        let repo = setup_test_db().await;

        let created = repo
            .create_settlement(new_settlement(1, 2025, 6))
            .await
            .expect("Should create settlement");

        assert!(created.id > 0);
        assert_eq!(created.net_salary, dec!(899310));

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
        let fetched = repo.get_settlement(&key).await.expect("Should fetch settlement");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_settlement_for_a_month_is_rejected() {
        let repo = setup_test_db().await;
        repo.create_settlement(new_settlement(1, 2025, 6)).await.unwrap();

        let result = repo.create_settlement(new_settlement(1, 2025, 6)).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn list_settlements_filters_by_year() {
        let repo = setup_test_db().await;
        repo.create_settlement(new_settlement(1, 2024, 12)).await.unwrap();
        repo.create_settlement(new_settlement(1, 2025, 1)).await.unwrap();
        repo.create_settlement(new_settlement(1, 2025, 2)).await.unwrap();
        repo.create_settlement(new_settlement(2, 2025, 1)).await.unwrap();

        let all = repo.list_settlements(1, None).await.unwrap();
        assert_eq!(all.len(), 3);
        // Newest first.
        assert_eq!((all[0].settlement_year, all[0].settlement_month), (2025, 2));

        let for_2025 = repo.list_settlements(1, Some(2025)).await.unwrap();
        assert_eq!(for_2025.len(), 2);

        let for_2023 = repo.list_settlements(1, Some(2023)).await.unwrap();
        assert!(for_2023.is_empty());
    }

    #[tokio::test]
    async fn delete_settlement_removes_the_row() {
        let repo = setup_test_db().await;
        let created = repo.create_settlement(new_settlement(1, 2025, 6)).await.unwrap();

        repo.delete_settlement(created.id).await.expect("Should delete settlement");

        let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
        assert!(matches!(
            repo.get_settlement(&key).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_missing_settlement_is_not_found() {
        let repo = setup_test_db().await;

        assert!(matches!(
            repo.delete_settlement(123).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
