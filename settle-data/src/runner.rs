use settle_core::calculations::{
    BonusEvaluator, SettlementConfig, SettlementError, SettlementInput, SettlementWorksheet,
    find_commission_rate, total_revenue,
};
use settle_core::{
    MonthlySettlement, NewMonthlySettlement, RepositoryError, SettlementRepository,
    SettlementResult, Staff, TrainerMonthKey,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Settlement error: {0}")]
    Settlement(#[from] SettlementError),
}

/// Assembles repository facts for one trainer-month and runs the settlement
/// worksheet over them.
///
/// The runner owns all the async fetching; the worksheet itself stays pure.
/// Missing facts (no base salary, no sessions, no matching commission rate)
/// become absent inputs that the worksheet treats as zero terms.
pub struct SettlementRunner<'a> {
    repo: &'a dyn SettlementRepository,
    config: SettlementConfig,
}

impl<'a> SettlementRunner<'a> {
    pub fn new(repo: &'a dyn SettlementRepository) -> Self {
        Self {
            repo,
            config: SettlementConfig::default(),
        }
    }

    pub fn with_config(repo: &'a dyn SettlementRepository, config: SettlementConfig) -> Self {
        Self { repo, config }
    }

    /// Fetch every fact the worksheet consumes for `key`.
    ///
    /// `member_search` filters `total_revenue` by member name; pass an empty
    /// string to include every payment. Bonus rules are always evaluated
    /// against the unfiltered payments.
    pub async fn assemble_input(
        &self,
        key: &TrainerMonthKey,
        member_search: &str,
    ) -> Result<(Staff, SettlementInput), RunnerError> {
        let staff = self.repo.get_staff(key.trainer_id()).await?;
        let payments = self.repo.get_payments(key).await?;
        let base_salary = self.repo.get_base_salary(key.trainer_id()).await?;
        let carryover_amount = self.repo.get_carryover(key).await?;

        let session_stats = {
            let stats = self.repo.get_session_stats(key).await?;
            (stats != settle_core::SessionStats::default()).then_some(stats)
        };

        let bonus_rules = self.repo.get_bonus_rules().await?;
        let bonus = (!bonus_rules.is_empty()).then(|| {
            BonusEvaluator::new(&bonus_rules).evaluate(&payments, key.year(), key.month())
        });

        let revenue_with_carryover = total_revenue(&payments, member_search) + carryover_amount;
        let rates = self.repo.get_commission_rates().await?;
        let commission_rate = find_commission_rate(
            &rates,
            revenue_with_carryover,
            staff.role.position_id(),
            Some(staff.center_id),
        )
        .cloned();
        debug!(
            trainer_id = key.trainer_id(),
            year = key.year(),
            month = key.month(),
            rate_matched = commission_rate.is_some(),
            "assembled settlement facts"
        );

        let team_revenue = match staff.team_id {
            Some(team_id) if staff.role.is_team_leader() => Some(
                self.repo
                    .get_team_revenue_stats(team_id, key.year(), key.month())
                    .await?,
            ),
            _ => None,
        };

        let input = SettlementInput {
            trainer_id: key.trainer_id(),
            role: staff.role,
            payments,
            member_search: member_search.to_string(),
            carryover_amount,
            base_salary,
            commission_rate,
            session_stats,
            bonus,
            team_revenue,
        };

        Ok((staff, input))
    }

    /// Run the full settlement for `key` without persisting anything.
    pub async fn settle(
        &self,
        key: &TrainerMonthKey,
        member_search: &str,
    ) -> Result<SettlementResult, RunnerError> {
        let (_, input) = self.assemble_input(key, member_search).await?;
        let worksheet = SettlementWorksheet::new(self.config.clone());
        Ok(worksheet.calculate(&input)?)
    }

    /// Run the full settlement for `key` and persist it as a
    /// [`MonthlySettlement`] snapshot.
    pub async fn settle_and_save(
        &self,
        key: &TrainerMonthKey,
        member_search: &str,
    ) -> Result<(SettlementResult, MonthlySettlement), RunnerError> {
        let (staff, input) = self.assemble_input(key, member_search).await?;
        let worksheet = SettlementWorksheet::new(self.config.clone());
        let result = worksheet.calculate(&input)?;

        let saved = self
            .repo
            .create_settlement(NewMonthlySettlement {
                trainer_id: key.trainer_id(),
                center_id: staff.center_id,
                settlement_year: key.year(),
                settlement_month: key.month(),
                actual_revenue: result.total_revenue,
                carryover_from_prev: result.carryover_amount,
                total_revenue: result.total_revenue_with_carryover,
                session_revenue: result.session_revenue,
                team_pt_incentive: result.team_pt_incentive,
                base_salary: input.base_salary.unwrap_or_default(),
                gross_salary: result.gross_salary,
                withholding_tax: result.withholding_tax,
                net_salary: result.net_salary,
            })
            .await?;

        Ok((result, saved))
    }
}
