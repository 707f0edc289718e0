//! Monthly settlement worksheet for trainer payroll.
//!
//! This module combines the pre-fetched financial facts for one
//! trainer-month into a complete settlement: session revenue, team
//! incentive, gross salary, withholding tax and net salary.
//!
//! # Worksheet structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total revenue (filtered sum of this month's payments) |
//! | 2    | Total revenue with carryover (step 1 + previous month's carryover) |
//! | 3    | Session revenue (regular × per-session rate + free × fixed event rate) |
//! | 4    | Team PT revenue (team leaders only; team total − own share, min 0) |
//! | 5    | Team PT incentive (step 4 × incentive rate, rounded) |
//! | 6    | Gross salary (base + step 3 + bonus + monthly commission + step 5) |
//! | 7    | Withholding tax (step 6 × withholding rate, rounded) |
//! | 8    | Net salary (step 6 − step 7) |
//!
//! Missing upstream facts (no commission policy matched, no bonus data, no
//! session counts, …) contribute zero to their terms; they never fail the
//! computation.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use settle_core::calculations::{SettlementConfig, SettlementInput, SettlementWorksheet};
//! use settle_core::models::{CommissionRate, SessionStats, StaffRole};
//!
//! let input = SettlementInput {
//!     trainer_id: 1,
//!     role: StaffRole::Trainer,
//!     payments: vec![],
//!     member_search: String::new(),
//!     carryover_amount: dec!(0),
//!     base_salary: Some(dec!(700000)),
//!     commission_rate: Some(CommissionRate {
//!         min_revenue: dec!(0),
//!         max_revenue: None,
//!         commission_per_session: dec!(21000),
//!         monthly_commission: dec!(50000),
//!         position_id: None,
//!         center_id: None,
//!     }),
//!     session_stats: Some(SessionStats {
//!         regular_sessions: 10,
//!         free_sessions: 2,
//!     }),
//!     bonus: None,
//!     team_revenue: None,
//! };
//!
//! let worksheet = SettlementWorksheet::new(SettlementConfig::default());
//! let result = worksheet.calculate(&input).unwrap();
//!
//! assert_eq!(result.session_revenue, dec!(230000));
//! assert_eq!(result.gross_salary, dec!(980000));
//! assert_eq!(result.withholding_tax, dec!(32340));
//! assert_eq!(result.net_salary, dec!(947660));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{clamp_non_negative, round_to_won};
use crate::calculations::revenue::total_revenue;
use crate::models::{
    BonusResult, CommissionRate, PaymentRecord, SessionStats, SettlementResult, StaffRole,
    TeamRevenueStats,
};

/// Errors that can occur during settlement calculations.
///
/// All variants are configuration errors; the worksheet itself is total
/// over its input facts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    /// The withholding tax rate must be between 0 and 1.
    #[error("withholding tax rate must be between 0 and 1, got {0}")]
    InvalidWithholdingRate(Decimal),

    /// The team incentive rate must be between 0 and 1.
    #[error("team incentive rate must be between 0 and 1, got {0}")]
    InvalidIncentiveRate(Decimal),

    /// The free-session rate must be non-negative.
    #[error("free session rate must be non-negative, got {0}")]
    InvalidFreeSessionRate(Decimal),
}

/// Business constants for the settlement worksheet.
///
/// The defaults are the fixed rates the business runs on; tests override
/// them freely. None of these values appear inline in calculation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Flat withholding applied to the full gross salary. Default 3.3%.
    pub withholding_tax_rate: Decimal,

    /// Incentive paid to team leaders on team PT revenue. Default 5%.
    pub team_incentive_rate: Decimal,

    /// Fixed pay per free/event session, independent of the commission
    /// policy. Default 10,000 won.
    pub free_session_rate: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            withholding_tax_rate: Decimal::new(33, 3),
            team_incentive_rate: Decimal::new(5, 2),
            free_session_rate: Decimal::from(10_000),
        }
    }
}

/// Input facts for one settlement computation.
///
/// Every `Option` field is an upstream fact that may legitimately be absent
/// for the period; absent facts contribute zero to their terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInput {
    /// Trainer the settlement is for. Used to exclude the trainer's own
    /// revenue from the team incentive base.
    pub trainer_id: i64,

    /// Role of the trainer; only team leaders earn the team incentive.
    pub role: StaffRole,

    /// This month's payments for the trainer.
    pub payments: Vec<PaymentRecord>,

    /// Case-insensitive member-name filter over `payments`. Empty matches
    /// all payments.
    pub member_search: String,

    /// Carryover from the previous month's settlement.
    pub carryover_amount: Decimal,

    /// Base salary fact, if configured for the trainer.
    pub base_salary: Option<Decimal>,

    /// Commission policy matched for the period's revenue, if any.
    pub commission_rate: Option<CommissionRate>,

    /// PT session counts for the period, if any sessions were recorded.
    pub session_stats: Option<SessionStats>,

    /// Evaluated bonus result for the period, if any.
    pub bonus: Option<BonusResult>,

    /// Team revenue statistics, if the trainer belongs to a team.
    pub team_revenue: Option<TeamRevenueStats>,
}

/// Calculator for the monthly settlement worksheet.
///
/// Pure and side-effect free: no I/O, no caching, no shared state. One
/// instance can be reused across trainers and months.
#[derive(Debug, Clone)]
pub struct SettlementWorksheet {
    config: SettlementConfig,
}

impl SettlementWorksheet {
    /// Creates a worksheet with the given business constants.
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    /// Calculates the complete settlement for one trainer-month.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError`] only when the configuration rates are out
    /// of range; missing input facts are not errors.
    pub fn calculate(&self, input: &SettlementInput) -> Result<SettlementResult, SettlementError> {
        self.validate_config()?;

        // Step 1: filtered revenue for the month
        let total_revenue = total_revenue(&input.payments, &input.member_search);

        // Step 2: add the previous month's carryover
        let total_revenue_with_carryover = total_revenue + input.carryover_amount;

        // Step 3: session revenue
        let session_revenue = self.session_revenue(
            input.session_stats.as_ref(),
            input.commission_rate.as_ref(),
        );

        // Step 4: team PT revenue (team leaders only, never negative)
        let team_pt_revenue =
            self.team_pt_revenue(input.role, input.trainer_id, input.team_revenue.as_ref());

        // Step 5: team PT incentive
        let team_pt_incentive = self.team_pt_incentive(team_pt_revenue);

        // Step 6: gross salary
        let base_salary = input.base_salary.unwrap_or_default();
        let total_bonus = input
            .bonus
            .as_ref()
            .map(|b| b.total_bonus)
            .unwrap_or_default();
        let monthly_commission = input
            .commission_rate
            .as_ref()
            .map(|r| r.monthly_commission)
            .unwrap_or_default();
        let gross_salary =
            base_salary + session_revenue + total_bonus + monthly_commission + team_pt_incentive;

        // Steps 7 and 8: withholding and net pay
        let withholding_tax = self.withholding_tax(gross_salary);
        let net_salary = gross_salary - withholding_tax;

        Ok(SettlementResult {
            total_revenue,
            carryover_amount: input.carryover_amount,
            total_revenue_with_carryover,
            session_revenue,
            team_pt_revenue,
            team_pt_incentive,
            gross_salary,
            withholding_tax,
            net_salary,
        })
    }

    /// Calculates a settlement for an optional trainer selection.
    ///
    /// Returns `Ok(None)` when no trainer is selected; the worksheet never
    /// computes against a placeholder trainer id.
    pub fn calculate_selected(
        &self,
        input: Option<&SettlementInput>,
    ) -> Result<Option<SettlementResult>, SettlementError> {
        match input {
            Some(input) => self.calculate(input).map(Some),
            None => Ok(None),
        }
    }

    fn validate_config(&self) -> Result<(), SettlementError> {
        let cfg = &self.config;
        if cfg.withholding_tax_rate < Decimal::ZERO || cfg.withholding_tax_rate > Decimal::ONE {
            return Err(SettlementError::InvalidWithholdingRate(
                cfg.withholding_tax_rate,
            ));
        }
        if cfg.team_incentive_rate < Decimal::ZERO || cfg.team_incentive_rate > Decimal::ONE {
            return Err(SettlementError::InvalidIncentiveRate(cfg.team_incentive_rate));
        }
        if cfg.free_session_rate < Decimal::ZERO {
            return Err(SettlementError::InvalidFreeSessionRate(cfg.free_session_rate));
        }
        Ok(())
    }

    /// Step 3: regular sessions at the commission rate plus free sessions
    /// at the fixed event rate.
    ///
    /// Free sessions always pay the fixed rate, even when no commission
    /// policy matched.
    fn session_revenue(
        &self,
        stats: Option<&SessionStats>,
        rate: Option<&CommissionRate>,
    ) -> Decimal {
        let Some(stats) = stats else {
            return Decimal::ZERO;
        };

        let per_session = match rate {
            Some(rate) => rate.commission_per_session,
            None => {
                if stats.regular_sessions > 0 {
                    warn!(
                        regular_sessions = stats.regular_sessions,
                        "no commission rate matched; regular sessions settle at zero"
                    );
                }
                Decimal::ZERO
            }
        };

        Decimal::from(stats.regular_sessions) * per_session
            + Decimal::from(stats.free_sessions) * self.config.free_session_rate
    }

    /// Step 4: the team's revenue minus the leader's own share, clamped at
    /// zero. Non-leaders always get zero.
    fn team_pt_revenue(
        &self,
        role: StaffRole,
        trainer_id: i64,
        team: Option<&TeamRevenueStats>,
    ) -> Decimal {
        if !role.is_team_leader() {
            return Decimal::ZERO;
        }
        let Some(team) = team else {
            return Decimal::ZERO;
        };
        clamp_non_negative(team.total_revenue - team.member_revenue(trainer_id))
    }

    /// Step 5: incentive on team PT revenue, rounded after multiplication.
    fn team_pt_incentive(&self, team_pt_revenue: Decimal) -> Decimal {
        round_to_won(team_pt_revenue * self.config.team_incentive_rate)
    }

    /// Step 7: flat withholding on the full gross salary, rounded after
    /// multiplication.
    fn withholding_tax(&self, gross_salary: Decimal) -> Decimal {
        round_to_won(gross_salary * self.config.withholding_tax_rate)
    }
}
