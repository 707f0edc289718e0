//! Data plumbing around the settlement core: CSV policy loaders and the
//! async runner that feeds repository facts into the worksheet.

pub mod loader;
pub mod runner;

pub use loader::{
    BonusRuleLoader, BonusRuleRecord, CommissionRateLoader, CommissionRateRecord,
    PolicyLoaderError,
};
pub use runner::{RunnerError, SettlementRunner};
