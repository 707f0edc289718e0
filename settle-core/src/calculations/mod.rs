//! Settlement calculation modules.
//!
//! Everything here is pure: facts in, figures out. The async fetch layer
//! that obtains the facts lives behind [`crate::db::SettlementRepository`].

pub mod bonus;
pub mod commission;
pub mod common;
pub mod revenue;
pub mod settlement;

pub use bonus::BonusEvaluator;
pub use commission::find_commission_rate;
pub use revenue::total_revenue;
pub use settlement::{SettlementConfig, SettlementError, SettlementInput, SettlementWorksheet};
