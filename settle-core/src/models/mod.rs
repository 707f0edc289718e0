mod bonus;
mod commission_rate;
mod payment;
mod role;
mod session_stats;
mod settlement;
mod staff;
mod team;
mod trainer_month;

pub use bonus::{BonusDetail, BonusResult, BonusRule, BonusTarget};
pub use commission_rate::CommissionRate;
pub use payment::{PaymentRecord, PtType};
pub use role::StaffRole;
pub use session_stats::SessionStats;
pub use settlement::{MonthlySettlement, NewMonthlySettlement, SettlementResult};
pub use staff::Staff;
pub use team::{TeamMemberRevenue, TeamRevenueStats};
pub use trainer_month::{TrainerMonthKey, TrainerMonthKeyError};
