pub mod calculations;
pub mod db;
pub mod models;
pub mod shift;

pub use db::repository::{RepositoryError, SettlementRepository};
pub use models::*;
