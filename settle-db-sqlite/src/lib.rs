//! SQLite backend for the settlement repository.
//!
//! Money columns are stored as TEXT and parsed into [`rust_decimal::Decimal`]
//! on the way out, so no value ever passes through floating point. Dates are
//! ISO-8601 TEXT.

mod factory;
mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
