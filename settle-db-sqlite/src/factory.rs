use async_trait::async_trait;

use settle_core::db::{DbConfig, RepositoryFactory};
use settle_core::{RepositoryError, SettlementRepository};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`settle_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use settle_core::db::RepositoryRegistry;
/// use settle_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

/// Turn a user-facing connection string into a sqlx SQLite URL.
///
/// Accepted values:
/// * A bare file path — e.g. `"settlements.db"`.  The file is created if it
///   does not exist.
/// * `":memory:"` — an ephemeral in-memory database (useful for tests).
/// * A full `sqlite:` URL, passed through unchanged.
fn sqlite_url(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        "sqlite::memory:".to_string()
    } else if connection_string.starts_with("sqlite:") {
        connection_string.to_string()
    } else {
        format!("sqlite:{connection_string}?mode=rwc")
    }
}

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SettlementRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&sqlite_url(&config.connection_string)).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}
