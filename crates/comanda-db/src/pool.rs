//! # Pool and Handle
//!
//! `DbConfig` describes where the ledger lives; `Database` owns the pool and
//! hands out repositories that share it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig ──────────────► Database ──┬──► tabs()      open / close      │
//! │   path or :memory:          pool     ├──► ledger()    append / list     │
//! │   pool sizes, timeouts      fee      ├──► tables()    floor plan        │
//! │   default service fee                ├──► menu()                        │
//! │                                      ├──► staff()                       │
//! │                                      └──► customers()                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrent writers
//! File databases run in WAL mode with a busy timeout. Lifecycle
//! transactions write first, so a second writer blocks on the lock for up to
//! `busy_timeout` and then sees the first writer's committed state.
//!
//! ## In-memory databases
//! `:memory:` lives and dies with its connection: the pool is capped at one
//! connection that is never idled out or recycled.

use comanda_core::ServiceFeeRate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customer::CustomerRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::menu::MenuRepository;
use crate::repository::staff::StaffRepository;
use crate::repository::tab::TabRepository;
use crate::repository::table::TableRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Connection and ledger settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/comanda/comanda.db")
///     .busy_timeout(Duration::from_secs(10))
///     .service_fee(ServiceFeeRate::from_bps(1200));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Pool acquire timeout.
    pub connect_timeout: Duration,
    /// How long a writer waits for the write lock before failing.
    pub busy_timeout: Duration,
    /// `None` keeps idle connections open.
    pub idle_timeout: Option<Duration>,
    pub run_migrations: bool,
    /// Service fee captured by newly opened tabs.
    pub default_service_fee: ServiceFeeRate,
}

impl DbConfig {
    /// File database at `path`, created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
            default_service_fee: ServiceFeeRate::default(),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the write-lock wait.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Skip with `false` when migrations are managed elsewhere.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets the service fee for newly opened tabs.
    pub fn service_fee(mut self, rate: ServiceFeeRate) -> Self {
        self.default_service_fee = rate;
        self
    }

    /// Private in-memory ledger, migrated and empty. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            ..DbConfig::new(IN_MEMORY)
        }
    }

    /// Returns whether this config points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: the pool is reference counted.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
///
/// let tab = db.tabs().open_tab(staff_id, table_id).await?;
/// db.ledger().append_item(tab.id, menu_item_id, 2).await?;
/// let closed = db.tabs().close_tab(tab.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Fee captured by tabs opened through this handle.
    default_service_fee: ServiceFeeRate,
}

impl Database {
    /// Connects and, unless disabled, brings the schema up to date.
    ///
    /// Fails with `ConnectionFailed` when the file cannot be opened or
    /// created, and `MigrationFailed` when the schema cannot be applied.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let connect_options = config.connect_options()?;
        debug!(path = %config.database_path.display(), "Opening ledger database");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_in_memory() {
            // Recycling the only connection would drop the database with it.
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            service_fee = %config.default_service_fee,
            "Ledger database ready"
        );

        let db = Database {
            pool,
            default_service_fee: config.default_service_fee,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Already-applied ones are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the fee new tabs will capture.
    pub fn default_service_fee(&self) -> ServiceFeeRate {
        self.default_service_fee
    }

    /// Returns the tab lifecycle repository (open, close, totals).
    pub fn tabs(&self) -> TabRepository {
        TabRepository::new(self.pool.clone(), self.default_service_fee)
    }

    /// Returns the line item ledger.
    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }

    /// Returns the dining table repository.
    pub fn tables(&self) -> TableRepository {
        TableRepository::new(self.pool.clone())
    }

    /// Returns the menu repository.
    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    /// Returns the staff repository.
    pub fn staff(&self) -> StaffRepository {
        StaffRepository::new(self.pool.clone())
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.default_service_fee(), ServiceFeeRate::default());
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comanda.db");

        let db = Database::new(DbConfig::new(&path).max_connections(2))
            .await
            .unwrap();

        assert!(db.health_check().await);
        assert!(path.exists());
        db.close().await;
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .service_fee(ServiceFeeRate::from_bps(1250));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.default_service_fee.bps(), 1250);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
