//! # evently-db
//!
//! PostgreSQL storage layer for evently.
//!
//! This crate provides:
//! - Connection pool management
//! - `PgEventRepository`, the SQL implementation of `EventRepository`
//! - Parameterized filter and ORDER BY generation
//!
//! ## Example
//!
//! ```rust,ignore
//! use evently_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/evently").await?;
//!     db.migrate().await?;
//!     let categories = db.events.categories().await?;
//!     println!("{:?}", categories);
//!     Ok(())
//! }
//! ```
pub mod event_filter;
pub mod events;
pub mod pool;

// Re-export core types
pub use evently_core::*;

pub use event_filter::{order_by_clause, EventFilterQueryBuilder, QueryParam};
pub use events::PgEventRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Connection pool plus the repositories built on it.
#[derive(Clone)]
pub struct Database {
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub events: PgEventRepository,
}

impl Database {
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            events: PgEventRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run the embedded migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
