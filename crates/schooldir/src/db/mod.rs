//! Database module for persistent storage.
//!
//! Uses SeaORM over a sqlx connection pool. One `DatabaseConnection` is
//! created at startup and shared by every request; cloning it is cheap and
//! all clones draw from the same bounded pool. Requests beyond the pool's
//! capacity wait for a free connection.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use secrecy::ExposeSecret;

pub mod entities;
pub mod error;
pub mod migrations;
pub mod school_repo;

pub use error::DatabaseError;
pub use migrations::Migrator;

use crate::config::DatabaseConfig;

/// Opens the connection pool and, if configured, applies pending migrations.
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DatabaseError> {
    let db = connect(config.url.expose_secret(), config.pool_size).await?;

    if config.run_migrations {
        run_migrations(&db).await?;
    }

    Ok(db)
}

/// Opens a pool of at most `pool_size` connections.
pub async fn connect(url: &str, pool_size: u32) -> Result<DatabaseConnection, DatabaseError> {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(pool_size)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    log::info!(
        "Database pool opened ({:?}, max {} connections)",
        db.get_database_backend(),
        pool_size
    );

    Ok(db)
}

/// Applies all pending migrations.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    Migrator::up(db, None)
        .await
        .map_err(DatabaseError::Migration)?;
    log::info!("Database migrations applied");
    Ok(())
}
