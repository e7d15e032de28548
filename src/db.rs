// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Result};
use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection = Object<AsyncPgConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database manager: connection pool plus startup migrations.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create the pool, verify connectivity and apply pending migrations.
    pub async fn new() -> Result<Self> {
        let config = Config::get();
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database.url);

        let pool = Pool::builder(manager)
            .max_size(config.database.max_connections)
            .build()?;

        let db = Self { pool };
        db.initialize().await?;

        Ok(db)
    }

    async fn initialize(&self) -> Result<()> {
        let _conn = self.get_connection().await?;
        info!("Successfully connected to the database");

        run_migrations(&Config::get().database.url).await?;

        Ok(())
    }

    pub async fn get_connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .await
            .map_err(|e| anyhow!("failed to get database connection: {e}"))
    }

    pub fn get_pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Acquire a pooled connection inside a request handler.
pub async fn acquire(pool: &DbPool) -> AppResult<DbConnection> {
    pool.get()
        .await
        .map_err(|e| AppError::backend("Database connection failed", anyhow!("{e}")))
}

/// Migrations run over a blocking wrapper around the async connection; the
/// migration harness itself is synchronous.
async fn run_migrations(url: &str) -> Result<()> {
    let url = url.to_string();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn: AsyncConnectionWrapper<AsyncPgConnection> =
            AsyncConnectionWrapper::establish(&url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("failed to run migrations: {e}"))?;
        Ok(())
    })
    .await??;

    info!("Database migrations applied successfully");
    Ok(())
}
