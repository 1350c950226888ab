// =============================================================================
// POSTGRES USER STORE
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{Executor, PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::config::environment::EnvironmentVariables;
use crate::database::user_store::validate_credentials;
use crate::database::{StoreError, User, UserStore};
use crate::utils::password::hash_password;

// =============================================================================
// SQL CONSTANTS
// =============================================================================

const CREATE_USERS_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(64) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

// =============================================================================
// STORE
// =============================================================================

/// User store backed by a single PostgreSQL connection pool.
#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl PgUserStore {
    /// Wraps an existing pool
    pub fn from_pool(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Opens the pool described by the DB_* variables
    pub async fn connect(config: &EnvironmentVariables) -> Result<Self> {
        info!(host = %config.db_host, database = %config.db_name, "Connecting user store to Postgres");

        let pool: PgPool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(30))
            .connect_with(connect_options(config))
            .await
            .context("Failed to create database connection pool")?;

        Ok(Self::from_pool(pool, config.bcrypt_cost))
    }

    /// Creates the users table if it does not exist yet
    pub async fn initialize(&self) -> Result<()> {
        self.pool
            .execute(CREATE_USERS_TABLE_SQL)
            .await
            .context("Failed to create users table")?;

        info!("User store schema initialized");
        Ok(())
    }

    /// Gracefully shuts down the pool.
    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        validate_credentials(username, password)?;

        let password_hash: String = hash_password(password, self.bcrypt_cost).await?;
        let id: Uuid = Uuid::new_v4();

        let result: Result<PgRow, sqlx::Error> = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                info!(user_id = %id, username, "User created");

                Ok(User {
                    id,
                    username: username.to_string(),
                    password_hash,
                    created_at,
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::DuplicateUser(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(&row)).transpose().map_err(StoreError::from)
    }

    fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

// =============================================================================
// INTERNAL HELPERS
// =============================================================================

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Connection options with UTC timezone; SSL is required outside development
fn connect_options(config: &EnvironmentVariables) -> PgConnectOptions {
    let ssl_mode: PgSslMode = if config.environment == "development" {
        PgSslMode::Prefer
    } else {
        PgSslMode::Require
    };

    PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name)
        .options([("timezone", "UTC"), ("application_name", "login-dashboard")])
        .ssl_mode(ssl_mode)
}
