// Start of file: /src/config/environment.rs

// * Environment configuration loaded from the process environment and .env,
// * with a default for every key.

use std::{borrow::Cow, collections::HashMap, fmt, str::FromStr};
// * anyhow for convenient error handling
use anyhow::{bail, Context, Result};
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "postgres";
const DEFAULT_DB_NAME: &str = "postgres";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 3; // 3 seconds
const DEFAULT_DB_PORT: u16 = 5432; // Default Postgres port
const DEFAULT_SESSION_TTL: u64 = 24 * 60 * 60; // 24 hours

// ! bcrypt only accepts costs in this range
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Where users are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserStoreKind {
    Memory,
    Postgres,
}

impl FromStr for UserStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!("Unknown USER_STORE '{other}', expected 'memory' or 'postgres'"),
        }
    }
}

impl fmt::Display for UserStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Postgres => f.write_str("postgres"),
        }
    }
}

/// Where sessions are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStoreKind {
    Memory,
    Redis,
}

impl FromStr for SessionStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => bail!("Unknown SESSION_STORE '{other}', expected 'memory' or 'redis'"),
        }
    }
}

impl fmt::Display for SessionStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Redis => f.write_str("redis"),
        }
    }
}

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    pub user_store: UserStoreKind,
    pub db_host: Cow<'static, str>,
    pub db_port: u16,
    pub db_user: Cow<'static, str>,
    pub db_password: Cow<'static, str>,
    pub db_name: Cow<'static, str>,
    pub session_store: SessionStoreKind,
    pub redis_url: Cow<'static, str>,
    pub session_ttl_seconds: u64,
    pub bcrypt_cost: u32,
}

impl Default for EnvironmentVariables {
    fn default() -> Self {
        Self {
            environment: Cow::Borrowed(DEFAULT_ENVIRONMENT),
            host: Cow::Borrowed(DEFAULT_HOST),
            port: DEFAULT_PORT,
            max_request_body_size: DEFAULT_MAX_BODY_SIZE,
            default_timeout_seconds: DEFAULT_TIMEOUT,
            user_store: UserStoreKind::Memory,
            db_host: Cow::Borrowed(DEFAULT_DB_HOST),
            db_port: DEFAULT_DB_PORT,
            db_user: Cow::Borrowed(DEFAULT_DB_USER),
            db_password: Cow::Borrowed(DEFAULT_DB_PASSWORD),
            db_name: Cow::Borrowed(DEFAULT_DB_NAME),
            session_store: SessionStoreKind::Memory,
            redis_url: Cow::Borrowed(DEFAULT_REDIS_URL),
            session_ttl_seconds: DEFAULT_SESSION_TTL,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EnvironmentVariables {
    // * Loads environment variables.
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        let config: EnvironmentVariables = Self::from_lookup(|key| vars.get(key).map(String::as_str))?;

        if cfg!(debug_assertions) {
            tracing::debug!("Loaded environment configuration: {:#?}", config.redacted());
        }

        Ok(config)
    }

    // * Builds the configuration from any key lookup, providing defaults if missing
    pub fn from_lookup<'a, F>(get_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let owned = |value: &str| -> Cow<'static, str> { Cow::Owned(value.to_string()) };

        let bcrypt_cost: u32 = parse_var(&get_var, "BCRYPT_COST")?.unwrap_or(bcrypt::DEFAULT_COST);
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            bail!("Invalid BCRYPT_COST {bcrypt_cost}, expected {MIN_BCRYPT_COST}..={MAX_BCRYPT_COST}");
        }

        let session_ttl_seconds: u64 = parse_var(&get_var, "SESSION_TTL_SECONDS")?
            .unwrap_or(DEFAULT_SESSION_TTL);
        if session_ttl_seconds == 0 {
            bail!("Invalid SESSION_TTL_SECONDS 0, sessions would expire as they are issued");
        }

        let default_timeout_seconds: u64 = parse_var(&get_var, "DEFAULT_TIMEOUT_SECONDS")?
            .unwrap_or(DEFAULT_TIMEOUT);
        if default_timeout_seconds == 0 {
            bail!("Invalid DEFAULT_TIMEOUT_SECONDS 0, every request would time out");
        }

        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(owned)
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: parse_var(&get_var, "PORT")?.unwrap_or(DEFAULT_PORT),

            max_request_body_size: parse_var(&get_var, "MAX_REQUEST_BODY_SIZE")?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds,

            user_store: parse_var(&get_var, "USER_STORE")?.unwrap_or(UserStoreKind::Memory),

            db_host: get_var("DB_HOST")
                .map(owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_HOST)),

            db_port: parse_var(&get_var, "DB_PORT")?.unwrap_or(DEFAULT_DB_PORT),

            db_user: get_var("DB_USER")
                .map(owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_USER)),

            db_password: get_var("DB_PASSWORD")
                .map(owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_PASSWORD)),

            db_name: get_var("DB_NAME")
                .map(owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_DB_NAME)),

            session_store: parse_var(&get_var, "SESSION_STORE")?.unwrap_or(SessionStoreKind::Memory),

            redis_url: get_var("REDIS_URL")
                .map(owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_REDIS_URL)),

            session_ttl_seconds,

            bcrypt_cost,
        }
        .with_backend_warnings())
    }

    // * Warns about missing credentials only for the backends actually in use
    fn with_backend_warnings(self) -> Self {
        if self.user_store == UserStoreKind::Postgres && self.db_password == DEFAULT_DB_PASSWORD {
            warn!("USER_STORE is postgres but DB_PASSWORD is the default '{DEFAULT_DB_PASSWORD}'");
        }
        if self.session_store == SessionStoreKind::Memory {
            warn!("SESSION_STORE is memory, sessions will not survive a restart");
        }
        self
    }

    // * Copy of the configuration that is safe to log
    pub fn redacted(&self) -> Self {
        Self {
            db_password: Cow::Borrowed("********"),
            ..self.clone()
        }
    }
}

// * Parses an optional variable, naming the key in the error
fn parse_var<'a, T, F>(get_var: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<&'a str>,
{
    get_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("Invalid {key} value '{raw}'"))
        })
        .transpose()
}


// End of file: /src/config/environment.rs
