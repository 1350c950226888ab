use std::fmt;

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::{debug, info};

use crate::database::{Session, SessionStore, StoreError, User};

const SESSION_KEY_PREFIX: &str = "session:";

/// Session store shared between instances through Redis.
/// Each session is a JSON value under `session:<token>` expiring with the session.
/// All calls share one multiplexed connection opened by `connect`.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_seconds: u64,
}

impl fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> Result<Self> {
        let client: Client = Client::open(redis_url)
            .context("Failed to create Redis client")?;

        let mut conn: MultiplexedConnection = client.get_multiplexed_async_connection().await
            .context("Failed to connect to Redis")?;

        // Simple ping to verify connection
        let _: () = redis::cmd("PING").query_async(&mut conn).await
            .context("Failed to ping Redis")?;

        info!("Redis connection established successfully");
        Ok(Self { conn, ttl_seconds })
    }

    // Clones share the underlying connection
    fn connection(&self) -> MultiplexedConnection {
        self.conn.clone()
    }
}

pub fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create_session(&self, user: &User) -> Result<Session, StoreError> {
        let session: Session = Session::issue(user, self.ttl_seconds);
        let payload: String = serde_json::to_string(&session)?;

        let mut conn: MultiplexedConnection = self.connection();
        let _: () = conn.set_ex(session_key(&session.token), payload, session.lifetime_seconds()).await?;

        debug!(user_id = %user.id, "Session cached in Redis");
        Ok(session)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let mut conn: MultiplexedConnection = self.connection();
        let payload: Option<String> = conn.get(session_key(token)).await?;

        // Redis expires the key itself; the timestamp check covers clock skew
        match payload {
            Some(raw) => {
                let session: Session = serde_json::from_str(&raw)?;
                Ok((!session.is_expired_at(chrono::Utc::now())).then_some(session))
            }
            None => Ok(None),
        }
    }

    async fn revoke_session(&self, token: &str) -> Result<bool, StoreError> {
        let mut conn: MultiplexedConnection = self.connection();
        let removed: i64 = conn.del(session_key(token)).await?;
        Ok(removed > 0)
    }
}
