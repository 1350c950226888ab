// =============================================================================
// SESSION STORE - login sessions keyed by opaque token
// =============================================================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::database::{StoreError, User};

/// Upper bound on any session lifetime (ten years)
pub const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// The lifetime a session actually gets for a configured TTL
pub fn capped_ttl_seconds(ttl_seconds: u64) -> u64 {
    ttl_seconds.min(MAX_TTL_SECONDS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session for `user` that lives for `ttl_seconds`
    pub fn issue(user: &User, ttl_seconds: u64) -> Self {
        let created_at: DateTime<Utc> = Utc::now();
        // The cap keeps the value well inside i64
        let ttl: Duration = Duration::seconds(capped_ttl_seconds(ttl_seconds) as i64);

        Self {
            token: Uuid::new_v4().to_string(),
            user_id: user.id,
            username: user.username.clone(),
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Seconds between issue and expiry, used for cookie and cache lifetimes
    pub fn lifetime_seconds(&self) -> u64 {
        u64::try_from((self.expires_at - self.created_at).num_seconds()).unwrap_or(0)
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    async fn create_session(&self, user: &User) -> Result<Session, StoreError>;

    /// `None` for unknown, revoked or expired tokens
    async fn validate_session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Returns whether a session was removed
    async fn revoke_session(&self, token: &str) -> Result<bool, StoreError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl_seconds: u64,
}

impl MemorySessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_seconds,
        }
    }

    /// Stores an externally built session as-is
    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.token.clone(), session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, user: &User) -> Result<Session, StoreError> {
        let session: Session = Session::issue(user, self.ttl_seconds);
        self.insert(session.clone()).await;

        debug!(user_id = %user.id, expires_at = %session.expires_at, "Session created");
        Ok(session)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session: Option<Session> = self.sessions.read().await.get(token).cloned();

        match session {
            Some(session) if session.is_expired_at(Utc::now()) => {
                self.sessions.write().await.remove(token);
                debug!(user_id = %session.user_id, "Evicted expired session");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn revoke_session(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }
}
