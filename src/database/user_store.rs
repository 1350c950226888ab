// =============================================================================
// USER STORE - registration and credential checks
// =============================================================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::StoreError;
use crate::utils::password::{hash_password, spend_verify_cost, verify_password};

/// Longest username accepted by every backend (matches the Postgres column)
pub const MAX_USERNAME_LENGTH: usize = 64;

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Registers a new user, hashing the password before it is stored
    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Work factor for newly hashed passwords
    fn bcrypt_cost(&self) -> u32;

    /// Returns the user only when the username exists and the password matches.
    /// Unknown usernames cost one bcrypt round too, so timing does not reveal them.
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        let Some(user) = self.find_by_username(username).await? else {
            spend_verify_cost(password, self.bcrypt_cost()).await?;
            debug!(username, "Login attempt for unknown user");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash).await? {
            Ok(Some(user))
        } else {
            debug!(username, "Password mismatch");
            Ok(None)
        }
    }
}

/// Input checks shared by all stores
pub fn validate_credentials(username: &str, password: &str) -> Result<(), StoreError> {
    if username.trim().is_empty() {
        return Err(StoreError::InvalidInput("username cannot be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(StoreError::InvalidInput("username cannot exceed 64 characters"));
    }
    if password.is_empty() {
        return Err(StoreError::InvalidInput("password cannot be empty"));
    }
    Ok(())
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Debug, Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    bcrypt_cost: u32,
}

impl MemoryUserStore {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            bcrypt_cost,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        validate_credentials(username, password)?;

        // Hash outside the lock
        let password_hash: String = hash_password(password, self.bcrypt_cost).await?;

        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StoreError::DuplicateUser(username.to_string()));
        }

        let user: User = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.username.clone(), user.clone());

        info!(user_id = %user.id, username, "User created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}
