// Application state shared by every handler

use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use crate::config::environment::{EnvironmentVariables, SessionStoreKind, UserStoreKind};
use crate::database::{
    MemorySessionStore, MemoryUserStore, PgUserStore, RedisSessionStore, SessionStore, UserStore,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Kept so shutdown can close the pool; `None` with the in-memory store.
    postgres: Option<PgUserStore>,
}

impl AppState {
    /// Builds state from already constructed stores
    pub fn new(
        environment: Arc<EnvironmentVariables>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            environment,
            users,
            sessions,
            postgres: None,
        }
    }

    /// State backed entirely by in-process stores
    pub fn in_memory(environment: Arc<EnvironmentVariables>) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new(environment.bcrypt_cost));
        let sessions: Arc<dyn SessionStore> =
            Arc::new(MemorySessionStore::new(environment.session_ttl_seconds));

        Self::new(environment, users, sessions)
    }

    /// Connects the backends selected by USER_STORE and SESSION_STORE
    pub async fn connect(environment: Arc<EnvironmentVariables>) -> Result<Self> {
        let mut postgres: Option<PgUserStore> = None;

        let users: Arc<dyn UserStore> = match environment.user_store {
            UserStoreKind::Memory => Arc::new(MemoryUserStore::new(environment.bcrypt_cost)),
            UserStoreKind::Postgres => {
                let store: PgUserStore = PgUserStore::connect(&environment).await?;
                store.initialize().await?;
                postgres = Some(store.clone());
                Arc::new(store)
            }
        };

        let sessions: Arc<dyn SessionStore> = match environment.session_store {
            SessionStoreKind::Memory => {
                Arc::new(MemorySessionStore::new(environment.session_ttl_seconds))
            }
            SessionStoreKind::Redis => {
                let store: RedisSessionStore =
                    RedisSessionStore::connect(&environment.redis_url, environment.session_ttl_seconds).await?;
                Arc::new(store)
            }
        };

        info!(
            user_store = %environment.user_store,
            session_store = %environment.session_store,
            "Services initialized successfully"
        );

        Ok(Self {
            environment,
            users,
            sessions,
            postgres,
        })
    }

    /// Gracefully shutdown all database connections
    pub async fn shutdown(&self) {
        if let Some(store) = &self.postgres {
            store.shutdown().await;
        }
    }
}
