pub mod error;
pub mod postgres_service;
pub mod redis_manager;
pub mod session_store;
pub mod user_store;

pub use error::StoreError;
pub use postgres_service::PgUserStore;
pub use redis_manager::RedisSessionStore;
pub use session_store::{MemorySessionStore, Session, SessionStore};
pub use user_store::{MemoryUserStore, User, UserStore};
