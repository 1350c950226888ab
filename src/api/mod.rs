// HTTP surface: public auth routes, the session-protected dashboard, health

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod middleware;
