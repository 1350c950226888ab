//! World struct for the login scenarios
//!
//! Holds the running application, the credentials in play and the last
//! login response so later steps can inspect it.

use anyhow::Context;
use cucumber::World;

use crate::common::{ApiResponse, TestApp, TEST_PASSWORD, TEST_USERNAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: TEST_USERNAME.to_string(),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Default, World)]
pub struct AuthWorld {
    /// Started on first use so every scenario gets its own stores
    app: Option<TestApp>,
    /// Credentials of the registered user, if one was registered
    pub user: Option<Credentials>,
    /// Last login response
    pub response: Option<ApiResponse>,
}

impl AuthWorld {
    pub async fn app(&mut self) -> &TestApp {
        if self.app.is_none() {
            self.app = Some(TestApp::spawn().await);
        }
        self.app.as_ref().expect("app was started above")
    }

    /// The registered user, or the default test credentials when no Given step ran
    pub fn credentials(&self) -> Credentials {
        self.user.clone().unwrap_or_default()
    }

    pub fn last_response(&self) -> anyhow::Result<&ApiResponse> {
        self.response.as_ref().context("no login has been attempted in this scenario")
    }

    /// Logs in through the HTTP API and keeps the response
    pub async fn log_in(&mut self, username: &str, password: &str) {
        let response: ApiResponse = self.app().await.login(username, password).await;
        self.response = Some(response);
    }
}
