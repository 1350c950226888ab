//! Then step definitions

use anyhow::{bail, ensure, Context};
use cucumber::then;
use reqwest::StatusCode;

use crate::assertions::ensure_status;
use crate::world::AuthWorld;

/// Login returned 200 with the dashboard redirect, and the dashboard greets the user
async fn check_dashboard(world: &mut AuthWorld) -> anyhow::Result<()> {
    let response = world.last_response()?.clone();
    ensure_status(StatusCode::OK, response.status)?;

    let redirect = &response.body["data"]["redirect"];
    ensure!(redirect == "/dashboard", "expected a redirect to /dashboard, got {redirect}");

    let token: String = response.session_token.context("login did not set a session cookie")?;
    let dashboard = world.app().await.dashboard(Some(&token)).await;
    ensure_status(StatusCode::OK, dashboard.status)?;

    let username: String = world.credentials().username;
    let greeting = &dashboard.body["data"]["welcome_message"];
    ensure!(
        *greeting == format!("Welcome, {username}!"),
        "dashboard did not greet {username}, got {greeting}"
    );
    Ok(())
}

#[then("the user should see the dashboard")]
async fn the_user_should_see_the_dashboard(world: &mut AuthWorld) -> anyhow::Result<()> {
    check_dashboard(world).await
}

#[then(expr = "seeing the dashboard should fail with {string}")]
async fn seeing_the_dashboard_should_fail(world: &mut AuthWorld, expected: String) -> anyhow::Result<()> {
    match check_dashboard(world).await {
        Ok(()) => bail!("the dashboard check passed, expected it to fail with {expected:?}"),
        Err(err) => {
            ensure!(err.to_string() == expected, "dashboard check failed with {err:?}, expected {expected:?}");
            Ok(())
        }
    }
}

#[then("the session token should be valid")]
async fn the_session_token_should_be_valid(world: &mut AuthWorld) -> anyhow::Result<()> {
    let token: String = world
        .last_response()?
        .session_token
        .clone()
        .context("login did not set a session cookie")?;

    let session = world
        .app()
        .await
        .sessions
        .validate_session(&token)
        .await?
        .context("session store does not recognise the issued token")?;

    let username: String = world.credentials().username;
    ensure!(session.username == username, "session belongs to {}, not {username}", session.username);
    Ok(())
}

#[then(expr = "the login should be rejected with status {int}")]
fn the_login_should_be_rejected(world: &mut AuthWorld, status: u16) -> anyhow::Result<()> {
    let response = world.last_response()?;
    ensure_status(StatusCode::from_u16(status)?, response.status)?;
    ensure!(response.session_token.is_none(), "a rejected login must not issue a session");
    Ok(())
}
