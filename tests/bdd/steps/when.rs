//! When step definitions

use cucumber::when;

use crate::world::{AuthWorld, Credentials};

// Without a Given step this logs in as testuser, and the Then step reports the status
async fn log_in_as_the_user(world: &mut AuthWorld) {
    let Credentials { username, password } = world.credentials();
    world.log_in(&username, &password).await;
}

#[when("the user logs in")]
async fn the_user_logs_in(world: &mut AuthWorld) {
    log_in_as_the_user(world).await;
}

#[when("the user logs in with valid credentials")]
async fn the_user_logs_in_with_valid_credentials(world: &mut AuthWorld) {
    log_in_as_the_user(world).await;
}

#[when(expr = "the user logs in with password {string}")]
async fn the_user_logs_in_with_password(world: &mut AuthWorld, password: String) {
    let username: String = world.credentials().username;
    world.log_in(&username, &password).await;
}

#[when(expr = "{string} logs in with password {string}")]
async fn someone_logs_in(world: &mut AuthWorld, username: String, password: String) {
    world.log_in(&username, &password).await;
}
