//! Given step definitions

use cucumber::given;

use crate::world::{AuthWorld, Credentials};

async fn register(world: &mut AuthWorld, user: Credentials) -> anyhow::Result<()> {
    world
        .app()
        .await
        .users
        .create_user(&user.username, &user.password)
        .await?;
    world.user = Some(user);
    Ok(())
}

#[given("a registered user")]
async fn a_registered_user(world: &mut AuthWorld) -> anyhow::Result<()> {
    register(world, Credentials::default()).await
}

#[given(expr = "a registered user {string} with password {string}")]
async fn a_named_registered_user(world: &mut AuthWorld, username: String, password: String) -> anyhow::Result<()> {
    register(world, Credentials { username, password }).await
}
