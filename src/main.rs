// Start of file: src/main.rs

use std::sync::Arc;
use axum::{Router, serve};
use tokio::net::TcpListener;

use login_dashboard::config::{environment::EnvironmentVariables, state::AppState};
use login_dashboard::core::{
    logging::init_tracing,
    server::{create_app, setup_listener, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let environment: Arc<EnvironmentVariables> = Arc::new(EnvironmentVariables::load()?);
    let state: AppState = AppState::connect(environment.clone()).await?;

    let app: Router = create_app(state.clone());
    let listener: TcpListener = setup_listener(&environment).await?;

    tracing::info!("Server listening on: {}", listener.local_addr()?);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

// End of file: src/main.rs
