//! BDD test runner for the login flow
//!
//! Runs the Gherkin features under `tests/features` against an in-process
//! instance of the service.
//!
//! # Usage
//!
//! ```bash
//! cargo test --test bdd
//! ```

#[path = "../common/mod.rs"]
mod common;

mod assertions;
mod steps;
mod world;

use cucumber::World;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .init();

    world::AuthWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features"))
        .await;
}
