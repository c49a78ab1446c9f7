// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbuddy local API server
//!
//! Serves the buddy-finder UI from a local store (a JSON data file, or
//! memory when no file is configured).

use fitbuddy::{config::Config, db::LocalStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Fitbuddy API");

    let store = match &config.data_file {
        Some(path) => LocalStore::open_file(path)?,
        None => {
            tracing::warn!("FITBUDDY_DATA_FILE not set, state will not survive a restart");
            LocalStore::in_memory()
        }
    };

    let state = Arc::new(AppState::new(config.clone(), store));
    state.sessions.init()?;
    tracing::info!(
        seeded = state.directory.seeds().len(),
        "Directory initialized"
    );

    // Build router
    let app = fitbuddy::routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitbuddy=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
