// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventeye::api::{self, AppState};
use eventeye::auth::AuthClient;
use eventeye::config::Config;
use eventeye::db::Database;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,eventeye=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::init()?;
    info!("Initialized configuration");

    // Initialize database and apply migrations
    let db = Database::new().await?;
    info!("Connected to database");

    // Hosted auth provider client
    let auth = AuthClient::new(&config.auth);

    // Serve the API until shutdown
    api::start_api_server(AppState::new(&db, auth)).await?;

    info!("EventEye shutdown complete");
    Ok(())
}
