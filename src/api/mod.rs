// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

pub mod handlers;

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthClient;
use crate::config::Config;
use crate::db::{Database, DbPool};

/// Shared state injected into every handler: the store pool and the auth
/// provider client. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub auth: Arc<AuthClient>,
}

impl AppState {
    pub fn new(db: &Database, auth: AuthClient) -> Self {
        AppState {
            db: db.get_pool().clone(),
            auth: Arc::new(auth),
        }
    }
}

/// Standard API response wrapper. `message` carries the human-readable
/// confirmation text the frontend surfaces as a toast.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Create a success response with data and a confirmation message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        // Auth routes
        .route("/api/auth/signup", post(handlers::auth::sign_up))
        .route("/api/auth/signin", post(handlers::auth::sign_in))
        .route("/api/auth/google", get(handlers::auth::google))
        .route("/api/auth/signout", post(handlers::auth::sign_out))
        // Profile routes
        .route("/api/me", get(handlers::profiles::me))
        .route(
            "/api/profiles",
            post(handlers::profiles::create_profile).put(handlers::profiles::update_profile),
        )
        .route("/api/sponsors", get(handlers::profiles::list_sponsors))
        // Event routes
        .route(
            "/api/events",
            get(handlers::events::list_catalog).post(handlers::events::create_event),
        )
        .route("/api/events/mine", get(handlers::events::my_events))
        .route(
            "/api/events/recommended",
            get(handlers::events::recommended_events),
        )
        .route("/api/events/:id", put(handlers::events::update_event))
        .route("/api/events/:id/publish", post(handlers::events::publish_event))
        .route("/api/events/:id/view", post(handlers::events::record_view))
        .route(
            "/api/events/:id/interest",
            post(handlers::interests::toggle_interest),
        )
        // Interest routes
        .route("/api/interests", get(handlers::interests::list_interests))
        // Message routes
        .route(
            "/api/messages",
            get(handlers::messages::list_messages).post(handlers::messages::send_message),
        )
        .route("/api/messages/:id/read", post(handlers::messages::mark_read))
        .with_state(state)
}

/// Start the API server
pub async fn start_api_server(state: AppState) -> Result<()> {
    let config = Config::get();

    // Set up CORS
    let cors = if config.api.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("{}:{}", config.api.host, config.api.port).parse::<SocketAddr>()?;

    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, stopping API server");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_no_error() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.error.is_none());
    }

    #[test]
    fn message_envelope_carries_toast_text() {
        let response = ApiResponse::with_message((), "Added to interests");
        assert_eq!(response.message.as_deref(), Some("Added to interests"));
    }
}
