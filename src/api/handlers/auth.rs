// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::api::{ApiResponse, AppState};
use crate::auth::{AuthError, CurrentUser};
use crate::error::{friendly_auth_message, AppError, AppResult};
use crate::models::profile::Role;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

fn provider_error(action: &str, err: AuthError) -> AppError {
    match err {
        AuthError::Rejected(msg) => AppError::Provider(friendly_auth_message(action, &msg)),
        other => AppError::backend(format!("Failed to {action}"), other),
    }
}

/// Register a new account with the hosted auth provider.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    if request.full_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter your full name".to_string(),
        ));
    }

    let user = state
        .auth
        .sign_up(
            &request.email,
            &request.password,
            request.full_name.trim(),
            request.role,
        )
        .await
        .map_err(|e| provider_error("create account", e))?;

    info!("registered new {} account for user {}", request.role, user.id);
    Ok(Json(ApiResponse::with_message(
        user,
        "Account created successfully! Please check your email to verify your account.",
    )))
}

/// Exchange email/password for a session.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .auth
        .sign_in(&request.email, &request.password)
        .await
        .map_err(|e| provider_error("sign in", e))?;

    Ok(Json(ApiResponse::with_message(
        session,
        "Signed in successfully!",
    )))
}

/// Hand the browser over to the provider's Google OAuth flow.
pub async fn google(State(state): State<AppState>) -> impl IntoResponse {
    Redirect::temporary(&state.auth.google_authorize_url())
}

/// Revoke the caller's session.
pub async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    state
        .auth
        .sign_out(&user.access_token)
        .await
        .map_err(|e| provider_error("sign out", e))?;

    Ok(Json(ApiResponse::with_message((), "Signed out")))
}
