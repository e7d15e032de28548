// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Failure taxonomy for the API. Every variant is terminal for the triggering
/// action; nothing is retried automatically.
#[derive(Error, Debug)]
pub enum AppError {
    /// An expected row is missing (e.g. a profile without its extension row).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A required field failed local validation; no write was issued.
    #[error("{0}")]
    Validation(String),

    /// The caller is authenticated but not allowed to perform the action.
    #[error("{0}")]
    Forbidden(String),

    /// The bearer token is missing or was rejected by the auth provider.
    #[error("{0}")]
    Unauthorized(String),

    /// The auth provider refused a sign-up/sign-in request. Carries the
    /// already-mapped user-facing message.
    #[error("{0}")]
    Provider(String),

    /// Any failure from the store or the auth provider. The detail is logged;
    /// the client only sees a generic message.
    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wrap a store or provider failure with the user-facing "failed to X" text.
    pub fn backend(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Backend {
            message: message.into(),
            source: source.into(),
        }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => AppError::NotFound("record"),
            other => AppError::backend("Database request failed", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Provider(_) => StatusCode::BAD_REQUEST,
            AppError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AppError::Backend { ref source, .. } = self {
            error!("backend failure: {source:#}");
        }

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// Map a raw auth-provider error message onto the small set of user-facing
/// messages. Unrecognized messages fall back to a generic "Failed to {action}".
pub fn friendly_auth_message(action: &str, raw: &str) -> String {
    if raw.contains("already registered") {
        "An account with this email already exists. Please sign in instead.".to_string()
    } else if raw.contains("Invalid login credentials") {
        "Invalid email or password. Please try again.".to_string()
    } else if !raw.trim().is_empty() {
        raw.to_string()
    } else {
        format!("Failed to {action}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_signup_rejection_is_rewritten() {
        let msg = friendly_auth_message("create account", "User already registered");
        assert!(msg.contains("already exists"));
    }

    #[test]
    fn known_signin_rejection_is_rewritten() {
        let msg = friendly_auth_message("sign in", "Invalid login credentials");
        assert_eq!(msg, "Invalid email or password. Please try again.");
    }

    #[test]
    fn unknown_rejection_passes_through() {
        let msg = friendly_auth_message("sign in", "Email not confirmed");
        assert_eq!(msg, "Email not confirmed");
    }

    #[test]
    fn empty_rejection_falls_back_to_generic() {
        let msg = friendly_auth_message("sign in", "  ");
        assert_eq!(msg, "Failed to sign in");
    }

    #[test]
    fn missing_row_maps_to_not_found() {
        let err: AppError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
