// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

mod client;

pub use client::{AuthClient, AuthError, AuthSession, AuthUser};

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::api::AppState;
use crate::error::AppError;

/// The signed-in identity behind a request, resolved from the bearer token on
/// every call. Injected explicitly into handlers instead of living in ambient
/// global state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: AuthUser,
    pub access_token: String,
}

/// Pull "Bearer <token>" out of the Authorization header.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("You must be signed in".to_string()))?
            .to_string();

        let user = match state.auth.get_user(&token).await {
            Ok(user) => user,
            Err(AuthError::Rejected(_)) => {
                return Err(AppError::Unauthorized(
                    "Your session has expired. Please sign in again.".to_string(),
                ))
            }
            Err(err) => return Err(AppError::backend("Failed to verify session", err)),
        };

        Ok(CurrentUser {
            user,
            access_token: token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let request = Request::builder()
            .uri("/api/me")
            .header(AUTHORIZATION, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn non_bearer_schemes_are_ignored() {
        let parts = parts_with_auth("Basic abc123");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn empty_token_is_ignored() {
        let parts = parts_with_auth("Bearer   ");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn missing_header_rejects_before_any_provider_call() {
        use crate::config::AuthConfig;
        use diesel_async::pooled_connection::deadpool::Pool;
        use diesel_async::pooled_connection::AsyncDieselConnectionManager;
        use diesel_async::AsyncPgConnection;
        use std::sync::Arc;

        // Building the pool does not connect; the extractor must fail on the
        // absent header before touching the store or the provider.
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(
            "postgres://localhost:1/unused",
        );
        let state = AppState {
            db: Pool::builder(manager).max_size(1).build().unwrap(),
            auth: Arc::new(AuthClient::new(&AuthConfig {
                url: "http://localhost:1".to_string(),
                anon_key: String::new(),
                redirect_url: String::new(),
            })),
        };

        let mut parts = Request::builder()
            .uri("/api/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let err = tokio_test::block_on(CurrentUser::from_request_parts(&mut parts, &state))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
