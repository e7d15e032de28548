// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

//! Thin client for the hosted auth provider. Session issuance, token refresh
//! and OAuth redirects all live on the provider's side; this wrapper only
//! forwards credentials and reads back the provider's verdict.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::AuthConfig;
use crate::models::profile::Role;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider answered with a rejection (bad credentials, duplicate
    /// account, expired token, ...). Carries the provider's raw message.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached at all.
    #[error("auth provider request failed")]
    Transport(#[from] reqwest::Error),
}

/// The identity the provider vouches for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An issued session, passed back to the browser verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Shapes the provider uses for error bodies; different endpoints use
/// different keys.
#[derive(Debug, Deserialize, Default)]
struct ProviderError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ProviderError {
    fn into_message(self) -> String {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    redirect_url: String,
}

impl AuthClient {
    pub fn new(config: &AuthConfig) -> Self {
        AuthClient {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            redirect_url: config.redirect_url.clone(),
        }
    }

    /// Register a new account. Role and full name travel as user metadata so
    /// the provider keeps them alongside the identity.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<AuthUser, AuthError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": {
                "full_name": full_name,
                "role": role.as_str(),
            },
        });
        let response = self
            .http
            .post(format!("{}/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;
        self.read_json(response).await
    }

    /// Exchange email/password for a session (password grant).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let body = json!({ "email": email, "password": password });
        let response = self
            .http
            .post(format!("{}/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;
        self.read_json(response).await
    }

    /// URL the browser is redirected to for Google sign-in. The provider
    /// handles the whole OAuth dance and calls back into the frontend.
    pub fn google_authorize_url(&self) -> String {
        format!(
            "{}/authorize?provider=google&redirect_to={}",
            self.base_url, self.redirect_url
        )
    }

    /// Resolve a bearer token to the user it belongs to.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        self.read_json(response).await
    }

    /// Revoke the session behind a bearer token.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.rejection(response).await)
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AuthError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.rejection(response).await)
        }
    }

    async fn rejection(&self, response: reqwest::Response) -> AuthError {
        let status = response.status();
        let body: ProviderError = response.json().await.unwrap_or_default();
        let message = body.into_message();
        debug!("auth provider rejected request: {status} {message}");
        AuthError::Rejected(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        AuthClient::new(&AuthConfig {
            url: "http://localhost:9999/".to_string(),
            anon_key: "anon".to_string(),
            redirect_url: "http://localhost:3000/auth/callback".to_string(),
        })
    }

    #[test]
    fn authorize_url_targets_google() {
        let url = client().google_authorize_url();
        assert_eq!(
            url,
            "http://localhost:9999/authorize?provider=google&redirect_to=http://localhost:3000/auth/callback"
        );
    }

    #[test]
    fn provider_error_prefers_msg_key() {
        let err: ProviderError =
            serde_json::from_str(r#"{"msg":"User already registered","code":422}"#).unwrap();
        assert_eq!(err.into_message(), "User already registered");
    }

    #[test]
    fn provider_error_falls_back_to_error_description() {
        let err: ProviderError =
            serde_json::from_str(r#"{"error_description":"Invalid login credentials"}"#).unwrap();
        assert_eq!(err.into_message(), "Invalid login credentials");
    }
}
