// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer-credential verification against the OpenID provider.

use crate::error::ApiError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde::Deserialize;
use sfrest_core::{sanitize_tenant, Config};
use std::path::Path;
use std::time::Duration;

/// Client credentials as laid out in the provider's secrets file.
#[derive(Debug, Clone, Deserialize)]
struct ClientSecrets {
    web: WebSecrets,
}

#[derive(Debug, Clone, Deserialize)]
struct WebSecrets {
    client_id: String,
    client_secret: String,
    token_introspection_uri: String,
}

/// Introspection reply; only the fields the tenancy key needs.
#[derive(Debug, Deserialize)]
struct Introspection {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
}

/// Verifies bearer credentials and yields the sanitized tenancy key. When
/// auth is disabled every request runs as `anonymous`.
pub struct AuthAdapter {
    enabled: bool,
    realm: String,
    secrets: Option<ClientSecrets>,
    http: reqwest::Client,
}

pub const ANONYMOUS: &str = "anonymous";

impl AuthAdapter {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let secrets = match (config.auth_enabled, &config.auth_client_secrets) {
            (true, Some(path)) => Some(load_secrets(path)?),
            (true, None) => {
                return Err(ApiError::Internal(
                    "auth enabled but no client secrets file configured".to_string(),
                ))
            }
            (false, _) => None,
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::Internal(format!("http client: {}", e)))?;
        Ok(Self { enabled: config.auth_enabled, realm: config.auth_realm.clone(), secrets, http })
    }

    /// Resolve the tenancy key for a request.
    pub async fn identify(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        if !self.enabled {
            return Ok(ANONYMOUS.to_string());
        }
        let token = bearer_token(headers)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer credential".to_string()))?;
        let identity = self.introspect(&token).await?;
        Ok(sanitize_tenant(&identity))
    }

    async fn introspect(&self, token: &str) -> Result<String, ApiError> {
        let Some(secrets) = &self.secrets else {
            return Err(ApiError::Internal("auth adapter missing client secrets".to_string()));
        };
        let reply = self
            .http
            .post(&secrets.web.token_introspection_uri)
            .form(&[
                ("client_id", secrets.web.client_id.as_str()),
                ("client_secret", secrets.web.client_secret.as_str()),
                ("token", token),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Internal(format!("auth provider unreachable: {}", e)))?;

        if !reply.status().is_success() {
            return Err(ApiError::Unauthorized(format!(
                "credential verification failed in realm {}",
                self.realm
            )));
        }
        let introspection: Introspection = reply
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("bad introspection reply: {}", e)))?;

        if !introspection.active {
            return Err(ApiError::Unauthorized("credential invalid or expired".to_string()));
        }
        introspection
            .email
            .or(introspection.preferred_username)
            .ok_or_else(|| ApiError::Unauthorized("credential carries no identity".to_string()))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn load_secrets(path: &Path) -> Result<ClientSecrets, ApiError> {
    let raw = std::fs::read(path)
        .map_err(|e| ApiError::Internal(format!("cannot read client secrets: {}", e)))?;
    serde_json::from_slice(&raw)
        .map_err(|e| ApiError::Internal(format!("malformed client secrets: {}", e)))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
