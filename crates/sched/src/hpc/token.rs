// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived signed tokens for the cluster REST endpoint.
//!
//! A symmetric key is loaded from disk once; tokens are minted with HS256
//! and re-minted inline on the request path whenever the remaining
//! lifetime drops under the configured headroom. Renewal is single-writer:
//! the mint happens under the record lock.

use crate::error::SchedulerError;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use serde::Serialize;
use sfrest_core::Clock;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Claims {
    exp: u64,
    iat: u64,
    /// Cluster-side username, per the scheduler's token convention.
    sun: String,
}

/// In-memory record of the currently valid token.
#[derive(Debug, Clone)]
struct TokenRecord {
    token: String,
    expires_at: u64,
}

pub struct TokenManager<C: Clock> {
    key: EncodingKey,
    username: String,
    duration_secs: u64,
    headroom_secs: u64,
    clock: C,
    current: Mutex<Option<TokenRecord>>,
}

impl<C: Clock> std::fmt::Debug for TokenManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("username", &self.username)
            .field("duration_secs", &self.duration_secs)
            .field("headroom_secs", &self.headroom_secs)
            .field("current", &self.current)
            .finish()
    }
}

impl<C: Clock> TokenManager<C> {
    /// Load the symmetric key from disk and prepare the manager. No token
    /// is minted until the first request needs one.
    pub fn load(
        key_path: &Path,
        username: impl Into<String>,
        duration_secs: u64,
        headroom_secs: u64,
        clock: C,
    ) -> Result<Self, SchedulerError> {
        let secret = std::fs::read(key_path).map_err(|e| {
            SchedulerError::Auth(format!(
                "failed to read signing key {}: {}",
                key_path.display(),
                e
            ))
        })?;
        Ok(Self {
            key: EncodingKey::from_secret(&secret),
            username: username.into(),
            duration_secs,
            headroom_secs,
            clock,
            current: Mutex::new(None),
        })
    }

    /// Token to attach to the next request, re-minted when the current one
    /// would expire within the headroom.
    pub fn current_token(&self) -> Result<String, SchedulerError> {
        let now = self.clock.epoch_secs();
        let mut slot = self.current.lock();
        if let Some(record) = slot.as_ref() {
            if record.expires_at > now + self.headroom_secs {
                return Ok(record.token.clone());
            }
            tracing::info!(
                expires_in = record.expires_at.saturating_sub(now),
                "auth token near expiry, re-minting"
            );
        }
        let record = self.mint(now)?;
        let token = record.token.clone();
        *slot = Some(record);
        Ok(token)
    }

    fn mint(&self, now: u64) -> Result<TokenRecord, SchedulerError> {
        let expires_at = now + self.duration_secs;
        let claims = Claims { exp: expires_at, iat: now, sun: self.username.clone() };
        let token = encode(&Header::default(), &claims, &self.key)
            .map_err(|e| SchedulerError::Auth(format!("token mint failed: {}", e)))?;
        Ok(TokenRecord { token, expires_at })
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
