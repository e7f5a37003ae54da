// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface and service wiring.
//!
//! A single immutable [`sfrest_core::Config`] flows into [`Service::build`],
//! which assembles the stores, the application registry, the scheduler
//! adapters, and the background engines. The axum router is a thin adapter
//! mapping requests onto the controllers; every response is a JSON object
//! carrying at least a `status` field (or a file attachment).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod auth;
mod context;
mod error;
mod routes;
mod service;
mod submit;

pub use auth::AuthAdapter;
pub use context::AppContext;
pub use error::ApiError;
pub use routes::router;
pub use service::{Service, ServiceError};
pub use submit::{submit_job, SubmitOutcome};
