// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Subscription Status API Library
//!
//! HTTP front for the billing queries: bearer-token authentication, the
//! subscription status and billing portal routes, and the query envelope.

pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod security;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
