//! brigadmin - administer the volunteer responder reporting platform
//!
//! This is the library interface behind the `brigadmin` CLI: session
//! handling for the platform's bearer tokens, role evaluation over the
//! token claims, and a middleware-based client for the admin API.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod notifications;

pub use api::ApiClient;
pub use auth::{Claims, ClaimsEvaluator, RouteGuard, SessionStore};
pub use config::Config;
pub use error::Error;
