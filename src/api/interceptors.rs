//! Middleware attached to every API call

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use std::time::Instant;

use super::pipeline::{ApiRequest, ApiResponse, Middleware, Next};
use crate::auth::{Navigator, Route, SessionStore};
use crate::error::{Error, Result};
use crate::notifications::Notifications;

/// Attaches the bearer token and ends the session on 401
pub struct BearerAuth {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl BearerAuth {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn handle(&self, mut request: ApiRequest, next: Next<'_>) -> Result<ApiResponse> {
        if let Some(token) = self.session.read() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Stored token is not a valid header value; sending without it"),
            }
        }

        let result = next.run(request).await;

        if let Err(e) = &result {
            if e.is_unauthorized() {
                tracing::info!("Server rejected credentials, ending session");
                if let Err(clear_err) = self.session.clear() {
                    tracing::warn!("Failed to clear session: {}", clear_err);
                }
                self.navigator.navigate(Route::Login);
            }
        }

        result
    }
}

/// Turns failures into error toasts; the error still reaches the caller
pub struct ErrorReporter {
    notifications: Notifications,
}

impl ErrorReporter {
    pub fn new(notifications: Notifications) -> Self {
        Self { notifications }
    }

    /// Message shown to the user for a failed call
    pub fn describe(error: &Error) -> String {
        match error.status() {
            Some(status) if status.as_u16() == 401 => {
                "Session expired. Sign in again.".to_string()
            }
            Some(status) if status.is_server_error() => {
                "Server error. Try again later.".to_string()
            }
            _ => match error {
                Error::Api { message, .. } if !message.is_empty() => message.clone(),
                Error::Transport(e) => e.to_string(),
                _ => "Unknown error".to_string(),
            },
        }
    }
}

#[async_trait]
impl Middleware for ErrorReporter {
    async fn handle(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse> {
        let result = next.run(request).await;
        if let Err(e) = &result {
            self.notifications.error(Self::describe(e));
        }
        result
    }
}

/// Logs every call with its outcome and latency
pub struct TraceRequests;

#[async_trait]
impl Middleware for TraceRequests {
    async fn handle(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse> {
        let method = request.method.clone();
        let url = request.url.clone();
        let started = Instant::now();

        let result = next.run(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                tracing::debug!(%method, %url, status = response.status.as_u16(), elapsed_ms, "API call")
            }
            Err(e) => tracing::warn!(%method, %url, elapsed_ms, "API call failed: {}", e),
        }

        result
    }
}
