//! Request middleware pipeline
//!
//! Every outbound call passes through a fixed, ordered list of middleware
//! before reaching the transport. Each middleware may rewrite the request,
//! inspect the result, or both.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};

/// An outbound API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }
}

/// A raw API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Turn a non-2xx response into [`Error::Api`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }
        Err(Error::Api {
            status: self.status,
            message: self.error_message(),
        })
    }

    /// Best human-readable explanation the server gave
    fn error_message(&self) -> String {
        let from_body = serde_json::from_slice::<Value>(&self.body)
            .ok()
            .and_then(|body| {
                ["message", "title"].iter().find_map(|field| {
                    body.get(*field)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
            });

        from_body
            .or_else(|| self.status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Final hop that actually talks to the server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the response for any status; only I/O problems are errors
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// One stage of the pipeline
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse>;
}

/// Handle to the rest of the pipeline
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub async fn run(self, request: ApiRequest) -> Result<ApiResponse> {
        match self.middleware.split_first() {
            Some((current, rest)) => {
                let next = Next {
                    middleware: rest,
                    transport: self.transport,
                };
                current.handle(request, next).await
            }
            None => self.transport.send(request).await?.error_for_status(),
        }
    }
}

/// Statically ordered middleware chain; the first added runs outermost
#[derive(Clone)]
pub struct Pipeline {
    middleware: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            middleware: Vec::new(),
            transport,
        }
    }

    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
        Next {
            middleware: &self.middleware,
            transport: self.transport.as_ref(),
        }
        .run(request)
        .await
    }
}
