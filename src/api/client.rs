//! HTTP client for the reporting platform API

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::brigadistas::BrigadistasApi;
use super::interceptors::{BearerAuth, ErrorReporter, TraceRequests};
use super::pipeline::{ApiRequest, ApiResponse, Pipeline, Transport};
use super::reportes::ReportesApi;
use super::ubicaciones::UbicacionesApi;
use super::usuarios::UsuariosApi;
use crate::auth::{LoginRequest, LoginResponse, Navigator, Route, SessionStore};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::notifications::Notifications;

/// Transport backed by reqwest
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brigadmin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

/// Entry point for every API call the console makes
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    pipeline: Pipeline,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        pipeline: Pipeline,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            pipeline,
            session,
            navigator,
        }
    }

    /// Client with the standard middleware stack over `transport`
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        notifications: Notifications,
    ) -> Self {
        let pipeline = Pipeline::new(transport)
            .with(TraceRequests)
            .with(ErrorReporter::new(notifications))
            .with(BearerAuth::new(session.clone(), Arc::clone(&navigator)));
        Self::new(base_url, pipeline, session, navigator)
    }

    /// Client talking to the configured server over HTTP
    pub fn from_config(
        config: &ApiConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        notifications: Notifications,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(
            config.base_url.clone(),
            Arc::new(transport),
            session,
            navigator,
            notifications,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request through the pipeline; non-2xx statuses are errors
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.pipeline.dispatch(request).await
    }

    async fn call<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, self.url(path));
        if let Some(body) = body {
            request = request.json(serde_json::to_value(body)?);
        }
        self.send(request).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call::<()>(Method::GET, path, None).await?.json()
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.call::<()>(Method::GET, path, None).await?.body)
    }

    pub(crate) async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.call(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.call(Method::PUT, path, Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.call::<()>(Method::DELETE, path, None).await
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// Returns whether the server handed back a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/admin/auth/login", &credentials).await?.json()?;

        match response.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session.save(&token)?;
                tracing::info!("Signed in as {}", email);
                self.navigator.navigate(Route::Dashboard);
                Ok(true)
            }
            None => {
                tracing::warn!("Login succeeded without a token");
                Ok(false)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    pub fn brigadistas(&self) -> BrigadistasApi<'_> {
        BrigadistasApi::new(self)
    }

    pub fn ubicaciones(&self) -> UbicacionesApi<'_> {
        UbicacionesApi::new(self)
    }

    pub fn reportes(&self) -> ReportesApi<'_> {
        ReportesApi::new(self)
    }

    pub fn usuarios(&self) -> UsuariosApi<'_> {
        UsuariosApi::new(self)
    }
}
