//! Outbound request pipeline tests
//! Drives the standard middleware stack against a scripted transport
//!
//! Run with: cargo test --test pipeline_tests

use async_trait::async_trait;
use brigadmin::api::{ApiClient, ApiRequest, ApiResponse, Transport};
use brigadmin::auth::{MemoryStorage, Navigator, RecordingNavigator, Route, SessionStore};
use brigadmin::error::{Error, Result};
use brigadmin::notifications::{self, Notifications, ToastKind};
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use std::sync::Arc;

/// Replies with a fixed status and records every request it sees
struct Scripted {
    status: StatusCode,
    body: &'static str,
    seen: Mutex<Vec<ApiRequest>>,
}

impl Scripted {
    fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn authorization(&self, index: usize) -> Option<String> {
        self.seen.lock()[index]
            .header("authorization")
            .map(|v| v.to_str().unwrap().to_string())
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.seen.lock().push(request);
        Ok(ApiResponse::new(self.status, self.body))
    }
}

struct Harness {
    client: ApiClient,
    session: SessionStore,
    navigator: Arc<RecordingNavigator>,
    notifications: Notifications,
}

fn harness(transport: Arc<Scripted>) -> Harness {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    let navigator = Arc::new(RecordingNavigator::new());
    let notifications = Notifications::new();
    let client = ApiClient::with_transport(
        "http://api.test/api",
        transport,
        session.clone(),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        notifications.clone(),
    );
    Harness {
        client,
        session,
        navigator,
        notifications,
    }
}

fn get(client: &ApiClient, path: &str) -> ApiRequest {
    ApiRequest::new(Method::GET, client.url(path))
}

// ============================================================================
// Bearer token
// ============================================================================

#[tokio::test]
async fn test_bearer_header_attached_when_token_present() {
    let transport = Scripted::new(StatusCode::OK, "[]");
    let h = harness(transport.clone());
    h.session.save("abc.def.ghi").unwrap();

    h.client.send(get(&h.client, "/admin/brigadistas")).await.unwrap();

    assert_eq!(transport.authorization(0).as_deref(), Some("Bearer abc.def.ghi"));
}

#[tokio::test]
async fn test_no_header_without_token() {
    let transport = Scripted::new(StatusCode::OK, "[]");
    let h = harness(transport.clone());

    h.client.send(get(&h.client, "/admin/brigadistas")).await.unwrap();

    assert_eq!(transport.authorization(0), None);
}

#[tokio::test]
async fn test_header_is_read_per_request() {
    let transport = Scripted::new(StatusCode::OK, "[]");
    let h = harness(transport.clone());

    h.session.save("first").unwrap();
    h.client.send(get(&h.client, "/a")).await.unwrap();
    h.session.save("second").unwrap();
    h.client.send(get(&h.client, "/b")).await.unwrap();
    h.session.clear().unwrap();
    h.client.send(get(&h.client, "/c")).await.unwrap();

    assert_eq!(transport.authorization(0).as_deref(), Some("Bearer first"));
    assert_eq!(transport.authorization(1).as_deref(), Some("Bearer second"));
    assert_eq!(transport.authorization(2), None);
}

#[tokio::test]
async fn test_caller_headers_survive() {
    let transport = Scripted::new(StatusCode::OK, "{}");
    let h = harness(transport.clone());
    h.session.save("t").unwrap();

    let mut request = get(&h.client, "/x");
    request
        .headers
        .insert("x-request-id", "42".parse().unwrap());
    h.client.send(request).await.unwrap();

    let seen = transport.seen.lock();
    assert_eq!(seen[0].header("x-request-id").unwrap(), "42");
    assert!(seen[0].header("authorization").is_some());
}

// ============================================================================
// Unauthorized responses
// ============================================================================

#[tokio::test]
async fn test_unauthorized_clears_session_and_navigates_once() {
    let transport = Scripted::new(StatusCode::UNAUTHORIZED, r#"{"message":"token expired"}"#);
    let h = harness(transport);
    h.session.save("stale").unwrap();
    let mut toasts = h.notifications.subscribe();

    let err = h.client.send(get(&h.client, "/admin/reportes")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.session.read(), None);
    assert_eq!(h.navigator.visits(), vec![Route::Login]);

    let shown = notifications::drain(&mut toasts);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, ToastKind::Error);
    assert_eq!(shown[0].message, "Session expired. Sign in again.");
    println!("✓ 401 ended the session with a single redirect");
}

#[tokio::test]
async fn test_unauthorized_without_session_still_redirects() {
    let transport = Scripted::new(StatusCode::UNAUTHORIZED, "");
    let h = harness(transport);

    let err = h.client.send(get(&h.client, "/x")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.navigator.count(Route::Login), 1);
}

#[tokio::test]
async fn test_each_unauthorized_call_redirects() {
    let transport = Scripted::new(StatusCode::UNAUTHORIZED, "");
    let h = harness(transport);

    for _ in 0..3 {
        let _ = h.client.send(get(&h.client, "/x")).await;
    }

    assert_eq!(h.navigator.count(Route::Login), 3);
}

// ============================================================================
// Other failures
// ============================================================================

#[tokio::test]
async fn test_server_error_passes_through_untouched() {
    let transport = Scripted::new(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"boom"}"#);
    let h = harness(transport);
    h.session.save("keep-me").unwrap();
    let mut toasts = h.notifications.subscribe();

    let err = h.client.send(get(&h.client, "/x")).await.unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.session.read().as_deref(), Some("keep-me"));
    assert!(h.navigator.visits().is_empty());

    let shown = notifications::drain(&mut toasts);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, "Server error. Try again later.");
}

#[tokio::test]
async fn test_client_error_toast_uses_server_message() {
    let transport = Scripted::new(StatusCode::BAD_REQUEST, r#"{"message":"Correo ya registrado"}"#);
    let h = harness(transport);
    let mut toasts = h.notifications.subscribe();

    let _ = h.client.send(get(&h.client, "/x")).await;

    let shown = notifications::drain(&mut toasts);
    assert_eq!(shown[0].message, "Correo ya registrado");
}

#[tokio::test]
async fn test_forbidden_does_not_end_session() {
    let transport = Scripted::new(StatusCode::FORBIDDEN, "");
    let h = harness(transport);
    h.session.save("t").unwrap();

    let err = h.client.send(get(&h.client, "/x")).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(h.session.read().is_some());
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_success_emits_no_toast() {
    let transport = Scripted::new(StatusCode::OK, "[]");
    let h = harness(transport);
    let mut toasts = h.notifications.subscribe();

    h.client.send(get(&h.client, "/x")).await.unwrap();

    assert!(notifications::drain(&mut toasts).is_empty());
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_opens_dashboard() {
    let transport = Scripted::new(StatusCode::OK, r#"{"token":"new.session.token"}"#);
    let h = harness(transport.clone());

    assert!(h.client.login("ana@example.com", "secret").await.unwrap());

    assert_eq!(h.session.read().as_deref(), Some("new.session.token"));
    assert_eq!(h.navigator.visits(), vec![Route::Dashboard]);

    let seen = transport.seen.lock();
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].url, "http://api.test/api/admin/auth/login");
    let body = seen[0].body.as_ref().unwrap();
    assert_eq!(body["Correo"], "ana@example.com");
    assert_eq!(body["Contrasena"], "secret");
}

#[tokio::test]
async fn test_login_without_token_keeps_session_empty() {
    let transport = Scripted::new(StatusCode::OK, r#"{"token":""}"#);
    let h = harness(transport);

    assert!(!h.client.login("ana@example.com", "secret").await.unwrap());
    assert_eq!(h.session.read(), None);
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_rejected_login_is_an_error() {
    let transport = Scripted::new(StatusCode::UNAUTHORIZED, r#"{"message":"Credenciales inválidas"}"#);
    let h = harness(transport);

    let err = h.client.login("ana@example.com", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.session.read(), None);
}
