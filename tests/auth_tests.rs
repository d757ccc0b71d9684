//! Session and claims tests
//! Uses real HS256 tokens so the payload encoding matches what servers emit
//!
//! Run with: cargo test --test auth_tests

use brigadmin::auth::{decode_claims, MemoryStorage, SessionStore};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;

fn mint(payload: Value) -> String {
    encode(
        &Header::default(),
        &payload,
        &EncodingKey::from_secret(b"test-secret-not-verified-by-client"),
    )
    .expect("Failed to create token")
}

fn session_with(payload: Value) -> SessionStore {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    session.save(&mint(payload)).expect("Failed to save token");
    session
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

// ============================================================================
// Token shape
// ============================================================================

#[test]
fn test_minted_token_has_three_segments() {
    let token = mint(json!({"email": "ana@example.com"}));
    assert_eq!(token.split('.').count(), 3);
    assert!(decode_claims(&token).is_some());
}

#[test]
fn test_wrong_segment_counts_yield_no_claims() {
    let token = mint(json!({"email": "ana@example.com"}));
    let parts: Vec<&str> = token.split('.').collect();

    let candidates = [
        String::new(),
        parts[1].to_string(),
        format!("{}.{}", parts[0], parts[1]),
        format!("{}.x", token),
        format!("{}..{}", parts[0], parts[2]),
    ];
    for candidate in &candidates {
        assert!(decode_claims(candidate).is_none(), "{candidate:?} should not decode");
    }
}

#[test]
fn test_malformed_token_stored_is_unauthenticated() {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    session.save("not-a-token").unwrap();
    assert!(!session.is_authenticated());
    assert!(session.evaluator().claims().is_none());
    assert!(!session.evaluator().is_admin());
    assert_eq!(session.evaluator().subject_email(), "");
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn test_token_without_exp_is_authenticated() {
    let session = session_with(json!({"email": "ana@example.com"}));
    assert!(session.is_authenticated());
}

#[test]
fn test_expired_token() {
    let session = session_with(json!({"exp": now() - 1}));
    assert!(!session.is_authenticated());
}

#[test]
fn test_live_token() {
    let session = session_with(json!({"exp": now() + 3600}));
    assert!(session.is_authenticated());
}

#[test]
fn test_no_token_is_unauthenticated() {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    assert!(!session.is_authenticated());
}

// ============================================================================
// Roles
// ============================================================================

#[test]
fn test_role_lookup_is_case_insensitive() {
    let payloads = [
        json!({"roles": ["admin"]}),
        json!({"roles": ["Admin", "brigadista"]}),
        json!({"role": "ADMIN"}),
        json!({"EsAdmin": "True"}),
        json!({"esAdmin": false}),
        json!({}),
    ];
    for payload in payloads {
        let evaluator = session_with(payload.clone()).evaluator();
        assert_eq!(
            evaluator.has_role("ADMIN"),
            evaluator.has_role("admin"),
            "case mismatch for {payload}"
        );
    }
}

#[test]
fn test_role_list() {
    let evaluator = session_with(json!({"roles": ["admin", "brigadista"]})).evaluator();
    assert!(evaluator.has_role("brigadista"));
    assert!(evaluator.is_brigadista());
    assert!(evaluator.is_admin());
    assert!(!evaluator.has_role("superuser"));
}

#[test]
fn test_admin_string_flag() {
    let evaluator = session_with(json!({"EsAdmin": "true"})).evaluator();
    assert!(evaluator.has_role("admin"));
}

#[test]
fn test_admin_false_flag() {
    let evaluator = session_with(json!({"esAdmin": false})).evaluator();
    assert!(!evaluator.has_role("admin"));
}

#[test]
fn test_absent_and_false_flags_both_deny() {
    assert!(!session_with(json!({})).evaluator().is_brigadista());
    assert!(!session_with(json!({"EsBrigadista": false})).evaluator().is_brigadista());
    assert!(!session_with(json!({"EsBrigadista": "false"})).evaluator().is_brigadista());
}

#[test]
fn test_no_session_has_no_roles() {
    let evaluator = SessionStore::new(Arc::new(MemoryStorage::new())).evaluator();
    assert!(!evaluator.has_role("admin"));
    assert!(!evaluator.has_role("brigadista"));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_subject_email() {
    assert_eq!(
        session_with(json!({"email": "ana@example.com"})).evaluator().subject_email(),
        "ana@example.com"
    );
    assert_eq!(
        session_with(json!({"Correo": "luis@example.com"})).evaluator().subject_email(),
        "luis@example.com"
    );
    assert_eq!(session_with(json!({"sub": "1"})).evaluator().subject_email(), "");
}

#[test]
fn test_claims_follow_latest_login() {
    let session = session_with(json!({"email": "first@example.com"}));
    let evaluator = session.evaluator();
    assert_eq!(evaluator.subject_email(), "first@example.com");

    session.save(&mint(json!({"email": "second@example.com"}))).unwrap();
    assert_eq!(evaluator.subject_email(), "second@example.com");

    session.clear().unwrap();
    assert_eq!(evaluator.subject_email(), "");
}

// ============================================================================
// Store lifecycle
// ============================================================================

#[test]
fn test_save_read_clear() {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    session.save("t").unwrap();
    assert_eq!(session.read().as_deref(), Some("t"));
    session.clear().unwrap();
    assert_eq!(session.read(), None);
}

#[test]
fn test_clear_empty_store() {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    assert!(session.clear().is_ok());
    println!("✓ Clearing an empty session is a no-op");
}
