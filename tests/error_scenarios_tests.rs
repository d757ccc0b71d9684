//! Error scenario and edge case tests
//! Malformed tokens, broken config files and error formatting
//!
//! Run with: cargo test --test error_scenarios_tests

use brigadmin::auth::{try_decode, FileStorage, MemoryStorage, SessionStore, TokenError};
use brigadmin::config::loader::{load_config_from_path, parse_config};
use brigadmin::error::Error;
use reqwest::StatusCode;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Error formatting
// ============================================================================

#[test]
fn test_error_config_not_found() {
    let msg = Error::ConfigNotFound.to_string();
    assert!(msg.contains("brigadmin init"));
    println!("✓ ConfigNotFound error: {}", msg);
}

#[test]
fn test_error_access_denied() {
    let msg = Error::AccessDenied.to_string();
    assert!(msg.contains("administrator"));
}

#[test]
fn test_error_api_status() {
    let err = Error::Api {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Campo requerido".to_string(),
    };
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert!(!err.is_unauthorized());
    assert!(err.to_string().contains("Campo requerido"));
}

#[test]
fn test_non_http_errors_have_no_status() {
    assert_eq!(Error::Storage("x".to_string()).status(), None);
    assert_eq!(Error::AccessDenied.status(), None);
}

// ============================================================================
// Malformed tokens
// ============================================================================

#[test]
fn test_token_segment_errors() {
    assert!(matches!(try_decode(""), Err(TokenError::SegmentCount(1))));
    assert!(matches!(try_decode("a.b"), Err(TokenError::SegmentCount(2))));
    assert!(matches!(try_decode("a.b.c.d"), Err(TokenError::SegmentCount(4))));
    assert!(matches!(try_decode("a..c"), Err(TokenError::EmptySegment)));
    assert!(matches!(try_decode(".e30.c"), Err(TokenError::EmptySegment)));
}

#[test]
fn test_token_payload_errors() {
    assert!(matches!(try_decode("h.!!!.s"), Err(TokenError::Encoding(_))));
    // "bm90IGpzb24" is "not json"
    assert!(matches!(try_decode("h.bm90IGpzb24.s"), Err(TokenError::Json(_))));
    // "W10" is "[]"
    assert!(matches!(try_decode("h.W10.s"), Err(TokenError::NotObject)));
}

#[test]
fn test_empty_object_payload_decodes() {
    // "e30" is "{}"
    let claims = try_decode("h.e30.s").unwrap();
    assert!(claims.email.is_none());
    assert!(!claims.is_admin());
    assert!(claims.is_live_at(i64::MAX));
}

#[test]
fn test_garbage_tokens_never_authenticate() {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    for token in ["", ".", "..", "a.b.c", "h.e30", "Bearer h.e30.s", "h.e30.s.x"] {
        session.save(token).unwrap();
        assert!(
            !session.evaluator().is_admin(),
            "{token:?} should carry no roles"
        );
    }
}

// ============================================================================
// Session storage failures
// ============================================================================

#[test]
fn test_corrupt_session_file_reads_as_signed_out() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.json");
    fs::write(&path, "{not json").unwrap();

    let session = SessionStore::new(Arc::new(FileStorage::new(&path)));
    assert!(session.read().is_none());
    assert!(!session.is_authenticated());
}

#[test]
fn test_login_and_logout_work_after_truncated_session_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.json");
    let session = SessionStore::new(Arc::new(FileStorage::new(&path)));

    fs::write(&path, "{truncated").unwrap();
    session.clear().expect("clear should discard a corrupt file");
    assert!(session.read().is_none());

    fs::write(&path, "{truncated").unwrap();
    session.save("a.b.c").expect("save should replace a corrupt file");
    assert_eq!(session.read().as_deref(), Some("a.b.c"));
}

#[test]
fn test_session_file_in_missing_directory_is_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("session.json");

    let session = SessionStore::new(Arc::new(FileStorage::new(&path)));
    session.save("t").unwrap();
    assert!(path.exists());
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    let err = load_config_from_path(&temp.path().join("brigadmin.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound));
}

#[test]
fn test_invalid_toml() {
    let err = parse_config("[api\nbase_url = ").unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_wrong_storage_kind() {
    let err = parse_config("[session]\nstorage = \"cloud\"").unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.api.base_url, "http://localhost:5000/api");
    assert_eq!(config.api.timeout_secs, 30);
}
