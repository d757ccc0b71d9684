//! Bearer token payload decoding
//!
//! Tokens are never verified here. The server owns authentication; the
//! client only reads the payload segment to learn who is signed in and
//! which roles they carry.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

use crate::auth::claims::{Claims, RawClaims};

/// Standard alphabet, padding optional, lenient about trailing bits.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Why a token payload could not be read
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("token has an empty segment")]
    EmptySegment,

    #[error("payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotObject,
}

/// Split a token and decode its payload segment into raw JSON bytes
pub fn payload_bytes(token: &str) -> Result<Vec<u8>, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TokenError::EmptySegment);
    }

    let relocated: String = segments[1]
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    Ok(PAYLOAD_ENGINE.decode(relocated.as_bytes())?)
}

/// Decode a token's payload, reporting the reason on failure
pub fn try_decode(token: &str) -> Result<Claims, TokenError> {
    let bytes = payload_bytes(token)?;
    let payload: Value = serde_json::from_slice(&bytes)?;
    if !payload.is_object() {
        return Err(TokenError::NotObject);
    }
    let raw: RawClaims = serde_json::from_value(payload)?;
    Ok(Claims::from(raw))
}

/// Decode a token's payload; every failure collapses to `None`
pub fn decode_claims(token: &str) -> Option<Claims> {
    match try_decode(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Ignoring unreadable token: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_with_payload(json: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl", URL_SAFE_NO_PAD.encode(json))
    }

    #[test]
    fn test_decode_valid_payload() {
        let token = token_with_payload(r#"{"email":"ana@example.com","exp":2000000000}"#);
        let claims = decode_claims(&token).expect("claims should decode");
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.exp, Some(2_000_000_000.0));
    }

    #[test]
    fn test_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d", "...."] {
            assert!(decode_claims(token).is_none(), "{token:?} should not decode");
        }
        assert!(matches!(try_decode("a.b"), Err(TokenError::SegmentCount(2))));
    }

    #[test]
    fn test_empty_segment_rejected() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"email":"x@y.z"}"#);
        assert!(matches!(
            try_decode(&format!(".{}.sig", payload)),
            Err(TokenError::EmptySegment)
        ));
        assert!(matches!(
            try_decode(&format!("hdr.{}.", payload)),
            Err(TokenError::EmptySegment)
        ));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(try_decode("hdr.%%%%.sig"), Err(TokenError::Encoding(_))));
    }

    #[test]
    fn test_invalid_json() {
        let token = token_with_payload("not json");
        assert!(matches!(try_decode(&token), Err(TokenError::Json(_))));
    }

    #[test]
    fn test_non_object_payload() {
        assert!(decode_claims(&token_with_payload("5")).is_none());
        assert!(decode_claims(&token_with_payload("null")).is_none());
        assert!(matches!(
            try_decode(&token_with_payload(r#""admin""#)),
            Err(TokenError::NotObject)
        ));
    }

    #[test]
    fn test_array_payload_grants_nothing() {
        // Positional arrays must not fill claim fields
        let token = token_with_payload(r#"[null,null,null,["admin"],null,null,null,null,null]"#);
        assert!(matches!(try_decode(&token), Err(TokenError::NotObject)));
        assert!(decode_claims(&token).is_none());
    }

    #[test]
    fn test_url_safe_characters_relocated() {
        let token = token_with_payload(r#"{"email":"a>>>?"}"#);
        assert!(token.contains('-') && token.contains('_'));
        let claims = decode_claims(&token).expect("claims should decode");
        assert_eq!(claims.email.as_deref(), Some("a>>>?"));
    }

    #[test]
    fn test_padded_payload_accepted() {
        let padded = base64::engine::general_purpose::STANDARD.encode(r#"{"role":"admin"}"#);
        let token = format!("h.{}.s", padded);
        let claims = decode_claims(&token).expect("claims should decode");
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }
}
