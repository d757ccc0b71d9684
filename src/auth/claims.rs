//! Token claims and role evaluation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::jwt::decode_claims;
use crate::auth::models::Role;
use crate::auth::session::SessionStore;

/// Payload fields as the server emits them, one slot per accepted spelling
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawClaims {
    exp: Option<Value>,
    email: Option<Value>,
    #[serde(rename = "Correo")]
    correo: Option<Value>,
    roles: Option<Value>,
    role: Option<Value>,
    #[serde(rename = "EsAdmin")]
    es_admin_pascal: Option<Value>,
    #[serde(rename = "esAdmin")]
    es_admin_camel: Option<Value>,
    #[serde(rename = "EsBrigadista")]
    es_brigadista_pascal: Option<Value>,
    #[serde(rename = "esBrigadista")]
    es_brigadista_camel: Option<Value>,
}

/// Normalized view of a token payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Claims {
    /// Expiration in epoch seconds; `None` means the token never expires
    pub exp: Option<f64>,
    /// Subject email
    pub email: Option<String>,
    /// Explicit role list
    pub roles: Option<Vec<String>>,
    /// Single role, only consulted when there is no list
    pub role: Option<String>,
    /// Ad-hoc administrator flag
    pub admin_flag: bool,
    /// Ad-hoc brigadista flag
    pub brigadista_flag: bool,
}

impl From<RawClaims> for Claims {
    fn from(raw: RawClaims) -> Self {
        let roles = match &raw.roles {
            Some(Value::Array(items)) => Some(items.iter().map(role_entry).collect()),
            _ => None,
        };
        let role = match (&roles, raw.role.as_ref()) {
            (None, Some(v)) if truthy(v) => Some(role_entry(v)),
            _ => None,
        };

        Self {
            exp: raw.exp.as_ref().and_then(expiry),
            email: [raw.email.as_ref(), raw.correo.as_ref()]
                .into_iter()
                .flatten()
                .find_map(|v| match v {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                }),
            roles,
            role,
            admin_flag: flag(raw.es_admin_pascal.as_ref(), raw.es_admin_camel.as_ref()),
            brigadista_flag: flag(
                raw.es_brigadista_pascal.as_ref(),
                raw.es_brigadista_camel.as_ref(),
            ),
        }
    }
}

impl Claims {
    /// Whether the claims grant `name`, compared case-insensitively
    pub fn has_role(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();

        let listed: Option<&[String]> = match (&self.roles, &self.role) {
            (Some(list), _) => Some(list.as_slice()),
            (None, Some(single)) => Some(std::slice::from_ref(single)),
            (None, None) => None,
        };
        if listed.is_some_and(|list| list.iter().any(|r| r.to_lowercase() == wanted)) {
            return true;
        }

        match Role::from_name(&wanted) {
            Some(Role::Admin) => self.admin_flag,
            Some(Role::Brigadista) => self.brigadista_flag,
            None => false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin.as_str())
    }

    pub fn is_brigadista(&self) -> bool {
        self.has_role(Role::Brigadista.as_str())
    }

    /// Whether the token is still valid at `now` (epoch seconds)
    pub fn is_live_at(&self, now: i64) -> bool {
        match self.exp {
            None => true,
            Some(exp) => exp > now as f64,
        }
    }

    /// Expiration as a timestamp, when it is a representable instant
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let exp = self.exp.filter(|e| e.is_finite())?;
        chrono::DateTime::from_timestamp(exp.floor() as i64, 0)
    }
}

/// Reads role and identity information from the current session token
#[derive(Clone)]
pub struct ClaimsEvaluator {
    session: SessionStore,
}

impl ClaimsEvaluator {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Decode the stored token, recomputed on every call
    pub fn claims(&self) -> Option<Claims> {
        self.session.read().as_deref().and_then(decode_claims)
    }

    /// Email of the signed-in user, or an empty string
    pub fn subject_email(&self) -> String {
        self.claims().and_then(|c| c.email).unwrap_or_default()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.claims().is_some_and(|c| c.has_role(name))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin.as_str())
    }

    pub fn is_brigadista(&self) -> bool {
        self.has_role(Role::Brigadista.as_str())
    }
}

/// Loose truthiness of a JSON value
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stringify a role entry; falsy entries become empty
fn role_entry(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        v if !truthy(v) => String::new(),
        v => v.to_string(),
    }
}

/// A flag holds when either spelling is `true`, or when the first present
/// spelling is the string "true" in any case.
fn flag(pascal: Option<&Value>, camel: Option<&Value>) -> bool {
    let is_true = |v: &Value| matches!(v, Value::Bool(true));
    if pascal.is_some_and(is_true) || camel.is_some_and(is_true) {
        return true;
    }
    match pascal.or(camel) {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Falsy values mean "no expiry". Anything non-numeric becomes NaN, which
/// never compares as being in the future.
fn expiry(value: &Value) -> Option<f64> {
    if !truthy(value) {
        return None;
    }
    let secs = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Value::Bool(true) => 1.0,
        _ => f64::NAN,
    };
    Some(secs)
}
