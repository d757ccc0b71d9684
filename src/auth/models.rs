//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-defined roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator - full access to the console
    Admin,
    /// Volunteer responder
    Brigadista,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Brigadista => "brigadista",
        }
    }

    /// Match an already lowercased role name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Role::Admin),
            "brigadista" => Some(Role::Brigadista),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login credentials, in the field names the API expects
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "Correo")]
    pub email: String,
    #[serde(rename = "Contrasena")]
    pub password: String,
}

/// Login response; the token may be missing on a malformed reply
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role::from_name("admin"), Some(Role::Admin));
        assert_eq!(Role::from_name("brigadista"), Some(Role::Brigadista));
        assert_eq!(Role::from_name("Admin"), None);
        assert_eq!(Role::Brigadista.to_string(), "brigadista");
    }

    #[test]
    fn test_login_request_field_names() {
        let req = LoginRequest {
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["Correo"], "ana@example.com");
        assert_eq!(json["Contrasena"], "secret");
    }
}
