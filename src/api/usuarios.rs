//! Platform user accounts and brigadista role assignment

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::client::ApiClient;
use super::normalize;
use crate::error::Result;

const ADMIN_BASE: &str = "/admin/usuarios";
const INVITE_BASE: &str = "/auth/invitados";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Usuario {
    pub id: i64,
    pub nombre: Option<String>,
    pub correo: String,
    pub habilitado: bool,
    pub es_brigadista: bool,
}

impl Usuario {
    pub fn from_value(record: &Value) -> Self {
        Self {
            id: normalize::id(record, &["id", "idUsuario"]),
            nombre: normalize::text(record, &["nombre", "nombreUsuario"]),
            correo: normalize::text(record, &["correo", "email"]).unwrap_or_default(),
            habilitado: normalize::flag(record, &["habilitado"]),
            es_brigadista: normalize::flag(record, &["esBrigadista"]),
        }
    }
}

/// Registration payload for a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUsuario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    pub correo: String,
    #[serde(rename = "contraseña")]
    pub contrasena: String,
    pub es_brigadista: bool,
    pub habilitado: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(rename = "contraseña", skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_brigadista: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habilitado: Option<bool>,
}

/// Account-level actions exposed by the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    AssignBrigadista,
    RemoveBrigadista,
    Disable,
    Enable,
}

impl UserAction {
    fn segment(&self) -> &'static str {
        match self {
            UserAction::AssignBrigadista => "asignar-brigadista",
            UserAction::RemoveBrigadista => "quitar-brigadista",
            UserAction::Disable => "inhabilitar-usuario",
            UserAction::Enable => "habilitar-usuario",
        }
    }

    pub fn path(&self, id: i64) -> String {
        format!("{}/{}/{}", ADMIN_BASE, id, self.segment())
    }
}

pub struct UsuariosApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsuariosApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Usuario>> {
        let records: Option<Vec<Value>> = self
            .client
            .get_json(&format!("{}/usuarios", ADMIN_BASE))
            .await?;
        Ok(records
            .unwrap_or_default()
            .iter()
            .map(Usuario::from_value)
            .collect())
    }

    /// Register an account; the server answers with plain text
    pub async fn create(&self, data: &NewUsuario) -> Result<String> {
        let response = self
            .client
            .post(&format!("{}/registro", INVITE_BASE), data)
            .await?;
        tracing::info!("Registered user {}", data.correo);
        Ok(response.text())
    }

    pub async fn update(&self, id: i64, data: &UsuarioUpdate) -> Result<String> {
        let response = self
            .client
            .put(&format!("{}/actualizar/{}", INVITE_BASE, id), data)
            .await?;
        tracing::info!("Updated user #{}", id);
        Ok(response.text())
    }

    pub async fn apply(&self, id: i64, action: UserAction) -> Result<()> {
        self.client.post(&action.path(id), &json!({})).await?;
        tracing::info!("Applied {:?} to user #{}", action, id);
        Ok(())
    }

    pub async fn assign_brigadista(&self, id: i64) -> Result<()> {
        self.apply(id, UserAction::AssignBrigadista).await
    }

    pub async fn remove_brigadista(&self, id: i64) -> Result<()> {
        self.apply(id, UserAction::RemoveBrigadista).await
    }

    pub async fn disable(&self, id: i64) -> Result<()> {
        self.apply(id, UserAction::Disable).await
    }

    pub async fn enable(&self, id: i64) -> Result<()> {
        self.apply(id, UserAction::Enable).await
    }
}
