//! Volunteer responder records

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::Result;

const BASE: &str = "/admin/brigadistas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brigadista {
    pub id: i64,
    pub nombre: String,
    pub correo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub activo: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBrigadista {
    pub nombre: String,
    pub correo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub activo: bool,
}

/// Partial update; unset fields are left untouched by the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrigadistaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl BrigadistaUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.correo.is_none()
            && self.telefono.is_none()
            && self.activo.is_none()
    }
}

pub struct BrigadistasApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BrigadistasApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Brigadista>> {
        tracing::debug!("Listing brigadistas");
        self.client.get_json(BASE).await
    }

    pub async fn create(&self, data: &NewBrigadista) -> Result<Brigadista> {
        let created: Brigadista = self.client.post(BASE, data).await?.json()?;
        tracing::info!("Created brigadista #{}", created.id);
        Ok(created)
    }

    pub async fn update(&self, id: i64, data: &BrigadistaUpdate) -> Result<()> {
        self.client.put(&format!("{}/{}", BASE, id), data).await?;
        tracing::info!("Updated brigadista #{}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{}/{}", BASE, id)).await?;
        tracing::info!("Deleted brigadista #{}", id);
        Ok(())
    }
}
