//! Physical locations that reports are filed against

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::ApiClient;
use super::normalize;
use crate::error::Result;

const BASE: &str = "/admin/ubicaciones";

/// Prefix of the text encoded in a location's QR code
pub const QR_PREFIX: &str = "reportes_unimayor_ubicación_oficial:";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ubicacion {
    pub id: i64,
    pub sede: String,
    pub edificio: String,
    pub piso: String,
    pub lugar: String,
    pub descripcion: String,
    pub codigo: String,
}

impl Ubicacion {
    /// Build from whatever shape the server returned
    pub fn from_value(record: &Value) -> Self {
        let text = |names: &[&str]| normalize::text(record, names).unwrap_or_default();
        Self {
            id: normalize::id(record, &["id", "idUbicacion"]),
            sede: text(&["sede"]),
            edificio: text(&["edificio"]),
            piso: text(&["piso"]),
            lugar: text(&["lugar", "nombre"]),
            descripcion: text(&["descripcion"]),
            codigo: text(&["codigo"]),
        }
    }

    /// Whether `term` appears in the location's descriptive fields
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            self.sede.as_str(),
            self.edificio.as_str(),
            self.lugar.as_str(),
            self.piso.as_str(),
            self.descripcion.as_str(),
        ]
        .join(" ")
        .to_lowercase()
        .contains(&term)
    }

    /// Text encoded in this location's QR code
    pub fn qr_payload(&self) -> String {
        format!("{}{}", QR_PREFIX, urlencoding::encode(&self.id.to_string()))
    }

    /// File name for this location's QR image
    pub fn qr_file_name(&self) -> String {
        format!(
            "QR_{}_Edificio_{}_Piso_{}_{}.png",
            self.sede, self.edificio, self.piso, self.lugar
        )
    }
}

/// Locations matching `term`, in their original order
pub fn filter<'u>(ubicaciones: &'u [Ubicacion], term: &str) -> Vec<&'u Ubicacion> {
    ubicaciones.iter().filter(|u| u.matches(term)).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UbicacionInput {
    pub sede: String,
    pub edificio: String,
    pub piso: String,
    pub lugar: String,
    #[serde(default)]
    pub descripcion: String,
}

impl UbicacionInput {
    /// Names of required fields left blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("sede", &self.sede),
            ("edificio", &self.edificio),
            ("piso", &self.piso),
            ("lugar", &self.lugar),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

pub struct UbicacionesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UbicacionesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Ubicacion>> {
        let records: Option<Vec<Value>> = self.client.get_json(BASE).await?;
        Ok(records
            .unwrap_or_default()
            .iter()
            .map(Ubicacion::from_value)
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Ubicacion> {
        let record: Value = self.client.get_json(&format!("{}/{}", BASE, id)).await?;
        Ok(Ubicacion::from_value(&record))
    }

    pub async fn create(&self, input: &UbicacionInput) -> Result<Ubicacion> {
        let response = self.client.post(BASE, input).await?;
        let record: Value = response.json().unwrap_or(Value::Null);
        let created = Ubicacion::from_value(&record);
        tracing::info!("Created location #{}", created.id);
        Ok(created)
    }

    pub async fn update(&self, id: i64, input: &UbicacionInput) -> Result<()> {
        self.client.put(&format!("{}/{}", BASE, id), input).await?;
        tracing::info!("Updated location #{}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{}/{}", BASE, id)).await?;
        tracing::info!("Deleted location #{}", id);
        Ok(())
    }
}
