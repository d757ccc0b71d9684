//! Incident reports and dashboard statistics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::client::ApiClient;
use crate::error::Result;

const BASE: &str = "/admin/reportes";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporte {
    pub id_reporte: i64,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(default)]
    pub hora_creacion: Option<String>,
    #[serde(default)]
    pub ruta_audio: Option<String>,
    #[serde(default)]
    pub usuario: Option<Reportante>,
    #[serde(default)]
    pub ubicacion: Option<UbicacionResumen>,
}

impl Reporte {
    pub fn has_audio(&self) -> bool {
        self.ruta_audio.as_deref().is_some_and(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reportante {
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub nombre: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UbicacionResumen {
    #[serde(default)]
    pub sede: Option<String>,
    #[serde(default)]
    pub edificio: Option<String>,
    #[serde(default)]
    pub lugar: Option<String>,
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub by_month: BTreeMap<String, usize>,
    pub by_site: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
    pub with_audio: usize,
    pub without_audio: usize,
}

impl ReportStats {
    pub fn from_reports(reportes: &[Reporte]) -> Self {
        let mut stats = Self {
            total: reportes.len(),
            ..Default::default()
        };

        for reporte in reportes {
            let month = reporte
                .fecha_creacion
                .as_deref()
                .and_then(month_of)
                .unwrap_or_else(|| "No date".to_string());
            *stats.by_month.entry(month).or_default() += 1;

            let site = reporte
                .ubicacion
                .as_ref()
                .and_then(|u| u.sede.clone())
                .unwrap_or_else(|| "No site".to_string());
            *stats.by_site.entry(site).or_default() += 1;

            let state = reporte
                .estado
                .clone()
                .unwrap_or_else(|| "No state".to_string());
            *stats.by_state.entry(state).or_default() += 1;

            if reporte.has_audio() {
                stats.with_audio += 1;
            } else {
                stats.without_audio += 1;
            }
        }

        stats
    }
}

/// `YYYY-MM` of a `YYYY-MM-DD` date, tolerating a trailing time part
fn month_of(date: &str) -> Option<String> {
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m").to_string())
}

pub struct ReportesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Reporte>> {
        self.client.get_json(BASE).await
    }

    pub async fn get(&self, id: i64) -> Result<Reporte> {
        self.client.get_json(&format!("{}/{}", BASE, id)).await
    }

    /// Raw audio attached to a report
    pub async fn audio(&self, id: i64) -> Result<Vec<u8>> {
        self.client.get_bytes(&format!("{}/{}/audio", BASE, id)).await
    }

    pub async fn stats(&self) -> Result<ReportStats> {
        Ok(ReportStats::from_reports(&self.list().await?))
    }
}
