//! types.rs
//! Modelos compartidos por servidor y visor: la alerta almacenada, el cuerpo
//! de un reporte nuevo y la configuración del servicio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alerta de tráfico ya registrada. Nunca se modifica después de crearse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alerta {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
    pub tipo: String,
    pub descripcion: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Cuerpo de `POST /api/alertas`.
///
/// Todos los campos son opcionales al deserializar: la falta de uno se
/// reporta como error de validación (400) y no como rechazo del extractor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NuevaAlerta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
}

impl NuevaAlerta {
    pub fn new(lat: f64, lng: f64, tipo: impl Into<String>, descripcion: impl Into<String>) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            descripcion: Some(descripcion.into()),
            tipo: Some(tipo.into()),
        }
    }
}

/// Cuerpo de error de la API: `{"message": "..."}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct AppCfg {
    /// Dirección/puerto del servidor HTTP (Axum)
    pub bind: String,

    /// GeoJSON de la Línea 1 servido por `/api/rutas/monorriel/linea1`
    pub route_path: String,

    /// Carpeta servida en `/js`
    pub js_dir: String,

    /// Carpeta servida en `/data`
    pub data_dir: String,

    /// Documento de la página única servido en `/`
    pub index_path: String,

    /// Ventana de vida de una alerta (segundos)
    pub alert_ttl_s: u64,

    /// Periodicidad de la purga de alertas expiradas (segundos). 0 = nunca se borran.
    pub purge_interval_s: u64,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".into(),
            route_path: "data/linea1_monorriel.geojson".into(),
            js_dir: "js".into(),
            data_dir: "data".into(),
            index_path: "index.html".into(),
            alert_ttl_s: 60 * 60, // 1 hora
            purge_interval_s: 0,
        }
    }
}
