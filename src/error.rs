//! error.rs
//! Errores de la API. Toda respuesta de error lleva un cuerpo `{"message"}`
//! legible; no hay códigos estructurados.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::types::ErrorBody;

pub const MSG_FALTAN_DATOS: &str = "Faltan datos para crear la alerta.";
pub const MSG_ERROR_RUTA: &str = "Error interno del servidor al obtener la ruta.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Reporte incompleto o cuerpo ilegible.
    #[error("reporte inválido: {0}")]
    Validation(String),

    /// No se pudo leer el GeoJSON de la ruta.
    #[error("no se pudo leer {path}: {source}")]
    RouteRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// El GeoJSON de la ruta no es JSON válido.
    #[error("GeoJSON mal formado en {path}: {source}")]
    RouteParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteRead { .. } | ApiError::RouteParse { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => MSG_FALTAN_DATOS,
            ApiError::RouteRead { .. } | ApiError::RouteParse { .. } => MSG_ERROR_RUTA,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("{self}");
        }
        let body = ErrorBody { message: self.public_message().to_string() };
        (status, Json(body)).into_response()
    }
}
