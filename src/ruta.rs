//! ruta.rs
//! Carga del GeoJSON de la Línea 1. El servidor no transforma la ruta:
//! se lee en cada petición y se devuelve tal cual.

use serde_json::Value;
use std::path::Path;

use crate::error::ApiError;

pub async fn load_route(path: impl AsRef<Path>) -> Result<Value, ApiError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ApiError::RouteRead { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| ApiError::RouteParse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn returns_document_verbatim() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"type":"FeatureCollection","features":[],"name":"linea1"}}"#).unwrap();
        let v = load_route(f.path()).await.unwrap();
        assert_eq!(v["name"], "linea1");
        assert_eq!(v["features"].as_array().map(|a| a.len()), Some(0));
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_route(dir.path().join("no_existe.geojson")).await.unwrap_err();
        assert!(matches!(err, ApiError::RouteRead { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{\"type\": \"FeatureCollection\",").unwrap();
        let err = load_route(f.path()).await.unwrap_err();
        assert!(matches!(err, ApiError::RouteParse { .. }));
    }
}
