//! error.rs (visor)
//! Errores del lado cliente: red, almacenamiento local y geolocalización

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("fallo de red: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} en {url}: {message}")]
    Status { status: u16, url: String, message: String },

    #[error("respuesta ilegible: {0}")]
    Decode(String),

    #[error("no hay ningún reporte abierto")]
    NoOpenReport,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no se pudo acceder a {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("almacén corrupto: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Motivo por el que no se obtuvo la posición del dispositivo.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("geolocalización no soportada")]
    Unsupported,
    #[error("User denied Geolocation")]
    PermissionDenied,
}
