//! Visor de alertas de tráfico sobre la Línea 1 del Monorriel.
//!
//! - `server`: API HTTP (Axum) con el almacén de alertas en memoria y la ruta
//! - `client`: presentación de alertas del visor (filtros, reporte, refresco)

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod ruta;
pub mod server;
pub mod store;
