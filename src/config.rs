//! config.rs
//! Configuración por variables de entorno sobre los valores por defecto.

use anyhow::{Context, Result};
use chrono::TimeDelta;
use std::env;
use std::time::Duration;

use crate::client::refresco::DEFAULT_PERIOD;
use crate::models::types::AppCfg;

pub fn app_cfg_from_env() -> AppCfg {
    app_cfg_from(|k| env::var(k).ok())
}

pub fn app_cfg_from(var: impl Fn(&str) -> Option<String>) -> AppCfg {
    let mut c = AppCfg::default();
    if let Some(v) = var("BIND") { c.bind = v; }
    if let Some(v) = var("RUTA_GEOJSON") { c.route_path = v; }
    if let Some(v) = var("JS_DIR") { c.js_dir = v; }
    if let Some(v) = var("DATA_DIR") { c.data_dir = v; }
    if let Some(v) = var("INDEX_HTML") { c.index_path = v; }
    if let Some(v) = var("ALERTA_TTL_S") { c.alert_ttl_s = v.parse().unwrap_or(c.alert_ttl_s); }
    if let Some(v) = var("PURGE_INTERVAL_S") { c.purge_interval_s = v.parse().unwrap_or(c.purge_interval_s); }
    c
}

/// Vida de una alerta según `ALERTA_TTL_S`; un valor que no cabe en un
/// `TimeDelta` es un error de arranque.
pub fn alert_ttl(cfg: &AppCfg) -> Result<TimeDelta> {
    let secs = i64::try_from(cfg.alert_ttl_s)
        .with_context(|| format!("ALERTA_TTL_S fuera de rango: {}", cfg.alert_ttl_s))?;
    TimeDelta::try_seconds(secs).with_context(|| format!("ALERTA_TTL_S fuera de rango: {secs}"))
}

/// Configuración del binario `visor`.
#[derive(Clone, Debug)]
pub struct VisorCfg {
    /// URL base del backend
    pub url: String,
    /// Fichero donde se guardan las preferencias de filtro
    pub prefs_path: String,
    pub refresh: Duration,
    /// Posición fija del "dispositivo" (sin ella, la geolocalización no está disponible)
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Default for VisorCfg {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".into(),
            prefs_path: ".visor_prefs.json".into(),
            refresh: DEFAULT_PERIOD,
            lat: None,
            lng: None,
        }
    }
}

pub fn visor_cfg_from_env() -> VisorCfg {
    visor_cfg_from(|k| env::var(k).ok())
}

pub fn visor_cfg_from(var: impl Fn(&str) -> Option<String>) -> VisorCfg {
    let mut c = VisorCfg::default();
    if let Some(v) = var("VISOR_URL") { c.url = v; }
    if let Some(v) = var("VISOR_PREFS") { c.prefs_path = v; }
    if let Some(v) = var("VISOR_REFRESH_S") {
        if let Ok(s) = v.parse::<u64>() { c.refresh = Duration::from_secs(s.max(1)); }
    }
    c.lat = var("VISOR_LAT").and_then(|v| v.parse().ok());
    c.lng = var("VISOR_LNG").and_then(|v| v.parse().ok());
    c
}
