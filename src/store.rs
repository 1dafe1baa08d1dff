//! store.rs
//! Almacén en memoria de las alertas reportadas.
//!
//! - Vive lo que vive el proceso: un reinicio descarta todas las alertas
//! - Se inyecta en los handlers como estado de Axum (no hay global)
//! - "Activa" = más joven que la ventana de vida. La expiración es un filtro
//!   de consulta: las alertas viejas siguen guardadas salvo que se purguen

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::ApiError;
use crate::models::types::{Alerta, NuevaAlerta};

/// Vida de una alerta: 1 hora.
pub fn default_ttl() -> TimeDelta { TimeDelta::hours(1) }

#[derive(Debug)]
pub struct AlertStore {
    inner: RwLock<Inner>,
    ttl: TimeDelta,
}

#[derive(Debug)]
struct Inner {
    alertas: Vec<Alerta>,
    next_id: u64,
}

impl Default for AlertStore {
    fn default() -> Self { Self::new(default_ttl()) }
}

impl AlertStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self { inner: RwLock::new(Inner { alertas: Vec::new(), next_id: 1 }), ttl }
    }

    /// Registra una alerta con marca de tiempo "ahora".
    pub async fn create(&self, input: NuevaAlerta) -> Result<Alerta, ApiError> {
        self.create_at(input, Utc::now()).await
    }

    /// Igual que [`create`](Self::create) pero con el instante explícito.
    pub async fn create_at(&self, input: NuevaAlerta, now: DateTime<Utc>) -> Result<Alerta, ApiError> {
        let (lat, lng, tipo, descripcion) = validate(input)?;

        // id y push bajo el mismo lock: ids únicos y orden de inserción
        let mut g = self.inner.write().await;
        let alerta = Alerta { id: g.next_id, lat, lng, tipo, descripcion, created_at: now };
        g.next_id += 1;
        g.alertas.push(alerta.clone());
        drop(g);

        info!(id = alerta.id, tipo = %alerta.tipo, lat = alerta.lat, lng = alerta.lng, "nueva alerta recibida");
        Ok(alerta)
    }

    /// Alertas con `now - createdAt < ttl`, en orden de inserción.
    pub async fn list_active(&self, now: DateTime<Utc>) -> Vec<Alerta> {
        let g = self.inner.read().await;
        g.alertas.iter().filter(|a| is_active(a, now, self.ttl)).cloned().collect()
    }

    /// Borra las alertas expiradas. Devuelve cuántas se eliminaron.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut g = self.inner.write().await;
        let before = g.alertas.len();
        let ttl = self.ttl;
        g.alertas.retain(|a| is_active(a, now, ttl));
        before - g.alertas.len()
    }

    /// Total guardado, incluidas las expiradas que no se han purgado.
    pub async fn len(&self) -> usize { self.inner.read().await.alertas.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[inline]
fn is_active(a: &Alerta, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
    now - a.created_at < ttl
}

fn validate(input: NuevaAlerta) -> Result<(f64, f64, String, String), ApiError> {
    let mut faltan = Vec::new();
    let lat = input.lat.filter(|v| v.is_finite());
    let lng = input.lng.filter(|v| v.is_finite());
    let tipo = input.tipo.filter(|s| !s.is_empty());
    let descripcion = input.descripcion.filter(|s| !s.is_empty());
    if lat.is_none() { faltan.push("lat"); }
    if lng.is_none() { faltan.push("lng"); }
    if descripcion.is_none() { faltan.push("descripcion"); }
    if tipo.is_none() { faltan.push("tipo"); }

    match (lat, lng, tipo, descripcion) {
        (Some(lat), Some(lng), Some(tipo), Some(descripcion)) => Ok((lat, lng, tipo, descripcion)),
        _ => Err(ApiError::Validation(format!("faltan campos: {}", faltan.join(", ")))),
    }
}
