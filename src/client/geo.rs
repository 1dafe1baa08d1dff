//! geo.rs
//! Posición del dispositivo. El visor no conoce el GPS: pregunta a un `Geolocator`.

use async_trait::async_trait;

use super::error::GeolocationError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Posición configurada de antemano (p.ej. `VISOR_LAT`/`VISOR_LNG`).
/// Sin posición se comporta como un navegador sin geolocalización.
#[derive(Clone, Debug, Default)]
pub struct FixedGeolocator {
    pub position: Option<Position>,
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        self.position.ok_or(GeolocationError::Unsupported)
    }
}
