//! Capa de presentación del visor: filtra, pinta y reporta alertas
//! hablando con el backend por HTTP.

pub mod api;
pub mod categorias;
pub mod error;
pub mod filtros;
pub mod geo;
pub mod modal;
pub mod overlay;
pub mod presenter;
pub mod refresco;
pub mod render;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{AlertsApi, HttpAlertsApi};
pub use error::{ClientError, GeolocationError};
pub use presenter::{AlertPanel, AlertPresenter, ReportMode};
pub use render::MapView;
