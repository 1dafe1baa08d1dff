//! render.rs
//!
//! Lo que el visor le pide al mapa. El presentador decide *qué* se pinta y la
//! implementación de `MapView` (Leaflet, terminal, o una grabadora en tests)
//! decide *cómo*.

use chrono::{DateTime, Utc};

use super::categorias::{capitalize, icon_for, IconSpec};
use super::overlay::RouteOverlay;
use crate::models::types::Alerta;

/// Zoom al centrar el mapa en una alerta o en la posición del usuario.
pub const ZOOM_DETALLE: u8 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
}

/// Controles que pueden recibir el foco.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Map,
    ReportButton,
    LocateButton,
    ModalClose,
    /// Fondo oscuro alrededor del modal
    ModalBackdrop,
    ModalDescripcion,
    ModalTipo,
    ModalSubmit,
    Other(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlertMarker {
    pub alert_id: u64,
    pub lat: f64,
    pub lng: f64,
    pub icon: &'static IconSpec,
    pub popup: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
    pub alert_id: u64,
    pub label: String,
}

pub trait MapView: Send + Sync {
    fn set_spinner(&self, visible: bool);
    fn set_panel_visible(&self, visible: bool);
    /// Vacía la capa de alertas y la lista del panel.
    fn clear_alerts(&self);
    fn add_marker(&self, marker: &AlertMarker);
    fn add_list_entry(&self, entry: &ListEntry);
    fn clear_route(&self);
    fn draw_route(&self, overlay: &RouteOverlay);
    fn set_view(&self, lat: f64, lng: f64, zoom: u8);
    fn open_popup(&self, alert_id: u64);
    fn add_user_marker(&self, lat: f64, lng: f64, icon: &'static IconSpec, popup: &str);
    fn set_cursor(&self, cursor: Cursor);
    fn open_modal(&self, lat: f64, lng: f64);
    fn close_modal(&self);
    fn focus(&self, control: &Control);
    /// Mensaje directo al usuario (el `alert()` del navegador).
    fn notify(&self, message: &str);
}

pub fn marker_for(a: &Alerta, now: DateTime<Utc>) -> AlertMarker {
    AlertMarker {
        alert_id: a.id,
        lat: a.lat,
        lng: a.lng,
        icon: icon_for(&a.tipo),
        popup: format!(
            "<b>Alerta: {}</b><br>{}<br><small>{}</small>",
            capitalize(&a.tipo),
            a.descripcion,
            time_ago(a.created_at, now)
        ),
    }
}

pub fn list_entry_for(a: &Alerta, now: DateTime<Utc>) -> ListEntry {
    ListEntry {
        alert_id: a.id,
        label: format!(
            "<strong>{}:</strong> {}<br><small>{}</small>",
            capitalize(&a.tipo),
            a.descripcion,
            time_ago(a.created_at, now)
        ),
    }
}

/// Etiqueta relativa "hace N unidades". Cada unidad exige superar 1 estrictamente.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = ((now - created_at).num_milliseconds() / 1000).max(0) as f64;
    const UNITS: [(f64, &str); 5] = [
        (31_536_000.0, "años"),
        (2_592_000.0, "meses"),
        (86_400.0, "días"),
        (3_600.0, "horas"),
        (60.0, "minutos"),
    ];
    for (secs, name) in UNITS {
        let interval = seconds / secs;
        if interval > 1.0 {
            return format!("hace {} {name}", interval.floor() as u64);
        }
    }
    format!("hace {} segundos", seconds as u64)
}
