//! Dobles de prueba del visor: vista que graba y API sobre un `AlertStore` real.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::api::AlertsApi;
use super::categorias::IconSpec;
use super::error::ClientError;
use super::overlay::RouteOverlay;
use super::render::{AlertMarker, Control, Cursor, ListEntry, MapView};
use crate::models::types::{Alerta, NuevaAlerta};
use crate::store::AlertStore;

#[derive(Clone, Debug, PartialEq)]
pub enum Ev {
    Spinner(bool),
    Panel(bool),
    ClearAlerts,
    Marker(AlertMarker),
    Entry(ListEntry),
    ClearRoute,
    Route(RouteOverlay),
    View(f64, f64, u8),
    Popup(u64),
    UserMarker(f64, f64, String),
    Cursor(Cursor),
    OpenModal(f64, f64),
    CloseModal,
    Focus(Control),
    Notify(String),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Mutex<Vec<Ev>>,
}

impl RecordingView {
    fn push(&self, e: Ev) { self.events.lock().unwrap().push(e); }

    pub fn events(&self) -> Vec<Ev> { self.events.lock().unwrap().clone() }

    pub fn take(&self) -> Vec<Ev> { std::mem::take(&mut *self.events.lock().unwrap()) }

    /// Marcadores presentes tras el último `ClearAlerts`.
    pub fn markers(&self) -> Vec<AlertMarker> {
        let evs = self.events();
        let start = evs.iter().rposition(|e| *e == Ev::ClearAlerts).map(|i| i + 1).unwrap_or(0);
        evs[start..].iter().filter_map(|e| if let Ev::Marker(m) = e { Some(m.clone()) } else { None }).collect()
    }

    pub fn entries(&self) -> Vec<ListEntry> {
        let evs = self.events();
        let start = evs.iter().rposition(|e| *e == Ev::ClearAlerts).map(|i| i + 1).unwrap_or(0);
        evs[start..].iter().filter_map(|e| if let Ev::Entry(l) = e { Some(l.clone()) } else { None }).collect()
    }

    pub fn last_panel(&self) -> Option<bool> {
        self.events().iter().rev().find_map(|e| if let Ev::Panel(v) = e { Some(*v) } else { None })
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events().into_iter().filter_map(|e| if let Ev::Notify(m) = e { Some(m) } else { None }).collect()
    }

    pub fn last_focus(&self) -> Option<Control> {
        self.events().into_iter().rev().find_map(|e| if let Ev::Focus(c) = e { Some(c) } else { None })
    }
}

impl MapView for RecordingView {
    fn set_spinner(&self, visible: bool) { self.push(Ev::Spinner(visible)); }
    fn set_panel_visible(&self, visible: bool) { self.push(Ev::Panel(visible)); }
    fn clear_alerts(&self) { self.push(Ev::ClearAlerts); }
    fn add_marker(&self, marker: &AlertMarker) { self.push(Ev::Marker(marker.clone())); }
    fn add_list_entry(&self, entry: &ListEntry) { self.push(Ev::Entry(entry.clone())); }
    fn clear_route(&self) { self.push(Ev::ClearRoute); }
    fn draw_route(&self, overlay: &RouteOverlay) { self.push(Ev::Route(overlay.clone())); }
    fn set_view(&self, lat: f64, lng: f64, zoom: u8) { self.push(Ev::View(lat, lng, zoom)); }
    fn open_popup(&self, alert_id: u64) { self.push(Ev::Popup(alert_id)); }
    fn add_user_marker(&self, lat: f64, lng: f64, _icon: &'static IconSpec, popup: &str) {
        self.push(Ev::UserMarker(lat, lng, popup.to_string()));
    }
    fn set_cursor(&self, cursor: Cursor) { self.push(Ev::Cursor(cursor)); }
    fn open_modal(&self, lat: f64, lng: f64) { self.push(Ev::OpenModal(lat, lng)); }
    fn close_modal(&self) { self.push(Ev::CloseModal); }
    fn focus(&self, control: &Control) { self.push(Ev::Focus(control.clone())); }
    fn notify(&self, message: &str) { self.push(Ev::Notify(message.to_string())); }
}

/// API en proceso: las alertas viven en un `AlertStore` de verdad.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub store: AlertStore,
    pub route: Mutex<Option<serde_json::Value>>,
    pub offline: AtomicBool,
    pub fetches: AtomicUsize,
    /// Latencia simulada de `fetch_active`
    pub latency: Mutex<Option<Duration>>,
}

impl FakeApi {
    pub fn set_offline(&self, v: bool) { self.offline.store(v, Ordering::SeqCst); }

    pub fn set_latency(&self, d: Duration) { *self.latency.lock().unwrap() = Some(d); }

    pub fn fetch_count(&self) -> usize { self.fetches.load(Ordering::SeqCst) }

    fn check_online(&self) -> Result<(), ClientError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Decode("sin conexión".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AlertsApi for FakeApi {
    async fn fetch_active(&self) -> Result<Vec<Alerta>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        if let Some(d) = latency {
            tokio::time::sleep(d).await;
        }
        self.check_online()?;
        Ok(self.store.list_active(chrono::Utc::now()).await)
    }

    async fn create(&self, alerta: &NuevaAlerta) -> Result<Alerta, ClientError> {
        self.check_online()?;
        self.store.create(alerta.clone()).await.map_err(|e| ClientError::Status {
            status: e.status().as_u16(),
            url: "/api/alertas".into(),
            message: e.to_string(),
        })
    }

    async fn fetch_route(&self) -> Result<serde_json::Value, ClientError> {
        self.check_online()?;
        self.route
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Status { status: 500, url: "/api/rutas".into(), message: "sin ruta".into() })
    }
}
