//! presenter.rs
//!
//! Presentación de alertas del visor.
//!
//! - `AlertPanel`: lo último descargado (`all_alerts`), las preferencias de
//!   filtro y lo pintado. Cada carga hace su ciclo completo descarga→pintado;
//!   si dos se solapan gana la última en terminar. En vista de ruta no pinta
//! - `AlertPresenter`: además, vista ruta/alertas con su refresco periódico,
//!   el modo reporte con el modal y la geolocalización
//!
//! Modo reporte: Idle -> Armed (botón) -> Idle (clic en mapa, se abre el modal)
//! -> Idle (modal cerrado o enviado). Solo un modal a la vez.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::api::AlertsApi;
use super::categorias::ICON_DEFAULT;
use super::error::{ClientError, GeolocationError};
use super::filtros::{visible_alerts, FilterPreferences, PreferenceStorage};
use super::geo::{Geolocator, Position};
use super::modal::{Key, KeyOutcome, ReportModal};
use super::overlay::RouteOverlay;
use super::refresco::{RefreshTimer, DEFAULT_PERIOD};
use super::render::{list_entry_for, marker_for, AlertMarker, Control, Cursor, MapView, ZOOM_DETALLE};
use crate::models::types::{Alerta, NuevaAlerta};

pub const MSG_CLIC_MAPA: &str = "Haz clic en el mapa para seleccionar la ubicación de la alerta.";
pub const MSG_GRACIAS: &str = "¡Gracias! Tu reporte ha sido enviado.";
pub const MSG_ERROR_REPORTE: &str = "Hubo un problema al enviar tu reporte. Por favor, inténtalo de nuevo.";
pub const MSG_SIN_GEO: &str = "Tu navegador no soporta la geolocalización.";
pub const POPUP_USUARIO: &str = "<b>¡Estás aquí!</b>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportMode {
    Idle,
    Armed,
}

#[derive(Debug, Default)]
struct PanelState {
    all_alerts: Vec<Alerta>,
    prefs: FilterPreferences,
    rendered: Vec<AlertMarker>,
    /// En vista de ruta no se pintan alertas
    route_view: bool,
}

/// Alertas + filtros + pintado. Es lo único que toca el refresco periódico.
#[derive(Clone)]
pub struct AlertPanel {
    api: Arc<dyn AlertsApi>,
    view: Arc<dyn MapView>,
    storage: Arc<dyn PreferenceStorage>,
    state: Arc<Mutex<PanelState>>,
    /// Sube con cada cambio de vista; una descarga que empezó antes ya no pinta
    view_gen: Arc<AtomicU64>,
}

impl AlertPanel {
    pub fn new(api: Arc<dyn AlertsApi>, view: Arc<dyn MapView>, storage: Arc<dyn PreferenceStorage>) -> Self {
        Self {
            api,
            view,
            storage,
            state: Arc::new(Mutex::new(PanelState::default())),
            view_gen: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Descarga las alertas activas y repinta con el filtro vigente.
    /// Si la descarga falla solo se registra: lo pintado se queda como estaba.
    /// En vista de ruta, o si la vista cambió durante la descarga, el resultado
    /// se descarta.
    pub async fn load_traffic_alerts(&self) -> Result<usize, ClientError> {
        let gen = self.view_gen.load(Ordering::SeqCst);
        self.view.set_spinner(true);
        let res = self.api.fetch_active().await;
        self.view.set_spinner(false);
        match res {
            Ok(list) => {
                let n = list.len();
                let mut st = self.state.lock().await;
                if st.route_view || self.view_gen.load(Ordering::SeqCst) != gen {
                    debug!("descarga de alertas descartada: vista de ruta");
                    return Ok(n);
                }
                st.all_alerts = list;
                self.render_visible(&mut st);
                Ok(n)
            }
            Err(e) => {
                warn!("Error al cargar las alertas de tráfico: {e}");
                Err(e)
            }
        }
    }

    /// Repinta con el filtro vigente; en vista de ruta no hay nada que repintar.
    pub async fn apply_alert_filters(&self) {
        let mut st = self.state.lock().await;
        if st.route_view {
            return;
        }
        self.render_visible(&mut st);
    }

    /// Pinta exactamente `subset` (marcadores + lista).
    pub async fn render_alerts(&self, subset: &[Alerta]) {
        let mut st = self.state.lock().await;
        self.render_into(&mut st, subset);
    }

    fn render_visible(&self, st: &mut PanelState) {
        let subset: Vec<Alerta> = visible_alerts(&st.all_alerts, &st.prefs).into_iter().cloned().collect();
        self.render_into(st, &subset);
    }

    fn render_into(&self, st: &mut PanelState, subset: &[Alerta]) {
        self.view.clear_alerts();
        st.rendered.clear();

        // panel visible si hubo alertas en la descarga, aunque el filtro las oculte todas
        self.view.set_panel_visible(!st.all_alerts.is_empty());

        let now = Utc::now();
        for a in subset {
            let marker = marker_for(a, now);
            self.view.add_marker(&marker);
            self.view.add_list_entry(&list_entry_for(a, now));
            st.rendered.push(marker);
        }
    }

    /// Clic en una entrada de la lista: centra el mapa y abre el popup.
    pub async fn select_alert(&self, alert_id: u64) -> bool {
        let st = self.state.lock().await;
        let Some(m) = st.rendered.iter().find(|m| m.alert_id == alert_id) else { return false };
        self.view.set_view(m.lat, m.lng, ZOOM_DETALLE);
        self.view.open_popup(alert_id);
        true
    }

    /// Vacía la capa de alertas, oculta el panel e invalida las descargas en curso.
    async fn enter_route_view(&self) {
        let mut st = self.state.lock().await;
        self.view_gen.fetch_add(1, Ordering::SeqCst);
        st.route_view = true;
        st.rendered.clear();
        self.view.clear_alerts();
        self.view.set_panel_visible(false);
    }

    async fn enter_alert_view(&self) {
        let mut st = self.state.lock().await;
        self.view_gen.fetch_add(1, Ordering::SeqCst);
        st.route_view = false;
    }

    pub async fn load_filter_preferences(&self) {
        let prefs = FilterPreferences::load(self.storage.as_ref());
        self.state.lock().await.prefs = prefs;
    }

    pub async fn save_filter_preferences(&self) {
        let st = self.state.lock().await;
        if let Err(e) = st.prefs.save(self.storage.as_ref()) {
            warn!("no se pudieron guardar las preferencias de filtro: {e}");
        }
    }

    /// Cambio de una casilla: se guarda y se aplica al momento.
    pub async fn set_filter(&self, tipo: &str, shown: bool) {
        self.state.lock().await.prefs.set(tipo, shown);
        self.save_filter_preferences().await;
        self.apply_alert_filters().await;
    }

    pub async fn filter_preferences(&self) -> FilterPreferences {
        self.state.lock().await.prefs.clone()
    }

    pub async fn all_alerts(&self) -> Vec<Alerta> {
        self.state.lock().await.all_alerts.clone()
    }
}

#[derive(Debug)]
struct ReportState {
    mode: ReportMode,
    modal: ReportModal,
    focus: Option<Control>,
}

#[derive(Clone)]
pub struct AlertPresenter {
    panel: AlertPanel,
    api: Arc<dyn AlertsApi>,
    view: Arc<dyn MapView>,
    geolocator: Arc<dyn Geolocator>,
    refresh: Arc<Mutex<RefreshTimer>>,
    report: Arc<Mutex<ReportState>>,
    refresh_period: Duration,
}

impl AlertPresenter {
    pub fn new(
        api: Arc<dyn AlertsApi>,
        view: Arc<dyn MapView>,
        storage: Arc<dyn PreferenceStorage>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            panel: AlertPanel::new(api.clone(), view.clone(), storage),
            api,
            view,
            geolocator,
            refresh: Arc::new(Mutex::new(RefreshTimer::default())),
            report: Arc::new(Mutex::new(ReportState {
                mode: ReportMode::Idle,
                modal: ReportModal::default(),
                focus: None,
            })),
            refresh_period: DEFAULT_PERIOD,
        }
    }

    pub fn with_refresh_period(mut self, period: Duration) -> Self {
        self.refresh_period = period;
        self
    }

    pub fn panel(&self) -> &AlertPanel { &self.panel }

    /// Arranque: preferencias guardadas y la ruta como vista inicial.
    pub async fn init(&self) -> Result<RouteOverlay, ClientError> {
        self.panel.load_filter_preferences().await;
        self.show_routes().await
    }

    // --------------------------------------
    // Vista ruta / vista alertas
    // --------------------------------------

    /// Pasa a la vista de ruta: para el refresco, limpia las alertas y pinta la línea.
    pub async fn show_routes(&self) -> Result<RouteOverlay, ClientError> {
        self.refresh.lock().await.stop();
        self.panel.enter_route_view().await;

        let overlay = self.api.fetch_route().await.and_then(RouteOverlay::from_geojson);
        match overlay {
            Ok(ov) => {
                self.view.clear_route();
                self.view.draw_route(&ov);
                info!("ruta pintada: {} trazos, {} estaciones", ov.lines.len(), ov.stations.len());
                Ok(ov)
            }
            Err(e) => {
                warn!("Error al cargar la ruta del monorriel: {e}");
                Err(e)
            }
        }
    }

    /// Pasa a la vista de alertas: carga inmediata y refresco periódico
    /// (sustituye a cualquier refresco anterior).
    pub async fn show_alerts(&self) {
        // el temporizador queda armado antes de la primera descarga: un
        // `show_routes` durante esa descarga lo encuentra y lo para
        self.panel.enter_alert_view().await;
        let panel = self.panel.clone();
        self.refresh.lock().await.start(self.refresh_period, move || {
            let panel = panel.clone();
            async move {
                let _ = panel.load_traffic_alerts().await;
            }
        });
        let _ = self.panel.load_traffic_alerts().await;
    }

    pub async fn refresh_active(&self) -> bool { self.refresh.lock().await.is_active() }

    pub async fn stop_refresh(&self) -> bool { self.refresh.lock().await.stop() }

    // --------------------------------------
    // Reporte
    // --------------------------------------

    pub async fn report_mode(&self) -> ReportMode { self.report.lock().await.mode }

    pub async fn modal_open(&self) -> bool { self.report.lock().await.modal.is_open() }

    /// Botón "reportar". Ignorado si ya está armado o hay un modal abierto.
    pub async fn arm_report(&self) -> bool {
        let mut r = self.report.lock().await;
        if r.mode == ReportMode::Armed || r.modal.is_open() {
            return false;
        }
        r.mode = ReportMode::Armed;
        r.focus = Some(Control::ReportButton);
        self.view.set_cursor(Cursor::Crosshair);
        self.view.notify(MSG_CLIC_MAPA);
        true
    }

    /// Clic en el mapa. Solo cuenta si el modo reporte está armado (un único clic).
    pub async fn on_map_click(&self, lat: f64, lng: f64) -> bool {
        let mut r = self.report.lock().await;
        if r.mode != ReportMode::Armed {
            return false;
        }
        r.mode = ReportMode::Idle;
        let previous = r.focus.take();
        let target = r.modal.open(lat, lng, previous);
        self.view.open_modal(lat, lng);
        self.view.set_cursor(Cursor::Default);
        self.view.focus(&target);
        r.focus = Some(target);
        true
    }

    /// Clic sobre un control. Con el modal abierto, el fondo y la X lo cierran.
    pub async fn on_click(&self, control: Control) {
        let open = self.report.lock().await.modal.is_open();
        match control {
            Control::ModalBackdrop | Control::ModalClose if open => self.close_report().await,
            Control::ModalBackdrop => {}
            other => self.focus_changed(other).await,
        }
    }

    /// El usuario movió el foco (clic o similar).
    pub async fn focus_changed(&self, control: Control) {
        let mut r = self.report.lock().await;
        if r.modal.is_open() && !r.modal.set_focus(&control) {
            // fuera del modal no se puede: se queda donde estaba
            if let Some(c) = r.modal.focused().cloned() {
                self.view.focus(&c);
            }
            return;
        }
        r.focus = Some(control);
    }

    pub async fn modal_key(&self, key: Key) {
        let outcome = self.report.lock().await.modal.handle_key(key);
        match outcome {
            KeyOutcome::Focus(c) => {
                self.view.focus(&c);
                self.report.lock().await.focus = Some(c);
            }
            KeyOutcome::Close => self.close_report().await,
            KeyOutcome::Ignored => {}
        }
    }

    /// Cierra el modal, limpia el formulario y devuelve el foco a donde estaba.
    pub async fn close_report(&self) {
        let mut r = self.report.lock().await;
        r.mode = ReportMode::Idle;
        if !r.modal.is_open() {
            return;
        }
        let restore = r.modal.close();
        self.view.close_modal();
        if let Some(c) = restore {
            self.view.focus(&c);
            r.focus = Some(c);
        }
    }

    /// Envía el formulario del modal. Si va bien se cierra y se recargan las alertas;
    /// si falla se avisa y el modal sigue abierto.
    pub async fn submit_report(&self, descripcion: &str, tipo: &str) -> Result<Alerta, ClientError> {
        let (lat, lng) = self.report.lock().await.modal.coords().ok_or(ClientError::NoOpenReport)?;
        let input = NuevaAlerta::new(lat, lng, tipo, descripcion);
        match self.api.create(&input).await {
            Ok(alerta) => {
                self.close_report().await;
                self.view.notify(MSG_GRACIAS);
                let _ = self.panel.load_traffic_alerts().await;
                Ok(alerta)
            }
            Err(e) => {
                warn!("Error en el reporte: {e}");
                self.view.notify(MSG_ERROR_REPORTE);
                Err(e)
            }
        }
    }

    // --------------------------------------
    // Geolocalización
    // --------------------------------------

    pub async fn locate(&self) -> Result<Position, GeolocationError> {
        match self.geolocator.current_position().await {
            Ok(p) => {
                self.view.set_view(p.lat, p.lng, ZOOM_DETALLE);
                self.view.add_user_marker(p.lat, p.lng, &ICON_DEFAULT, POPUP_USUARIO);
                Ok(p)
            }
            Err(e) => {
                let msg = match &e {
                    GeolocationError::Unsupported => MSG_SIN_GEO.to_string(),
                    other => format!("No se pudo obtener tu ubicación. Error: {other}"),
                };
                self.view.notify(&msg);
                Err(e)
            }
        }
    }
}
