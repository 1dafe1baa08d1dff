//! terminal.rs
//! `MapView` de texto para el binario `visor`: en vez de un mapa escribe por
//! stdout lo que se pintaría.

use std::io::Write;

use super::categorias::IconSpec;
use super::overlay::RouteOverlay;
use super::render::{AlertMarker, Control, Cursor, ListEntry, MapView};

#[derive(Debug, Default)]
pub struct TerminalView;

/// Quita las etiquetas HTML de popups y entradas de la lista.
pub fn strip_tags(html: &str) -> String {
    let html = html.replace("<br>", " · ");
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn line(s: impl AsRef<str>) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{}", s.as_ref());
}

impl MapView for TerminalView {
    fn set_spinner(&self, visible: bool) {
        if visible {
            line("… cargando alertas");
        }
    }

    fn set_panel_visible(&self, visible: bool) {
        if !visible {
            line("(sin alertas activas)");
        }
    }

    fn clear_alerts(&self) {
        line("──────── alertas ────────");
    }

    fn add_marker(&self, m: &AlertMarker) {
        line(format!("[{:>4}] ({:.5}, {:.5}) icono {}", m.alert_id, m.lat, m.lng, m.icon.color));
    }

    fn add_list_entry(&self, e: &ListEntry) {
        line(format!("       {}", strip_tags(&e.label)));
    }

    fn clear_route(&self) {}

    fn draw_route(&self, ov: &RouteOverlay) {
        line("──────── Línea 1 ────────");
        for l in &ov.lines {
            let name = l.popup.as_deref().map(strip_tags).unwrap_or_else(|| "trazado".into());
            line(format!("{name}: {} puntos, color {}", l.coordinates.len(), l.style.color));
        }
        for s in &ov.stations {
            let name = s.popup.as_deref().map(strip_tags).unwrap_or_default();
            line(format!("  ● ({:.5}, {:.5}) {name}", s.lat, s.lng));
        }
    }

    fn set_view(&self, lat: f64, lng: f64, zoom: u8) {
        line(format!("mapa centrado en ({lat:.5}, {lng:.5}) zoom {zoom}"));
    }

    fn open_popup(&self, alert_id: u64) {
        line(format!("popup de la alerta {alert_id}"));
    }

    fn add_user_marker(&self, lat: f64, lng: f64, _icon: &'static IconSpec, popup: &str) {
        line(format!("{} ({lat:.5}, {lng:.5})", strip_tags(popup)));
    }

    fn set_cursor(&self, _cursor: Cursor) {}

    fn open_modal(&self, lat: f64, lng: f64) {
        line(format!("nuevo reporte en ({lat:.5}, {lng:.5})"));
    }

    fn close_modal(&self) {}

    fn focus(&self, _control: &Control) {}

    fn notify(&self, message: &str) {
        line(format!("» {message}"));
    }
}
