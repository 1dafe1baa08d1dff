//! modal.rs
//! Modal de reporte con foco atrapado: mientras está abierto el foco no sale
//! de sus controles, y al cerrarse vuelve a donde estaba antes de abrirlo

use super::render::Control;

/// Orden de tabulación dentro del modal.
pub static FOCUSABLES: [Control; 4] =
    [Control::ModalClose, Control::ModalDescripcion, Control::ModalTipo, Control::ModalSubmit];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Tab,
    ShiftTab,
    Escape,
}

/// Qué debe hacer el presentador tras una tecla.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Focus(Control),
    Close,
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct ReportModal {
    open: Option<OpenModal>,
}

#[derive(Clone, Debug)]
struct OpenModal {
    lat: f64,
    lng: f64,
    focused: usize,
    previously_focused: Option<Control>,
}

impl ReportModal {
    pub fn is_open(&self) -> bool { self.open.is_some() }

    /// Coordenadas del clic que abrió el modal.
    pub fn coords(&self) -> Option<(f64, f64)> {
        self.open.as_ref().map(|m| (m.lat, m.lng))
    }

    pub fn focused(&self) -> Option<&Control> {
        self.open.as_ref().map(|m| &FOCUSABLES[m.focused])
    }

    /// Abre en (lat, lng). Devuelve el control que recibe el foco (el botón de cierre).
    pub fn open(&mut self, lat: f64, lng: f64, previously_focused: Option<Control>) -> Control {
        self.open = Some(OpenModal { lat, lng, focused: 0, previously_focused });
        FOCUSABLES[0].clone()
    }

    /// Cierra y devuelve el control al que hay que restituir el foco.
    pub fn close(&mut self) -> Option<Control> {
        self.open.take().and_then(|m| m.previously_focused)
    }

    /// El usuario movió el foco con el ratón a otro control del modal.
    pub fn set_focus(&mut self, control: &Control) -> bool {
        let Some(m) = self.open.as_mut() else { return false };
        match FOCUSABLES.iter().position(|c| c == control) {
            Some(i) => {
                m.focused = i;
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let Some(m) = self.open.as_mut() else { return KeyOutcome::Ignored };
        let last = FOCUSABLES.len() - 1;
        match key {
            Key::Escape => KeyOutcome::Close,
            Key::Tab => {
                m.focused = if m.focused == last { 0 } else { m.focused + 1 };
                KeyOutcome::Focus(FOCUSABLES[m.focused].clone())
            }
            Key::ShiftTab => {
                m.focused = if m.focused == 0 { last } else { m.focused - 1 };
                KeyOutcome::Focus(FOCUSABLES[m.focused].clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_wraps_from_last_to_first() {
        let mut m = ReportModal::default();
        assert_eq!(m.open(19.45, -70.7, Some(Control::Map)), Control::ModalClose);
        assert_eq!(m.handle_key(Key::Tab), KeyOutcome::Focus(Control::ModalDescripcion));
        assert_eq!(m.handle_key(Key::Tab), KeyOutcome::Focus(Control::ModalTipo));
        assert_eq!(m.handle_key(Key::Tab), KeyOutcome::Focus(Control::ModalSubmit));
        assert_eq!(m.handle_key(Key::Tab), KeyOutcome::Focus(Control::ModalClose));
    }

    #[test]
    fn shift_tab_wraps_from_first_to_last() {
        let mut m = ReportModal::default();
        m.open(0.0, 0.0, None);
        assert_eq!(m.handle_key(Key::ShiftTab), KeyOutcome::Focus(Control::ModalSubmit));
        assert_eq!(m.focused(), Some(&Control::ModalSubmit));
    }

    #[test]
    fn escape_requests_close_and_close_restores_focus() {
        let mut m = ReportModal::default();
        m.open(1.0, 2.0, Some(Control::ReportButton));
        assert_eq!(m.coords(), Some((1.0, 2.0)));
        assert_eq!(m.handle_key(Key::Escape), KeyOutcome::Close);
        assert_eq!(m.close(), Some(Control::ReportButton));
        assert!(!m.is_open());
        assert_eq!(m.handle_key(Key::Tab), KeyOutcome::Ignored);
    }

    #[test]
    fn pointer_focus_only_inside_modal() {
        let mut m = ReportModal::default();
        m.open(0.0, 0.0, None);
        assert!(m.set_focus(&Control::ModalTipo));
        assert!(!m.set_focus(&Control::LocateButton));
        assert_eq!(m.handle_key(Key::Tab), KeyOutcome::Focus(Control::ModalSubmit));
    }
}
