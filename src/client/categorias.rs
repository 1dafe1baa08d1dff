//! categorias.rs
//! Tabla única de categorías de alerta: etiqueta, casilla de filtro e icono.
//! Cualquier `tipo` fuera de la tabla usa el icono por defecto.

const SHADOW_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.7/images/marker-shadow.png";

/// Icono de marcador (mismas medidas para todas las categorías).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconSpec {
    pub color: &'static str,
    pub icon_url: &'static str,
    pub shadow_url: &'static str,
    pub icon_size: [u16; 2],
    pub icon_anchor: [i16; 2],
    pub popup_anchor: [i16; 2],
    pub shadow_size: [u16; 2],
}

const fn marker(color: &'static str, icon_url: &'static str) -> IconSpec {
    IconSpec {
        color,
        icon_url,
        shadow_url: SHADOW_URL,
        icon_size: [25, 41],
        icon_anchor: [12, 41],
        popup_anchor: [1, -34],
        shadow_size: [41, 41],
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Categoria {
    pub tipo: &'static str,
    pub icon: IconSpec,
}

pub static CATEGORIAS: [Categoria; 3] = [
    Categoria {
        tipo: "accidente",
        icon: marker("red", "https://cdn.rawgit.com/pointhi/leaflet-color-markers/master/img/marker-icon-red.png"),
    },
    Categoria {
        tipo: "congestion",
        icon: marker("yellow", "https://cdn.rawgit.com/pointhi/leaflet-color-markers/master/img/marker-icon-yellow.png"),
    },
    Categoria {
        tipo: "obra",
        icon: marker("orange", "https://cdn.rawgit.com/pointhi/leaflet-color-markers/master/img/marker-icon-orange.png"),
    },
];

/// Fallback para categorías desconocidas; también se usa para "¡Estás aquí!".
pub static ICON_DEFAULT: IconSpec =
    marker("blue", "https://cdn.rawgit.com/pointhi/leaflet-color-markers/master/img/marker-icon-blue.png");

pub fn icon_for(tipo: &str) -> &'static IconSpec {
    CATEGORIAS.iter().find(|c| c.tipo == tipo).map(|c| &c.icon).unwrap_or(&ICON_DEFAULT)
}

pub fn is_known(tipo: &str) -> bool {
    CATEGORIAS.iter().any(|c| c.tipo == tipo)
}

/// "obra" -> "Obra"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
