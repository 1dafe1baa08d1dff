//! overlay.rs
//! Convierte el GeoJSON de la Línea 1 en la capa que pinta el visor:
//! trazado(s) con estilo y estaciones con su popup

use geojson::{Feature, GeoJson, Value};

use super::error::ClientError;

pub const COLOR_LINEA_DEFAULT: &str = "#ff0000";

#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub weight: u8,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteLine {
    /// [lon, lat] como en GeoJSON
    pub coordinates: Vec<[f64; 2]>,
    pub style: LineStyle,
    pub popup: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub lat: f64,
    pub lng: f64,
    pub popup: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteOverlay {
    pub lines: Vec<RouteLine>,
    pub stations: Vec<Station>,
}

impl RouteOverlay {
    pub fn from_geojson(doc: serde_json::Value) -> Result<Self, ClientError> {
        let gj = GeoJson::from_json_value(doc).map_err(|e| ClientError::Decode(e.to_string()))?;
        let features = match gj {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(g) => vec![Feature { geometry: Some(g), ..Default::default() }],
        };

        let mut out = RouteOverlay::default();
        for f in &features {
            let Some(geom) = &f.geometry else { continue };
            let popup = popup_for(f);
            match &geom.value {
                Value::LineString(coords) => out.lines.push(RouteLine {
                    coordinates: to_pairs(coords),
                    style: style_for(f),
                    popup,
                }),
                Value::MultiLineString(parts) => {
                    for coords in parts {
                        out.lines.push(RouteLine {
                            coordinates: to_pairs(coords),
                            style: style_for(f),
                            popup: popup.clone(),
                        });
                    }
                }
                Value::Point(p) if p.len() >= 2 => out.stations.push(Station { lat: p[1], lng: p[0], popup }),
                _ => {}
            }
        }
        Ok(out)
    }
}

fn to_pairs(coords: &[Vec<f64>]) -> Vec<[f64; 2]> {
    coords.iter().filter(|p| p.len() >= 2).map(|p| [p[0], p[1]]).collect()
}

fn style_for(f: &Feature) -> LineStyle {
    let color = f
        .property("color")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(COLOR_LINEA_DEFAULT);
    LineStyle { color: color.to_string(), weight: 5, opacity: 0.8 }
}

/// `<b>nombre</b>` + horario + interconexiones, solo si la feature tiene nombre.
fn popup_for(f: &Feature) -> Option<String> {
    let name = f.property("name").and_then(|v| v.as_str()).filter(|s| !s.is_empty())?;
    let mut html = format!("<b>{name}</b>");
    if let Some(h) = f.property("horario").and_then(|v| v.as_str()).filter(|s| !s.is_empty()) {
        html.push_str(&format!("<br>Horario: {h}"));
    }
    match f.property("interconexion") {
        Some(serde_json::Value::Array(items)) if !items.is_empty() => {
            let names: Vec<String> = items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect();
            html.push_str(&format!("<br>Interconexión: {}", names.join(", ")));
        }
        Some(serde_json::Value::String(s)) if !s.is_empty() => {
            html.push_str(&format!("<br>Interconexión: {s}"));
        }
        _ => {}
    }
    Some(html)
}
