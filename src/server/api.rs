//! api.rs
//! Rutas HTTP: /health, /api/alertas (GET/POST), /api/rutas/monorriel/linea1
//! y los estáticos (/js, /data y el documento raíz)

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::models::types::{AppCfg, NuevaAlerta};
use crate::ruta::load_route;
use crate::store::AlertStore;

pub const PATH_ALERTAS: &str = "/api/alertas";
pub const PATH_RUTA_LINEA1: &str = "/api/rutas/monorriel/linea1";

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<AlertStore>,
    pub route_path: Arc<PathBuf>,
}

impl ApiState {
    pub fn new(store: Arc<AlertStore>, cfg: &AppCfg) -> Self {
        Self { store, route_path: Arc::new(PathBuf::from(&cfg.route_path)) }
    }
}

pub fn router(state: ApiState, cfg: &AppCfg) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(PATH_RUTA_LINEA1, get(get_linea1))
        .route(PATH_ALERTAS, get(list_alertas).post(create_alerta))
        .nest_service("/js", ServeDir::new(&cfg.js_dir))
        .nest_service("/data", ServeDir::new(&cfg.data_dir))
        .route_service("/", ServeFile::new(&cfg.index_path))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// GeoJSON de la Línea 1, sin transformar.
async fn get_linea1(State(st): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let gj = load_route(st.route_path.as_path()).await?;
    Ok(Json(gj))
}

async fn list_alertas(State(st): State<ApiState>) -> impl IntoResponse {
    Json(st.store.list_active(Utc::now()).await)
}

async fn create_alerta(
    State(st): State<ApiState>,
    payload: Result<Json<NuevaAlerta>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // cuerpo ilegible = mismos 400 que un campo ausente
    let Json(input) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let alerta = st.store.create(input).await?;
    Ok((StatusCode::CREATED, Json(alerta)))
}
