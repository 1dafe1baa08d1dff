//! Rutas HTTP del backend sobre el `Router` en memoria.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use monorriel_alertas::models::types::AppCfg;
use monorriel_alertas::server::api::{router, ApiState};
use monorriel_alertas::store::AlertStore;

const LINEA1: &str = r##"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"name":"Línea 1","color":"#0055aa"},"geometry":{"type":"LineString","coordinates":[[-70.71,19.44],[-70.69,19.46]]}}]}"##;

struct App {
    _dir: TempDir,
    cfg: AppCfg,
    store: Arc<AlertStore>,
}

impl App {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("js")).unwrap();
        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(root.join("js/map.js"), "console.log('mapa');").unwrap();
        std::fs::write(root.join("data/linea1_monorriel.geojson"), LINEA1).unwrap();
        std::fs::write(root.join("index.html"), "<html><body><div id=\"map\"></div></body></html>").unwrap();

        let cfg = AppCfg {
            route_path: root.join("data/linea1_monorriel.geojson").display().to_string(),
            js_dir: root.join("js").display().to_string(),
            data_dir: root.join("data").display().to_string(),
            index_path: root.join("index.html").display().to_string(),
            ..AppCfg::default()
        };
        Self { _dir: dir, cfg, store: Arc::new(AlertStore::default()) }
    }

    fn router(&self) -> Router {
        router(ApiState::new(self.store.clone(), &self.cfg), &self.cfg)
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/alertas")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_returns_201_with_assigned_fields() {
    let app = App::new();
    let before = Utc::now();
    let (status, body) = send(
        app.router(),
        post_json(json!({"lat": 19.45, "lng": -70.7, "descripcion": "bloqueo", "tipo": "obra"})),
    )
    .await;
    let after = Utc::now();

    assert_eq!(status, StatusCode::CREATED);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["lat"], 19.45);
    assert_eq!(v["lng"], -70.7);
    assert_eq!(v["descripcion"], "bloqueo");
    assert_eq!(v["tipo"], "obra");
    assert!(v["id"].is_u64());
    let created: DateTime<Utc> = v["createdAt"].as_str().unwrap().parse().unwrap();
    assert!(created >= before && created <= after);
}

#[tokio::test]
async fn create_without_descripcion_is_400() {
    let app = App::new();
    let (status, body) =
        send(app.router(), post_json(json!({"lat": 19.45, "lng": -70.7, "tipo": "obra"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["message"], "Faltan datos para crear la alerta.");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn unparsable_body_is_400_with_message() {
    let app = App::new();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/alertas")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"lat\": \"norte\""))
        .unwrap();
    let (status, body) = send(app.router(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert!(v["message"].is_string());
}

#[tokio::test]
async fn list_returns_active_alerts_in_insertion_order() {
    let app = App::new();
    for (tipo, desc) in [("accidente", "choque"), ("obra", "zanja"), ("congestion", "tapón")] {
        let (status, _) =
            send(app.router(), post_json(json!({"lat": 19.4, "lng": -70.6, "descripcion": desc, "tipo": tipo}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, body) = send(app.router(), get("/api/alertas")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let tipos: Vec<&str> = v.iter().map(|a| a["tipo"].as_str().unwrap()).collect();
    assert_eq!(tipos, ["accidente", "obra", "congestion"]);
    for a in &v {
        for k in ["id", "lat", "lng", "tipo", "descripcion", "createdAt"] {
            assert!(a.get(k).is_some(), "falta {k}");
        }
    }
}

#[tokio::test]
async fn expired_alerts_are_not_listed() {
    let app = App::new();
    let input = monorriel_alertas::models::types::NuevaAlerta::new(19.4, -70.6, "obra", "vieja");
    app.store.create_at(input, Utc::now() - chrono::TimeDelta::hours(2)).await.unwrap();
    let (_, body) = send(app.router(), get("/api/alertas")).await;
    let v: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert!(v.is_empty());
}

#[tokio::test]
async fn route_is_served_verbatim() {
    let app = App::new();
    let (status, body) = send(app.router(), get("/api/rutas/monorriel/linea1")).await;
    assert_eq!(status, StatusCode::OK);
    let got: Value = serde_json::from_slice(&body).unwrap();
    let want: Value = serde_json::from_str(LINEA1).unwrap();
    assert_eq!(got, want);
}

#[tokio::test]
async fn broken_route_is_500_with_message() {
    let app = App::new();
    std::fs::write(&app.cfg.route_path, "{ roto").unwrap();
    let (status, body) = send(app.router(), get("/api/rutas/monorriel/linea1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["message"], "Error interno del servidor al obtener la ruta.");

    std::fs::remove_file(&app.cfg.route_path).unwrap();
    let (status, _) = send(app.router(), get("/api/rutas/monorriel/linea1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn static_assets_and_root_document() {
    let app = App::new();
    let (status, body) = send(app.router(), get("/js/map.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('mapa');");

    let (status, _) = send(app.router(), get("/data/linea1_monorriel.geojson")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app.router(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("id=\"map\""));

    let (status, body) = send(app.router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}
