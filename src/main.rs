//! main.rs — Backend de alertas: API + estáticos (configuración por entorno)

use anyhow::{Context, Result};
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{signal, time::sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use monorriel_alertas::config::{alert_ttl, app_cfg_from_env};
use monorriel_alertas::models::types::AppCfg;
use monorriel_alertas::server::api::{self, ApiState};
use monorriel_alertas::store::AlertStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_cfg = app_cfg_from_env();
    let ttl = alert_ttl(&app_cfg)?;
    let store = Arc::new(AlertStore::new(ttl));

    // Purga opcional: por defecto las alertas expiradas se quedan en memoria
    if app_cfg.purge_interval_s > 0 {
        let store_c = store.clone();
        let cfg_c = app_cfg.clone();
        tokio::spawn(async move { purge_loop(store_c, cfg_c).await; });
    }

    // API
    let app = api::router(ApiState::new(store, &app_cfg), &app_cfg);
    info!("Backend escuchando en http://{}", app_cfg.bind);
    let listener = tokio::net::TcpListener::bind(&app_cfg.bind)
        .await
        .with_context(|| format!("no se pudo abrir {}", app_cfg.bind))?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}

async fn purge_loop(store: Arc<AlertStore>, cfg: AppCfg) {
    loop {
        sleep(Duration::from_secs(cfg.purge_interval_s)).await;
        let n = store.purge_expired(Utc::now()).await;
        if n > 0 {
            info!("purga: {n} alertas expiradas eliminadas");
        }
    }
}
