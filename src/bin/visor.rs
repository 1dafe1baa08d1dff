//! visor.rs
//! Visor de alertas en terminal contra un backend en marcha.
//! Uso:
//!   visor alertas                               alertas activas con el filtro guardado
//!   visor filtro <tipo> <si|no>                 cambia (y guarda) una casilla de filtro
//!   visor vigilar                               vista de alertas con refresco hasta Ctrl-C
//!   visor ruta                                  vista de arranque: trazado y estaciones de la Línea 1
//!   visor ir <id>                               centra el mapa en una alerta
//!   visor reportar <lat> <lng> <tipo> <texto…>  envía un reporte
//!   visor ubicar                                posición de VISOR_LAT/VISOR_LNG

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use monorriel_alertas::client::filtros::FileStorage;
use monorriel_alertas::client::geo::{FixedGeolocator, Position};
use monorriel_alertas::client::terminal::TerminalView;
use monorriel_alertas::client::{AlertPresenter, HttpAlertsApi};
use monorriel_alertas::config::visor_cfg_from_env;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cfg = visor_cfg_from_env();
    let position = match (cfg.lat, cfg.lng) {
        (Some(lat), Some(lng)) => Some(Position { lat, lng }),
        _ => None,
    };
    let api = HttpAlertsApi::new(&cfg.url).context("cliente HTTP")?;
    let p = AlertPresenter::new(
        Arc::new(api),
        Arc::new(TerminalView),
        Arc::new(FileStorage::new(&cfg.prefs_path)),
        Arc::new(FixedGeolocator { position }),
    )
    .with_refresh_period(cfg.refresh);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = args.first().map(String::as_str).unwrap_or("alertas");
    // `ruta` arranca como el mapa: `init` carga las preferencias él mismo
    if cmd != "ruta" {
        p.panel().load_filter_preferences().await;
    }
    match cmd {
        "alertas" => {
            p.panel().load_traffic_alerts().await?;
        }
        "filtro" => {
            let tipo = args.get(1).context("falta <tipo>")?;
            let shown = match args.get(2).map(String::as_str) {
                Some("si") | Some("sí") | Some("on") => true,
                Some("no") | Some("off") => false,
                other => bail!("valor de filtro inválido: {other:?}"),
            };
            p.panel().set_filter(tipo, shown).await;
            let checked = p.panel().filter_preferences().await.checked();
            println!("filtros activos: {}", checked.join(", "));
        }
        "vigilar" => {
            p.show_alerts().await;
            tokio::signal::ctrl_c().await?;
            p.stop_refresh().await;
        }
        "ruta" => {
            p.init().await?;
        }
        "ir" => {
            let id: u64 = args.get(1).context("falta <id>")?.parse().context("<id> no es un número")?;
            p.panel().load_traffic_alerts().await?;
            if !p.panel().select_alert(id).await {
                bail!("la alerta {id} no está visible");
            }
        }
        "reportar" => {
            let lat: f64 = args.get(1).context("falta <lat>")?.parse().context("<lat>")?;
            let lng: f64 = args.get(2).context("falta <lng>")?.parse().context("<lng>")?;
            let tipo = args.get(3).context("falta <tipo>")?;
            let descripcion = args.get(4..).map(|r| r.join(" ")).unwrap_or_default();
            p.arm_report().await;
            p.on_map_click(lat, lng).await;
            let alerta = p.submit_report(&descripcion, tipo).await?;
            println!("alerta {} registrada ({})", alerta.id, alerta.created_at.to_rfc3339());
        }
        "ubicar" => {
            p.locate().await?;
        }
        other => bail!("comando desconocido: {other}"),
    }
    Ok(())
}
