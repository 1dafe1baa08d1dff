//! api.rs (visor)
//! Acceso del visor al backend: alertas activas, nuevo reporte y la ruta.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::error::ClientError;
use crate::models::types::{Alerta, ErrorBody, NuevaAlerta};
use crate::server::api::{PATH_ALERTAS, PATH_RUTA_LINEA1};

#[async_trait]
pub trait AlertsApi: Send + Sync {
    async fn fetch_active(&self) -> Result<Vec<Alerta>, ClientError>;
    async fn create(&self, alerta: &NuevaAlerta) -> Result<Alerta, ClientError>;
    async fn fetch_route(&self) -> Result<serde_json::Value, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpAlertsApi {
    client: Client,
    base_url: String,
}

impl HttpAlertsApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        // HTTP client con compresion
        let client = Client::builder().brotli(true).gzip(true).deflate(true).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }
}

async fn json_or_status<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let url = resp.url().to_string();
    if !status.is_success() {
        let message = resp
            .json::<ErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
        return Err(ClientError::Status { status: status.as_u16(), url, message });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl AlertsApi for HttpAlertsApi {
    async fn fetch_active(&self) -> Result<Vec<Alerta>, ClientError> {
        let resp = self.client.get(self.url(PATH_ALERTAS)).send().await?;
        json_or_status(resp).await
    }

    async fn create(&self, alerta: &NuevaAlerta) -> Result<Alerta, ClientError> {
        let resp = self.client.post(self.url(PATH_ALERTAS)).json(alerta).send().await?;
        json_or_status(resp).await
    }

    async fn fetch_route(&self) -> Result<serde_json::Value, ClientError> {
        let resp = self.client.get(self.url(PATH_RUTA_LINEA1)).send().await?;
        json_or_status(resp).await
    }
}
