use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::offboarding::{ChartData, ChartReport, ChartSource, UploadFile};

pub const UPLOAD_FAILED: &str = "Erro ao enviar arquivo!";

/// Client for the offboarding automation webhooks.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    upload_url: String,
    dashboard_url: String,
}

impl WebhookClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.webhook_timeout_secs))
                .build()?,
            upload_url: config.upload_webhook_url.clone(),
            dashboard_url: config.dashboard_webhook_url.clone(),
        })
    }

    /// Posts the file as `audio` or `sheet` together with its `type`. Any non-2xx is a failure.
    pub async fn upload(&self, file: UploadFile) -> AppResult<()> {
        let kind = file.kind;
        let mut part = Part::bytes(file.bytes).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type).map_err(|e| {
                AppError::InvalidInput(format!("Tipo de arquivo inválido: {e}"))
            })?;
        }
        let form = Form::new()
            .part(kind.field_name(), part)
            .text("type", kind.type_label());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "upload webhook unreachable");
                AppError::Upstream(UPLOAD_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "upload webhook rejected the file");
            return Err(AppError::Upstream(UPLOAD_FAILED.to_string()));
        }
        tracing::info!(file = %file.file_name, kind = kind.type_label(), "offboarding file forwarded");
        Ok(())
    }

    /// Chart data from the dashboard webhook, or the fixed fallback on any failure.
    pub async fn chart(&self) -> ChartReport {
        match self.fetch_chart().await {
            Ok(data) => ChartReport::new(data, ChartSource::Webhook),
            Err(e) => {
                tracing::warn!(error = %e, "using fallback chart data");
                ChartReport::fallback()
            }
        }
    }

    async fn fetch_chart(&self) -> AppResult<ChartData> {
        let response = self
            .client
            .get(&self.dashboard_url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("HTTP error! Status: {status}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        ChartData::from_payload(&payload).ok_or_else(|| {
            AppError::Upstream("Formato de dados inválido recebido da API".to_string())
        })
    }
}
