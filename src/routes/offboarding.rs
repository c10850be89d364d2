// src/routes/offboarding.rs
use axum::{
    extract::{multipart::MultipartError, Json, Multipart},
    http::StatusCode,
    Extension,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::offboarding::{ChartReport, UploadFile, UploadKind, UploadSelection};
use crate::models::session::UserSession;
use crate::state::AppState;

pub const UPLOAD_OK: &str = "Arquivo enviado com sucesso!";

#[derive(Serialize)]
pub struct UploadResponse {
    message: &'static str,
}

pub const UPLOAD_TOO_LARGE: &str = "Arquivo maior que o limite permitido para envio.";

fn bad_multipart(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!(error = %e, "upload rejected: body over the size limit");
        return AppError::PayloadTooLarge(UPLOAD_TOO_LARGE.to_string());
    }
    AppError::InvalidInput(format!("Formulário de envio inválido: {e}"))
}

/// Accepts one `audio` or one `sheet` file and relays it to the upload webhook.
pub async fn upload(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<UserSession>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut selection = UploadSelection::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(kind) = field.name().and_then(UploadKind::from_field_name) else {
            continue;
        };
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(kind.field_name())
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(bad_multipart)?.to_vec();
        if bytes.is_empty() {
            // An empty file input means nothing was picked.
            continue;
        }

        selection
            .select(UploadFile { kind, file_name, content_type, bytes })
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    }

    let file = selection
        .into_file()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    tracing::info!(email = %user.email, file = %file.file_name, "offboarding upload requested");

    app_state.webhook.upload(file).await?;
    Ok(Json(UploadResponse { message: UPLOAD_OK }))
}

pub async fn dashboard(Extension(app_state): Extension<Arc<AppState>>) -> Json<ChartReport> {
    Json(app_state.webhook.chart().await)
}
