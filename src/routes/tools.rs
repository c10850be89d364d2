use axum::Json;

use crate::models::tool::{catalogue, Tool};

pub async fn list() -> Json<Vec<Tool>> {
    Json(catalogue())
}
