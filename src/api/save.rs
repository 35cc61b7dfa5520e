//! Whole-section save and whole-document restore.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use super::{ApiJson, MutationResponse};
use crate::errors::AppError;
use crate::models::{Document, Section, SectionData};
use crate::AppState;

/// Request body for POST /api/save.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(rename = "type", default)]
    pub section: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    /// Revision the caller read; omitted means last writer wins
    #[serde(default)]
    pub expected_revision: Option<u64>,
}

/// Request body for POST /api/restore.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreRequest {
    #[serde(default)]
    pub data: Option<Value>,
}

/// POST /api/save - Replace one section.
pub async fn save_section(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SaveRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let (Some(name), Some(value)) = (request.section, request.data) else {
        return Err(AppError::BadRequest("Missing type or data".to_string()));
    };

    let section = Section::parse(&name)
        .ok_or_else(|| AppError::Validation(format!("Unknown section type: {}", name)))?;

    let data = SectionData::from_value(section, value)?;

    let revision = state
        .store
        .write_section(data, request.expected_revision)
        .await?;

    Ok(Json(MutationResponse::ok(
        format!("{} saved successfully", section),
        Some(revision),
    )))
}

/// POST /api/restore - Replace the whole document after validating its shape.
pub async fn restore_document(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RestoreRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let Some(value) = request.data else {
        return Err(AppError::BadRequest("Missing data".to_string()));
    };

    let document = Document::from_value(value)?;

    state.store.restore_document(document).await?;

    Ok(Json(MutationResponse::ok("Data restored successfully", None)))
}
