//! Read endpoints.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::{Document, Revisions, Section, SectionData};
use crate::AppState;

/// GET /api/data - The full document.
pub async fn get_data(State(state): State<AppState>) -> Result<Json<Document>, AppError> {
    Ok(Json(state.store.read_document().await?))
}

/// GET /api/revisions - Current per-section revisions.
pub async fn get_revisions(State(state): State<AppState>) -> Result<Json<Revisions>, AppError> {
    Ok(Json(state.store.revisions().await?))
}

/// GET /api/news
pub async fn get_news(State(state): State<AppState>) -> Result<Json<SectionData>, AppError> {
    read_section(&state, Section::News).await
}

/// GET /api/staff
pub async fn get_staff(State(state): State<AppState>) -> Result<Json<SectionData>, AppError> {
    read_section(&state, Section::Staff).await
}

/// GET /api/vacancies
pub async fn get_vacancies(State(state): State<AppState>) -> Result<Json<SectionData>, AppError> {
    read_section(&state, Section::Vacancies).await
}

/// GET /api/faq
pub async fn get_faq(State(state): State<AppState>) -> Result<Json<SectionData>, AppError> {
    read_section(&state, Section::Faq).await
}

/// GET /api/info
pub async fn get_info(State(state): State<AppState>) -> Result<Json<SectionData>, AppError> {
    read_section(&state, Section::Info).await
}

async fn read_section(state: &AppState, section: Section) -> Result<Json<SectionData>, AppError> {
    Ok(Json(state.store.read_section(section).await?))
}
