//! Focus mode catalog handlers

use super::error::ApiError;
use super::state::AppState;
use crate::focus_modes::{FocusModeUpdate, NewFocusMode};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

const NOT_FOUND: &str = "Focus mode not found";

pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "modes": state.focus_modes.list().await }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mode = state
        .focus_modes
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Json(json!({ "mode": mode })))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewFocusMode>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(new) = payload?;
    let mode = state
        .focus_modes
        .create(new)
        .await
        .ok_or_else(|| ApiError::bad_request("Name and API endpoint are required"))?;
    Ok((StatusCode::CREATED, Json(json!({ "mode": mode }))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FocusModeUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(update) = payload?;
    let mode = state
        .focus_modes
        .update(&id, update)
        .await
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Json(json!({ "mode": mode })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.focus_modes.delete(&id).await {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(Json(json!({ "message": "Focus mode deleted successfully" })))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mode = state
        .focus_modes
        .toggle(&id)
        .await
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Json(json!({ "mode": mode })))
}
