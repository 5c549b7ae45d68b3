//! Movie CRUD handlers: list, read by id/title, create, update, delete.

use crate::error::AppError;
use crate::model::MoviePayload;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let movies = state.service.list().await?;
    Ok((StatusCode::OK, Json(movies)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let movie = state.service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(movie)))
}

pub async fn read_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let movie = state.service.find_by_title(&title).await?;
    Ok((StatusCode::OK, Json(movie)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<MoviePayload>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let movie = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(payload): Json<MoviePayload>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let movie = state.service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(movie)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.service.delete(id).await?;
    Ok(StatusCode::OK)
}
