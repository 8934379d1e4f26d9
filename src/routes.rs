use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::{
    AppState, envelope,
    error::{AppError, AppResult},
    models::{ListQuery, Movie, MovieInput},
    validation,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(q) = query?;
    let filter = validation::parse_filter(q)?;
    let movies = state.movies.find_all(&filter).await?;
    Ok(envelope::list(movies.into_iter().map(Movie::from).collect()))
}

pub async fn create(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<impl IntoResponse> {
    let input = parse_body(&body)?;
    let movie = state.movies.create(&input).await?;
    Ok((StatusCode::CREATED, envelope::record("movie created", movie.into())))
}

pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let movie = state.movies.find_by_id(&id).await?;
    Ok(envelope::record("movie found", movie.into()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let input = parse_body(&body)?;
    let movie = state.movies.update(&id, &input).await?;
    Ok(envelope::record(format!("movie {:?} updated", movie.title), movie.into()))
}

pub async fn remove(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let movie = state.movies.remove(&id).await?;
    Ok(envelope::record(format!("movie {:?} deleted", movie.title), movie.into()))
}

/// Decodes a create/update body, rejecting empty ones before any lookup.
fn parse_body(body: &[u8]) -> AppResult<MovieInput> {
    let empty = || AppError::Validation("request body is empty; send the movie fields as JSON".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(empty());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("request body is not valid JSON: {e}")))?;

    match &value {
        Value::Null => return Err(empty()),
        Value::Object(fields) if fields.is_empty() => return Err(empty()),
        Value::Object(_) => {},
        _ => return Err(AppError::Validation("request body must be a JSON object".to_string())),
    }

    serde_json::from_value(value).map_err(|e| AppError::Validation(format!("invalid request body: {e}")))
}
