//! JSON response bodies shared by every handler.

use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

use crate::models::Movie;

pub fn record(message: impl Into<String>, movie: Movie) -> Json<Value> {
    Json(json!({
        "status": "success",
        "success": true,
        "message": message.into(),
        "data": movie,
    }))
}

pub fn list(movies: Vec<Movie>) -> Json<Value> {
    let message = if movies.is_empty() { "no movies found" } else { "movies found" };
    Json(json!({
        "status": "success",
        "success": true,
        "message": message,
        "total": movies.len(),
        "movies": movies,
    }))
}

pub fn error(status: StatusCode, message: String) -> Json<Value> {
    Json(json!({
        "status": status.as_u16(),
        "success": false,
        "error": message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_informational() {
        let Json(body) = list(Vec::new());
        assert_eq!(body["success"], true);
        assert_eq!(body["total"], 0);
        assert_eq!(body["message"], "no movies found");
        assert!(body["movies"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn error_echoes_status_code() {
        let Json(body) = error(StatusCode::NOT_FOUND, "gone".into());
        assert_eq!(body["status"], 404);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "gone");
    }
}
