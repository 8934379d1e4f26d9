//! Field rules shared by create and update.
//!
//! Every check returns the first violated rule as [`AppError::Validation`].
//! Title uniqueness is not checked here: the `movie.title_key` unique index
//! owns that invariant and the store maps its violation to a conflict.

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{ListQuery, MovieChanges, MovieFilter, MovieInput, NewMovie},
};

pub const GENRES: [&str; 9] = [
    "Ação",
    "Ficção Científica",
    "Drama",
    "Crime",
    "Terror",
    "Animação",
    "Comédia",
    "Suspense",
    "Romance",
];

pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;
pub const MAX_RUNTIME: i64 = 300;
pub const MAX_RATING: f64 = 10.0;

/// Lower-cased form of a title, stored in the uniquely indexed column.
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

pub fn canonical_genre(genre: &str) -> Option<&'static str> {
    let wanted = genre.trim().to_lowercase();
    GENRES.iter().copied().find(|g| g.to_lowercase() == wanted)
}

/// Canonical genres containing `fragment`, ignoring case.
pub fn matching_genres(fragment: &str) -> Vec<&'static str> {
    let fragment = fragment.trim().to_lowercase();
    GENRES.iter().copied().filter(|g| g.to_lowercase().contains(&fragment)).collect()
}

pub fn parse_id(raw: &str) -> AppResult<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Validation(format!("invalid movie id {raw:?}: expected a positive integer"))),
    }
}

pub fn validate_new(input: &MovieInput) -> AppResult<NewMovie> {
    let missing = missing_fields(input);
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "the following fields are required: {}",
            missing.join(", ")
        )));
    }

    let title = check_title(input.title.as_deref().unwrap_or_default())?;
    let description = check_description(input.description.as_deref().unwrap_or_default())?;
    let genre = check_genre(input.genre.as_deref().unwrap_or_default())?;
    let runtime = check_runtime(input.runtime.as_ref().unwrap_or(&Value::Null))?;
    let rating = check_rating(input.rating.as_ref().unwrap_or(&Value::Null))?;

    Ok(NewMovie { title, description, runtime, genre, rating })
}

pub fn validate_changes(input: &MovieInput) -> AppResult<MovieChanges> {
    Ok(MovieChanges {
        title: input.title.as_deref().map(check_title).transpose()?,
        description: input.description.as_deref().map(check_description).transpose()?,
        genre: input.genre.as_deref().map(check_genre).transpose()?,
        runtime: input.runtime.as_ref().map(check_runtime).transpose()?,
        rating: input.rating.as_ref().map(check_rating).transpose()?,
        available: input.available,
    })
}

pub fn parse_filter(query: ListQuery) -> AppResult<MovieFilter> {
    let available = match non_empty(query.available).as_deref() {
        None => None,
        Some(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Some(s) if s.eq_ignore_ascii_case("false") => Some(false),
        Some(other) => {
            return Err(AppError::Validation(format!(
                "available must be true or false, got {other:?}"
            )));
        },
    };

    let min_rating = non_empty(query.min_rating)
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|r| r.is_finite())
                .ok_or_else(|| AppError::Validation(format!("minRating must be a number, got {s:?}")))
        })
        .transpose()?;

    let max_runtime = non_empty(query.max_runtime)
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| AppError::Validation(format!("maxRuntime must be a whole number, got {s:?}")))
        })
        .transpose()?;

    Ok(MovieFilter {
        title: non_empty(query.title),
        genre: non_empty(query.genre),
        available,
        min_rating,
        max_runtime,
    })
}

fn missing_fields(input: &MovieInput) -> Vec<&'static str> {
    let blank = |s: &Option<String>| s.as_deref().is_none_or(|s| s.trim().is_empty());
    let absent = |v: &Option<Value>| match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };

    let mut missing = Vec::new();
    if blank(&input.title) {
        missing.push("title");
    }
    if blank(&input.description) {
        missing.push("description");
    }
    if blank(&input.genre) {
        missing.push("genre");
    }
    if absent(&input.runtime) {
        missing.push("runtime");
    }
    if absent(&input.rating) {
        missing.push("rating");
    }
    missing
}

fn check_title(raw: &str) -> AppResult<String> {
    let title = raw.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(AppError::Validation(format!(
            "title must be at least {MIN_TITLE_LEN} characters long"
        )));
    }
    Ok(title.to_string())
}

fn check_description(raw: &str) -> AppResult<String> {
    let description = raw.trim();
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(AppError::Validation(format!(
            "description must be at least {MIN_DESCRIPTION_LEN} characters long"
        )));
    }
    Ok(description.to_string())
}

fn check_genre(raw: &str) -> AppResult<&'static str> {
    canonical_genre(raw).ok_or_else(|| {
        AppError::Validation(format!("genre must be one of: {}", GENRES.join(", ")))
    })
}

fn check_runtime(raw: &Value) -> AppResult<i32> {
    let minutes = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match minutes {
        Some(m) if m > MAX_RUNTIME => Err(AppError::Validation(format!(
            "runtime cannot exceed {MAX_RUNTIME} minutes"
        ))),
        Some(m) if m > 0 => Ok(m as i32),
        _ => Err(AppError::Validation(
            "runtime must be a positive whole number of minutes".to_string(),
        )),
    }
}

fn check_rating(raw: &Value) -> AppResult<f64> {
    let rating = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match rating {
        Some(r) if r.is_finite() && (0.0..=MAX_RATING).contains(&r) => Ok(r),
        _ => Err(AppError::Validation(format!("rating must be between 0 and {MAX_RATING}"))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn input(body: Value) -> MovieInput {
        serde_json::from_value(body).unwrap()
    }

    fn valid() -> Value {
        json!({
            "title": "  Dune  ",
            "description": "A noble family becomes embroiled in a war for a desert planet.",
            "runtime": 155,
            "genre": "ficção científica",
            "rating": 8.0,
        })
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_movie_and_canonicalizes() {
        let movie = validate_new(&input(valid())).unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.genre, "Ficção Científica");
        assert_eq!(movie.runtime, 155);
        assert_eq!(movie.rating, 8.0);
    }

    #[test]
    fn lists_every_missing_field() {
        let msg = message(validate_new(&input(json!({ "title": "Dune", "rating": 0 }))).unwrap_err());
        assert!(msg.contains("description, genre, runtime"), "{msg}");
        assert!(!msg.contains("rating"), "zero rating is present: {msg}");
    }

    #[test]
    fn rejects_short_title() {
        let mut body = valid();
        body["title"] = json!("Up");
        let msg = message(validate_new(&input(body)).unwrap_err());
        assert!(msg.contains("at least 3"), "{msg}");
    }

    #[test]
    fn rejects_short_description() {
        let mut body = valid();
        body["description"] = json!("too short");
        let msg = message(validate_new(&input(body)).unwrap_err());
        assert!(msg.contains("at least 10"), "{msg}");
    }

    #[test]
    fn rejects_unknown_genre_in_any_case() {
        for genre in ["Western", "western", "WESTERN"] {
            let mut body = valid();
            body["genre"] = json!(genre);
            let msg = message(validate_new(&input(body)).unwrap_err());
            assert!(msg.starts_with("genre must be one of"), "{msg}");
        }
    }

    #[test]
    fn runtime_bounds() {
        let mut body = valid();
        body["runtime"] = json!(300);
        assert_eq!(validate_new(&input(body.clone())).unwrap().runtime, 300);

        body["runtime"] = json!(301);
        assert!(message(validate_new(&input(body.clone())).unwrap_err()).contains("300"));

        body["runtime"] = json!(-5);
        assert!(message(validate_new(&input(body.clone())).unwrap_err()).contains("positive"));

        body["runtime"] = json!(90.5);
        assert!(validate_new(&input(body.clone())).is_err());

        body["runtime"] = json!(155.0);
        assert_eq!(validate_new(&input(body.clone())).unwrap().runtime, 155);

        body["runtime"] = json!(300.0);
        assert_eq!(validate_new(&input(body.clone())).unwrap().runtime, 300);

        body["runtime"] = json!(301.0);
        assert!(validate_new(&input(body.clone())).is_err());

        body["runtime"] = json!("120");
        assert_eq!(validate_new(&input(body)).unwrap().runtime, 120);
    }

    #[test]
    fn rating_bounds() {
        let mut body = valid();
        body["rating"] = json!(10);
        assert_eq!(validate_new(&input(body.clone())).unwrap().rating, 10.0);

        body["rating"] = json!(0);
        assert_eq!(validate_new(&input(body.clone())).unwrap().rating, 0.0);

        body["rating"] = json!(10.1);
        assert!(validate_new(&input(body.clone())).is_err());

        body["rating"] = json!("7.5");
        assert_eq!(validate_new(&input(body)).unwrap().rating, 7.5);
    }

    #[test]
    fn changes_only_validate_supplied_fields() {
        let changes = validate_changes(&input(json!({ "genre": "DRAMA", "available": false }))).unwrap();
        assert_eq!(changes.genre, Some("Drama"));
        assert_eq!(changes.available, Some(false));
        assert_eq!(changes.title, None);

        assert!(validate_changes(&input(json!({ "title": "ab" }))).is_err());
        assert!(validate_changes(&input(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
    }

    #[test]
    fn filter_parsing() {
        let filter = parse_filter(ListQuery {
            title: Some("  ".into()),
            available: Some("true".into()),
            min_rating: Some("8.5".into()),
            max_runtime: Some("150".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.title, None);
        assert_eq!(filter.available, Some(true));
        assert_eq!(filter.min_rating, Some(8.5));
        assert_eq!(filter.max_runtime, Some(150));

        let upper = parse_filter(ListQuery { available: Some("FALSE".into()), ..Default::default() }).unwrap();
        assert_eq!(upper.available, Some(false));
        assert!(parse_filter(ListQuery { available: Some("yes".into()), ..Default::default() }).is_err());
        assert!(parse_filter(ListQuery { max_runtime: Some("long".into()), ..Default::default() }).is_err());
    }

    #[test]
    fn genre_fragments_match_case_insensitively() {
        assert_eq!(matching_genres("ÇÃO"), vec!["Ação", "Ficção Científica", "Animação"]);
        assert!(matching_genres("western").is_empty());
    }
}
