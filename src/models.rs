use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::movie;

/// A movie as it is returned to clients.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub runtime: i32,
    pub genre: String,
    pub rating: f64,
    pub available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<movie::Model> for Movie {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            runtime: m.runtime,
            genre: m.genre,
            rating: m.rating,
            available: m.available,
            created_at: Timestamp::from_millisecond(m.created_at).unwrap_or_default(),
            updated_at: Timestamp::from_millisecond(m.updated_at).unwrap_or_default(),
        }
    }
}

/// Request body for create and update. Every field is optional here so that
/// missing and malformed values are reported by validation, not by serde.
///
/// `runtime` and `rating` stay raw because clients send them both as JSON
/// numbers and as numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct MovieInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub runtime: Option<Value>,
    pub genre: Option<String>,
    pub rating: Option<Value>,
    pub available: Option<bool>,
}

/// Fields of a movie that passed every create rule.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub runtime: i32,
    pub genre: &'static str,
    pub rating: f64,
}

/// Validated subset of fields supplied to an update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub runtime: Option<i32>,
    pub genre: Option<&'static str>,
    pub rating: Option<f64>,
    pub available: Option<bool>,
}

impl MovieChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Raw query string of `GET /movies`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub available: Option<String>,
    pub min_rating: Option<String>,
    pub max_runtime: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub available: Option<bool>,
    pub min_rating: Option<f64>,
    pub max_runtime: Option<i32>,
}
