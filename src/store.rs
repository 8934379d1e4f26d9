use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
    sea_query::{Expr, LikeExpr},
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieFilter, MovieInput},
    validation,
};

/// Movies rated at or above this are protected from deletion.
pub const TOP_RATED: f64 = 9.0;

#[derive(Clone, Copy, Debug)]
pub struct MoviePolicy {
    /// Reject updates to unavailable movies unless the update re-enables them.
    pub block_unavailable_updates: bool,
    /// Reject deletion of movies rated [`TOP_RATED`] or higher.
    pub protect_top_rated: bool,
}

impl Default for MoviePolicy {
    fn default() -> Self {
        Self { block_unavailable_updates: true, protect_top_rated: true }
    }
}

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
    policy: MoviePolicy,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection, policy: MoviePolicy) -> Self {
        Self { db, policy }
    }

    pub async fn create(&self, input: &MovieInput) -> AppResult<movie::Model> {
        let new = validation::validate_new(input)?;
        let now = now_ms();

        let model = movie::ActiveModel {
            id: Default::default(),
            title_key: Set(validation::title_key(&new.title)),
            title: Set(new.title.clone()),
            description: Set(new.description),
            runtime: Set(new.runtime),
            genre: Set(new.genre.to_string()),
            rating: Set(new.rating),
            available: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await.map_err(|e| write_error(e, &new.title))?;
        debug!(id = created.id, title = %created.title, "movie created");
        Ok(created)
    }

    pub async fn find_all(&self, filter: &MovieFilter) -> AppResult<Vec<movie::Model>> {
        let mut query = movie::Entity::find();

        if let Some(title) = &filter.title {
            let pattern = format!("%{}%", escape_like(&validation::title_key(title)));
            query = query.filter(Expr::col(movie::Column::TitleKey).like(LikeExpr::new(pattern).escape('\\')));
        }
        if let Some(genre) = &filter.genre {
            let genres = validation::matching_genres(genre);
            if genres.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(movie::Column::Genre.is_in(genres));
        }
        if let Some(available) = filter.available {
            query = query.filter(movie::Column::Available.eq(available));
        }
        if let Some(min_rating) = filter.min_rating {
            query = query.filter(movie::Column::Rating.gte(min_rating));
        }
        if let Some(max_runtime) = filter.max_runtime {
            query = query.filter(movie::Column::Runtime.lte(max_runtime));
        }

        let movies = query
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .all(&self.db)
            .await?;

        debug!(count = movies.len(), ?filter, "movies listed");
        Ok(movies)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<movie::Model> {
        let id = validation::parse_id(id)?;
        self.get(id).await
    }

    pub async fn update(&self, id: &str, input: &MovieInput) -> AppResult<movie::Model> {
        let id = validation::parse_id(id)?;
        let existing = self.get(id).await?;

        if self.policy.block_unavailable_updates && !existing.available && input.available != Some(true) {
            return Err(AppError::Forbidden(format!(
                "movie {id} is unavailable and cannot be updated"
            )));
        }

        let changes = validation::validate_changes(input)?;
        if changes.is_empty() {
            return Err(AppError::Validation("no updatable fields were supplied".to_string()));
        }

        let title = changes.title.clone().unwrap_or_else(|| existing.title.clone());
        let mut model: movie::ActiveModel = existing.into();
        if let Some(t) = changes.title {
            model.title_key = Set(validation::title_key(&t));
            model.title = Set(t);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }
        if let Some(runtime) = changes.runtime {
            model.runtime = Set(runtime);
        }
        if let Some(genre) = changes.genre {
            model.genre = Set(genre.to_string());
        }
        if let Some(rating) = changes.rating {
            model.rating = Set(rating);
        }
        if let Some(available) = changes.available {
            model.available = Set(available);
        }
        model.updated_at = Set(now_ms());

        let updated = model.update(&self.db).await.map_err(|e| write_error(e, &title))?;
        debug!(id = updated.id, "movie updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> AppResult<movie::Model> {
        let id = validation::parse_id(id)?;
        let existing = self.get(id).await?;

        if self.policy.protect_top_rated && existing.rating >= TOP_RATED {
            return Err(AppError::Forbidden(format!(
                "movie {id} is rated {} and cannot be deleted",
                existing.rating
            )));
        }

        movie::Entity::delete_by_id(existing.id).exec(&self.db).await?;
        debug!(id = existing.id, "movie deleted");
        Ok(existing)
    }

    async fn get(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {id} not found")))
    }
}

fn write_error(err: DbErr, title: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("a movie titled {title:?} already exists"))
        },
        _ => err.into(),
    }
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
