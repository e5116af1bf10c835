//! Repository for the `genres` table.

use cinecat_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::genre::{CreateGenre, Genre, GenreWithMovies, UpdateGenre};
use crate::repositories::movie_repo::MovieRepo;
use crate::soft_delete::{SoftDeleteGuard, Tombstoned};

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Same columns qualified with the `g` alias.
const ALIASED_COLUMNS: &str = "g.id, g.name, g.created_at, g.updated_at";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> DbResult<Genre> {
        let query = format!("INSERT INTO genres (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
            .map_err(|e| DbError::classify(e, &input.name))
    }

    /// Find a genre by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {ALIASED_COLUMNS} FROM genres g {}",
            SoftDeleteGuard::where_clause("g", &["g.id = $1".to_string()])
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a genre by ID, enriched with the ids of its live movies.
    pub async fn find_by_id_with_movies(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GenreWithMovies>, sqlx::Error> {
        let genre = Self::find_by_id(pool, id).await?;
        match genre {
            Some(genre) => {
                let movie_ids = MovieRepo::ids_by_genre(pool, id).await?;
                Ok(Some(GenreWithMovies { genre, movie_ids }))
            }
            None => Ok(None),
        }
    }

    /// Find the live genre with exactly this name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {ALIASED_COLUMNS} FROM genres g {}",
            SoftDeleteGuard::where_clause("g", &["g.name = $1".to_string()])
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all live genres, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {ALIASED_COLUMNS} FROM genres g {} ORDER BY g.name ASC",
            SoftDeleteGuard::where_clause("g", &[])
        );
        sqlx::query_as::<_, Genre>(&query).fetch_all(pool).await
    }

    /// Update a genre. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateGenre) -> DbResult<Option<Genre>> {
        let query = format!(
            "UPDATE genres SET name = COALESCE($2, name)
             WHERE id = $1 AND deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
            .map_err(|e| DbError::classify(e, input.name.as_deref().unwrap_or_default()))
    }

    /// Soft-delete a genre. Movies referencing it stay visible with
    /// `genre_id` reading as `None`.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        SoftDeleteGuard::soft_delete(pool, Tombstoned::Genres, id).await
    }

    /// Restore a soft-deleted genre. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> DbResult<bool> {
        SoftDeleteGuard::restore(pool, Tombstoned::Genres, id).await
    }
}
