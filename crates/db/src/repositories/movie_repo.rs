//! Repository for the `movies` table.

use cinecat_core::criteria::MovieCriteria;
use cinecat_core::pagination::{Page, PageRequest};
use cinecat_core::predicate::build_movie_predicate;
use cinecat_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::filter::{compile_movie_filter, movie_genre_join, movie_order_by};
use crate::models::movie::{CreateMovie, Movie, MovieWithCharacters, UpdateMovie};
use crate::repositories::filtered_repo::FilteredRepository;
use crate::repositories::movie_character_repo::MovieCharacterRepo;
use crate::soft_delete::{SoftDeleteGuard, Tombstoned};

/// Column list for reads. `genre_id` comes through the live-genre left join,
/// so a tombstoned genre reads as NULL.
const COLUMNS: &str =
    "m.id, m.title, m.creation_date, m.rate, g.id AS genre_id, m.created_at, m.updated_at";

/// Provides CRUD and filtered listing for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie and link its initial characters in one transaction.
    ///
    /// Fails with `NotFound` if the genre or any character is absent or
    /// tombstoned, and with `AlreadyExists` if a live movie has the title.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> DbResult<MovieWithCharacters> {
        let changes = input.character_changes()?;

        let mut tx = pool.begin().await?;
        SoftDeleteGuard::ensure_live(&mut tx, Tombstoned::Genres, input.genre_id, false).await?;

        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO movies (title, creation_date, rate, genre_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(input.creation_date)
        .bind(input.rate)
        .bind(input.genre_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::classify(e, &input.title))?;

        let character_ids = MovieCharacterRepo::apply_movie_changes(&mut tx, id, &changes).await?;
        let movie = Self::find_live(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::vanished("Movie", id))?;

        tx.commit().await?;
        Ok(MovieWithCharacters {
            movie,
            character_ids,
        })
    }

    /// Find a movie by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        Self::find_live(pool, id).await
    }

    /// Find a movie by ID, enriched with its live character ids.
    pub async fn find_by_id_with_characters(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovieWithCharacters>, sqlx::Error> {
        let movie = Self::find_live(pool, id).await?;
        match movie {
            Some(movie) => {
                let character_ids = MovieCharacterRepo::character_ids_for_movie(pool, id).await?;
                Ok(Some(MovieWithCharacters {
                    movie,
                    character_ids,
                }))
            }
            None => Ok(None),
        }
    }

    /// Find the live movie with exactly this title.
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies m {} {}",
            movie_genre_join(),
            SoftDeleteGuard::where_clause("m", &["m.title = $1".to_string()])
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// Filtered, paginated listing ordered by creation date.
    pub async fn list(
        pool: &PgPool,
        criteria: &MovieCriteria,
        page: PageRequest,
    ) -> DbResult<Page<Movie>> {
        let (predicate, order) = build_movie_predicate(criteria)?;
        let filter = compile_movie_filter(&predicate);
        let page = FilteredRepository::fetch_page(
            pool,
            &filter,
            COLUMNS,
            &movie_order_by(&order),
            "m.id",
            page,
        )
        .await?;
        Ok(page)
    }

    /// Ids of the live movies referencing a genre, ascending.
    pub async fn ids_by_genre(pool: &PgPool, genre_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT m.id FROM movies m {} ORDER BY m.id",
            SoftDeleteGuard::where_clause("m", &["m.genre_id = $1".to_string()])
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(genre_id)
            .fetch_all(pool)
            .await
    }

    /// Update a movie. Only non-`None` fields in `input` are applied, then
    /// the character change set (additions before removals).
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> DbResult<Option<MovieWithCharacters>> {
        let changes = input.character_changes()?;

        let mut tx = pool.begin().await?;
        if let Some(genre_id) = input.genre_id {
            SoftDeleteGuard::ensure_live(&mut tx, Tombstoned::Genres, genre_id, false).await?;
        }

        let updated = sqlx::query_scalar::<_, DbId>(
            "UPDATE movies SET
                title = COALESCE($2, title),
                creation_date = COALESCE($3, creation_date),
                rate = COALESCE($4, rate),
                genre_id = COALESCE($5, genre_id)
             WHERE id = $1 AND deleted = false
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(input.creation_date)
        .bind(input.rate)
        .bind(input.genre_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DbError::classify(e, input.title.as_deref().unwrap_or_default()))?;

        if updated.is_none() {
            return Ok(None);
        }

        let character_ids = MovieCharacterRepo::apply_movie_changes(&mut tx, id, &changes).await?;
        let movie = Self::find_live(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::vanished("Movie", id))?;

        tx.commit().await?;
        Ok(Some(MovieWithCharacters {
            movie,
            character_ids,
        }))
    }

    /// Soft-delete a movie by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        SoftDeleteGuard::soft_delete(pool, Tombstoned::Movies, id).await
    }

    /// Restore a soft-deleted movie. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> DbResult<bool> {
        SoftDeleteGuard::restore(pool, Tombstoned::Movies, id).await
    }

    /// Load one live movie on any executor (pool or open transaction).
    pub(crate) async fn find_live<'e, E>(executor: E, id: DbId) -> Result<Option<Movie>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM movies m {} {}",
            movie_genre_join(),
            SoftDeleteGuard::where_clause("m", &["m.id = $1".to_string()])
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
