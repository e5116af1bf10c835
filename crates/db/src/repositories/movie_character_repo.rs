//! Repository for the `rel_movie_character` junction table.
//!
//! The join is owned by movies: every write goes through `link` / `unlink`
//! keyed `(movie_id, character_id)`, whichever side requested the change.
//! Reads resolve either direction from the same table and skip rows whose
//! counterpart is tombstoned.

use std::collections::BTreeSet;

use cinecat_core::criteria::validate_id;
use cinecat_core::relations::RelationChanges;
use cinecat_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::movie::MovieWithCharacters;
use crate::repositories::movie_repo::MovieRepo;
use crate::soft_delete::{SoftDeleteGuard, Tombstoned};

/// Maintains the character/movie many-to-many relation from both sides.
pub struct MovieCharacterRepo;

impl MovieCharacterRepo {
    /// Add a character to a movie's cast (idempotent).
    ///
    /// Fails with `NotFound` if the movie or the character is absent or
    /// tombstoned. The movie row is locked for the duration of the write.
    pub async fn append_character_to_movie(
        pool: &PgPool,
        movie_id: DbId,
        character_id: DbId,
    ) -> DbResult<MovieWithCharacters> {
        validate_id("movie_id", movie_id)?;
        validate_id("character_id", character_id)?;

        let mut tx = pool.begin().await?;
        SoftDeleteGuard::ensure_live(&mut tx, Tombstoned::Movies, movie_id, true).await?;
        SoftDeleteGuard::ensure_live(&mut tx, Tombstoned::Characters, character_id, false).await?;

        let inserted = Self::link(&mut tx, movie_id, character_id).await?;
        tracing::debug!(movie_id, character_id, inserted, "Appended character to movie");

        let movie = Self::reload_movie(&mut tx, movie_id).await?;
        tx.commit().await?;
        Ok(movie)
    }

    /// Remove a character from a movie's cast. Removing an absent member is
    /// a no-op.
    ///
    /// Fails with `NotFound` only if the movie is absent or tombstoned.
    pub async fn remove_character_from_movie(
        pool: &PgPool,
        movie_id: DbId,
        character_id: DbId,
    ) -> DbResult<MovieWithCharacters> {
        validate_id("movie_id", movie_id)?;
        validate_id("character_id", character_id)?;

        let mut tx = pool.begin().await?;
        SoftDeleteGuard::ensure_live(&mut tx, Tombstoned::Movies, movie_id, true).await?;

        let removed = Self::unlink(&mut tx, movie_id, character_id).await?;
        tracing::debug!(movie_id, character_id, removed, "Removed character from movie");

        let movie = Self::reload_movie(&mut tx, movie_id).await?;
        tx.commit().await?;
        Ok(movie)
    }

    /// Ids of the live characters linked to a movie, ascending.
    pub async fn character_ids_for_movie<'e, E>(
        executor: E,
        movie_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "SELECT rmc.character_id \
             FROM rel_movie_character rmc \
             JOIN characters c ON c.id = rmc.character_id AND {} \
             WHERE rmc.movie_id = $1 \
             ORDER BY rmc.character_id",
            SoftDeleteGuard::live("c")
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(movie_id)
            .fetch_all(executor)
            .await
    }

    /// Ids of the live movies a character appears in, ascending.
    pub async fn movie_ids_for_character<'e, E>(
        executor: E,
        character_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "SELECT rmc.movie_id \
             FROM rel_movie_character rmc \
             JOIN movies m ON m.id = rmc.movie_id AND {} \
             WHERE rmc.character_id = $1 \
             ORDER BY rmc.movie_id",
            SoftDeleteGuard::live("m")
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(character_id)
            .fetch_all(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Batch changes (used by create/update flows inside their transaction)
    // -----------------------------------------------------------------------

    /// Apply a character-initiated change set, routed through the movie-owned
    /// join. Every added movie must be live.
    ///
    /// Returns the character's resulting live movie ids.
    pub(crate) async fn apply_character_changes(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        character_id: DbId,
        changes: &RelationChanges,
    ) -> DbResult<Vec<DbId>> {
        let mut current: BTreeSet<DbId> = Self::movie_ids_for_character(&mut **tx, character_id)
            .await?
            .into_iter()
            .collect();

        for &movie_id in changes.additions() {
            SoftDeleteGuard::ensure_live(tx, Tombstoned::Movies, movie_id, false).await?;
            Self::link(tx, movie_id, character_id).await?;
        }
        for &movie_id in changes.removals() {
            Self::unlink(tx, movie_id, character_id).await?;
        }

        changes.apply_to(&mut current);
        tracing::debug!(
            character_id,
            added = changes.additions().len(),
            removed = changes.removals().len(),
            "Applied character movie changes"
        );
        Ok(current.into_iter().collect())
    }

    /// Apply a movie-initiated change set. Every added character must be
    /// live.
    ///
    /// Returns the movie's resulting live character ids.
    pub(crate) async fn apply_movie_changes(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        changes: &RelationChanges,
    ) -> DbResult<Vec<DbId>> {
        let mut current: BTreeSet<DbId> = Self::character_ids_for_movie(&mut **tx, movie_id)
            .await?
            .into_iter()
            .collect();

        for &character_id in changes.additions() {
            SoftDeleteGuard::ensure_live(tx, Tombstoned::Characters, character_id, false).await?;
            Self::link(tx, movie_id, character_id).await?;
        }
        for &character_id in changes.removals() {
            Self::unlink(tx, movie_id, character_id).await?;
        }

        changes.apply_to(&mut current);
        tracing::debug!(
            movie_id,
            added = changes.additions().len(),
            removed = changes.removals().len(),
            "Applied movie character changes"
        );
        Ok(current.into_iter().collect())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert one join row. Returns `false` if it already existed.
    async fn link(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        character_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO rel_movie_character (movie_id, character_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(character_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete one join row. Returns `false` if it did not exist.
    async fn unlink(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        character_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM rel_movie_character \
             WHERE movie_id = $1 AND character_id = $2",
        )
        .bind(movie_id)
        .bind(character_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reload_movie(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
    ) -> DbResult<MovieWithCharacters> {
        let movie = MovieRepo::find_live(&mut **tx, movie_id)
            .await?
            .ok_or_else(|| DbError::vanished("Movie", movie_id))?;
        let character_ids = Self::character_ids_for_movie(&mut **tx, movie_id).await?;
        Ok(MovieWithCharacters {
            movie,
            character_ids,
        })
    }
}
