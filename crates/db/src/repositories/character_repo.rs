//! Repository for the `characters` table.

use cinecat_core::criteria::CharacterCriteria;
use cinecat_core::pagination::{Page, PageRequest};
use cinecat_core::predicate::build_character_predicate;
use cinecat_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::filter::compile_character_filter;
use crate::models::character::{Character, CharacterWithMovies, CreateCharacter, UpdateCharacter};
use crate::repositories::filtered_repo::FilteredRepository;
use crate::repositories::movie_character_repo::MovieCharacterRepo;
use crate::soft_delete::{SoftDeleteGuard, Tombstoned};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, name, age, weight, history, created_at, updated_at";

/// Same columns qualified with the `c` alias, for joined listings.
const ALIASED_COLUMNS: &str =
    "c.id, c.name, c.age, c.weight, c.history, c.created_at, c.updated_at";

/// Provides CRUD and filtered listing for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character and link its initial movies in one
    /// transaction.
    ///
    /// Fails with `NotFound` if any movie is absent or tombstoned, and with
    /// `AlreadyExists` if a live character has the name.
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> DbResult<CharacterWithMovies> {
        let changes = input.movie_changes()?;

        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO characters (name, age, weight, history)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(&input.name)
            .bind(input.age)
            .bind(input.weight)
            .bind(&input.history)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DbError::classify(e, &input.name))?;

        let movie_ids =
            MovieCharacterRepo::apply_character_changes(&mut tx, character.id, &changes).await?;

        tx.commit().await?;
        Ok(CharacterWithMovies {
            character,
            movie_ids,
        })
    }

    /// Find a character by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {ALIASED_COLUMNS} FROM characters c {}",
            SoftDeleteGuard::where_clause("c", &["c.id = $1".to_string()])
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character by ID, enriched with its live movie ids.
    pub async fn find_by_id_with_movies(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CharacterWithMovies>, sqlx::Error> {
        let character = Self::find_by_id(pool, id).await?;
        match character {
            Some(character) => {
                let movie_ids = MovieCharacterRepo::movie_ids_for_character(pool, id).await?;
                Ok(Some(CharacterWithMovies {
                    character,
                    movie_ids,
                }))
            }
            None => Ok(None),
        }
    }

    /// Find the live character with exactly this name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {ALIASED_COLUMNS} FROM characters c {}",
            SoftDeleteGuard::where_clause("c", &["c.name = $1".to_string()])
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Filtered, paginated listing. Pages are sliced in id order.
    pub async fn list(
        pool: &PgPool,
        criteria: &CharacterCriteria,
        page: PageRequest,
    ) -> DbResult<Page<Character>> {
        let predicate = build_character_predicate(criteria)?;
        let filter = compile_character_filter(&predicate);
        let page = FilteredRepository::fetch_page(
            pool,
            &filter,
            ALIASED_COLUMNS,
            "ORDER BY c.id ASC",
            "c.id",
            page,
        )
        .await?;
        Ok(page)
    }

    /// Update a character. Only non-`None` fields in `input` are applied,
    /// then the movie change set (additions before removals) is routed
    /// through the movie-owned join.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> DbResult<Option<CharacterWithMovies>> {
        let changes = input.movie_changes()?;

        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                weight = COALESCE($4, weight),
                history = COALESCE($5, history)
             WHERE id = $1 AND deleted = false
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.age)
            .bind(input.weight)
            .bind(&input.history)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::classify(e, input.name.as_deref().unwrap_or_default()))?;

        let Some(character) = character else {
            return Ok(None);
        };

        let movie_ids = MovieCharacterRepo::apply_character_changes(&mut tx, id, &changes).await?;

        tx.commit().await?;
        Ok(Some(CharacterWithMovies {
            character,
            movie_ids,
        }))
    }

    /// Soft-delete a character by ID. Returns `true` if a row was marked
    /// deleted. Join rows are kept; reads stop resolving them.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        SoftDeleteGuard::soft_delete(pool, Tombstoned::Characters, id).await
    }

    /// Restore a soft-deleted character. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> DbResult<bool> {
        SoftDeleteGuard::restore(pool, Tombstoned::Characters, id).await
    }
}
