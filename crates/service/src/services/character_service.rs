use cinecat_core::criteria::{validate_id, CharacterCriteria};
use cinecat_core::pagination::{Page, PageRequest};
use cinecat_core::types::DbId;
use cinecat_db::models::character::{
    Character, CharacterWithMovies, CreateCharacter, UpdateCharacter,
};
use cinecat_db::repositories::CharacterRepo;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};

const ENTITY: &str = "Character";

/// Character use cases: validation, name uniqueness and logging on top of
/// [`CharacterRepo`].
pub struct CharacterService;

impl CharacterService {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCharacter,
    ) -> ServiceResult<CharacterWithMovies> {
        let input = input.trimmed();
        input.validate()?;

        if CharacterRepo::find_by_name(pool, &input.name).await?.is_some() {
            return Err(ServiceError::already_exists(ENTITY, &input.name));
        }

        let created = CharacterRepo::create(pool, &input).await?;
        tracing::info!(
            character_id = created.character.id,
            name = %created.character.name,
            movies = created.movie_ids.len(),
            "Character created"
        );
        Ok(created)
    }

    pub async fn get(pool: &PgPool, id: DbId) -> ServiceResult<CharacterWithMovies> {
        validate_id("id", id)?;
        CharacterRepo::find_by_id_with_movies(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn list(
        pool: &PgPool,
        criteria: &CharacterCriteria,
        page: PageRequest,
    ) -> ServiceResult<Page<Character>> {
        tracing::debug!(
            name = ?criteria.name,
            age = ?criteria.age,
            movie_ids = ?criteria.movie_ids,
            page = page.page_number(),
            size = page.page_size(),
            "Listing characters"
        );
        Ok(CharacterRepo::list(pool, criteria, page).await?)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> ServiceResult<CharacterWithMovies> {
        validate_id("id", id)?;
        let input = input.trimmed();
        input.validate()?;

        if let Some(name) = input.name.as_deref() {
            if let Some(existing) = CharacterRepo::find_by_name(pool, name).await? {
                if existing.id != id {
                    return Err(ServiceError::already_exists(ENTITY, name));
                }
            }
        }

        let updated = CharacterRepo::update(pool, id, &input)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        tracing::debug!(character_id = id, "Character updated");
        Ok(updated)
    }

    /// Tombstone a live character. Its movie links are kept.
    pub async fn delete(pool: &PgPool, id: DbId) -> ServiceResult<()> {
        validate_id("id", id)?;
        if !CharacterRepo::soft_delete(pool, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(character_id = id, "Character deleted");
        Ok(())
    }

    /// Bring a tombstoned character back, with its surviving links.
    pub async fn restore(pool: &PgPool, id: DbId) -> ServiceResult<CharacterWithMovies> {
        validate_id("id", id)?;
        if !CharacterRepo::restore(pool, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(character_id = id, "Character restored");
        Self::get(pool, id).await
    }
}
