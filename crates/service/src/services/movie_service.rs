use cinecat_core::criteria::{validate_id, MovieCriteria};
use cinecat_core::pagination::{Page, PageRequest};
use cinecat_core::types::DbId;
use cinecat_db::models::movie::{CreateMovie, Movie, MovieWithCharacters, UpdateMovie};
use cinecat_db::repositories::{MovieCharacterRepo, MovieRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};

const ENTITY: &str = "Movie";

/// Movie use cases, including cast membership changes.
pub struct MovieService;

impl MovieService {
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> ServiceResult<MovieWithCharacters> {
        let input = input.trimmed();
        input.validate()?;

        if MovieRepo::find_by_title(pool, &input.title).await?.is_some() {
            return Err(ServiceError::already_exists(ENTITY, &input.title));
        }

        let created = MovieRepo::create(pool, &input).await?;
        tracing::info!(
            movie_id = created.movie.id,
            title = %created.movie.title,
            genre_id = input.genre_id,
            characters = created.character_ids.len(),
            "Movie created"
        );
        Ok(created)
    }

    pub async fn get(pool: &PgPool, id: DbId) -> ServiceResult<MovieWithCharacters> {
        validate_id("id", id)?;
        MovieRepo::find_by_id_with_characters(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn list(
        pool: &PgPool,
        criteria: &MovieCriteria,
        page: PageRequest,
    ) -> ServiceResult<Page<Movie>> {
        tracing::debug!(
            title = ?criteria.title,
            genre_id = ?criteria.genre_id,
            order = ?criteria.order,
            page = page.page_number(),
            size = page.page_size(),
            "Listing movies"
        );
        Ok(MovieRepo::list(pool, criteria, page).await?)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> ServiceResult<MovieWithCharacters> {
        validate_id("id", id)?;
        let input = input.trimmed();
        input.validate()?;

        if let Some(title) = input.title.as_deref() {
            if let Some(existing) = MovieRepo::find_by_title(pool, title).await? {
                if existing.id != id {
                    return Err(ServiceError::already_exists(ENTITY, title));
                }
            }
        }

        let updated = MovieRepo::update(pool, id, &input)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        tracing::debug!(movie_id = id, "Movie updated");
        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> ServiceResult<()> {
        validate_id("id", id)?;
        if !MovieRepo::soft_delete(pool, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(movie_id = id, "Movie deleted");
        Ok(())
    }

    pub async fn restore(pool: &PgPool, id: DbId) -> ServiceResult<MovieWithCharacters> {
        validate_id("id", id)?;
        if !MovieRepo::restore(pool, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(movie_id = id, "Movie restored");
        Self::get(pool, id).await
    }

    /// Add a character to the movie's cast. Appending an existing member
    /// leaves the cast unchanged.
    pub async fn append_character(
        pool: &PgPool,
        movie_id: DbId,
        character_id: DbId,
    ) -> ServiceResult<MovieWithCharacters> {
        let movie =
            MovieCharacterRepo::append_character_to_movie(pool, movie_id, character_id).await?;
        tracing::info!(movie_id, character_id, "Character added to cast");
        Ok(movie)
    }

    /// Remove a character from the movie's cast. Removing a non-member is a
    /// no-op.
    pub async fn remove_character(
        pool: &PgPool,
        movie_id: DbId,
        character_id: DbId,
    ) -> ServiceResult<MovieWithCharacters> {
        let movie =
            MovieCharacterRepo::remove_character_from_movie(pool, movie_id, character_id).await?;
        tracing::info!(movie_id, character_id, "Character removed from cast");
        Ok(movie)
    }
}
