use cinecat_core::criteria::validate_id;
use cinecat_core::types::DbId;
use cinecat_db::models::genre::{CreateGenre, Genre, GenreWithMovies, UpdateGenre};
use cinecat_db::repositories::GenreRepo;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};

const ENTITY: &str = "Genre";

pub struct GenreService;

impl GenreService {
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> ServiceResult<Genre> {
        let input = input.trimmed();
        input.validate()?;

        if GenreRepo::find_by_name(pool, &input.name).await?.is_some() {
            return Err(ServiceError::already_exists(ENTITY, &input.name));
        }

        let genre = GenreRepo::create(pool, &input).await?;
        tracing::info!(genre_id = genre.id, name = %genre.name, "Genre created");
        Ok(genre)
    }

    pub async fn get(pool: &PgPool, id: DbId) -> ServiceResult<GenreWithMovies> {
        validate_id("id", id)?;
        GenreRepo::find_by_id_with_movies(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// All live genres by name. The set is small, so it is not paged.
    pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Genre>> {
        Ok(GenreRepo::list(pool).await?)
    }

    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateGenre) -> ServiceResult<Genre> {
        validate_id("id", id)?;
        let input = input.trimmed();
        input.validate()?;

        if let Some(name) = input.name.as_deref() {
            if let Some(existing) = GenreRepo::find_by_name(pool, name).await? {
                if existing.id != id {
                    return Err(ServiceError::already_exists(ENTITY, name));
                }
            }
        }

        GenreRepo::update(pool, id, &input)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Tombstone a genre. Its movies stay visible without a genre until it
    /// is restored.
    pub async fn delete(pool: &PgPool, id: DbId) -> ServiceResult<()> {
        validate_id("id", id)?;
        if !GenreRepo::soft_delete(pool, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(genre_id = id, "Genre deleted");
        Ok(())
    }

    pub async fn restore(pool: &PgPool, id: DbId) -> ServiceResult<GenreWithMovies> {
        validate_id("id", id)?;
        if !GenreRepo::restore(pool, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(genre_id = id, "Genre restored");
        Self::get(pool, id).await
    }
}
