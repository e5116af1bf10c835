//! Genre entity model and DTOs.

use cinecat_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A live row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A genre together with the ids of the live movies referencing it.
#[derive(Debug, Clone, Serialize)]
pub struct GenreWithMovies {
    #[serde(flatten)]
    pub genre: Genre,
    pub movie_ids: Vec<DbId>,
}

/// DTO for creating a new genre.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl CreateGenre {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

/// DTO for updating an existing genre.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGenre {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

impl UpdateGenre {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|n| n.trim().to_string()),
        }
    }
}
