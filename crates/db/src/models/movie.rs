//! Movie entity model and DTOs.
//!
//! Movies own the character relation (`rel_movie_character`) and reference
//! exactly one genre. A tombstoned genre reads back as `genre_id: None`.

use cinecat_core::error::CoreError;
use cinecat_core::relations::RelationChanges;
use cinecat_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A live row from the `movies` table with its genre resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub creation_date: Date,
    pub rate: i32,
    /// `None` when the referenced genre has been soft-deleted.
    pub genre_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A movie together with the ids of its live characters.
#[derive(Debug, Clone, Serialize)]
pub struct MovieWithCharacters {
    #[serde(flatten)]
    pub movie: Movie,
    pub character_ids: Vec<DbId>,
}

/// DTO for creating a new movie. The genre is mandatory and must be live.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub creation_date: Date,
    #[validate(range(min = 1, max = 5))]
    pub rate: i32,
    #[validate(range(min = 1))]
    pub genre_id: DbId,
    /// Characters to link on creation. Each must be live.
    #[serde(default)]
    pub character_ids: Vec<DbId>,
}

impl CreateMovie {
    /// Copy with the title trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn character_changes(&self) -> Result<RelationChanges, CoreError> {
        RelationChanges::additions_only("character_ids", &self.character_ids)
    }
}

/// DTO for updating an existing movie. Only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMovie {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub creation_date: Option<Date>,
    #[validate(range(min = 1, max = 5))]
    pub rate: Option<i32>,
    #[validate(range(min = 1))]
    pub genre_id: Option<DbId>,
    #[serde(default)]
    pub add_character_ids: Vec<DbId>,
    #[serde(default)]
    pub remove_character_ids: Vec<DbId>,
}

impl UpdateMovie {
    /// Copy with the title (if any) trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.as_deref().map(|t| t.trim().to_string()),
            ..self.clone()
        }
    }

    pub fn character_changes(&self) -> Result<RelationChanges, CoreError> {
        RelationChanges::new(
            "character_ids",
            &self.add_character_ids,
            &self.remove_character_ids,
        )
    }
}
