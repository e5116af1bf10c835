//! Character entity model and DTOs.

use cinecat_core::error::CoreError;
use cinecat_core::relations::RelationChanges;
use cinecat_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A live row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub age: i32,
    pub weight: f64,
    pub history: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A character together with the ids of the live movies it appears in.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterWithMovies {
    #[serde(flatten)]
    pub character: Character,
    pub movie_ids: Vec<DbId>,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 1))]
    pub age: i32,
    #[validate(range(exclusive_min = 0.0))]
    pub weight: f64,
    pub history: Option<String>,
    /// Movies to link on creation. Each must be live.
    #[serde(default)]
    pub movie_ids: Vec<DbId>,
}

impl CreateCharacter {
    /// Copy with the name trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn movie_changes(&self) -> Result<RelationChanges, CoreError> {
        RelationChanges::additions_only("movie_ids", &self.movie_ids)
    }
}

/// DTO for updating an existing character. Only supplied fields are written.
///
/// `add_movie_ids` are applied before `remove_movie_ids`; an id in both ends
/// up unlinked.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub age: Option<i32>,
    #[validate(range(exclusive_min = 0.0))]
    pub weight: Option<f64>,
    pub history: Option<String>,
    #[serde(default)]
    pub add_movie_ids: Vec<DbId>,
    #[serde(default)]
    pub remove_movie_ids: Vec<DbId>,
}

impl UpdateCharacter {
    /// Copy with the name (if any) trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|n| n.trim().to_string()),
            ..self.clone()
        }
    }

    pub fn movie_changes(&self) -> Result<RelationChanges, CoreError> {
        RelationChanges::new("movie_ids", &self.add_movie_ids, &self.remove_movie_ids)
    }
}
