//! Repository error type.

use cinecat_core::error::CoreError;

/// Errors returned by repositories that enforce domain rules (existence of
/// related rows, uniqueness) on top of plain SQL.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error such as a missing or tombstoned row.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Unique indexes guarding live names, with the entity they belong to.
const UNIQUE_INDEXES: &[(&str, &str)] = &[
    ("uq_characters_name", "Character"),
    ("uq_movies_title", "Movie"),
    ("uq_genres_name", "Genre"),
];

impl DbError {
    /// Translate a sqlx error, mapping a unique violation (`23505`) on one of
    /// the `uq_*` name indexes to [`CoreError::AlreadyExists`].
    ///
    /// `name` is the value that was being written.
    pub fn classify(err: sqlx::Error, name: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or_default();
                if let Some((_, entity)) = UNIQUE_INDEXES.iter().find(|(c, _)| *c == constraint) {
                    return DbError::Core(CoreError::AlreadyExists {
                        entity: *entity,
                        name: name.to_string(),
                    });
                }
            }
        }
        DbError::Database(err)
    }

    pub fn not_found(entity: &'static str, id: cinecat_core::types::DbId) -> Self {
        DbError::Core(CoreError::NotFound { entity, id })
    }

    /// A row written or locked earlier in the same transaction could not be
    /// read back.
    pub fn vanished(entity: &'static str, id: cinecat_core::types::DbId) -> Self {
        DbError::Core(CoreError::Internal(format!(
            "{entity} {id} missing after write in the same transaction"
        )))
    }
}
