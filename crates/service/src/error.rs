use cinecat_core::error::CoreError;
use cinecat_db::DbError;

/// Error type returned by every catalog service operation.
///
/// Wraps [`CoreError`] for domain errors and keeps raw database failures
/// separate so they can be logged and reported as internal errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `cinecat_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for service return values.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => ServiceError::Core(core),
            DbError::Database(db) => ServiceError::Database(db),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Core(CoreError::InvalidArgument(errors.to_string()))
    }
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Core(CoreError::NotFound { .. }) => "NOT_FOUND",
            ServiceError::Core(CoreError::AlreadyExists { .. }) => "ALREADY_EXISTS",
            ServiceError::Core(CoreError::InvalidArgument(_)) => "INVALID_ARGUMENT",
            ServiceError::Core(CoreError::Internal(_)) | ServiceError::Database(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Message safe to hand to a caller. Internal and database errors are
    /// logged here and replaced by a generic message.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                "An internal error occurred".to_string()
            }
            ServiceError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                "An internal error occurred".to_string()
            }
            ServiceError::Core(core) => core.to_string(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: cinecat_core::types::DbId) -> Self {
        ServiceError::Core(CoreError::NotFound { entity, id })
    }

    pub(crate) fn already_exists(entity: &'static str, name: &str) -> Self {
        tracing::warn!(entity, name, "Rejected duplicate name");
        ServiceError::Core(CoreError::AlreadyExists {
            entity,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::not_found("Movie", 1).code(), "NOT_FOUND");
        assert_eq!(
            ServiceError::already_exists("Genre", "Drama").code(),
            "ALREADY_EXISTS"
        );
        assert_eq!(
            ServiceError::Core(CoreError::InvalidArgument("page".into())).code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            ServiceError::Database(sqlx::Error::RowNotFound).code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn db_errors_unwrap_into_matching_variant() {
        let err: ServiceError = DbError::not_found("Character", 3).into();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::NotFound {
                entity: "Character",
                id: 3
            })
        ));
    }

    #[test]
    fn internal_messages_are_sanitized() {
        let err = ServiceError::Core(CoreError::Internal("pool exhausted".into()));
        assert_eq!(err.public_message(), "An internal error occurred");
    }
}
