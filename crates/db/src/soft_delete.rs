//! Tombstone handling shared by every catalog table.
//!
//! Deleting flips `deleted = true`; rows are never removed, so join rows and
//! `genre_id` references stay resolvable. Every read path builds its WHERE
//! clause through [`SoftDeleteGuard::where_clause`], which always leads with
//! the live-row condition. Callers cannot opt out of it.

use cinecat_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};

/// Tables that carry a `deleted` tombstone flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tombstoned {
    Characters,
    Movies,
    Genres,
}

impl Tombstoned {
    pub fn table(self) -> &'static str {
        match self {
            Tombstoned::Characters => "characters",
            Tombstoned::Movies => "movies",
            Tombstoned::Genres => "genres",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Tombstoned::Characters => "Character",
            Tombstoned::Movies => "Movie",
            Tombstoned::Genres => "Genre",
        }
    }

    /// The column that must be unique among live rows.
    fn name_column(self) -> &'static str {
        match self {
            Tombstoned::Characters | Tombstoned::Genres => "name",
            Tombstoned::Movies => "title",
        }
    }
}

/// Builds the mandatory live-row filter and performs tombstone writes.
pub struct SoftDeleteGuard;

impl SoftDeleteGuard {
    /// Condition selecting live rows of the table aliased as `alias`.
    pub fn live(alias: &str) -> String {
        format!("{alias}.deleted = false")
    }

    /// Render `WHERE <live> AND <conditions...>`.
    pub fn where_clause(alias: &str, conditions: &[String]) -> String {
        let mut all = Vec::with_capacity(conditions.len() + 1);
        all.push(Self::live(alias));
        all.extend(conditions.iter().cloned());
        format!("WHERE {}", all.join(" AND "))
    }

    /// Tombstone a live row. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        target: Tombstoned,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted = true WHERE id = $1 AND deleted = false",
            target.table()
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the tombstone of a deleted row. Returns `true` if a row was
    /// restored.
    ///
    /// Fails with `AlreadyExists` if another live row has taken the name in
    /// the meantime.
    pub async fn restore(pool: &PgPool, target: Tombstoned, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted = true FOR UPDATE",
            target.name_column(),
            target.table()
        );
        let name = sqlx::query_scalar::<_, String>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(name) = name else {
            return Ok(false);
        };

        let update = format!("UPDATE {} SET deleted = false WHERE id = $1", target.table());
        sqlx::query(&update)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::classify(e, &name))?;

        tx.commit().await?;
        Ok(true)
    }

    /// Fail with `NotFound` unless `id` is a live row of `target`.
    ///
    /// With `lock`, the row is held `FOR UPDATE` until the transaction ends.
    pub(crate) async fn ensure_live(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        target: Tombstoned,
        id: DbId,
        lock: bool,
    ) -> DbResult<()> {
        let query = format!(
            "SELECT id FROM {} WHERE id = $1 AND deleted = false{}",
            target.table(),
            if lock { " FOR UPDATE" } else { "" }
        );
        let found = sqlx::query_scalar::<_, DbId>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(DbError::not_found(target.entity(), id)),
        }
    }
}
