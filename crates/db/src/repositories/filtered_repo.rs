//! Paginated execution of compiled filters.

use cinecat_core::pagination::{Page, PageRequest};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::filter::{bind_values, bind_values_scalar, CompiledFilter};

/// Runs a [`CompiledFilter`] as a page query plus a total count.
pub struct FilteredRepository;

impl FilteredRepository {
    /// Fetch one page of rows matching `filter`.
    ///
    /// `key` is the column counted for totals (e.g. `c.id`); totals are
    /// computed over the full match, not the page slice. A page past the end
    /// yields empty content with the same totals.
    pub async fn fetch_page<T>(
        pool: &PgPool,
        filter: &CompiledFilter,
        columns: &str,
        order_by: &str,
        key: &str,
        page: PageRequest,
    ) -> Result<Page<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let count_query = filter.count(key);
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), &filter.binds)
            .fetch_one(pool)
            .await?;

        let content = if page.offset() >= total {
            Vec::new()
        } else {
            let select_query = filter.select_page(columns, order_by);
            bind_values(sqlx::query_as::<_, T>(&select_query), &filter.binds)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(pool)
                .await?
        };

        let page = Page::new(content, page, total);
        tracing::debug!(
            total,
            page = page.page_number,
            size = page.page_size,
            returned = page.content.len(),
            last = page.is_last(),
            "Fetched filtered page"
        );
        Ok(page)
    }
}
