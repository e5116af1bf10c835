//! Zero-based page requests and page results.

use serde::Serialize;

use crate::error::CoreError;

/// Default number of rows per page when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated `(page_number, page_size)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    /// Validate a zero-based page number and a page size in
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, CoreError> {
        if page_number < 0 {
            return Err(CoreError::InvalidArgument(format!(
                "page number must be >= 0, got {page_number}"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CoreError::InvalidArgument(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }
        if page_number.checked_mul(page_size).is_none() {
            return Err(CoreError::InvalidArgument(format!(
                "page number {page_number} is out of range"
            )));
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    /// First page with the given size.
    pub fn first(page_size: i64) -> Result<Self, CoreError> {
        Self::new(0, page_size)
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// SQL `OFFSET`. Cannot overflow, checked in [`PageRequest::new`].
    pub fn offset(&self) -> i64 {
        self.page_number * self.page_size
    }
}

/// Number of pages needed for `total_elements` rows. Zero when empty.
pub fn total_pages(total_elements: i64, page_size: i64) -> i64 {
    if total_elements <= 0 || page_size <= 0 {
        return 0;
    }
    (total_elements + page_size - 1) / page_size
}

/// One slice of a listing plus totals computed over the full match.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            page_number: request.page_number(),
            page_size: request.page_size(),
            total_elements,
            total_pages: total_pages(total_elements, request.page_size()),
        }
    }

    /// `true` when no later page can contain rows.
    pub fn is_last(&self) -> bool {
        self.page_number >= self.total_pages.saturating_sub(1)
    }
}
