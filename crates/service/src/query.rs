//! Caller-facing list parameters shared by the catalog services.

use cinecat_core::pagination::{PageRequest, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

use crate::error::ServiceResult;

/// Pagination parameters (`page` is zero-based).
///
/// Missing values fall back to page `0` and the configured default size;
/// out-of-range values are rejected as `InvalidArgument`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }

    /// Resolve into a validated request using `default_size` for a missing
    /// size.
    pub fn resolve(self, default_size: i64) -> ServiceResult<PageRequest> {
        let request = PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(default_size),
        )?;
        Ok(request)
    }

    /// Resolve with the library default page size.
    pub fn to_request(self) -> ServiceResult<PageRequest> {
        self.resolve(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use cinecat_core::error::CoreError;

    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn missing_values_use_defaults() {
        let request = PageParams::default().resolve(25).unwrap();
        assert_eq!(request.page_number(), 0);
        assert_eq!(request.page_size(), 25);
    }

    #[test]
    fn out_of_range_is_invalid_argument() {
        assert_matches!(
            PageParams::new(-1, 10).to_request(),
            Err(ServiceError::Core(CoreError::InvalidArgument(_)))
        );
        assert_matches!(
            PageParams::new(0, 0).to_request(),
            Err(ServiceError::Core(CoreError::InvalidArgument(_)))
        );
    }
}
