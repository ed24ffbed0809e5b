//! Pagination extractor.

use serde::Deserialize;
use tally_core::PageRequest;
use utoipa::IntoParams;

/// Query parameters for pagination.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number, starting at 0.
    #[serde(default)]
    pub page: Option<usize>,
    /// Page size, 10 by default and at most 100.
    #[serde(default)]
    pub size: Option<usize>,
}

impl From<PaginationQuery> for PageRequest {
    fn from(query: PaginationQuery) -> Self {
        PageRequest::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        )
    }
}
