//! Shared query parameter types for API handlers.

use serde::Deserialize;
use toolforge_core::types::DbId;

/// Hard ceiling on page size to keep history queries bounded.
const MAX_PER_PAGE: i64 = 100;

/// Pagination parameters for the submission history (`?page=&per_page=`),
/// with an optional tool filter.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub tool_id: Option<DbId>,
}

impl HistoryParams {
    /// Resolve to a 1-based page and clamped page size.
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }

    /// SQL offset for the resolved page.
    pub fn offset(&self) -> i64 {
        let (page, per_page) = self.resolve();
        (page - 1) * per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        let params = HistoryParams {
            page: None,
            per_page: None,
            tool_id: None,
        };
        assert_eq!(params.resolve(), (1, 20));
        assert_eq!(params.offset(), 0);

        let params = HistoryParams {
            page: Some(3),
            per_page: Some(500),
            tool_id: None,
        };
        assert_eq!(params.resolve(), (3, 100));
        assert_eq!(params.offset(), 200);

        let params = HistoryParams {
            page: Some(0),
            per_page: Some(0),
            tool_id: None,
        };
        assert_eq!(params.resolve(), (1, 1));
    }
}
