//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get
//! compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing envelope used by the submission history endpoints.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Assemble a page from its rows and the total row count.
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            data,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 21, 1, 10);
        assert_eq!(page.total_pages, 3);

        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 20, 1, 10);
        assert_eq!(page.total_pages, 2);

        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, 1, 10);
        assert_eq!(page.total_pages, 0);
    }
}
