// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP route handlers.

pub mod auth;
pub mod boards;
pub mod cards;
pub mod lists;

use axum::http::{HeaderMap, HeaderValue};
use serde::Deserialize;
use taskboard_common::{PageParams, SortOrder};

/// Raw pagination query values. Pagination only activates when both are
/// present (see [`PageParams::from_query`]).
#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query values for card listings: pagination plus sorting.
#[derive(Deserialize, Debug, Default)]
pub struct CardsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

/// Pagination response headers.
pub(crate) fn pagination_headers(total: usize, page: PageParams) -> HeaderMap {
    let total_pages = total.div_ceil(page.limit as usize);
    let mut headers = HeaderMap::new();
    headers.insert("x-total-count", HeaderValue::from(total));
    headers.insert("x-page", HeaderValue::from(page.page));
    headers.insert("x-per-page", HeaderValue::from(page.limit));
    headers.insert("x-total-pages", HeaderValue::from(total_pages));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_headers() {
        let headers = pagination_headers(5, PageParams { page: 2, limit: 2 });
        assert_eq!(headers.get("x-total-count").unwrap(), "5");
        assert_eq!(headers.get("x-page").unwrap(), "2");
        assert_eq!(headers.get("x-per-page").unwrap(), "2");
        assert_eq!(headers.get("x-total-pages").unwrap(), "3");
    }
}
