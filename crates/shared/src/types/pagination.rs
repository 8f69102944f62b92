//! Pagination for list endpoints.
//!
//! Pages are 1-indexed on the wire; `SeaORM` paginators are 0-indexed, so
//! repositories go through [`PageRequest::zero_based`] when fetching.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 20;

/// Page selection parsed from query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-indexed page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// 0-indexed page for `SeaORM` `fetch_page`.
    #[must_use]
    pub fn zero_based(&self) -> u64 {
        u64::from(self.page.saturating_sub(1))
    }

    /// Row offset for manual OFFSET/LIMIT queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.zero_based() * u64::from(self.per_page)
    }

    /// Row limit.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// A page of rows plus its metadata envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Page metadata.
    pub meta: PageMeta,
}

/// Metadata describing where a page sits in the full result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-indexed page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Total rows across every page.
    pub total: u64,
    /// Total pages; an empty result still reports one page.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Wraps one page of rows with its metadata.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages: total_pages(total, per_page),
            },
        }
    }
}

fn total_pages(total: u64, per_page: u32) -> u32 {
    if total == 0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation)]
    {
        total.div_ceil(u64::from(per_page.max(1))) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_starts_at_zero() {
        let req = PageRequest::default();
        assert_eq!(req.zero_based(), 0);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_offset_skips_earlier_pages() {
        let req = PageRequest {
            page: 3,
            per_page: 25,
        };
        assert_eq!(req.zero_based(), 2);
        assert_eq!(req.offset(), 50);
    }

    #[test]
    fn test_page_zero_is_clamped() {
        let req = PageRequest {
            page: 0,
            per_page: 20,
        };
        assert_eq!(req.zero_based(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
    }

    #[test]
    fn test_empty_result_still_has_a_page() {
        let resp: PageResponse<u32> = PageResponse::new(vec![], 1, 10, 0);
        assert_eq!(resp.meta.total_pages, 1);
        assert!(resp.data.is_empty());
    }

    #[test]
    fn test_missing_params_take_defaults() {
        let req: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 20);
    }
}
