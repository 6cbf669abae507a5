// ABOUTME: Offset pagination with clamped inputs and a bounded display window
// ABOUTME: Provides the page metadata structure consumed by the presentation layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Offset-based pagination
//!
//! Invalid page inputs are normalized, never rejected: the requested page is
//! clamped into `[1, total_pages]` and `total_pages` is at least 1 even for
//! an empty result set. The display window lists at most
//! [`MAX_DISPLAY_PAGES`] page numbers around the current page.

use serde::{Deserialize, Serialize};

/// Maximum number of page links in the display window
pub const MAX_DISPLAY_PAGES: u32 = 5;

/// Page metadata for a sliced result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page after clamping, 1-based
    pub page: u32,
    /// Total number of pages, at least 1
    pub total_pages: u32,
    /// Page numbers to display, a window of at most [`MAX_DISPLAY_PAGES`]
    pub pages: Vec<u32>,
    /// Whether a previous page exists
    pub has_prev: bool,
    /// Whether a next page exists
    pub has_next: bool,
    /// Previous page number, when one exists
    pub prev_page: Option<u32>,
    /// Next page number, when one exists
    pub next_page: Option<u32>,
}

impl Pagination {
    /// Compute page metadata for `total` items at `page_size` per page.
    ///
    /// `page_size` must be non-zero; callers normalize it first.
    #[must_use]
    pub fn compute(total: usize, page: u32, page_size: u32) -> Self {
        let total_pages = total
            .div_ceil(page_size as usize)
            .max(1)
            .try_into()
            .unwrap_or(u32::MAX);
        let page = page.clamp(1, total_pages);

        // Window: two pages either side, then pulled down so a clamped top
        // edge still yields a full window where possible. At the low edge
        // the window stays short, matching the reference behavior.
        let mut start_page = page.saturating_sub(2).max(1);
        let end_page = total_pages.min(page + 2);
        if end_page - start_page < MAX_DISPLAY_PAGES - 1 {
            start_page = end_page.saturating_sub(MAX_DISPLAY_PAGES - 1).max(1);
        }
        let pages = (start_page..=end_page).collect();

        Self {
            page,
            total_pages,
            pages,
            has_prev: page > 1,
            has_next: page < total_pages,
            prev_page: (page > 1).then(|| page - 1),
            next_page: (page < total_pages).then(|| page + 1),
        }
    }

    /// Slice bounds for the current page over a `total`-item collection.
    #[must_use]
    pub fn slice_bounds(&self, total: usize, page_size: u32) -> (usize, usize) {
        let start = (self.page as usize - 1) * page_size as usize;
        let end = (start + page_size as usize).min(total);
        (start.min(total), end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_still_has_one_page() {
        let pagination = Pagination::compute(0, 1, 12);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.pages, vec![1]);
        assert!(!pagination.has_prev);
        assert!(!pagination.has_next);
        assert_eq!(pagination.slice_bounds(0, 12), (0, 0));
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let pagination = Pagination::compute(25, 99, 10);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.prev_page, Some(2));
        assert_eq!(pagination.next_page, None);

        let below = Pagination::compute(25, 0, 10);
        assert_eq!(below.page, 1);
    }

    #[test]
    fn boundary_last_page_is_partial() {
        let pagination = Pagination::compute(3, 2, 2);
        assert_eq!(pagination.total_pages, 2);
        assert!(pagination.has_prev);
        assert!(!pagination.has_next);
        assert_eq!(pagination.slice_bounds(3, 2), (2, 3));
    }

    #[test]
    fn window_is_short_at_the_low_edge() {
        // Mirrors the reference arithmetic: page 1 of many shows 1..=3
        let pagination = Pagination::compute(100, 1, 10);
        assert_eq!(pagination.pages, vec![1, 2, 3]);

        let mid = Pagination::compute(100, 5, 10);
        assert_eq!(mid.pages, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn window_is_pulled_down_at_the_top_edge() {
        let pagination = Pagination::compute(100, 10, 10);
        assert_eq!(pagination.pages, vec![6, 7, 8, 9, 10]);

        let near_top = Pagination::compute(100, 9, 10);
        assert_eq!(near_top.pages, vec![6, 7, 8, 9, 10]);
    }
}
