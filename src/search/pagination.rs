//! Fixed-size page slicing for display.

use serde::Serialize;

use crate::models::Book;

/// Books shown per UI page
pub const BOOKS_PER_PAGE: usize = 12;

/// Maximum number of page-number entries in the paging control
const MAX_VISIBLE_PAGES: usize = 5;

/// Number of pages needed to show `len` items, `per_page` at a time
pub fn total_pages(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page.max(1))
}

/// Clamp a 1-based page index into `[1, total_pages]` (1 when there are no pages)
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One displayed page of books
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageView<'a> {
    /// Books on this page
    pub items: &'a [Book],

    /// 1-based page index after clamping
    pub page: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Number of items across all pages
    pub total_items: usize,

    /// Index of the first item of this page in the full collection
    pub offset: usize,
}

impl<'a> PageView<'a> {
    /// Slice `items` for a 1-based `page`, clamping out-of-range pages
    pub fn new(items: &'a [Book], per_page: usize, page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_pages(items.len(), per_page);
        let page = clamp_page(page, total_pages);

        let offset = ((page - 1) * per_page).min(items.len());
        let end = (offset + per_page).min(items.len());

        Self {
            items: &items[offset..end],
            page,
            total_pages,
            total_items: items.len(),
            offset,
        }
    }

    /// Whether the paging control should be shown at all
    pub fn show_controls(&self) -> bool {
        self.total_pages > 1
    }

    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page-number entries for the paging control
    pub fn markers(&self) -> Vec<PageMarker> {
        page_numbers(self.page, self.total_pages)
    }
}

/// One entry of the paging control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// Page-number window around `current`.
///
/// Shows every page when there are at most five. Otherwise keeps the first
/// and last page visible with ellipses around a window near `current`.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Page};

    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(Page).collect();
    }

    let current = clamp_page(current, total);
    let mut markers = Vec::with_capacity(7);

    if current <= 3 {
        markers.extend((1..=4).map(Page));
        markers.push(Ellipsis);
        markers.push(Page(total));
    } else if current >= total - 2 {
        markers.push(Page(1));
        markers.push(Ellipsis);
        markers.extend((total - 3..=total).map(Page));
    } else {
        markers.push(Page(1));
        markers.push(Ellipsis);
        markers.extend((current - 1..=current + 1).map(Page));
        markers.push(Ellipsis);
        markers.push(Page(total));
    }

    markers
}
