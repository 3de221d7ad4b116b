//! Fixed-size pagination over a sorted record list.

use serde::Serialize;

/// Page navigation actions from the table footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
    /// Jump to a zero-based page; clamped into range.
    Goto(usize),
}

/// Pagination metadata accompanying a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based page actually shown (after clamping).
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// Zero-based index of the first row on this page.
    pub start: usize,
}

impl PageInfo {
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// `max(1, ceil(count / page_size))`. A zero page size is treated as 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` into `[0, total_pages - 1]`.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.min(total_pages(count, page_size) - 1)
}

/// Resolve a navigation action against the current page.
pub fn navigate(current: usize, nav: PageNav, count: usize, page_size: usize) -> usize {
    let last = total_pages(count, page_size) - 1;
    let target = match nav {
        PageNav::First => 0,
        PageNav::Prev => current.saturating_sub(1),
        PageNav::Next => current.saturating_add(1),
        PageNav::Last => last,
        PageNav::Goto(page) => page,
    };
    target.min(last)
}

/// Slice one page out of `items`. Out-of-range pages are clamped.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> (&[T], PageInfo) {
    let page_size = page_size.max(1);
    let page = clamp_page(page, items.len(), page_size);
    let start = (page * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    let info = PageInfo {
        page,
        page_size,
        total_pages: total_pages(items.len(), page_size),
        total_count: items.len(),
        start,
    };
    (&items[start..end], info)
}
