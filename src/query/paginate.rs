//! Page window computation.

use serde::Serialize;

/// One page of a larger result set, together with the navigation metadata
/// a client needs to walk the whole set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    /// Always the first page, `1`.
    pub first: u64,
    /// Previous page number, `None` on the first page.
    pub prev: Option<u64>,
    /// Next page number, `None` on the last page.
    pub next: Option<u64>,
    /// Always the last page number, equal to `pages`.
    pub last: u64,
    /// Total number of pages; at least `1` even for an empty set.
    pub pages: u64,
    /// Total number of items across all pages.
    pub items: u64,
    /// The records of the current page.
    pub data: Vec<T>,
}

/// Cuts `items` into the requested page window.
///
/// `per_page` is floored to an integer and clamped to at least `1`
/// (non-finite input also clamps to `1`). The page count is
/// `max(1, ceil(items / per_page))`, so an empty list still reports one
/// page. The requested `page` is floored and clamped into `[1, pages]`.
pub fn paginate<T: Clone>(items: &[T], page: f64, per_page: f64) -> Page<T> {
    let per_page = if per_page.is_finite() && per_page >= 1.0 {
        per_page.floor() as u64
    } else {
        1
    };
    let total = items.len() as u64;
    let pages = total.div_ceil(per_page).max(1);
    let page = if page.is_finite() && page >= 1.0 {
        (page.floor() as u64).min(pages)
    } else {
        1
    };

    let from = ((page - 1) * per_page) as usize;
    let to = (from + per_page as usize).min(items.len());
    let data = items[from.min(items.len())..to].to_vec();

    Page {
        first: 1,
        prev: (page > 1).then(|| page - 1),
        next: (page < pages).then(|| page + 1),
        last: pages,
        pages,
        items: total,
        data,
    }
}
