//! Page-number pagination with the envelope the catalog frontend consumes.

use serde::{Deserialize, Serialize};

/// Default page size; divisible by three so catalog grids fill evenly.
pub const DEFAULT_PAGE_SIZE: u32 = 21;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Client-requested page coordinates, parsed straight from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "PageRequest::first_page")]
    pub page: u32,
    #[serde(default = "PageRequest::default_size")]
    pub page_size: u32,
}

impl PageRequest {
    fn first_page() -> u32 {
        1
    }

    fn default_size() -> u32 {
        DEFAULT_PAGE_SIZE
    }

    pub fn clamped_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page {requested} is out of range ({total_pages} pages available)")]
    OutOfRange { requested: u32, total_pages: u32 },
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Slices `items` into the requested page. An empty collection still has a
/// valid first page; anything beyond the last page is an error the API
/// surfaces as 404.
pub fn paginate<T>(items: Vec<T>, request: PageRequest, path: &str) -> Result<Page<T>, PageError> {
    let page_size = request.clamped_size();
    let count = items.len();
    let total_pages = (count as u32).div_ceil(page_size).max(1);

    if request.page == 0 || request.page > total_pages {
        return Err(PageError::OutOfRange {
            requested: request.page,
            total_pages,
        });
    }

    let start = ((request.page - 1) * page_size) as usize;
    let results: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    let next = (request.page < total_pages)
        .then(|| page_link(path, request.page + 1, page_size));
    let previous = (request.page > 1).then(|| page_link(path, request.page - 1, page_size));

    Ok(Page {
        count,
        total_pages,
        current_page: request.page,
        page_size,
        next,
        previous,
        results,
    })
}

fn page_link(path: &str, page: u32, page_size: u32) -> String {
    format!("{path}?page={page}&page_size={page_size}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u32, page_size: u32) -> PageRequest {
        PageRequest { page, page_size }
    }

    #[test]
    fn first_page_carries_next_but_no_previous() {
        let items: Vec<u32> = (0..50).collect();
        let page = paginate(items, request(1, 21), "/api/worksheets/").expect("page in range");

        assert_eq!(page.count, 50);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.page_size, 21);
        assert_eq!(page.results.len(), 21);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/worksheets/?page=2&page_size=21")
        );
        assert!(page.previous.is_none());
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let items: Vec<u32> = (0..50).collect();
        let page = paginate(items, request(3, 21), "/api/worksheets/").unwrap();

        assert_eq!(page.results.len(), 8);
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/worksheets/?page=2&page_size=21")
        );
    }

    #[test]
    fn empty_collections_still_have_one_page() {
        let page = paginate(Vec::<u32>::new(), PageRequest::default(), "/api/worksheets/")
            .expect("first page of nothing");
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn pages_beyond_the_end_are_out_of_range() {
        let items: Vec<u32> = (0..5).collect();
        let err = paginate(items, request(2, 21), "/api/worksheets/").unwrap_err();
        assert!(matches!(
            err,
            PageError::OutOfRange {
                requested: 2,
                total_pages: 1
            }
        ));

        let err = paginate(vec![1u32], request(0, 21), "/api/worksheets/").unwrap_err();
        assert!(matches!(err, PageError::OutOfRange { requested: 0, .. }));
    }

    #[test]
    fn page_size_is_clamped_to_the_maximum() {
        let items: Vec<u32> = (0..250).collect();
        let page = paginate(items, request(1, 500), "/api/worksheets/").unwrap();
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        assert_eq!(page.results.len(), 100);
        assert_eq!(page.total_pages, 3);
    }
}
