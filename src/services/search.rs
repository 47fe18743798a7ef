use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Movie};

pub const DEFAULT_PAGE_SIZE: usize = 8;
pub const MAX_PAGE_SIZE: usize = 50;

/// Normalized search input used by the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    page: usize,
    page_size: usize,
}

impl SearchQuery {
    /// Normalize the raw inputs: the query is trimmed and lowercased (empty
    /// means match-all), the page is floored to 1, and the page size is
    /// clamped to `[1, MAX_PAGE_SIZE]`.
    pub fn new(query: &str, page: usize, page_size: usize) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            page: normalize_page(page),
            page_size: normalize_page_size(page_size),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paged response envelope. Also the shape a proxy-mode upstream must return,
/// so it derives `Deserialize` for validation of upstream bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub query: String,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub results: Vec<Movie>,
}

pub struct SearchService;

impl SearchService {
    /// Pure query-filter-paginate pass over the catalog. The filter is a
    /// stable, case-insensitive substring match on titles; the requested page
    /// is clamped to the last populated page, so the served `page` is always
    /// in `[1, totalPages]`.
    pub fn execute(catalog: &Catalog, query: &SearchQuery) -> SearchPage {
        let matches: Vec<&Movie> = catalog
            .movies()
            .iter()
            .filter(|movie| title_matches(movie, query.query()))
            .collect();

        let total = matches.len();
        let total_pages = total.div_ceil(query.page_size()).max(1);
        let page = query.page().min(total_pages);
        let start = (page - 1) * query.page_size();

        let results = matches
            .into_iter()
            .skip(start)
            .take(query.page_size())
            .cloned()
            .collect();

        SearchPage {
            query: query.query().to_string(),
            page,
            page_size: query.page_size(),
            total,
            total_pages,
            results,
        }
    }
}

fn title_matches(movie: &Movie, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    movie.title.to_lowercase().contains(needle)
}

fn normalize_page(page: usize) -> usize {
    if page == 0 { 1 } else { page }
}

fn normalize_page_size(page_size: usize) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
