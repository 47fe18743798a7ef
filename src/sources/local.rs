use crate::{
    catalog::Catalog,
    services::search::{DEFAULT_PAGE_SIZE, SearchPage, SearchQuery, SearchService},
};

/// In-memory data source: the whole catalog is filtered and paginated per
/// request. The catalog never changes after startup, so concurrent reads need
/// no coordination.
#[derive(Debug)]
pub struct LocalSource {
    catalog: Catalog,
}

impl LocalSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Coerce the raw parameters and run the paginator. Malformed numerics
    /// degrade to their defaults instead of failing the request.
    pub fn search(&self, q: &str, page: &str, page_size: &str) -> SearchPage {
        let query = SearchQuery::new(
            q,
            coerce_positive(page, 1),
            coerce_positive(page_size, DEFAULT_PAGE_SIZE),
        );
        SearchService::execute(&self.catalog, &query)
    }
}

/// Non-numeric input falls back to the default; values below 1 floor to 1.
fn coerce_positive(raw: &str, default: usize) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 1 => value as usize,
        Ok(_) => 1,
        Err(_) => default,
    }
}
