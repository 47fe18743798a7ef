use anyhow::{Context, Result};
use reqwest::{Client, Url};

use super::SourceError;
use crate::services::search::SearchPage;

const SEARCH_PATH: &str = "/v1/movies/search";

/// HTTP data source for proxy mode. Holds one reused client; every search is
/// a fresh upstream fetch with no caching or retries.
#[derive(Debug, Clone)]
pub struct UpstreamSource {
    client: Client,
    search_url: Url,
}

impl UpstreamSource {
    pub fn new(base_url: Url) -> Result<Self> {
        let search_url = base_url
            .join(SEARCH_PATH)
            .with_context(|| format!("cannot derive search URL from '{base_url}'"))?;
        let client = Client::builder()
            .build()
            .context("failed to build upstream HTTP client")?;
        Ok(Self { client, search_url })
    }

    /// Forward the raw parameters upstream, renaming the incoming `q` to the
    /// upstream's `query`. The body must parse as a full search page; any
    /// non-2xx status, transport failure, or unparseable body becomes a
    /// `SourceError` for the gateway to report.
    pub async fn search(
        &self,
        q: &str,
        page: &str,
        page_size: &str,
    ) -> Result<SearchPage, SourceError> {
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("query", q), ("page", page), ("pageSize", page_size)])
            .send()
            .await
            .map_err(SourceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UpstreamStatus(status.as_u16()));
        }

        response.json().await.map_err(SourceError::InvalidBody)
    }
}
