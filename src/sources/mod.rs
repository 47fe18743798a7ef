use anyhow::Result;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    config::{AppConfig, SourceConfig},
    services::search::SearchPage,
};

mod local;
mod upstream;

pub use local::LocalSource;
pub use upstream::UpstreamSource;

/// The data source behind the gateway, fixed at startup. Local mode filters
/// the in-memory catalog; proxy mode forwards every search to the external
/// movie API.
#[derive(Debug)]
pub enum MovieSource {
    Local(LocalSource),
    Upstream(UpstreamSource),
}

impl MovieSource {
    /// Build the source the configuration selects. Catalog problems surface
    /// here, at startup, never during a request.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match &config.source {
            SourceConfig::Local { catalog_file } => {
                let catalog = Catalog::load(catalog_file.as_deref())?;
                Ok(Self::Local(LocalSource::new(catalog)))
            }
            SourceConfig::Upstream { base_url } => {
                Ok(Self::Upstream(UpstreamSource::new(base_url.clone())?))
            }
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Upstream(_) => "proxy",
        }
    }

    /// The backing catalog, when one exists (local mode only).
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Local(source) => Some(source.catalog()),
            Self::Upstream(_) => None,
        }
    }

    /// Answer one search from raw query-string values. Local mode coerces the
    /// parameters and cannot fail; proxy mode forwards them and maps every
    /// upstream problem into a `SourceError`.
    pub async fn search(
        &self,
        q: &str,
        page: &str,
        page_size: &str,
    ) -> Result<SearchPage, SourceError> {
        match self {
            Self::Local(source) => Ok(source.search(q, page, page_size)),
            Self::Upstream(source) => source.search(q, page, page_size).await,
        }
    }
}

/// Failure taxonomy for proxy mode. The `Display` strings are the messages
/// clients see in the error envelope.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Upstream error {0}")]
    UpstreamStatus(u16),

    #[error("upstream request failed")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned a malformed search response")]
    InvalidBody(#[source] reqwest::Error),
}
