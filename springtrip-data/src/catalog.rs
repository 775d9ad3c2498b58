//! Waypoint catalog sources: a paginated HTTP endpoint and a local JSON file.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use reqwest::Client;
use serde::Deserialize;
use springtrip_core::{CatalogError, CatalogSource, ProviderError, WaypointRecord};

use crate::http::{HttpProviderConfig, ProviderBuildError};

/// Upper bound on pages fetched before the source gives up.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// One page of catalog records.
#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    records: Vec<WaypointRecord>,
    /// Continuation token for the next page.
    #[serde(default)]
    offset: Option<String>,
}

/// A catalog file holds either a bare record array or a single page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Records(Vec<WaypointRecord>),
    Page(CatalogPage),
}

/// Catalog served page by page over HTTP.
///
/// Each response carries an `offset` continuation token; the next request
/// passes it back as the `offset` query parameter. Fetching stops when a page
/// has no token.
#[derive(Debug)]
pub struct HttpCatalogSource {
    client: Client,
    config: HttpProviderConfig,
    max_pages: usize,
}

impl HttpCatalogSource {
    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Limit the number of pages fetched.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    fn unavailable(&self, err: &ProviderError) -> CatalogError {
        let location = self.config.base_url.clone();
        match err {
            ProviderError::Parse { message } => CatalogError::Malformed {
                location,
                message: message.clone(),
            },
            other => CatalogError::Unavailable {
                location,
                message: other.to_string(),
            },
        }
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<CatalogPage, ProviderError> {
        let url = self.config.endpoint("");
        let mut request = self.client.get(&url);
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }
        let request = self.config.authorize(request);
        self.config.fetch_json(request, &url).await
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_records(&self) -> Result<Vec<WaypointRecord>, CatalogError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        for page_number in 1..=self.max_pages {
            let page = self
                .fetch_page(offset.as_deref())
                .await
                .map_err(|err| self.unavailable(&err))?;
            log::debug!(
                "catalog page {page_number} returned {} records",
                page.records.len()
            );
            records.extend(page.records);
            match page.offset {
                Some(next) if !next.is_empty() => offset = Some(next),
                _ => return Ok(records),
            }
        }
        log::warn!(
            "catalog at {} still paginating after {} pages; using {} records",
            self.config.base_url,
            self.max_pages,
            records.len()
        );
        Ok(records)
    }
}

/// Catalog read from a local JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: Utf8PathBuf,
}

impl JsonFileCatalog {
    /// Read records from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read(path: &Utf8Path) -> Result<Vec<WaypointRecord>, CatalogError> {
        let contents = springtrip_fs::read_to_string_if_exists(path)
            .map_err(|err| CatalogError::Unavailable {
                location: path.to_string(),
                message: err.to_string(),
            })?
            .ok_or_else(|| CatalogError::Unavailable {
                location: path.to_string(),
                message: "file not found".to_owned(),
            })?;
        let file: CatalogFile =
            serde_json::from_str(&contents).map_err(|err| CatalogError::Malformed {
                location: path.to_string(),
                message: err.to_string(),
            })?;
        Ok(match file {
            CatalogFile::Records(records) => records,
            CatalogFile::Page(page) => page.records,
        })
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn fetch_records(&self) -> Result<Vec<WaypointRecord>, CatalogError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::read(&path))
            .await
            .map_err(|err| CatalogError::Unavailable {
                location: self.path.to_string(),
                message: err.to_string(),
            })?
    }
}
