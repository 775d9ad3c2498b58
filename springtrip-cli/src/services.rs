//! Construction of the catalog source, providers and slot store.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use springtrip_core::{CatalogSource, SlotStore, UnconfiguredOptimizer};
use springtrip_data::{
    DEFAULT_OVERPASS_URL, FileSlotStore, HttpCatalogSource, HttpOptimizingProvider,
    HttpProviderConfig, JsonFileCatalog, OsrmDirectionsProvider, OverpassPoiProvider,
    ProviderBuildError,
};
use springtrip_planner::Providers;

use crate::{ARG_OPTIMIZER_BASE_URL, CliError};

/// Seconds allowed for each provider call when `--timeout-secs` is absent.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the waypoint catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogLocation {
    /// A JSON file on disk.
    File(Utf8PathBuf),
    /// A paginated HTTP endpoint.
    Url(String),
}

impl CatalogLocation {
    /// Treat `http://` and `https://` values as endpoints, anything else as a
    /// path.
    pub(crate) fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_owned())
        } else {
            Self::File(Utf8PathBuf::from(raw))
        }
    }

    /// Check that a file catalog exists and is a regular file.
    pub(crate) fn validate(&self, field: &'static str) -> Result<(), CliError> {
        let Self::File(path) = self else {
            return Ok(());
        };
        match springtrip_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.clone(),
                source,
            }),
        }
    }
}

/// Credentials and endpoint for the optimizing tier.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct OptimizerSettings {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl std::fmt::Debug for OptimizerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizerSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Resolved provider endpoints shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderSettings {
    pub(crate) osrm_base_url: String,
    pub(crate) overpass_url: String,
    /// `None` disables the optimizing tier.
    pub(crate) optimizer: Option<OptimizerSettings>,
    pub(crate) timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            osrm_base_url: HttpProviderConfig::default().base_url,
            overpass_url: DEFAULT_OVERPASS_URL.to_owned(),
            optimizer: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderSettings {
    /// Merge optional overrides onto the defaults.
    ///
    /// A blank API key counts as absent. A key without an optimizer URL is an
    /// error, while a URL without a key leaves the tier disabled.
    pub(crate) fn resolve(
        osrm_base_url: Option<String>,
        overpass_url: Option<String>,
        optimizer_base_url: Option<String>,
        optimizer_api_key: Option<String>,
        timeout_secs: Option<u64>,
        optimizer_env: &'static str,
    ) -> Result<Self, CliError> {
        let defaults = Self::default();
        let api_key = optimizer_api_key.filter(|key| !key.trim().is_empty());
        let optimizer = match (optimizer_base_url, api_key) {
            (Some(base_url), Some(api_key)) => Some(OptimizerSettings { base_url, api_key }),
            (None, Some(_)) => {
                return Err(CliError::MissingArgument {
                    field: ARG_OPTIMIZER_BASE_URL,
                    env: optimizer_env,
                });
            }
            (_, None) => None,
        };
        Ok(Self {
            osrm_base_url: osrm_base_url.unwrap_or(defaults.osrm_base_url),
            overpass_url: overpass_url.unwrap_or(defaults.overpass_url),
            optimizer,
            timeout: timeout_secs.map_or(defaults.timeout, Duration::from_secs),
        })
    }

    fn http_config(&self, base_url: &str) -> HttpProviderConfig {
        HttpProviderConfig::new(base_url).with_timeout(self.timeout)
    }
}

/// Builds the collaborators a command needs.
pub(crate) trait Services {
    /// Catalog source for `location`.
    fn catalog_source(
        &self,
        location: &CatalogLocation,
        settings: &ProviderSettings,
    ) -> Result<Box<dyn CatalogSource>, CliError>;

    /// Optimizer, directions and POI providers.
    fn providers(&self, settings: &ProviderSettings) -> Result<Providers, CliError>;

    /// Slot store rooted at `dir`.
    fn slot_store(&self, dir: &Utf8Path) -> Rc<dyn SlotStore> {
        Rc::new(FileSlotStore::new(dir))
    }
}

/// Production services talking to the configured HTTP endpoints.
pub(crate) struct HttpServices;

fn build_error(base_url: &str) -> impl FnOnce(ProviderBuildError) -> CliError + '_ {
    move |source| CliError::BuildProvider {
        base_url: base_url.to_owned(),
        source,
    }
}

impl Services for HttpServices {
    fn catalog_source(
        &self,
        location: &CatalogLocation,
        settings: &ProviderSettings,
    ) -> Result<Box<dyn CatalogSource>, CliError> {
        match location {
            CatalogLocation::File(path) => Ok(Box::new(JsonFileCatalog::new(path.clone()))),
            CatalogLocation::Url(url) => {
                let source = HttpCatalogSource::with_config(settings.http_config(url))
                    .map_err(build_error(url))?;
                Ok(Box::new(source))
            }
        }
    }

    fn providers(&self, settings: &ProviderSettings) -> Result<Providers, CliError> {
        let directions =
            OsrmDirectionsProvider::with_config(settings.http_config(&settings.osrm_base_url))
                .map_err(build_error(&settings.osrm_base_url))?;
        let pois = OverpassPoiProvider::with_config(settings.http_config(&settings.overpass_url))
            .map_err(build_error(&settings.overpass_url))?;
        let optimizer: Arc<dyn springtrip_core::OptimizingProvider> = match &settings.optimizer {
            Some(optimizer) => {
                let config = settings
                    .http_config(&optimizer.base_url)
                    .with_api_key(optimizer.api_key.clone());
                Arc::new(
                    HttpOptimizingProvider::with_config(config)
                        .map_err(build_error(&optimizer.base_url))?,
                )
            }
            None => {
                log::debug!("no optimizer credential configured; using distance ordering");
                Arc::new(UnconfiguredOptimizer)
            }
        };
        Ok(Providers {
            optimizer,
            directions: Arc::new(directions),
            pois: Arc::new(pois),
        })
    }
}
