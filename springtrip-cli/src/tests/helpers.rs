//! Test helpers: an on-disk catalog and offline services.

use super::*;
use crate::services::{CatalogLocation, ProviderSettings, Services};
use camino::Utf8PathBuf;
use springtrip_core::CatalogSource;
use springtrip_data::JsonFileCatalog;
use springtrip_planner::Providers;
use springtrip_planner::test_support::offline_providers;
use tempfile::TempDir;

pub(super) const CATALOG_JSON: &str = r#"[
  {"id": "sol-duc", "name": "Sol Duc Hot Springs", "lat": 47.9690, "lng": -123.8624},
  {"id": "baker", "name": "Baker Hot Springs", "lat": 48.7634, "lng": -121.6690},
  {"id": "goldmyer", "name": "Goldmyer Hot Springs", "lat": 47.4856, "lng": -121.3873},
  {"id": "scenic", "name": "Scenic Hot Springs", "lat": 47.7093, "lng": -121.1387},
  {"id": "olympic", "name": "Olympic Hot Springs", "lat": 47.9756, "lng": -123.6846}
]"#;

/// A temporary workspace holding `catalog.json` and a slot directory.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        std::fs::write(root.join("catalog.json"), CATALOG_JSON).expect("write catalog");
        Self { _dir: dir, root }
    }

    pub(super) fn catalog(&self) -> Utf8PathBuf {
        self.root.join("catalog.json")
    }

    pub(super) fn slot_dir(&self) -> Utf8PathBuf {
        self.root.join("slots")
    }

    pub(super) fn root(&self) -> &Utf8PathBuf {
        &self.root
    }
}

/// Services that read catalogs from disk and never touch the network.
pub(super) struct OfflineServices;

impl Services for OfflineServices {
    fn catalog_source(
        &self,
        location: &CatalogLocation,
        _settings: &ProviderSettings,
    ) -> Result<Box<dyn CatalogSource>, CliError> {
        match location {
            CatalogLocation::File(path) => Ok(Box::new(JsonFileCatalog::new(path.clone()))),
            CatalogLocation::Url(url) => panic!("offline tests cannot fetch {url}"),
        }
    }

    fn providers(&self, _settings: &ProviderSettings) -> Result<Providers, CliError> {
        Ok(offline_providers())
    }
}

/// Run `command` against [`OfflineServices`] and capture its output.
pub(super) fn run_offline(command: Command) -> Result<String, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let mut output = Vec::new();
    runtime.block_on(run_command(command, &OfflineServices, &mut output))?;
    Ok(String::from_utf8(output).expect("utf-8 output"))
}
