//! Restore command implementation for the Springtrip CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use springtrip_planner::{Planner, PlannerConfig, TripPersistence, TripSession, load_catalog};

use crate::report::{RestoreReport, write_json};
use crate::services::{CatalogLocation, ProviderSettings, Services};
use crate::{ARG_CATALOG, ARG_SHARE, ARG_SLOT_DIR, CliError, DEFAULT_SLOT_DIR, ENV_RESTORE_CATALOG};

/// CLI arguments for the `restore` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Restore a trip the way a returning visitor sees it: a share \
                 link wins over the saved trip, and springs the catalog no \
                 longer lists are dropped.",
    about = "Restore a trip from a share link or the saved slot"
)]
#[ortho_config(prefix = "SPRINGTRIP")]
pub(crate) struct RestoreArgs {
    /// Catalog JSON file or paginated catalog URL.
    #[arg(long = ARG_CATALOG, value_name = "path|url")]
    #[serde(default)]
    pub(crate) catalog: Option<String>,
    /// Share link or bare query to restore from.
    #[arg(long = ARG_SHARE, value_name = "url")]
    #[serde(default)]
    pub(crate) share: Option<String>,
    /// Directory holding the saved trip.
    #[arg(long = ARG_SLOT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) slot_dir: Option<Utf8PathBuf>,
}

/// Resolved `restore` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RestoreConfig {
    pub(crate) catalog: CatalogLocation,
    pub(crate) share: Option<String>,
    pub(crate) slot_dir: Utf8PathBuf,
}

impl TryFrom<RestoreArgs> for RestoreConfig {
    type Error = CliError;

    fn try_from(args: RestoreArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_RESTORE_CATALOG,
        })?;
        Ok(Self {
            catalog: CatalogLocation::parse(&catalog),
            share: args.share,
            slot_dir: args
                .slot_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SLOT_DIR)),
        })
    }
}

pub(crate) async fn run_restore(
    args: RestoreArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = RestoreConfig::try_from(merged)?;
    config.catalog.validate(ARG_CATALOG)?;
    let report = execute_restore(&config, services).await?;
    write_json(writer, &report)
}

/// Restore the trip with share-link precedence.
pub(crate) async fn execute_restore(
    config: &RestoreConfig,
    services: &dyn Services,
) -> Result<RestoreReport, CliError> {
    let settings = ProviderSettings::default();
    let source = services.catalog_source(&config.catalog, &settings)?;
    let catalog = load_catalog(source.as_ref()).await?;
    let session = TripSession::new(
        catalog,
        Planner::new(services.providers(&settings)?, &PlannerConfig::default()),
        TripPersistence::new(services.slot_store(&config.slot_dir)),
    );
    let restored = session.restore(config.share.as_deref());
    Ok(RestoreReport::new(restored, &session.trip()))
}
