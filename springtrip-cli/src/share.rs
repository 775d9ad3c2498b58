//! Share command implementation for the Springtrip CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use springtrip_core::{LatLng, ShareToken, TripState};
use springtrip_planner::load_catalog;
use url::Url;

use crate::plan::parse_start;
use crate::report::write_line;
use crate::services::{CatalogLocation, ProviderSettings, Services};
use crate::{ARG_BASE_URL, ARG_CATALOG, ARG_SPRING, ARG_START, CliError, ENV_SHARE_CATALOG};

/// CLI arguments for the `share` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Encode a trip as share-link query parameters. Springs are \
                 checked against the catalog and kept in the given order.",
    about = "Print the share link for a trip"
)]
#[ortho_config(prefix = "SPRINGTRIP")]
pub(crate) struct ShareArgs {
    /// Catalog JSON file or paginated catalog URL.
    #[arg(long = ARG_CATALOG, value_name = "path|url")]
    #[serde(default)]
    pub(crate) catalog: Option<String>,
    /// Spring identifier to visit; repeat for each stop.
    #[arg(long = ARG_SPRING, value_name = "id")]
    #[serde(default)]
    pub(crate) springs: Vec<String>,
    /// Start location as `lat,lng`.
    #[arg(long = ARG_START, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Page URL to attach the query to.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

/// Resolved `share` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShareConfig {
    pub(crate) catalog: CatalogLocation,
    pub(crate) springs: Vec<String>,
    pub(crate) start: Option<LatLng>,
    pub(crate) base_url: Option<String>,
}

impl TryFrom<ShareArgs> for ShareConfig {
    type Error = CliError;

    fn try_from(args: ShareArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_SHARE_CATALOG,
        })?;
        Ok(Self {
            catalog: CatalogLocation::parse(&catalog),
            springs: args.springs,
            start: args.start.map(parse_start).transpose()?,
            base_url: args.base_url,
        })
    }
}

pub(crate) async fn run_share(
    args: ShareArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ShareConfig::try_from(merged)?;
    config.catalog.validate(ARG_CATALOG)?;
    let link = share_link(&config, services).await?;
    write_line(writer, &link)
}

/// Encode the configured trip, attached to the base URL when one is given.
pub(crate) async fn share_link(
    config: &ShareConfig,
    services: &dyn Services,
) -> Result<String, CliError> {
    let source = services.catalog_source(&config.catalog, &ProviderSettings::default())?;
    let catalog = load_catalog(source.as_ref()).await?;
    let mut trip = TripState::default();
    for spring in &config.springs {
        trip.push_from_catalog(spring, &catalog)?;
    }
    if let Some(start) = config.start {
        trip.set_start(start)?;
    }
    let token = ShareToken::from_trip(&trip);
    match &config.base_url {
        Some(base) => {
            let base = Url::parse(base).map_err(|source| CliError::InvalidBaseUrl {
                url: base.clone(),
                source,
            })?;
            Ok(token.to_url(&base)?.into())
        }
        None => Ok(token.encode()?),
    }
}
