//! Plan command implementation for the Springtrip CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use springtrip_core::LatLng;
use springtrip_planner::{
    Command, CommandOutcome, OptimizeOutcome, Planner, PlannerConfig, TripPersistence,
    TripSession, load_catalog,
};

use crate::report::{PlanReport, write_json};
use crate::services::{CatalogLocation, ProviderSettings, Services};
use crate::{
    ARG_CATALOG, ARG_OPTIMIZER_API_KEY, ARG_OPTIMIZER_BASE_URL, ARG_OSRM_BASE_URL,
    ARG_OVERPASS_URL, ARG_SLOT_DIR, ARG_SPRING, ARG_START, ARG_TIMEOUT_SECS, CliError,
    DEFAULT_SLOT_DIR, ENV_PLAN_CATALOG, ENV_PLAN_START,
};

const ENV_PLAN_OPTIMIZER_BASE_URL: &str = "SPRINGTRIP_CMDS_PLAN_OPTIMIZER_BASE_URL";

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the waypoint catalog, order the chosen springs from the \
                 start location and print the measured route with nearby \
                 amenities as JSON. Without an optimizer credential the \
                 springs are ordered by distance from the start.",
    about = "Optimize a trip and print the route"
)]
#[ortho_config(prefix = "SPRINGTRIP")]
pub(crate) struct PlanArgs {
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
    /// Save the optimized trip to the slot directory.
    #[arg(long)]
    #[serde(default)]
    pub(crate) save: bool,
    /// Directory holding the saved trip.
    #[arg(long = ARG_SLOT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) slot_dir: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server.
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Overpass API interpreter URL.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Base URL for the waypoint optimizer.
    #[arg(long = ARG_OPTIMIZER_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) optimizer_base_url: Option<String>,
    /// Bearer credential for the waypoint optimizer.
    #[arg(long = ARG_OPTIMIZER_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) optimizer_api_key: Option<String>,
    /// Seconds allowed for each provider call.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) catalog: CatalogLocation,
    pub(crate) springs: Vec<String>,
    pub(crate) start: LatLng,
    pub(crate) save: bool,
    pub(crate) slot_dir: Utf8PathBuf,
    pub(crate) providers: ProviderSettings,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_PLAN_CATALOG,
        })?;
        let start = args.start.ok_or(CliError::MissingArgument {
            field: ARG_START,
            env: ENV_PLAN_START,
        })?;
        let providers = ProviderSettings::resolve(
            args.osrm_base_url,
            args.overpass_url,
            args.optimizer_base_url,
            args.optimizer_api_key,
            args.timeout_secs,
            ENV_PLAN_OPTIMIZER_BASE_URL,
        )?;
        Ok(Self {
            catalog: CatalogLocation::parse(&catalog),
            springs: args.springs,
            start: parse_start(start)?,
            save: args.save,
            slot_dir: args
                .slot_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SLOT_DIR)),
            providers,
        })
    }
}

/// Parse a `lat,lng` start location.
pub(crate) fn parse_start(value: String) -> Result<LatLng, CliError> {
    value
        .parse()
        .map_err(|source| CliError::InvalidStart { value, source })
}

pub(crate) async fn run_plan(
    args: PlanArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.catalog.validate(ARG_CATALOG)?;
    let report = execute_plan(&config, services).await?;
    write_json(writer, &report)
}

/// Build a session from `config`, replay the trip into it and optimize.
pub(crate) async fn execute_plan(
    config: &PlanConfig,
    services: &dyn Services,
) -> Result<PlanReport, CliError> {
    let source = services.catalog_source(&config.catalog, &config.providers)?;
    let catalog = load_catalog(source.as_ref()).await?;
    let planner_config = PlannerConfig::default().with_timeout(config.providers.timeout);
    let session = TripSession::new(
        catalog,
        Planner::new(services.providers(&config.providers)?, &planner_config),
        TripPersistence::new(services.slot_store(&config.slot_dir)),
    );

    session
        .dispatch(Command::SetStart(config.start))
        .await?;
    for spring in &config.springs {
        session
            .dispatch(Command::AddWaypoint(spring.clone()))
            .await?;
    }
    let planned = match session.dispatch(Command::Optimize).await? {
        CommandOutcome::Optimized(OptimizeOutcome::Applied(planned)) => planned,
        other => {
            log::warn!("optimize finished without a route: {other:?}");
            return Err(CliError::OptimizeDiscarded);
        }
    };
    let saved = if config.save {
        session.dispatch(Command::Save).await?;
        log::info!("saved trip to {}", config.slot_dir);
        true
    } else {
        false
    };
    let share = session.share_query().ok();
    Ok(PlanReport::new(&planned, share, saved))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
