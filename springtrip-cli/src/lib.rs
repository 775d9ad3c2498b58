//! Command-line interface for planning hot-springs road trips.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod plan;
mod report;
mod restore;
mod services;
mod share;

pub use error::CliError;

use plan::PlanArgs;
use restore::RestoreArgs;
use services::{HttpServices, Services};
use share::ShareArgs;

pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_SPRING: &str = "spring";
pub(crate) const ARG_START: &str = "start";
pub(crate) const ARG_SLOT_DIR: &str = "slot-dir";
pub(crate) const ARG_SHARE: &str = "share";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_OPTIMIZER_BASE_URL: &str = "optimizer-base-url";
pub(crate) const ARG_OPTIMIZER_API_KEY: &str = "optimizer-api-key";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_PLAN_CATALOG: &str = "SPRINGTRIP_CMDS_PLAN_CATALOG";
pub(crate) const ENV_PLAN_START: &str = "SPRINGTRIP_CMDS_PLAN_START";
pub(crate) const ENV_SHARE_CATALOG: &str = "SPRINGTRIP_CMDS_SHARE_CATALOG";
pub(crate) const ENV_RESTORE_CATALOG: &str = "SPRINGTRIP_CMDS_RESTORE_CATALOG";

/// Directory holding saved trips when `--slot-dir` is not given.
pub(crate) const DEFAULT_SLOT_DIR: &str = ".springtrip";

/// Run the Springtrip CLI with the current process arguments and environment.
///
/// Output is written to standard output; logging goes through the `log`
/// facade, so the caller decides whether and where it is shown.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(run_command(cli.command, &HttpServices, &mut stdout))
}

async fn run_command(
    command: Command,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Plan(args) => plan::run_plan(args, services, writer).await,
        Command::Share(args) => share::run_share(args, services, writer).await,
        Command::Restore(args) => restore::run_restore(args, services, writer).await,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "springtrip",
    about = "Plan road trips between hot springs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimize a trip and print the route as JSON.
    Plan(PlanArgs),
    /// Print the share link for a trip.
    Share(ShareArgs),
    /// Restore a trip from a share link or the saved slot.
    Restore(RestoreArgs),
}

#[cfg(test)]
mod tests;
