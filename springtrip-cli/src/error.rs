//! Error types emitted by the Springtrip CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use springtrip_core::{CatalogError, CoordinateError, ShareError, TripStateError};
use springtrip_data::ProviderBuildError;
use springtrip_planner::SessionError;
use thiserror::Error;

/// Errors emitted by the Springtrip CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The start location was not a `lat,lng` pair.
    #[error("invalid --start {value:?}: {source}")]
    InvalidStart {
        value: String,
        #[source]
        source: CoordinateError,
    },
    /// The async runtime could not start.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Constructing an HTTP client failed.
    #[error("failed to build provider for {base_url:?}: {source}")]
    BuildProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The waypoint catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A trip edit was rejected.
    #[error(transparent)]
    Trip(#[from] TripStateError),
    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The share link could not be built.
    #[error(transparent)]
    Share(#[from] ShareError),
    /// The share base URL could not be parsed.
    #[error("invalid --base-url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The optimize result was not applied to the trip.
    #[error("optimize result was discarded")]
    OptimizeDiscarded,
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
