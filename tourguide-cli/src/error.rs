//! Error types emitted by the tour guide CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`; large payloads are boxed.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tourguide_core::{BatchBuildError, BatchError, ProximityError, RankingError, RewardError};
use tourguide_fs::JsonFileError;

/// Errors emitted by the tour guide CLI.
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
    /// An input file could not be read or decoded.
    #[error("failed to load {field}: {source}")]
    ReadInput {
        field: &'static str,
        #[source]
        source: JsonFileError,
    },
    /// The catalog lists the same attraction identifier twice.
    #[error("catalog lists attraction {id} more than once")]
    DuplicateAttraction { id: uuid::Uuid },
    /// The proximity buffer was rejected.
    #[error(transparent)]
    Proximity(#[from] ProximityError),
    /// Ranking nearby attractions failed.
    #[error(transparent)]
    Ranking(#[from] RankingError),
    /// The rewards worker pool could not be started.
    #[error("failed to start the rewards pool: {0}")]
    Pool(#[from] BatchBuildError),
    /// At least one user's reward calculation failed.
    #[error("reward calculation failed: {0}")]
    Rewards(#[source] Box<BatchError<RewardError>>),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
