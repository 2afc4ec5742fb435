//! Nearby command: rank the attractions closest to a position.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::{
    AttractionRanker, DEFAULT_NEARBY_LIMIT, NearbyAttractions, Position, VisitedPosition,
};
use uuid::Uuid;

use crate::files::{FileCatalog, require_existing};
use crate::{
    ARG_CATALOG, ARG_LATITUDE, ARG_LIMIT, ARG_LONGITUDE, CliError, ENV_NEARBY_CATALOG,
    ENV_NEARBY_LATITUDE, ENV_NEARBY_LONGITUDE, write_json,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "nearby",
    long_about = "Rank the attractions in a catalog file by distance from a \
                 position and print them as JSON, together with the points a \
                 visit of each would earn.",
    about = "List the attractions closest to a position"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct NearbyArgs {
    /// Path to the attraction catalog JSON file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Latitude of the position in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the position in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// How many attractions to list (defaults to five).
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) position: Position,
    pub(crate) limit: usize,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_NEARBY_CATALOG,
        })?;
        let latitude = args.latitude.ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_NEARBY_LATITUDE,
        })?;
        let longitude = args.longitude.ok_or(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_NEARBY_LONGITUDE,
        })?;
        Ok(Self {
            catalog,
            position: Position::new(latitude, longitude),
            limit: args.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
        })
    }
}

pub(crate) fn run_nearby_with(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let nearby = execute_nearby(&config)?;
    write_json(writer, &nearby)
}

/// Rank the catalog named by `config` around its position.
///
/// The position is not attributed to any user; points are looked up for the
/// nil user identifier.
pub(crate) fn execute_nearby(config: &NearbyConfig) -> Result<NearbyAttractions, CliError> {
    require_existing(&config.catalog, ARG_CATALOG)?;
    let catalog = FileCatalog::load(&config.catalog, ARG_CATALOG)?;
    log::debug!(
        "ranking {} attraction(s) around {:?}",
        catalog.len(),
        config.position
    );
    let ranker = AttractionRanker::with_limit(&catalog, &catalog, config.limit)?;
    let visited = VisitedPosition::now(Uuid::nil(), config.position);
    Ok(ranker.rank(&visited)?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NearbyConfig, CliError> {
    let merged = NearbyArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NearbyConfig::try_from(merged)
}
