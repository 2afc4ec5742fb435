//! Command-line interface for the tour guide reward and proximity engine.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod files;
mod nearby;
mod rewards;

pub use error::CliError;

use nearby::{NearbyArgs, run_nearby_with};
use rewards::{RewardsArgs, run_rewards_with};

const ARG_CATALOG: &str = "catalog";
const ARG_LATITUDE: &str = "latitude";
const ARG_LONGITUDE: &str = "longitude";
const ARG_LIMIT: &str = "limit";
const ARG_HISTORY: &str = "history";
const ARG_PROXIMITY_BUFFER: &str = "proximity-buffer";
const ARG_POOL_SIZE: &str = "pool-size";
const ARG_COLLECT_ALL: &str = "collect-all";
const ENV_NEARBY_CATALOG: &str = "TOURGUIDE_CMDS_NEARBY_CATALOG";
const ENV_NEARBY_LATITUDE: &str = "TOURGUIDE_CMDS_NEARBY_LATITUDE";
const ENV_NEARBY_LONGITUDE: &str = "TOURGUIDE_CMDS_NEARBY_LONGITUDE";
const ENV_REWARDS_CATALOG: &str = "TOURGUIDE_CMDS_REWARDS_CATALOG";
const ENV_REWARDS_HISTORY: &str = "TOURGUIDE_CMDS_REWARDS_HISTORY";

/// Run the tour guide CLI with the current process arguments and environment,
/// writing command output to stdout.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli, &mut stdout)
}

fn run_with(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Nearby(args) => run_nearby_with(args, writer),
        Command::Rewards(args) => run_rewards_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tourguide",
    about = "Rank nearby attractions and calculate visit rewards",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the attractions closest to a position.
    Nearby(NearbyArgs),
    /// Calculate rewards for the visits in a history file.
    Rewards(RewardsArgs),
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
