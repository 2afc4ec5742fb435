//! Rewards command: grant rewards for recorded visits through the batch
//! scheduler and summarise each user's ledger.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::{BatchScheduler, FailureMode, ProximityConfig, RewardEngine, UserRecord};
use tourguide_service::DEFAULT_REWARDS_POOL_SIZE;
use uuid::Uuid;

use crate::files::{FileCatalog, HistoryFile, require_existing};
use crate::{
    ARG_CATALOG, ARG_COLLECT_ALL, ARG_HISTORY, ARG_POOL_SIZE, ARG_PROXIMITY_BUFFER, CliError,
    ENV_REWARDS_CATALOG, ENV_REWARDS_HISTORY, write_json,
};

/// Worker threads used when no pool size is configured; matches the
/// service's rewards pool.
pub(crate) const DEFAULT_POOL_SIZE: usize = DEFAULT_REWARDS_POOL_SIZE;

/// CLI arguments for the `rewards` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rewards",
    long_about = "Replay the visits recorded in a history file against an \
                 attraction catalog, granting at most one reward per user and \
                 attraction. Users are processed concurrently and a JSON \
                 summary of every user's rewards is printed on success.",
    about = "Calculate rewards for recorded visits"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct RewardsArgs {
    /// Path to the attraction catalog JSON file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Path to the visit history JSON file.
    #[arg(long = ARG_HISTORY, value_name = "path")]
    #[serde(default)]
    pub(crate) history: Option<Utf8PathBuf>,
    /// Reward eligibility distance in statute miles (defaults to ten).
    #[arg(long = ARG_PROXIMITY_BUFFER, value_name = "miles")]
    #[serde(default)]
    pub(crate) proximity_buffer: Option<f64>,
    /// Number of users processed concurrently (defaults to fifty).
    #[arg(long = ARG_POOL_SIZE, value_name = "threads")]
    #[serde(default)]
    pub(crate) pool_size: Option<usize>,
    /// Process every user before reporting failures instead of stopping at
    /// the first one.
    #[arg(long = ARG_COLLECT_ALL)]
    #[serde(default)]
    pub(crate) collect_all: bool,
}

impl RewardsArgs {
    pub(crate) fn into_config(self) -> Result<RewardsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RewardsConfig::try_from(merged)
    }
}

/// Resolved `rewards` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RewardsConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) history: Utf8PathBuf,
    pub(crate) proximity: ProximityConfig,
    pub(crate) pool_size: usize,
    pub(crate) mode: FailureMode,
}

impl TryFrom<RewardsArgs> for RewardsConfig {
    type Error = CliError;

    fn try_from(args: RewardsArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_REWARDS_CATALOG,
        })?;
        let history = args.history.ok_or(CliError::MissingArgument {
            field: ARG_HISTORY,
            env: ENV_REWARDS_HISTORY,
        })?;
        let proximity = match args.proximity_buffer {
            Some(miles) => ProximityConfig::default().with_proximity_buffer(miles)?,
            None => ProximityConfig::default(),
        };
        let mode = if args.collect_all {
            FailureMode::CollectAll
        } else {
            FailureMode::FirstError
        };
        Ok(Self {
            catalog,
            history,
            proximity,
            pool_size: args.pool_size.unwrap_or(DEFAULT_POOL_SIZE),
            mode,
        })
    }
}

/// Rewards held by every user once the batch completes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RewardsSummary {
    pub(crate) users: Vec<UserRewards>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct UserRewards {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) total_points: u64,
    pub(crate) rewards: Vec<RewardLine>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RewardLine {
    pub(crate) attraction: String,
    pub(crate) points: u32,
    pub(crate) visited_at: DateTime<Utc>,
}

impl RewardsSummary {
    fn from_users(users: &[Arc<UserRecord>]) -> Self {
        let entries = users
            .iter()
            .map(|user| UserRewards {
                id: user.id(),
                name: user.name().to_owned(),
                total_points: user.cumulative_points(),
                rewards: user
                    .rewards()
                    .into_iter()
                    .map(|reward| RewardLine {
                        attraction: reward.point_of_interest.name,
                        points: reward.points,
                        visited_at: reward.visited_position.timestamp,
                    })
                    .collect(),
            })
            .collect();
        Self { users: entries }
    }
}

pub(crate) fn run_rewards_with(args: RewardsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_rewards(&config)?;
    write_json(writer, &summary)
}

/// Load both input files and calculate every user's rewards concurrently.
pub(crate) fn execute_rewards(config: &RewardsConfig) -> Result<RewardsSummary, CliError> {
    require_existing(&config.catalog, ARG_CATALOG)?;
    require_existing(&config.history, ARG_HISTORY)?;
    let catalog = Arc::new(FileCatalog::load(&config.catalog, ARG_CATALOG)?);
    let users = HistoryFile::load(&config.history, ARG_HISTORY)?.into_users();

    let scheduler =
        BatchScheduler::new("tourguide-rewards", config.pool_size)?.with_mode(config.mode);
    let engine = RewardEngine::new(Arc::clone(&catalog), catalog);
    let proximity = config.proximity;
    scheduler
        .run(users.clone(), move |user: Arc<UserRecord>| {
            engine.calculate_rewards(&user, &proximity).map(|_| ())
        })
        .map_err(|err| CliError::Rewards(Box::new(err)))?;
    Ok(RewardsSummary::from_users(&users))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RewardsConfig, CliError> {
    let merged = RewardsArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RewardsConfig::try_from(merged)
}
