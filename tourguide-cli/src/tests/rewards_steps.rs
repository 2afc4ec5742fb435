//! Behaviour-driven step definitions driving the rewards CLI scenarios.

use super::helpers::{Workspace, reference_catalog_file, sample_history_file, write_utf8};
use super::*;
use crate::rewards::RewardsSummary;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tourguide_fs::JsonFileError;

struct RewardsWorld {
    workspace: Workspace,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RewardsWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn summary(&self) -> RewardsSummary {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON rewards summary")
    }
}

#[fixture]
fn world() -> RewardsWorld {
    RewardsWorld::new()
}

#[given("the reference catalog file has been written")]
fn reference_catalog_exists(#[from(world)] world: &RewardsWorld) {
    world.workspace.write_catalog(&reference_catalog_file());
}

#[given("the catalog file contains invalid JSON")]
fn catalog_contains_invalid_json(#[from(world)] world: &RewardsWorld) {
    write_utf8(&world.workspace.catalog_path(), b"{ \"attractions\": [");
}

#[given("a visit history exists on disk")]
fn history_exists(#[from(world)] world: &RewardsWorld) {
    world.workspace.write_history(&sample_history_file());
}

#[when("I run the rewards command")]
fn run_rewards_command(#[from(world)] world: &RewardsWorld) {
    let invocation = vec![
        "tourguide".to_owned(),
        "rewards".to_owned(),
        world.workspace.catalog_path().as_str().to_owned(),
        format!("--{ARG_HISTORY}"),
        world.workspace.history_path().as_str().to_owned(),
        format!("--{ARG_POOL_SIZE}"),
        "2".to_owned(),
        format!("--{ARG_COLLECT_ALL}"),
    ];
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::from)
        .and_then(|cli| {
            let mut buffer = world.stdout.borrow_mut();
            run_with(cli, &mut *buffer)
        });
    world.result.replace(Some(outcome));
}

#[then("every user in the history appears in the printed summary")]
fn every_user_listed(#[from(world)] world: &RewardsWorld) {
    let summary = world.summary();
    let names: Vec<&str> = summary.users.iter().map(|user| user.name.as_str()).collect();
    assert_eq!(names, ["internalUser0", "internalUser1", "internalUser2"]);
}

#[then("repeated visits to one attraction earn a single reward")]
fn repeated_visits_rewarded_once(#[from(world)] world: &RewardsWorld) {
    let summary = world.summary();
    let repeat_visitor = summary.users.first().expect("first user listed");
    assert_eq!(repeat_visitor.rewards.len(), 1);
    let reward = repeat_visitor.rewards.first().expect("one reward");
    assert_eq!(reward.attraction, "Fallingwater");
    assert_eq!(repeat_visitor.total_points, u64::from(reward.points));
}

#[then("the command fails because the catalog cannot be parsed")]
fn fails_unparseable_catalog(#[from(world)] world: &RewardsWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::ReadInput {
            field,
            source: JsonFileError::Parse { path, .. },
        } => {
            assert_eq!(*field, ARG_CATALOG);
            assert_eq!(*path, world.workspace.catalog_path());
        }
        other => panic!("expected a catalog parse error, found {other:?}"),
    }
}

macro_rules! register_rewards_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/rewards_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RewardsWorld) {
            let _ = world;
        }
    };
}

register_rewards_scenario!(
    rewards_happy_path,
    "summarising rewards for every user in a history file"
);
register_rewards_scenario!(
    rewards_invalid_catalog,
    "rejecting a catalog that is not valid JSON"
);
