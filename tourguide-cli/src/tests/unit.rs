//! Focused unit tests covering CLI configuration and the file-backed
//! providers.

use super::helpers::{
    ATTRACTION_POINTS, Workspace, attraction, reference_catalog_file, sample_history_file,
};
use super::*;
use crate::files::{CatalogEntry, CatalogFile, FileCatalog};
use crate::nearby::{NearbyConfig, execute_nearby};
use crate::rewards::{DEFAULT_POOL_SIZE, RewardsConfig, execute_rewards};
use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;
use tourguide_core::{
    CatalogProvider, DEFAULT_NEARBY_LIMIT, FailureMode, PointsProvider, Position,
    ProximityConfig, ProviderError, RankingError,
};
use uuid::Uuid;

#[rstest]
#[case(None, Some(1.0), Some(2.0), ARG_CATALOG, ENV_NEARBY_CATALOG)]
#[case(Some(Utf8PathBuf::from("catalog.json")), None, Some(2.0), ARG_LATITUDE, ENV_NEARBY_LATITUDE)]
#[case(Some(Utf8PathBuf::from("catalog.json")), Some(1.0), None, ARG_LONGITUDE, ENV_NEARBY_LONGITUDE)]
fn converting_nearby_without_required_fields_errors(
    #[case] catalog: Option<Utf8PathBuf>,
    #[case] latitude: Option<f64>,
    #[case] longitude: Option<f64>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = NearbyArgs {
        catalog,
        latitude,
        longitude,
        ..NearbyArgs::default()
    };
    let err = NearbyConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn nearby_config_defaults_the_limit() {
    let args = NearbyArgs {
        catalog: Some(Utf8PathBuf::from("catalog.json")),
        latitude: Some(10.0),
        longitude: Some(-10.0),
        limit: None,
    };
    let config = NearbyConfig::try_from(args).expect("config should build");
    assert_eq!(config.limit, DEFAULT_NEARBY_LIMIT);
    assert_eq!(config.position, Position::new(10.0, -10.0));
}

#[rstest]
fn rewards_config_applies_defaults() {
    let args = RewardsArgs {
        catalog: Some(Utf8PathBuf::from("catalog.json")),
        history: Some(Utf8PathBuf::from("history.json")),
        ..RewardsArgs::default()
    };
    let config = RewardsConfig::try_from(args).expect("config should build");
    assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
    assert_eq!(config.pool_size, tourguide_service::DEFAULT_REWARDS_POOL_SIZE);
    assert_eq!(config.pool_size, 50);
    assert_eq!(config.mode, FailureMode::FirstError);
    assert_eq!(config.proximity, ProximityConfig::default());
}

#[rstest]
fn rewards_config_rejects_negative_buffers() {
    let args = RewardsArgs {
        catalog: Some(Utf8PathBuf::from("catalog.json")),
        history: Some(Utf8PathBuf::from("history.json")),
        proximity_buffer: Some(-1.0),
        ..RewardsArgs::default()
    };
    let err = RewardsConfig::try_from(args).expect_err("negative buffer");
    assert!(matches!(err, CliError::Proximity(_)));
}

#[rstest]
fn rewards_config_requires_a_history() {
    let args = RewardsArgs {
        catalog: Some(Utf8PathBuf::from("catalog.json")),
        collect_all: true,
        ..RewardsArgs::default()
    };
    let err = RewardsConfig::try_from(args).expect_err("missing history");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_HISTORY);
            assert_eq!(env, ENV_REWARDS_HISTORY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "latitude": "north" }));

    let err = nearby::config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "catalog": "from-file.json",
            "history": "from-file-history.json",
            "pool_size": 2,
            "proximity_buffer": 5.0,
        }),
        None,
    );
    composer.push_environment(json!({
        "history": "from-env-history.json",
        "pool_size": 3,
    }));
    composer.push_cli(json!({ "pool_size": 6 }));

    let config =
        rewards::config_from_layers_for_test(composer.layers()).expect("merged config builds");
    assert_eq!(config.catalog, Utf8PathBuf::from("from-file.json"));
    assert_eq!(config.history, Utf8PathBuf::from("from-env-history.json"));
    assert_eq!(config.pool_size, 6);
    assert_eq!(config.proximity.proximity_buffer(), 5.0);
}

#[rstest]
fn file_catalog_rejects_duplicate_identifiers() {
    let entry = CatalogEntry {
        id: Uuid::from_u128(1),
        name: "Disneyland".to_owned(),
        latitude: 33.817_595,
        longitude: -117.922_008,
        points: 5,
    };
    let file = CatalogFile {
        attractions: vec![entry.clone(), entry],
    };
    let err = FileCatalog::from_file(file).expect_err("duplicate id");
    match err {
        CliError::DuplicateAttraction { id } => assert_eq!(id, Uuid::from_u128(1)),
        other => panic!("expected DuplicateAttraction, found {other:?}"),
    }
}

#[rstest]
fn file_catalog_serves_listed_points_and_no_positions() {
    let catalog = FileCatalog::from_file(reference_catalog_file()).expect("catalog builds");
    let zoo = attraction("Bronx Zoo");

    assert_eq!(catalog.points_of_interest().expect("pois").len(), 26);
    assert_eq!(
        catalog.reward_points(zoo.id, Uuid::nil()).expect("points"),
        ATTRACTION_POINTS
    );
    assert!(matches!(
        catalog.reward_points(Uuid::from_u128(999), Uuid::nil()),
        Err(ProviderError::Unavailable { .. })
    ));
    assert!(matches!(
        catalog.last_known_position(Uuid::nil()),
        Err(ProviderError::UnknownUser { .. })
    ));
}

#[rstest]
fn nearby_ranks_the_reference_catalog() {
    let workspace = Workspace::new();
    let catalog = workspace.write_catalog(&reference_catalog_file());
    let config = NearbyConfig {
        catalog,
        position: Position::new(10.0, 10.0),
        limit: 3,
    };

    let nearby = execute_nearby(&config).expect("ranking succeeds");

    let names: Vec<&str> = nearby
        .attractions
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, ["Franklin Park Zoo", "Bronx Zoo", "Flatiron Building"]);
    assert!(
        nearby
            .attractions
            .iter()
            .all(|entry| entry.points == ATTRACTION_POINTS)
    );
}

#[rstest]
fn nearby_rejects_an_empty_catalog() {
    let workspace = Workspace::new();
    let catalog = workspace.write_catalog(&CatalogFile::default());
    let config = NearbyConfig {
        catalog,
        position: Position::new(0.0, 0.0),
        limit: 1,
    };
    let err = execute_nearby(&config).expect_err("empty catalog");
    assert!(matches!(err, CliError::Ranking(RankingError::EmptyCatalog)));
}

#[rstest]
fn nearby_rejects_directories_as_catalogs() {
    let workspace = Workspace::new();
    let config = NearbyConfig {
        catalog: workspace.root().to_path_buf(),
        position: Position::new(0.0, 0.0),
        limit: 1,
    };
    let err = execute_nearby(&config).expect_err("directory catalog");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_CATALOG),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn rewards_are_granted_once_per_attraction() {
    let workspace = Workspace::new();
    let config = RewardsConfig {
        catalog: workspace.write_catalog(&reference_catalog_file()),
        history: workspace.write_history(&sample_history_file()),
        proximity: ProximityConfig::default(),
        pool_size: 2,
        mode: FailureMode::FirstError,
    };

    let summary = execute_rewards(&config).expect("rewards succeed");

    let totals: Vec<(&str, u64, usize)> = summary
        .users
        .iter()
        .map(|user| (user.name.as_str(), user.total_points, user.rewards.len()))
        .collect();
    assert_eq!(
        totals,
        [
            ("internalUser0", 100, 1),
            ("internalUser1", 200, 2),
            ("internalUser2", 0, 0),
        ]
    );
}

#[rstest]
fn rewards_report_missing_history_files() {
    let workspace = Workspace::new();
    let config = RewardsConfig {
        catalog: workspace.write_catalog(&reference_catalog_file()),
        history: workspace.history_path(),
        proximity: ProximityConfig::default(),
        pool_size: 1,
        mode: FailureMode::CollectAll,
    };
    let err = execute_rewards(&config).expect_err("missing history");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_HISTORY);
            assert_eq!(path, workspace.history_path());
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn rewards_reject_zero_pool_sizes() {
    let workspace = Workspace::new();
    let config = RewardsConfig {
        catalog: workspace.write_catalog(&reference_catalog_file()),
        history: workspace.write_history(&sample_history_file()),
        proximity: ProximityConfig::default(),
        pool_size: 0,
        mode: FailureMode::FirstError,
    };
    let err = execute_rewards(&config).expect_err("zero pool");
    assert!(matches!(err, CliError::Pool(_)));
}
