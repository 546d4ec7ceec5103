use std::fs;

use lineupsmith::adapter::solver::HiGHSSolver;
use lineupsmith::application::{BatchSettings, LineupGenerator, StackRule};
use lineupsmith::domain::TeamId;
use lineupsmith::error::{ConfigError, Error};
use lineupsmith::infrastructure::config::Config;
use lineupsmith::infrastructure::sport::Sport;
use lineupsmith::testkit::domain::{showdown_shape, PoolBuilder};
use lineupsmith::testkit::scenario::top_heavy_pool;
use rust_decimal_macros::dec;

#[test]
fn loads_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
sport = "f1-showdown"

[optimizer]
num_lineups = 3
fade_teams = ["FER"]
fade_dampening = 0.6
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.sport, Sport::F1Showdown);
    let settings = config.batch_settings().unwrap();
    assert_eq!(settings.num_lineups, 3);
    assert!(settings.fade_teams.contains(&TeamId::from("FER")));
    assert_eq!(config.roster_shape().unwrap().max_from_one_team(), 3);
}

#[test]
fn unknown_option_is_rejected() {
    let err = Config::parse_toml("[optimizer]\nlineups = 3\n").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn zero_lineups_is_invalid() {
    let err = Config::parse_toml("[optimizer]\nnum_lineups = 0\n").unwrap_err();
    assert!(err.to_string().contains("num_lineups"));
}

#[test]
fn fade_dampening_must_be_below_one() {
    let toml = "[optimizer]\nfade_teams = [\"NYL\"]\nfade_dampening = 1.0\n";
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "fade_dampening",
            ..
        }))
    ));
}

#[test]
fn exposure_fraction_above_one_is_invalid() {
    let toml = "[optimizer.exposure_constraints]\n\"42\" = 1.5\n";
    assert!(Config::parse_toml(toml).is_err());
}

#[test]
fn stack_team_missing_from_pool_fails_before_solving() {
    let pool = top_heavy_pool();
    let shape = showdown_shape();
    let settings = BatchSettings {
        stack: Some(StackRule {
            team: TeamId::from("SEA"),
            count: 2,
        }),
        ..Default::default()
    };
    let solver = HiGHSSolver::new();
    let err = LineupGenerator::new(&pool, &shape, &settings, &solver)
        .err()
        .expect("conflict");
    assert!(matches!(
        err,
        ConfigError::Conflict {
            first: "stack_team",
            ..
        }
    ));
}

#[test]
fn slot_demand_beyond_pool_names_both_sides() {
    let pool = PoolBuilder::new()
        .showdown("LVA", 5_000, dec!(30))
        .utility("NYL", 5_000, dec!(20))
        .utility("NYL", 5_000, dec!(20))
        .build();
    let shape = showdown_shape();
    let solver = HiGHSSolver::new();
    let err = LineupGenerator::new(&pool, &shape, &BatchSettings::default(), &solver)
        .err()
        .expect("conflict");
    let message = err.to_string();
    assert!(message.contains("roster_shape"));
    assert!(message.contains("player_pool"));
}

#[test]
fn diversity_larger_than_roster_is_a_conflict() {
    let pool = top_heavy_pool();
    let shape = showdown_shape();
    let settings = BatchSettings {
        num_lineups: 2,
        player_diversity: 7,
        ..Default::default()
    };
    let solver = HiGHSSolver::new();
    assert!(LineupGenerator::new(&pool, &shape, &settings, &solver).is_err());
}

#[test]
fn example_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
    let config = Config::load(path).unwrap();
    assert_eq!(config.sport, Sport::Showdown);
    let settings = config.batch_settings().unwrap();
    assert_eq!(settings.num_lineups, 20);
    assert_eq!(settings.player_diversity, 2);
}
