//! Command-line interface definitions.
//!
//! Defines the CLI structure for lineupsmith using `clap`. `optimize` runs a
//! batch; `check` validates a configuration file or a salary file without
//! solving anything.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::infrastructure::config::Config;
use crate::infrastructure::sport::Sport;

/// Daily fantasy lineup optimizer
#[derive(Parser, Debug)]
#[command(name = "lineupsmith")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a batch of lineups
    Optimize(Box<OptimizeArgs>),

    /// Validate inputs without solving
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `lineupsmith check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
    /// Load a salary file and report the resulting player pool.
    Pool(PoolArgs),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for `check pool`.
#[derive(Parser, Debug)]
pub struct PoolArgs {
    /// Salary CSV; the newest DKSalaries*.csv is used when omitted.
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// CSV of players to exclude (Player or Name column).
    #[arg(long)]
    pub injuries: Option<PathBuf>,

    /// Contest format [showdown, mlb-classic, f1-showdown].
    #[arg(long)]
    pub sport: Option<Sport>,

    /// Configuration file supplying the sport and roster overrides.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `optimize` subcommand.
///
/// All optional fields override the corresponding configuration file values.
#[derive(Parser, Debug, Default)]
pub struct OptimizeArgs {
    /// Path to the configuration file (`config.toml` is used when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Salary CSV; the newest DKSalaries*.csv is used when omitted.
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// CSV of players to exclude (Player or Name column).
    #[arg(long)]
    pub injuries: Option<PathBuf>,

    /// Contest format [showdown, mlb-classic, f1-showdown].
    #[arg(long)]
    pub sport: Option<Sport>,

    /// Number of lineups to generate.
    #[arg(short = 'n', long)]
    pub lineups: Option<u32>,

    // === Roster rules ===
    /// Team to stack.
    #[arg(long)]
    pub stack_team: Option<String>,

    /// Minimum selections from the stack team.
    #[arg(long)]
    pub stack_count: Option<u32>,

    /// Override maximum selections from any one team.
    #[arg(long)]
    pub max_from_team: Option<u32>,

    /// Override minimum number of distinct teams.
    #[arg(long)]
    pub min_teams: Option<u32>,

    /// Minimum fraction of the salary cap to spend (e.g. 0.95).
    #[arg(long)]
    pub min_salary: Option<Decimal>,

    // === Batch shaping ===
    /// Entities each lineup must differ by from every earlier lineup.
    #[arg(long)]
    pub diversity: Option<u32>,

    /// Team whose projections are dampened (repeatable).
    #[arg(long = "fade")]
    pub fade: Vec<String>,

    /// Multiplier applied to faded teams, in (0, 1).
    #[arg(long)]
    pub fade_dampening: Option<Decimal>,

    /// Projection noise, in [0, 1).
    #[arg(long)]
    pub randomness: Option<f64>,

    /// Absolute cap on appearances per entity across the batch.
    #[arg(long)]
    pub max_appearances: Option<u32>,

    /// Allow a lineup identical to an earlier one.
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Seed for projection noise.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-solve time limit in seconds.
    #[arg(long)]
    pub time_limit: Option<f64>,

    // === Output ===
    /// Directory for the lineup CSV files.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl OptimizeArgs {
    /// Apply command-line overrides on top of file values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(sport) = self.sport {
            config.sport = sport;
        }

        let optimizer = &mut config.optimizer;
        if let Some(n) = self.lineups {
            optimizer.num_lineups = n;
        }
        if let Some(team) = &self.stack_team {
            optimizer.stack_team = Some(team.clone());
        }
        if let Some(count) = self.stack_count {
            optimizer.stack_count = Some(count);
        }
        if let Some(max) = self.max_from_team {
            optimizer.max_from_one_team = Some(max);
        }
        if let Some(min) = self.min_teams {
            optimizer.min_teams_represented = Some(min);
        }
        if let Some(fraction) = self.min_salary {
            optimizer.min_salary_used_fraction = Some(fraction);
        }
        if let Some(d) = self.diversity {
            optimizer.player_diversity = d;
        }
        if !self.fade.is_empty() {
            optimizer.fade_teams = self.fade.clone();
        }
        if let Some(dampening) = self.fade_dampening {
            optimizer.fade_dampening = dampening;
        }
        if let Some(r) = self.randomness {
            optimizer.randomness = r;
        }
        if let Some(max) = self.max_appearances {
            optimizer.max_player_appearances = Some(max);
        }
        if self.allow_duplicates {
            optimizer.allow_duplicates = true;
        }
        if let Some(seed) = self.seed {
            optimizer.seed = Some(seed);
        }
        if let Some(secs) = self.time_limit {
            optimizer.solve_time_limit_secs = Some(secs);
        }

        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.json_logs {
            config.logging.format = "json".into();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
