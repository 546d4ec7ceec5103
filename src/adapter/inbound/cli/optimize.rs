//! Handler for the `optimize` command.

use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::signal;
use tracing::warn;

use crate::adapter::inbound::cli::command::OptimizeArgs;
use crate::adapter::inbound::cli::input::{self, LoadedPool};
use crate::adapter::inbound::cli::{output, table};
use crate::adapter::outbound::csv::CsvLineupWriter;
use crate::adapter::solver::HiGHSSolver;
use crate::application::{BatchReport, BatchSettings, CancelFlag, LineupGenerator};
use crate::domain::{PlayerPool, RosterShape};
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::port::{LineupSink, Solver};

/// Exit status after a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Response to the `received`-th Ctrl-C of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Cancel between attempts and keep what was accepted.
    StopBatch,
    /// Abandon the run, including a solve in progress.
    Exit,
}

fn on_interrupt(received: u32) -> Interrupt {
    if received <= 1 {
        Interrupt::StopBatch
    } else {
        Interrupt::Exit
    }
}

/// Execute the optimize command.
///
/// Ctrl-C cancels the batch between attempts; lineups accepted before the
/// interrupt are still written. A second Ctrl-C exits at once, which also
/// ends a long solve that has no time limit.
pub async fn execute(args: &OptimizeArgs) -> Result<()> {
    let mut config = input::load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    if output::is_json() {
        config.logging.format = "json".into();
    }
    config.validate()?;
    config.logging.init();

    let shape = config.roster_shape()?;
    let settings = config.batch_settings()?;
    let loaded = input::load_pool(
        args.pool.as_deref(),
        args.injuries.as_deref(),
        config.sport,
        &shape,
    )?;
    print_startup(&config, &loaded, &shape, &settings);

    let cancel = CancelFlag::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            let mut received = 0;
            while signal::ctrl_c().await.is_ok() {
                received += 1;
                match on_interrupt(received) {
                    Interrupt::StopBatch => {
                        warn!("Interrupt received, stopping after the current attempt");
                        output::hint("press Ctrl-C again to quit without writing lineups");
                        cancel.cancel();
                    }
                    Interrupt::Exit => {
                        warn!("Second interrupt received, exiting");
                        std::process::exit(INTERRUPTED_EXIT_CODE);
                    }
                }
            }
        }
    });

    let progress = output::progress(u64::from(settings.attempt_budget()), "Solving");
    let report = {
        let progress = progress.clone();
        let shape = shape.clone();
        let seed = config.optimizer.seed;
        let pool = loaded.pool;
        tokio::task::spawn_blocking(move || {
            run_batch(&pool, &shape, &settings, seed, cancel, &progress)
        })
        .await
        .map_err(|e| Error::Solver(format!("batch task failed: {e}")))?
    };
    watcher.abort();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            output::progress_fail(&progress, "Solver failed");
            return Err(e);
        }
    };
    if report.produced() > 0 {
        output::progress_success(&progress, "Batch finished");
    } else {
        output::progress_fail(&progress, "No feasible lineups");
    }

    let lineups = report.presentation_order(config.output.sort_by_points);
    if lineups.is_empty() {
        output::warning("Nothing written");
        output::hint("loosen the stack, salary floor or diversity settings");
    } else {
        for (position, lineup) in lineups.iter().enumerate() {
            table::print_lineup(position + 1, lineup, &shape);
        }

        let mut writer = CsvLineupWriter::new(&config.output.directory, config.output.timestamped);
        writer.write_lineups(&lineups, &shape)?;
        let files = writer.files();
        output::section("Files");
        output::field("Detailed", files.detailed.display());
        output::field("Roster", files.roster.display());
        output::field("Summary", files.summary.display());
    }

    table::print_usage(&report);
    table::print_batch_summary(&report);
    Ok(())
}

fn run_batch(
    pool: &PlayerPool,
    shape: &RosterShape,
    settings: &BatchSettings,
    seed: Option<u64>,
    cancel: CancelFlag,
    progress: &ProgressBar,
) -> Result<BatchReport> {
    let solver = HiGHSSolver::new().with_time_limit(settings.solve_time_limit);
    let generator = LineupGenerator::new(pool, shape, settings, &solver as &dyn Solver)?
        .with_cancel(cancel);
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    generator.run_with(rng, |attempt| {
        progress.inc(1);
        if let Some(points) = attempt.points {
            progress.set_message(format!("Solving, last {}", points.round_dp(2)));
        }
    })
}

fn print_startup(config: &Config, loaded: &LoadedPool, shape: &RosterShape, settings: &BatchSettings) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Sport", config.sport);
    output::field("Salary file", loaded.path.display());
    output::field(
        "Pool",
        format!(
            "{} entities, {} teams",
            loaded.pool.len(),
            loaded.pool.teams().len()
        ),
    );
    if loaded.excluded > 0 {
        output::field("Excluded", loaded.excluded);
    }
    output::field("Lineups", settings.num_lineups);
    output::field("Salary cap", shape.salary_cap());
    if let Some(stack) = &settings.stack {
        output::field("Stack", format!("{} x{}", stack.team, stack.count));
    }
    if !settings.fade_teams.is_empty() {
        let teams: Vec<String> = settings.fade_teams.iter().map(ToString::to_string).collect();
        output::field("Fade", teams.join(", "));
    }
    if output::verbosity() > 0 {
        output::field("Diversity", settings.effective_diversity());
        output::field("Randomness", settings.randomness);
        if let Some(seed) = config.optimizer.seed {
            output::field("Seed", seed);
        }
    }
    if !loaded.pool.rejected().is_empty() {
        output::warning(&format!(
            "{} records rejected while building the pool",
            loaded.pool.rejected().len()
        ));
    }
}
