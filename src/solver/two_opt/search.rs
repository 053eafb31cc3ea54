use std::error::Error;
use std::path::Path;

use colored::*;
use csv::Writer;
use dotenv::dotenv;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::SolverConfig;
use crate::domain::types::{ProblemInstance, RestartRecord, RestartReport, Route};
use crate::error::{TspError, TspResult};
use crate::fixtures::benchmarks::BenchmarkTable;
use crate::fixtures::instance_reader::Instance;
use crate::setup::init::{random_route, setup};
use crate::utils::format_route;

use super::optimizer::{optimize_in_place, ImprovementPolicy};

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .try_init()?;

    Ok(())
}

/// Random restarts: each restart shuffles a fresh route, runs 2-opt on it and
/// keeps the shortest tour seen so far. Restarts run one after another, each
/// owning its own route; the distance matrix is only read.
pub fn run_restarts<R: Rng + ?Sized>(
    problem: &ProblemInstance,
    restarts: usize,
    policy: ImprovementPolicy,
    rng: &mut R,
) -> TspResult<RestartReport> {
    if restarts == 0 {
        return Err(TspError::Config {
            key: "restarts".to_string(),
            reason: "at least one restart is required".to_string(),
        });
    }

    let dm = &problem.distance_matrix;
    let mut records: Vec<RestartRecord> = Vec::with_capacity(restarts);
    let mut best: Option<(Route, f64, usize)> = None;
    let mut best_so_far_updates: Vec<(usize, f64)> = vec![];

    for restart in 1..=restarts {
        let restart_span = span!(Level::DEBUG, "restart", restart);
        let _restart_guard = restart_span.enter();

        let mut route = random_route(problem.dim(), &mut *rng)?;
        let stats = optimize_in_place(&mut route, dm, policy)?;

        debug!(
            "Restart {}: {:.2} -> {:.2} ({} passes, {} swaps)",
            restart, stats.initial_length, stats.final_length, stats.passes, stats.swaps
        );

        records.push(RestartRecord {
            restart,
            initial_length: stats.initial_length,
            optimized_length: stats.final_length,
            passes: stats.passes,
            swaps: stats.swaps,
        });

        let improved = best
            .as_ref()
            .map_or(true, |(_, best_length, _)| stats.final_length < *best_length);
        if improved {
            info!(
                "New best at restart {}: length = {:.2}",
                restart, stats.final_length
            );
            best_so_far_updates.push((restart, stats.final_length));
            best = Some((route, stats.final_length, restart));
        }
    }

    let (best_so_far, best_length, best_so_far_restart) = best.ok_or_else(|| TspError::Config {
        key: "restarts".to_string(),
        reason: "no restart completed".to_string(),
    })?;

    Ok(RestartReport {
        best_so_far,
        best_length,
        best_so_far_restart,
        records,
        best_so_far_updates,
    })
}

/// Report final statistics and results
fn report_final_stats(report: &RestartReport, problem: &ProblemInstance, benchmarks: &BenchmarkTable) {
    info!(
        "Optimization complete. Best tour found at restart {} of {}",
        report.best_so_far_restart,
        report.records.len()
    );
    info!("Best tour length: {:.2}", report.best_length);
    debug!(
        "Best route: {}",
        format_route(report.best_so_far.as_slice(), 20)
    );

    let mean_initial = report.records.iter().map(|r| r.initial_length).sum::<f64>()
        / report.records.len() as f64;
    info!("Mean random starting length: {:.2}", mean_initial);

    if let Some(gap) = benchmarks.gap_percent(report.best_length, problem.dim()) {
        info!(
            "Known optimum: {}, gap: {:.2}%",
            problem.known_optimum.unwrap_or_default(),
            gap
        );
    }
}

fn print_summary(report: &RestartReport, problem: &ProblemInstance, benchmarks: &BenchmarkTable) {
    let name = problem.name.as_deref().unwrap_or("instance");
    match benchmarks.gap_percent(report.best_length, problem.dim()) {
        Some(gap) if gap <= 5.0 => println!(
            "{}",
            format!("{}: best {:.2} ({:+.2}% vs optimum)", name, report.best_length, gap).green()
        ),
        Some(gap) => println!(
            "{}",
            format!("{}: best {:.2} ({:+.2}% vs optimum)", name, report.best_length, gap).yellow()
        ),
        None => println!("{}: best {:.2}", name, report.best_length),
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;
    let config = SolverConfig::from_env()?;

    info!(
        "Starting 2-opt solver on {} with {} restarts ({})",
        config.instance_path.display(),
        config.restarts,
        config.policy
    );

    let benchmarks = match &config.benchmarks_path {
        Some(path) => BenchmarkTable::from_json_path(path)?,
        None => BenchmarkTable::default(),
    };

    let instance = Instance::from_path(&config.instance_path)?;

    let problem = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        setup(&instance, &benchmarks)?
    };

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let report = {
        let span = span!(Level::INFO, "restarts", total = config.restarts);
        let _guard = span.enter();
        run_restarts(&problem, config.restarts, config.policy, &mut rng)?
    };

    report_final_stats(&report, &problem, &benchmarks);
    save_to_csv(&report, &config.result_path)?;
    print_summary(&report, &problem, &benchmarks);

    Ok(())
}

/// One row per restart.
pub fn save_to_csv(report: &RestartReport, filename: impl AsRef<Path>) -> TspResult<()> {
    let mut wtr = Writer::from_path(filename.as_ref())?;

    wtr.write_record([
        "restart",
        "initial_length",
        "optimized_length",
        "passes",
        "swaps",
    ])?;

    for record in &report.records {
        wtr.write_record([
            record.restart.to_string(),
            format!("{:.4}", record.initial_length),
            format!("{:.4}", record.optimized_length),
            record.passes.to_string(),
            record.swaps.to_string(),
        ])?;
    }

    wtr.flush()?;
    info!("Wrote {} restart rows to {}", report.records.len(), filename.as_ref().display());
    Ok(())
}
