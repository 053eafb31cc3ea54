use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use tracing::{debug, span, trace, Level};

use crate::config::constant::MIN_TWO_OPT_DIM;
use crate::domain::types::{DistanceMatrix, Route};
use crate::error::TspResult;
use crate::evaluation::fitness::find_distance;

use super::neighbourhood::swap_delta;

/// Scan order for the 2-opt sweep. The two orders converge to different,
/// equally valid, local optima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImprovementPolicy {
    /// Apply every improving pair as the sweep reaches it, then keep sweeping
    /// from the next pair on the updated route.
    #[default]
    FirstImprovement,
    /// Evaluate every pair and apply only the most improving one per sweep.
    BestImprovement,
}

impl FromStr for ImprovementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-improvement" => Ok(ImprovementPolicy::FirstImprovement),
            "best" | "best-improvement" => Ok(ImprovementPolicy::BestImprovement),
            other => Err(format!("unknown policy '{}', expected 'first' or 'best'", other)),
        }
    }
}

impl fmt::Display for ImprovementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImprovementPolicy::FirstImprovement => write!(f, "first-improvement"),
            ImprovementPolicy::BestImprovement => write!(f, "best-improvement"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoOptStats {
    pub initial_length: f64,
    pub final_length: f64,
    pub passes: usize,
    pub swaps: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwoOptOutcome {
    pub route: Route,
    pub stats: TwoOptStats,
}

/// Run 2-opt on a copy of `route`; the caller's route is left as it was.
pub fn optimize(
    route: &Route,
    dm: &DistanceMatrix,
    policy: ImprovementPolicy,
) -> TspResult<TwoOptOutcome> {
    let mut working = route.clone();
    let stats = optimize_in_place(&mut working, dm, policy)?;
    Ok(TwoOptOutcome {
        route: working,
        stats,
    })
}

/// Run 2-opt on `route` in place until no swap strictly shortens the tour.
///
/// Only strictly negative deltas are applied. Routes over fewer than four
/// cities are returned untouched. There is no pass limit.
pub fn optimize_in_place(
    route: &mut Route,
    dm: &DistanceMatrix,
    policy: ImprovementPolicy,
) -> TspResult<TwoOptStats> {
    let dim = dm.dim();
    route.validate(dim)?;

    let initial_length = find_distance(&route.route, dm);
    if dim < MIN_TWO_OPT_DIM {
        debug!("Skipping 2-opt for {} cities", dim);
        return Ok(TwoOptStats {
            initial_length,
            final_length: initial_length,
            passes: 0,
            swaps: 0,
        });
    }

    let opt_span = span!(Level::DEBUG, "two_opt", dim, %policy);
    let _opt_guard = opt_span.enter();

    let mut passes = 0;
    let mut swaps = 0;
    loop {
        passes += 1;
        let applied = match policy {
            ImprovementPolicy::FirstImprovement => first_improvement_pass(&mut route.route, dm),
            ImprovementPolicy::BestImprovement => best_improvement_pass(&mut route.route, dm),
        };
        swaps += applied;
        trace!("pass {} applied {} swaps", passes, applied);

        if applied == 0 {
            break;
        }
    }

    let final_length = find_distance(&route.route, dm);
    debug!(
        "2-opt converged after {} passes, {} swaps: {:.2} -> {:.2}",
        passes, swaps, initial_length, final_length
    );

    Ok(TwoOptStats {
        initial_length,
        final_length,
        passes,
        swaps,
    })
}

fn first_improvement_pass(route: &mut [usize], dm: &DistanceMatrix) -> usize {
    let dim = route.len();
    let mut applied = 0;

    for m in 0..dim - 1 {
        for n in (m + 1)..dim {
            if swap_delta(route, m, n, dm) < 0.0 {
                route[m..=n].reverse();
                applied += 1;
            }
        }
    }

    applied
}

fn best_improvement_pass(route: &mut [usize], dm: &DistanceMatrix) -> usize {
    let dim = route.len();
    let best = {
        let tour: &[usize] = route;
        (0..dim)
            .tuple_combinations::<(usize, usize)>()
            .map(|(m, n)| (swap_delta(tour, m, n, dm), (m, n)))
            .filter(|(delta, _)| *delta < 0.0)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    };

    match best {
        Some((_, (m, n))) => {
            route[m..=n].reverse();
            1
        }
        None => 0,
    }
}
