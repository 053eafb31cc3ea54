use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::distance::matrix::{build_distance_matrix, print_dist_matrix};
use crate::domain::types::{ProblemInstance, Route};
use crate::error::{TspError, TspResult};
use crate::fixtures::benchmarks::BenchmarkTable;
use crate::fixtures::instance_reader::Instance;

/// Build the shared problem state for one instance: distance matrix plus the
/// known optimum for reporting.
pub fn setup(instance: &Instance, benchmarks: &BenchmarkTable) -> TspResult<ProblemInstance> {
    let dim = instance.dim();
    info!(
        "Starting setup for {} ({} cities)",
        instance.header.name.as_deref().unwrap_or("<unnamed>"),
        dim
    );

    let dm = build_distance_matrix(&instance.coordinates, dim)?;
    print_dist_matrix(&dm);

    let known_optimum = benchmarks.known_optimum(dim);
    match known_optimum {
        Some(opt) => info!("Known optimum for {} cities: {}", dim, opt),
        None => warn!("No known optimum for {} cities, gap will not be reported", dim),
    }

    info!("Setup completed successfully");

    Ok(ProblemInstance {
        name: instance.header.name.clone(),
        distance_matrix: dm,
        known_optimum,
    })
}

/// Uniformly random tour over `0..dim`.
///
/// Starts from the identity and runs a Fisher-Yates shuffle: for `i` from
/// `dim - 1` down to `1`, swap position `i` with a uniform `j` in `[0, i]`.
pub fn random_route<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> TspResult<Route> {
    if dim == 0 {
        return Err(TspError::InvalidDimension {
            dim,
            reason: "cannot build a route over zero cities".to_string(),
        });
    }

    let mut route = Route::identity(dim)?;
    route.route.shuffle(rng);
    debug!("Random route over {} cities", dim);
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::instance_reader::read_instance;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_dim_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            random_route(0, &mut rng),
            Err(TspError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_route() {
        let a = random_route(30, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let b = random_route(30, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_position_reachable() {
        // Each city should land in the first slot at some point.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen_first = [false; 5];
        for _ in 0..500 {
            let route = random_route(5, &mut rng).unwrap();
            seen_first[route.route[0]] = true;
        }
        assert!(seen_first.iter().all(|&s| s));
    }

    #[test]
    fn test_setup_attaches_optimum() {
        let text = "DIMENSION : 4\nNODE_COORD_SECTION\n1 0 0\n2 0 1\n3 1 1\n4 1 0\n";
        let instance = read_instance(text.as_bytes()).unwrap();

        let problem = setup(&instance, &BenchmarkTable::default()).unwrap();
        assert_eq!(problem.dim(), 4);
        assert_eq!(problem.known_optimum, None);

        let mut table = BenchmarkTable::default();
        table.insert(4, 4);
        let problem = setup(&instance, &table).unwrap();
        assert_eq!(problem.known_optimum, Some(4));
    }

    proptest! {
        #[test]
        fn prop_random_route_is_permutation(dim in 1usize..200, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let route = random_route(dim, &mut rng).unwrap();
            prop_assert_eq!(route.len(), dim);
            prop_assert!(route.validate(dim).is_ok());
        }
    }
}
