use crate::domain::types::{DistanceMatrix, Route};
use crate::error::TspResult;

/// Total length of the closed tour, closing edge included.
///
/// Fails with `MalformedRoute` unless `route` is a permutation of
/// `0..dm.dim()`.
pub fn tour_length(route: &Route, dm: &DistanceMatrix) -> TspResult<f64> {
    route.validate(dm.dim())?;
    Ok(find_distance(&route.route, dm))
}

/// Unchecked tour length. Callers guarantee `route` is a valid permutation.
pub fn find_distance(route: &[usize], dm: &DistanceMatrix) -> f64 {
    if route.is_empty() {
        return 0.0;
    }

    let last_to_first = dist_between(route[route.len() - 1], route[0], dm);

    let mut total_dist = 0.0;
    for pair in route.windows(2) {
        total_dist += dist_between(pair[0], pair[1], dm);
    }

    total_dist + last_to_first
}

pub fn dist_between(from_city: usize, to_city: usize, dm: &DistanceMatrix) -> f64 {
    dm.dist(from_city, to_city)
}
