use tracing::{debug, info, trace};

use crate::domain::types::{Coordinate, CoordinateStore, DistanceMatrix};
use crate::error::{TspError, TspResult};

/// Build the symmetric Euclidean distance matrix for `dim` cities.
///
/// Each off-diagonal distance is computed once and mirrored, so
/// `dist(i, j) == dist(j, i)` holds bit for bit. Storage is reserved up front;
/// if it cannot be obtained no matrix is returned.
pub fn build_distance_matrix(coords: &CoordinateStore, dim: usize) -> TspResult<DistanceMatrix> {
    if dim == 0 {
        return Err(TspError::InvalidDimension {
            dim,
            reason: "at least one city is required".to_string(),
        });
    }
    if coords.dim() != dim {
        return Err(TspError::InvalidDimension {
            dim,
            reason: format!("expected {} coordinate pairs, found {}", dim, coords.dim()),
        });
    }

    info!("Creating distance matrix for {} cities", dim);

    let alloc_err = |source| TspError::AllocationFailure {
        what: "distance matrix",
        dim,
        source,
    };

    let mut rows: Vec<Vec<f64>> = Vec::new();
    rows.try_reserve_exact(dim).map_err(alloc_err)?;
    for _ in 0..dim {
        let mut row: Vec<f64> = Vec::new();
        row.try_reserve_exact(dim).map_err(alloc_err)?;
        row.resize(dim, 0.0);
        rows.push(row);
    }

    let points = coords.as_slice();
    for i in 0..dim {
        for j in (i + 1)..dim {
            let d = euclidean(points[i], points[j]);
            rows[i][j] = d;
            rows[j][i] = d;
        }
    }

    debug!("Distance matrix ready ({} x {})", dim, dim);
    Ok(DistanceMatrix::from_rows(rows))
}

pub fn euclidean(a: Coordinate, b: Coordinate) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

// Dump the matrix at trace level for debugging
pub fn print_dist_matrix(dm: &DistanceMatrix) {
    trace!("Distance matrix:");
    for row in dm.rows() {
        trace!("{:?}", row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn unit_square() -> CoordinateStore {
        CoordinateStore::new(vec![(0, 0), (0, 1), (1, 1), (1, 0)])
    }

    #[test]
    fn test_unit_square_distances() {
        let dm = build_distance_matrix(&unit_square(), 4).unwrap();
        assert_eq!(dm.dim(), 4);
        assert_eq!(dm.dist(0, 1), 1.0);
        assert_eq!(dm.dist(1, 2), 1.0);
        assert!((dm.dist(0, 2) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_three_four_five() {
        assert_eq!(euclidean((0, 0), (3, 4)), 5.0);
        assert_eq!(euclidean((-3, -4), (0, 0)), 5.0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let empty = CoordinateStore::new(vec![]);
        assert!(matches!(
            build_distance_matrix(&empty, 0),
            Err(TspError::InvalidDimension { dim: 0, .. })
        ));
    }

    #[test]
    fn test_coordinate_count_mismatch_rejected() {
        assert!(matches!(
            build_distance_matrix(&unit_square(), 5),
            Err(TspError::InvalidDimension { dim: 5, .. })
        ));
    }

    #[test]
    fn test_single_city() {
        let dm = build_distance_matrix(&CoordinateStore::new(vec![(7, 7)]), 1).unwrap();
        assert_eq!(dm.dist(0, 0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_matrix_symmetric_zero_diagonal(dim in 1usize..40, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let coords: Vec<Coordinate> = (0..dim)
                .map(|_| (rng.gen_range(-1000..1000), rng.gen_range(-1000..1000)))
                .collect();
            let dm = build_distance_matrix(&CoordinateStore::new(coords), dim).unwrap();

            for i in 0..dim {
                prop_assert_eq!(dm.dist(i, i), 0.0);
                for j in 0..dim {
                    prop_assert_eq!(dm.dist(i, j), dm.dist(j, i));
                    prop_assert!(dm.dist(i, j) >= 0.0);
                }
            }
        }
    }
}
