/// Integer city coordinate `(x, y)`.
pub type Coordinate = (i64, i64);

/// Per-city coordinates for one problem instance. Fixed once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateStore {
    coords: Vec<Coordinate>,
}

impl CoordinateStore {
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self { coords }
    }

    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn get(&self, city: usize) -> Option<Coordinate> {
        self.coords.get(city).copied()
    }
}

impl From<Vec<Coordinate>> for CoordinateStore {
    fn from(coords: Vec<Coordinate>) -> Self {
        Self::new(coords)
    }
}

/// Symmetric `dim x dim` Euclidean distance matrix with a zero diagonal.
///
/// Only built through [`crate::distance::matrix::build_distance_matrix`] and
/// read-only afterwards, so a single matrix can back any number of routes.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn dist(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

/// Closed tour over city indices: after the last city the tour returns to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub name: Option<String>,
    pub distance_matrix: DistanceMatrix,
    pub known_optimum: Option<u64>,
}

impl ProblemInstance {
    pub fn dim(&self) -> usize {
        self.distance_matrix.dim()
    }
}

/// Outcome of one random restart followed by 2-opt.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartRecord {
    pub restart: usize,
    pub initial_length: f64,
    pub optimized_length: f64,
    pub passes: usize,
    pub swaps: usize,
}

#[derive(Debug, Clone)]
pub struct RestartReport {
    pub best_so_far: Route,
    pub best_length: f64,
    pub best_so_far_restart: usize,
    pub records: Vec<RestartRecord>,
    pub best_so_far_updates: Vec<(usize, f64)>,
}
