//! Heuristic solver for symmetric Euclidean TSP instances: random restarts
//! improved by 2-opt local search.

pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod setup;
pub mod solver;
pub mod utils;

pub use error::{TspError, TspResult};
