use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::config::constant::KNOWN_OPTIMA;
use crate::error::TspResult;

/// Known optimal tour lengths keyed by instance dimension.
///
/// Used for reporting only. Extra entries come from a JSON object such as
/// `{"51": 426, "76": 538}` and are merged over the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable {
    optima: BTreeMap<usize, u64>,
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self {
            optima: KNOWN_OPTIMA.iter().copied().collect(),
        }
    }
}

impl BenchmarkTable {
    pub fn from_json_str(json: &str) -> TspResult<Self> {
        let extra: BenchmarkTable = serde_json::from_str(json)?;
        let mut table = Self::default();
        table.optima.extend(extra.optima);
        Ok(table)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> TspResult<Self> {
        let path = path.as_ref();
        let table = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            "Loaded {} benchmark optima from {}",
            table.optima.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn insert(&mut self, dim: usize, optimum: u64) {
        self.optima.insert(dim, optimum);
    }

    pub fn known_optimum(&self, dim: usize) -> Option<u64> {
        self.optima.get(&dim).copied()
    }

    /// Percentage by which `length` exceeds the known optimum for `dim`.
    pub fn gap_percent(&self, length: f64, dim: usize) -> Option<f64> {
        self.known_optimum(dim)
            .filter(|&opt| opt > 0)
            .map(|opt| (length - opt as f64) / opt as f64 * 100.0)
    }
}
