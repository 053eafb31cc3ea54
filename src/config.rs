use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use tracing::debug;

use crate::error::{TspError, TspResult};
use crate::solver::two_opt::ImprovementPolicy;

pub mod constant {
    pub(crate) const SEED: u64 = 12345;
    pub(crate) const RESTARTS: usize = 20;
    pub(crate) const INSTANCE_PATH: &str = "data/eil51.tsp";
    pub(crate) const RESULT_PATH: &str = "restarts.csv";
    /// 2-opt needs two non-adjacent edges to exchange.
    pub(crate) const MIN_TWO_OPT_DIM: usize = 4;
    pub(crate) const KNOWN_OPTIMA: [(usize, u64); 3] = [(51, 426), (105, 14379), (442, 50778)];
}

/// Runtime settings for the solver binary.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub instance_path: PathBuf,
    pub seed: u64,
    pub restarts: usize,
    pub policy: ImprovementPolicy,
    pub benchmarks_path: Option<PathBuf>,
    pub result_path: PathBuf,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            instance_path: PathBuf::from(constant::INSTANCE_PATH),
            seed: constant::SEED,
            restarts: constant::RESTARTS,
            policy: ImprovementPolicy::default(),
            benchmarks_path: None,
            result_path: PathBuf::from(constant::RESULT_PATH),
        }
    }
}

impl SolverConfig {
    /// Load `.env` (if any) and read `TSP_*` variables over the defaults.
    pub fn from_env() -> TspResult<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> TspResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("TSP_INSTANCE") {
            config.instance_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("TSP_SEED") {
            config.seed = parse_value("TSP_SEED", &raw)?;
        }
        if let Some(raw) = lookup("TSP_RESTARTS") {
            config.restarts = parse_value("TSP_RESTARTS", &raw)?;
            if config.restarts == 0 {
                return Err(TspError::Config {
                    key: "TSP_RESTARTS".to_string(),
                    reason: "at least one restart is required".to_string(),
                });
            }
        }
        if let Some(raw) = lookup("TSP_POLICY") {
            config.policy = raw.parse().map_err(|reason| TspError::Config {
                key: "TSP_POLICY".to_string(),
                reason,
            })?;
        }
        if let Some(path) = lookup("TSP_BENCHMARKS") {
            config.benchmarks_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("TSP_RESULT_FILE") {
            config.result_path = PathBuf::from(path);
        }

        debug!("Solver configuration: {:?}", config);
        Ok(config)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> TspResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| TspError::Config {
        key: key.to_string(),
        reason: format!("'{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SolverConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.restarts, constant::RESTARTS);
    }

    #[test]
    fn test_overrides() {
        let config = SolverConfig::from_lookup(lookup_from(&[
            ("TSP_INSTANCE", "data/other.tsp"),
            ("TSP_SEED", "7"),
            ("TSP_RESTARTS", " 3 "),
            ("TSP_POLICY", "best"),
            ("TSP_RESULT_FILE", "out.csv"),
        ]))
        .unwrap();
        assert_eq!(config.instance_path, PathBuf::from("data/other.tsp"));
        assert_eq!(config.seed, 7);
        assert_eq!(config.restarts, 3);
        assert_eq!(config.policy, ImprovementPolicy::BestImprovement);
        assert_eq!(config.result_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_bad_values_rejected() {
        let bad_seed = SolverConfig::from_lookup(lookup_from(&[("TSP_SEED", "abc")]));
        assert!(matches!(bad_seed, Err(TspError::Config { .. })));

        let zero_restarts = SolverConfig::from_lookup(lookup_from(&[("TSP_RESTARTS", "0")]));
        assert!(matches!(zero_restarts, Err(TspError::Config { .. })));

        let bad_policy = SolverConfig::from_lookup(lookup_from(&[("TSP_POLICY", "random")]));
        assert!(matches!(bad_policy, Err(TspError::Config { .. })));
    }
}
