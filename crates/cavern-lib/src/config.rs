//! Planner configuration.
//!
//! # Environment Variables
//!
//! - `CAVERN_RICHNESS_THRESHOLD`: fraction of the richest node's gold a node
//!   must hold to be a collection candidate (default `0.6`)
//! - `CAVERN_ROUTE_ALGORITHM`: `a-star` (default) or `dijkstra`

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::planner::RouteAlgorithm;

/// Default fraction of the maximum node value a candidate must reach.
pub const DEFAULT_RICHNESS_THRESHOLD: f64 = 0.6;

pub const RICHNESS_THRESHOLD_ENV: &str = "CAVERN_RICHNESS_THRESHOLD";
pub const ROUTE_ALGORITHM_ENV: &str = "CAVERN_ROUTE_ALGORITHM";

/// Tunables for the escape policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Candidates must hold at least this fraction of the richest node's gold.
    pub richness_threshold: f64,
    /// Search used for every route the policy plans.
    pub algorithm: RouteAlgorithm,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            richness_threshold: DEFAULT_RICHNESS_THRESHOLD,
            algorithm: RouteAlgorithm::default(),
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by any planner variables present in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(RICHNESS_THRESHOLD_ENV) {
            let threshold = raw.trim().parse::<f64>().map_err(|_| Error::InvalidConfig {
                reason: format!("{RICHNESS_THRESHOLD_ENV} is not a number: '{raw}'"),
            })?;
            config = config.with_richness_threshold(threshold)?;
        }

        if let Some(raw) = lookup(ROUTE_ALGORITHM_ENV) {
            config.algorithm = raw.trim().parse()?;
        }

        Ok(config)
    }

    /// Replace the richness threshold; it must lie in `(0, 1]`.
    pub fn with_richness_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::InvalidConfig {
                reason: format!("richness threshold must be in (0, 1], got {threshold}"),
            });
        }
        self.richness_threshold = threshold;
        Ok(self)
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Whether `value` is rich enough relative to the richest node's `max`.
    pub fn is_rich(&self, value: u64, max: u64) -> bool {
        value as f64 >= self.richness_threshold * max as f64
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.richness_threshold, DEFAULT_RICHNESS_THRESHOLD);
        assert_eq!(config.algorithm, RouteAlgorithm::AStar);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (RICHNESS_THRESHOLD_ENV, " 0.25 "),
            (ROUTE_ALGORITHM_ENV, "dijkstra"),
        ]))
        .unwrap();
        assert_eq!(config.richness_threshold, 0.25);
        assert_eq!(config.algorithm, RouteAlgorithm::Dijkstra);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        for raw in ["0", "-0.5", "1.5", "NaN", "lots"] {
            let result = PlannerConfig::from_lookup(lookup(&[(RICHNESS_THRESHOLD_ENV, raw)]));
            assert!(
                matches!(result, Err(Error::InvalidConfig { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn richness_compares_against_fraction_of_max() {
        let config = PlannerConfig::default();
        assert!(config.is_rich(6, 10));
        assert!(!config.is_rich(5, 10));
        assert!(config.is_rich(10, 10));
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: PlannerConfig = serde_json::from_str(r#"{"algorithm":"dijkstra"}"#).unwrap();
        assert_eq!(config.algorithm, RouteAlgorithm::Dijkstra);
        assert_eq!(config.richness_threshold, DEFAULT_RICHNESS_THRESHOLD);
    }
}
