use std::env;

use serde::{Deserialize, Serialize};

use crate::astar::AStarMode;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CACHE_CAPACITY: usize = 5_000;

pub const DEFAULT_FUZZY_ALPHA: f64 = 3.0;
pub const DEFAULT_MIN_CERTAINTY: f64 = 0.1;
pub const DEFAULT_DECAY_FACTOR: f64 = 0.9;

/// Parameters of the piecewise-linear fuzzy membership function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyParams {
    pub alpha: f64,
    pub min_certainty: f64,
    pub decay_factor: f64,
}

impl Default for FuzzyParams {
    fn default() -> Self {
        Self { alpha: DEFAULT_FUZZY_ALPHA, min_certainty: DEFAULT_MIN_CERTAINTY, decay_factor: DEFAULT_DECAY_FACTOR }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub bfs_timeout_ms: u64,
    pub dfs_max_cost: Option<f64>,
    pub astar_max_cost: Option<f64>,
    pub astar_mode: AStarMode,

    /// Fuzzy `max_distance` overrides; `None` for both falls back to the
    /// heaviest edge weight.
    pub fuzzy_radius: Option<f64>,
    pub fuzzy_max_km: Option<f64>,
    pub fuzzy: FuzzyParams,

    pub cache_capacity: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            bfs_timeout_ms: DEFAULT_TIMEOUT_MS,
            dfs_max_cost: None,
            astar_max_cost: None,
            astar_mode: AStarMode::Strict,
            fuzzy_radius: None,
            fuzzy_max_km: None,
            fuzzy: FuzzyParams::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SearchOptions {
    /// Defaults overridden by `GEOROUTE_*` environment variables.
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut o = Self::default();
        if let Some(v) = env_parse::<u64>("GEOROUTE_BFS_TIMEOUT_MS") { o.bfs_timeout_ms = v; }
        if let Some(v) = env_parse::<f64>("GEOROUTE_DFS_MAX_COST") { o.dfs_max_cost = Some(v); }
        if let Some(v) = env_parse::<f64>("GEOROUTE_ASTAR_MAX_COST") { o.astar_max_cost = Some(v); }
        if let Ok(v) = env::var("GEOROUTE_ASTAR_MODE") {
            match v.to_ascii_lowercase().as_str() {
                "strict" => o.astar_mode = AStarMode::Strict,
                "best-effort" | "best_effort" => o.astar_mode = AStarMode::BestEffort,
                _ => {}
            }
        }
        if let Some(v) = env_parse::<f64>("GEOROUTE_FUZZY_RADIUS") { o.fuzzy_radius = Some(v); }
        if let Some(v) = env_parse::<f64>("GEOROUTE_FUZZY_MAX_KM") { o.fuzzy_max_km = Some(v); }
        if let Some(v) = env_parse::<f64>("GEOROUTE_FUZZY_ALPHA") { o.fuzzy.alpha = v; }
        if let Some(v) = env_parse::<f64>("GEOROUTE_FUZZY_MIN_CERTAINTY") { o.fuzzy.min_certainty = v; }
        if let Some(v) = env_parse::<f64>("GEOROUTE_FUZZY_DECAY") { o.fuzzy.decay_factor = v; }
        if let Some(v) = env_parse::<usize>("GEOROUTE_CACHE_CAPACITY") { o.cache_capacity = v; }
        o
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let o = SearchOptions::default();
        assert_eq!(o.bfs_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(o.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(o.astar_mode, AStarMode::Strict);
        assert_eq!(o.fuzzy.alpha, 3.0);
        assert_eq!(o.fuzzy.min_certainty, 0.1);
        assert_eq!(o.fuzzy.decay_factor, 0.9);
        assert!(o.dfs_max_cost.is_none() && o.astar_max_cost.is_none());
    }

    #[test]
    fn deserializes_with_defaults_when_missing_fields() {
        let v = json!({ "bfs_timeout_ms": 250, "fuzzy": { "alpha": 2.0 } });
        let o: SearchOptions = serde_json::from_value(v).unwrap();
        assert_eq!(o.bfs_timeout_ms, 250);
        assert_eq!(o.fuzzy.alpha, 2.0);
        assert_eq!(o.fuzzy.decay_factor, DEFAULT_DECAY_FACTOR);
        assert_eq!(o.astar_mode, AStarMode::Strict);
    }

    #[test]
    fn astar_mode_uses_kebab_case() {
        let o: SearchOptions = serde_json::from_value(json!({ "astar_mode": "best-effort" })).unwrap();
        assert_eq!(o.astar_mode, AStarMode::BestEffort);
    }

    #[test]
    fn env_overrides_and_ignores_garbage() {
        env::set_var("GEOROUTE_BFS_TIMEOUT_MS", "42");
        env::set_var("GEOROUTE_CACHE_CAPACITY", "not-a-number");
        env::set_var("GEOROUTE_ASTAR_MODE", "best-effort");
        let o = SearchOptions::from_env();
        env::remove_var("GEOROUTE_BFS_TIMEOUT_MS");
        env::remove_var("GEOROUTE_CACHE_CAPACITY");
        env::remove_var("GEOROUTE_ASTAR_MODE");
        assert_eq!(o.bfs_timeout_ms, 42);
        assert_eq!(o.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(o.astar_mode, AStarMode::BestEffort);
    }
}
