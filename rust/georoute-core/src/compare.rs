use serde::{Deserialize, Serialize};
use tracing::info;

use crate::astar::AStar;
use crate::engine::{bfs, dfs, dijkstra, fuzzy_with, ZeroHeuristic};
use crate::graph::GeoGraph;
use crate::models::{deserialize_distance, CityId, NoPathReason, PathResult};
use crate::options::SearchOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
    Fuzzy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Dijkstra, Algorithm::AStar, Algorithm::Fuzzy];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "a-star",
            Algorithm::Fuzzy => "fuzzy",
        }
    }

    /// Runs this engine with the defaults and bounds in `options`.
    pub fn run(&self, graph: &GeoGraph, start: CityId, end: CityId, options: &SearchOptions) -> PathResult {
        match self {
            Algorithm::Bfs => bfs(graph, start, end, options.bfs_timeout_ms),
            Algorithm::Dfs => dfs(graph, start, end, options.dfs_max_cost),
            Algorithm::Dijkstra => dijkstra(graph, start, end),
            // plain weight cost, which every mode accepts
            Algorithm::AStar => AStar::new(graph).max_cost(options.astar_max_cost).search(start, end),
            Algorithm::Fuzzy => {
                fuzzy_with(graph, start, end, options.fuzzy_radius, options.fuzzy_max_km, &options.fuzzy, &ZeroHeuristic)
            }
        }
    }
}

/// One row of a side-by-side comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub path: Option<Vec<CityId>>,
    #[serde(deserialize_with = "deserialize_distance")]
    pub total_distance: f64,
    pub hops: Option<usize>,
    pub elapsed_ms: f64,
    pub expanded: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<f64>,
    pub reason: Option<NoPathReason>,
}

impl AlgorithmRun {
    fn from_result(algorithm: Algorithm, r: PathResult) -> Self {
        Self {
            algorithm,
            hops: r.hops(),
            path: r.path,
            total_distance: r.total_distance,
            elapsed_ms: r.elapsed_ms,
            expanded: r.expanded,
            certainty: r.certainty,
            reason: r.reason,
        }
    }
}

/// Runs every engine on the same query, in [`Algorithm::ALL`] order.
pub fn compare_all(graph: &GeoGraph, start: CityId, end: CityId, options: &SearchOptions) -> Vec<AlgorithmRun> {
    let runs: Vec<AlgorithmRun> = Algorithm::ALL
        .iter()
        .map(|&algorithm| AlgorithmRun::from_result(algorithm, algorithm.run(graph, start, end, options)))
        .collect();
    let found = runs.iter().filter(|r| r.path.is_some()).count();
    info!(start, end, found, engines = runs.len(), "compared engines");
    runs
}
