//! City graphs built from distance constraints, and five ways to route
//! across them: BFS, DFS, Dijkstra, A* and a certainty-maximising fuzzy search.

pub mod astar;
pub mod cache;
pub mod compare;
pub mod cost;
pub mod distance;
pub mod engine;
pub mod error;
pub mod graph;
pub mod models;
pub mod options;

pub use astar::{a_star, AStar, AStarMode};
pub use cache::RouteCache;
pub use compare::{compare_all, Algorithm, AlgorithmRun};
pub use cost::{EdgeCost, WeightCost};
pub use distance::{angular_distance, haversine_km, EARTH_RADIUS_KM, KM_PER_DEGREE};
pub use engine::{
    bfs, dfs, dfs_with, dijkstra, fuzzy, fuzzy_with, membership, path_distance, reconstruct_path, AngularHeuristic, DefaultTieBreak,
    HaversineHeuristic, Heuristic, MetricHeuristic, PopulationHeuristic, TieBreak, TieKey, ZeroHeuristic,
};
pub use error::{ConstructionError, SearchError};
pub use graph::{build, verify_constraints, CityNode, ConstraintReport, GeoEdge, GeoGraph, GraphSummary, WeightMetric};
pub use models::{BfsMetrics, City, CityId, NoPathReason, PathResult};
pub use options::{FuzzyParams, SearchOptions};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
