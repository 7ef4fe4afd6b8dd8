//! Search engines over a built `GeoGraph`.
//!
//! Every engine takes city ids, works on dense node indices internally and
//! reports a `PathResult`. None of them fail: an unknown endpoint, an
//! unreachable target, a timeout or a cost bound all come back as a
//! "no path" result with a reason.

use std::time::Instant;

pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod frontier;
pub mod fuzzy;
pub mod heuristics;
pub mod reconstruct;

pub use bfs::bfs;
pub use dfs::{dfs, dfs_with};
pub use dijkstra::dijkstra;
pub use frontier::OrdF64;
pub use fuzzy::{fuzzy, fuzzy_with, max_distance_for, membership};
pub use heuristics::{
    AngularHeuristic, DefaultTieBreak, HaversineHeuristic, Heuristic, MetricHeuristic, PopulationHeuristic, TieBreak, TieKey, ZeroHeuristic,
};
pub use reconstruct::{path_distance, reconstruct_path, trace_back};

pub(crate) fn elapsed_ms(t0: Instant) -> f64 {
    t0.elapsed().as_secs_f64() * 1000.0
}
