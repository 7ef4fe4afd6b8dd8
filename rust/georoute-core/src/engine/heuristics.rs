use crate::distance::{angular_distance, haversine_km};
use crate::graph::fingerprint::stable_id_hash;
use crate::graph::{CityNode, GeoGraph, WeightMetric};

use super::frontier::OrdF64;

/// Estimated remaining cost from `from` to `goal`.
///
/// A* is optimal only when the estimate never exceeds the true remaining
/// weight; consistency (monotonicity along edges) is additionally required
/// for the lazy-deletion loop to settle each node once. Any
/// `Fn(&GeoGraph, &CityNode, &CityNode) -> f64` closure is a heuristic.
pub trait Heuristic {
    fn estimate(&self, graph: &GeoGraph, from: &CityNode, goal: &CityNode) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(&GeoGraph, &CityNode, &CityNode) -> f64,
{
    fn estimate(&self, graph: &GeoGraph, from: &CityNode, goal: &CityNode) -> f64 {
        self(graph, from, goal)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _: &GeoGraph, _: &CityNode, _: &CityNode) -> f64 { 0.0 }
}

/// Great-circle kilometres. Admissible on kilometre-weighted graphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct HaversineHeuristic;

impl Heuristic for HaversineHeuristic {
    fn estimate(&self, _: &GeoGraph, from: &CityNode, goal: &CityNode) -> f64 {
        haversine_km(from.coords(), goal.coords())
    }
}

/// Planar degrees. Admissible on degree-weighted graphs (triangle inequality).
#[derive(Clone, Copy, Debug, Default)]
pub struct AngularHeuristic;

impl Heuristic for AngularHeuristic {
    fn estimate(&self, _: &GeoGraph, from: &CityNode, goal: &CityNode) -> f64 {
        angular_distance(from.coords(), goal.coords())
    }
}

/// Straight-line distance in whatever unit the graph's edges are weighted in.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricHeuristic;

impl Heuristic for MetricHeuristic {
    fn estimate(&self, graph: &GeoGraph, from: &CityNode, goal: &CityNode) -> f64 {
        match graph.metric() {
            WeightMetric::Kilometres => HaversineHeuristic.estimate(graph, from, goal),
            WeightMetric::Degrees => AngularHeuristic.estimate(graph, from, goal),
        }
    }
}

/// Population of the candidate city. Steers the best-first DFS towards
/// small towns first; not a distance estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PopulationHeuristic;

impl Heuristic for PopulationHeuristic {
    fn estimate(&self, _: &GeoGraph, from: &CityNode, _: &CityNode) -> f64 {
        from.population as f64
    }
}

/// Secondary ordering for A* entries with equal f-score; smaller sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TieKey {
    pub h: OrdF64,
    pub population: u64,
    pub neg_degree: i64,
    pub hash: u64,
}

pub trait TieBreak {
    fn key(&self, graph: &GeoGraph, node: &CityNode, h: f64) -> TieKey;
}

/// Closer to the goal, then smaller population, then higher degree, then a
/// stable hash of the city id.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTieBreak;

impl TieBreak for DefaultTieBreak {
    fn key(&self, graph: &GeoGraph, node: &CityNode, h: f64) -> TieKey {
        let degree = graph.degree(node.id).unwrap_or(0);
        TieKey { h: OrdF64(h), population: node.population, neg_degree: -(degree as i64), hash: stable_id_hash(node.id) }
    }
}
