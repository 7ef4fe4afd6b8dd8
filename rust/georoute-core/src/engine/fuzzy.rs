//! Certainty-maximising bidirectional search.
//!
//! Each edge gets a certainty from a piecewise-linear membership function of
//! its weight; a route is as certain as its least certain edge. The search
//! maximises route certainty and prefers lighter routes among equally
//! certain ones.

use std::cmp::Reverse;
use std::time::Instant;

use tracing::debug;

use crate::distance::KM_PER_DEGREE;
use crate::graph::{GeoGraph, WeightMetric};
use crate::models::{CityId, NoPathReason, PathResult};
use crate::options::FuzzyParams;

use super::elapsed_ms;
use super::frontier::{pair_mut, BiSearch, HalfSearch, Keyed, OrdF64, Side};
use super::heuristics::{Heuristic, ZeroHeuristic};

/// Used when neither a bound nor any edge is available.
const FALLBACK_MAX_DISTANCE: f64 = 10.0;

/// Highest certainty first, then lowest `g + h`, then smaller population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    certainty: Reverse<OrdF64>,
    score: OrdF64,
    population: u64,
    seq: u64,
    node: usize,
}

impl Keyed for Entry {
    fn node(&self) -> usize { self.node }
}

/// Certainty of a single edge of weight `distance`.
///
/// Full certainty up to `max_distance / alpha`, `min_certainty` from
/// `max_distance` on, and `1 - (distance / max_distance) * decay_factor`
/// in between. Always within `[0, 1]`.
pub fn membership(distance: f64, max_distance: f64, params: &FuzzyParams) -> f64 {
    let c = if distance <= max_distance / params.alpha {
        1.0
    } else if distance >= max_distance {
        params.min_certainty
    } else {
        1.0 - (distance / max_distance) * params.decay_factor
    };
    c.clamp(0.0, 1.0)
}

/// The `max_distance` the membership function is scaled by, in the graph's
/// weight unit. A bound given in the other unit is converted at
/// `KM_PER_DEGREE`; without any bound the heaviest edge is used.
pub fn max_distance_for(graph: &GeoGraph, radius: Option<f64>, max_km: Option<f64>) -> f64 {
    let bound = match graph.metric() {
        WeightMetric::Kilometres => max_km.or(radius.map(|r| r * KM_PER_DEGREE)),
        WeightMetric::Degrees => radius.or(max_km.map(|d| d / KM_PER_DEGREE)),
    };
    bound.unwrap_or_else(|| graph.max_edge_weight().unwrap_or(FALLBACK_MAX_DISTANCE))
}

pub fn fuzzy(graph: &GeoGraph, start: CityId, end: CityId, radius: Option<f64>, max_km: Option<f64>) -> PathResult {
    fuzzy_with(graph, start, end, radius, max_km, &FuzzyParams::default(), &ZeroHeuristic)
}

/// Fuzzy search with explicit membership parameters and a per-side
/// heuristic (estimated weight to that side's goal). The heuristic must be
/// admissible and consistent for the weight tie-break to be exact.
///
/// `certainty` is always set on the result: the best route's certainty,
/// `1.0` for `start == end` and `0.0` when no route exists.
pub fn fuzzy_with(
    graph: &GeoGraph,
    start: CityId,
    end: CityId,
    radius: Option<f64>,
    max_km: Option<f64>,
    params: &FuzzyParams,
    heuristic: &dyn Heuristic,
) -> PathResult {
    let t0 = Instant::now();
    let (Some(s), Some(e)) = (graph.index_of(start), graph.index_of(end)) else {
        debug!(start, end, "fuzzy_unknown_endpoint");
        return PathResult::no_path(NoPathReason::UnknownEndpoint, elapsed_ms(t0), 0).with_certainty(0.0);
    };
    if s == e {
        return PathResult::found(vec![start], 0.0, elapsed_ms(t0), 0).with_certainty(1.0);
    }

    let n = graph.node_count();
    let max_distance = max_distance_for(graph, radius, max_km);
    let goal_of = |side: Side| match side {
        Side::Forward => e,
        Side::Backward => s,
    };

    let mut bi: BiSearch<Entry> = BiSearch::new(n);
    let mut certainty = [vec![0.0f64; n], vec![0.0f64; n]];
    for (side, origin) in [(Side::Forward, s), (Side::Backward, e)] {
        let (half, _) = bi.split(side);
        let (cert, _) = pair_mut(&mut certainty, side);
        cert[origin] = 1.0;
        half.dist[origin] = 0.0;
        let h = heuristic.estimate(graph, graph.node_at(origin), graph.node_at(goal_of(side)));
        half.frontier.push_with(|seq| Entry {
            certainty: Reverse(OrdF64(1.0)),
            score: OrdF64(h),
            population: graph.population_at(origin),
            seq,
            node: origin,
        });
    }

    // (certainty, distance, meeting node) of the best route so far
    let mut best: Option<(f64, f64, usize)> = None;
    let mut expanded = 0u64;

    loop {
        bi.forward.skip_settled();
        bi.backward.skip_settled();
        let Some(side) = bi.pick_side(|half| !dominated(half, best)) else { break };
        let goal = graph.node_at(goal_of(side));
        let (this, other) = bi.split(side);
        let (c_this, c_other) = pair_mut(&mut certainty, side);
        let Some(cur) = this.frontier.pop() else { break };
        let u = cur.node;
        this.visited[u] = true;
        expanded += 1;

        if other.visited[u] {
            let cand = (c_this[u].min(c_other[u]), this.dist[u] + other.dist[u]);
            let better = match best {
                None => true,
                Some((bc, bd, _)) => cand.0 > bc || (cand.0 == bc && cand.1 < bd),
            };
            if better {
                best = Some((cand.0, cand.1, u));
            }
        }

        for (v, edge) in graph.neighbors_at(u) {
            if this.visited[v] { continue; }
            let nc = c_this[u].min(membership(edge.weight, max_distance, params));
            let nd = this.dist[u] + edge.weight;
            if nc > c_this[v] || (nc == c_this[v] && nd < this.dist[v]) {
                c_this[v] = nc;
                this.dist[v] = nd;
                this.parent[v] = Some(u);
                let score = nd + heuristic.estimate(graph, graph.node_at(v), goal);
                this.frontier.push_with(|seq| Entry {
                    certainty: Reverse(OrdF64(nc)),
                    score: OrdF64(score),
                    population: graph.population_at(v),
                    seq,
                    node: v,
                });
            }
        }
    }

    let Some((cert, total, m)) = best else {
        debug!(start, end, expanded, "fuzzy_unreachable");
        return PathResult::no_path(NoPathReason::Unreachable, elapsed_ms(t0), expanded).with_certainty(0.0);
    };
    let path = bi.path_through(m);
    debug!(start, end, hops = path.len() - 1, total, certainty = cert, expanded, "fuzzy_done");
    PathResult::found(graph.ids_of(&path), total, elapsed_ms(t0), expanded).with_certainty(cert)
}

/// A side is done when its frontier is empty or its best entry cannot beat
/// the best route found so far.
fn dominated(half: &HalfSearch<Entry>, best: Option<(f64, f64, usize)>) -> bool {
    let Some(top) = half.frontier.peek() else { return true };
    let Some((bc, bd, _)) = best else { return false };
    let Reverse(OrdF64(tc)) = top.certainty;
    tc < bc || (tc == bc && top.score.0 >= bd)
}
