use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::{EdgeCost, WeightCost};
use crate::engine::elapsed_ms;
use crate::engine::frontier::{Frontier, OrdF64};
use crate::engine::heuristics::{DefaultTieBreak, Heuristic, MetricHeuristic, TieBreak, TieKey};
use crate::engine::reconstruct::trace_back;
use crate::error::SearchError;
use crate::graph::GeoGraph;
use crate::models::{CityId, NoPathReason, PathResult};

/// What A* does when the cost model changes what is being optimised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AStarMode {
    /// Refuse cost models that are not plain edge weight.
    #[default]
    Strict,
    /// Run anyway; the route is optimal for the cost model, not for weight.
    BestEffort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueNode {
    f: OrdF64,
    tie: TieKey,
    seq: u64,
    node: usize,
}

/// A* with pluggable heuristic, edge cost and tie-break.
///
/// Defaults: straight-line distance in the graph's weight unit, plain edge
/// weight, and [`DefaultTieBreak`].
pub struct AStar<'a> {
    graph: &'a GeoGraph,
    heuristic: Box<dyn Heuristic + 'a>,
    cost: Box<dyn EdgeCost + 'a>,
    tiebreak: Box<dyn TieBreak + 'a>,
    max_cost: Option<f64>,
    mode: AStarMode,
}

impl<'a> AStar<'a> {
    pub fn new(graph: &'a GeoGraph) -> Self {
        Self {
            graph,
            heuristic: Box::new(MetricHeuristic),
            cost: Box::new(WeightCost::default()),
            tiebreak: Box::new(DefaultTieBreak),
            max_cost: None,
            mode: AStarMode::Strict,
        }
    }

    pub fn with_heuristic(mut self, heuristic: impl Heuristic + 'a) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    pub fn with_cost(mut self, cost: impl EdgeCost + 'a) -> Self {
        self.cost = Box::new(cost);
        self
    }

    pub fn with_tiebreak(mut self, tiebreak: impl TieBreak + 'a) -> Self {
        self.tiebreak = Box::new(tiebreak);
        self
    }

    /// Branches whose accumulated cost exceeds `bound` are abandoned.
    pub fn max_cost(mut self, bound: Option<f64>) -> Self {
        self.max_cost = bound;
        self
    }

    pub fn mode(mut self, mode: AStarMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn find_path(&self, start: CityId, end: CityId) -> Result<PathResult, SearchError> {
        if self.mode == AStarMode::Strict && !self.cost.preserves_weight_objective() {
            return Err(SearchError::InadmissibleCost);
        }
        Ok(self.search(start, end))
    }

    /// Runs the search without the cost-model check done by [`AStar::find_path`].
    pub(crate) fn search(&self, start: CityId, end: CityId) -> PathResult {
        let t0 = Instant::now();
        let graph = self.graph;
        let (Some(s), Some(e)) = (graph.index_of(start), graph.index_of(end)) else {
            debug!(start, end, "astar_unknown_endpoint");
            return PathResult::no_path(NoPathReason::UnknownEndpoint, elapsed_ms(t0), 0);
        };
        let n = graph.node_count();
        let goal = graph.node_at(e);

        let mut open: Frontier<QueueNode> = Frontier::new();
        let mut g_score = vec![f64::INFINITY; n];
        let mut came_from: Vec<Option<usize>> = vec![None; n];
        let mut closed = vec![false; n];
        let mut expanded = 0u64;
        let mut cut_by_bound = false;

        g_score[s] = 0.0;
        let h0 = self.heuristic.estimate(graph, graph.node_at(s), goal);
        let tie0 = self.tiebreak.key(graph, graph.node_at(s), h0);
        open.push_with(|seq| QueueNode { f: OrdF64(h0), tie: tie0, seq, node: s });

        while let Some(qn) = open.pop() {
            let u = qn.node;
            // Discard stale
            if closed[u] { continue; }
            if self.max_cost.is_some_and(|bound| g_score[u] > bound) {
                cut_by_bound = true;
                continue;
            }
            if u == e {
                let path = trace_back(e, &came_from);
                debug!(start, end, hops = path.len() - 1, total = g_score[e], expanded, "astar_done");
                return PathResult::found(graph.ids_of(&path), g_score[e], elapsed_ms(t0), expanded);
            }
            closed[u] = true;
            expanded += 1;

            let from = graph.node_at(u);
            for (v, edge) in graph.neighbors_at(u) {
                if closed[v] { continue; }
                let to = graph.node_at(v);
                let tentative = g_score[u] + self.cost.cost(graph, from, to, edge);
                if tentative < g_score[v] {
                    g_score[v] = tentative;
                    came_from[v] = Some(u);
                    let h = self.heuristic.estimate(graph, to, goal);
                    let tie = self.tiebreak.key(graph, to, h);
                    open.push_with(|seq| QueueNode { f: OrdF64(tentative + h), tie, seq, node: v });
                }
            }
        }

        let reason = if cut_by_bound { NoPathReason::CostBound } else { NoPathReason::Unreachable };
        debug!(start, end, expanded, ?reason, "astar_no_path");
        PathResult::no_path(reason, elapsed_ms(t0), expanded)
    }
}

/// A* with the default heuristic, cost and tie-break.
pub fn a_star(graph: &GeoGraph, start: CityId, end: CityId, max_cost: Option<f64>) -> PathResult {
    AStar::new(graph).max_cost(max_cost).search(start, end)
}
