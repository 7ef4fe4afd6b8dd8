use std::cmp::Reverse;
use std::time::Instant;

use tracing::debug;

use crate::graph::GeoGraph;
use crate::models::{CityId, NoPathReason, PathResult};

use super::elapsed_ms;
use super::frontier::{Frontier, OrdF64};
use super::heuristics::{Heuristic, PopulationHeuristic};

/// One partial route: its last node, the trail it extends, and its cost.
struct Trail {
    node: usize,
    prev: Option<usize>,
    cost: f64,
}

/// Lowest `cost + h` first; among equals the newest entry, so the search
/// keeps digging along the branch it just extended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    priority: OrdF64,
    seq: Reverse<u64>,
    trail: usize,
}

/// Best-first depth search steered by city population.
pub fn dfs(graph: &GeoGraph, start: CityId, end: CityId, max_cost: Option<f64>) -> PathResult {
    dfs_with(graph, start, end, max_cost, &PopulationHeuristic)
}

/// Expands partial routes in `cost + heuristic` order and returns the first
/// route that reaches `end`. Routes never revisit a city already on them, a
/// neighbour is only pushed when it improves the best known cost to that
/// neighbour, and branches whose cost would exceed `max_cost` are cut.
/// The result is a valid route, not necessarily the shortest one.
pub fn dfs_with(graph: &GeoGraph, start: CityId, end: CityId, max_cost: Option<f64>, heuristic: &dyn Heuristic) -> PathResult {
    let t0 = Instant::now();
    let (Some(s), Some(e)) = (graph.index_of(start), graph.index_of(end)) else {
        debug!(start, end, "dfs_unknown_endpoint");
        return PathResult::no_path(NoPathReason::UnknownEndpoint, elapsed_ms(t0), 0);
    };
    let goal = graph.node_at(e);

    let mut best_cost = vec![f64::INFINITY; graph.node_count()];
    let mut trails = vec![Trail { node: s, prev: None, cost: 0.0 }];
    let mut open: Frontier<Entry> = Frontier::new();
    best_cost[s] = 0.0;
    open.push_with(|seq| Entry { priority: OrdF64(heuristic.estimate(graph, graph.node_at(s), goal)), seq: Reverse(seq), trail: 0 });

    let mut expanded = 0u64;
    let mut cut_by_bound = false;

    while let Some(entry) = open.pop() {
        let (u, cost) = (trails[entry.trail].node, trails[entry.trail].cost);
        if u == e {
            let path = walk(&trails, entry.trail);
            debug!(start, end, hops = path.len() - 1, total = cost, expanded, "dfs_done");
            return PathResult::found(graph.ids_of(&path), cost, elapsed_ms(t0), expanded);
        }
        if cost > best_cost[u] { continue; }
        expanded += 1;

        for (v, edge) in graph.neighbors_at(u) {
            let next = cost + edge.weight;
            if max_cost.is_some_and(|bound| next > bound) {
                cut_by_bound = true;
                continue;
            }
            if next >= best_cost[v] || on_trail(&trails, entry.trail, v) { continue; }
            best_cost[v] = next;
            trails.push(Trail { node: v, prev: Some(entry.trail), cost: next });
            let idx = trails.len() - 1;
            let priority = next + heuristic.estimate(graph, graph.node_at(v), goal);
            open.push_with(|seq| Entry { priority: OrdF64(priority), seq: Reverse(seq), trail: idx });
        }
    }

    let reason = if cut_by_bound { NoPathReason::CostBound } else { NoPathReason::Unreachable };
    debug!(start, end, expanded, ?reason, "dfs_no_path");
    PathResult::no_path(reason, elapsed_ms(t0), expanded)
}

fn on_trail(trails: &[Trail], mut at: usize, node: usize) -> bool {
    loop {
        let t = &trails[at];
        if t.node == node { return true; }
        match t.prev {
            Some(p) => at = p,
            None => return false,
        }
    }
}

fn walk(trails: &[Trail], mut at: usize) -> Vec<usize> {
    let mut path = vec![trails[at].node];
    while let Some(p) = trails[at].prev {
        path.push(trails[p].node);
        at = p;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::heuristics::ZeroHeuristic;
    use crate::engine::reconstruct::path_distance;
    use crate::graph::build;
    use crate::models::City;

    fn diamond() -> GeoGraph {
        // 1 -> {2 (big), 3 (small)} -> 4, both branches weigh the same
        let cities = vec![
            City::new(1, "s", "S", 0.0, 0.0, 10),
            City::new(2, "big", "S", 1.0, 1.0, 90_000),
            City::new(3, "small", "S", -1.0, 1.0, 50),
            City::new(4, "t", "S", 0.0, 2.0, 10),
        ];
        build(&cities, Some(1.5), None).unwrap()
    }

    #[test]
    fn prefers_small_towns() {
        let g = diamond();
        let r = dfs(&g, 1, 4, None);
        assert_eq!(r.path, Some(vec![1, 3, 4]));
        let total = path_distance(&g, &[1, 3, 4]).unwrap();
        assert!((r.total_distance - total).abs() < 1e-12);
    }

    #[test]
    fn custom_heuristic_is_used() {
        let g = diamond();
        let r = dfs_with(&g, 1, 4, None, &ZeroHeuristic);
        assert!(r.is_found());
        assert_eq!(r.hops(), Some(2));
    }

    #[test]
    fn cost_bound_cuts_every_branch() {
        let g = diamond();
        let r = dfs(&g, 1, 4, Some(1.0));
        assert!(r.path.is_none());
        assert_eq!(r.reason, Some(NoPathReason::CostBound));

        let loose = dfs(&g, 1, 4, Some(10.0));
        assert!(loose.is_found());
    }

    #[test]
    fn start_equals_end() {
        let g = diamond();
        let r = dfs(&g, 2, 2, None);
        assert_eq!(r.path, Some(vec![2]));
        assert_eq!(r.total_distance, 0.0);
    }

    #[test]
    fn trail_walk_and_cycle_check() {
        let trails = vec![
            Trail { node: 0, prev: None, cost: 0.0 },
            Trail { node: 1, prev: Some(0), cost: 1.0 },
            Trail { node: 2, prev: Some(1), cost: 2.0 },
        ];
        assert_eq!(walk(&trails, 2), vec![0, 1, 2]);
        assert!(on_trail(&trails, 2, 0));
        assert!(!on_trail(&trails, 1, 2));
    }
}
