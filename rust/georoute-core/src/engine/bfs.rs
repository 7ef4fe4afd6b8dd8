use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::graph::GeoGraph;
use crate::models::{BfsMetrics, CityId, NoPathReason, PathResult};

use super::elapsed_ms;
use super::frontier::BiSearch;
use super::reconstruct::path_distance_at;

/// Frontier order: smaller towns first, then discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    population: u64,
    seq: u64,
    node: usize,
}

/// Bidirectional breadth-first search with population-ordered frontiers.
///
/// Nodes are marked at discovery and the search stops at the first node
/// discovered from both sides, so the route is short in hops but not
/// guaranteed hop-minimal. `total_distance` is the weight of that route.
/// The time budget is checked once per iteration; `timeout_ms == 0` always
/// times out unless `start == end`.
pub fn bfs(graph: &GeoGraph, start: CityId, end: CityId, timeout_ms: u64) -> PathResult {
    let t0 = Instant::now();
    let n = graph.node_count();
    let (Some(s), Some(e)) = (graph.index_of(start), graph.index_of(end)) else {
        debug!(start, end, "bfs_unknown_endpoint");
        return PathResult::no_path(NoPathReason::UnknownEndpoint, elapsed_ms(t0), 0).with_metrics(BfsMetrics::default());
    };
    if s == e {
        let metrics = BfsMetrics { visited: 1, frontier_max: 1, explored_pct: 100.0 / n as f64, iterations: 0, timeout: false };
        return PathResult::found(vec![start], 0.0, elapsed_ms(t0), 0).with_metrics(metrics);
    }

    let timeout = Duration::from_millis(timeout_ms);
    let mut bi: BiSearch<Entry> = BiSearch::new(n);
    for (half, origin) in [(&mut bi.forward, s), (&mut bi.backward, e)] {
        half.visited[origin] = true;
        half.dist[origin] = 0.0;
        half.frontier.push_with(|seq| Entry { population: graph.population_at(origin), seq, node: origin });
    }

    let mut visited = 2usize;
    let mut frontier_max = 1usize;
    let mut iterations = 0u64;
    let mut expanded = 0u64;
    let mut meeting = None;

    while meeting.is_none() {
        if t0.elapsed() >= timeout {
            let metrics = BfsMetrics {
                visited,
                frontier_max,
                explored_pct: visited as f64 / n as f64 * 100.0,
                iterations,
                timeout: true,
            };
            warn!(start, end, timeout_ms, visited, iterations, "bfs_timeout");
            return PathResult::no_path(NoPathReason::Timeout, elapsed_ms(t0), expanded).with_metrics(metrics);
        }
        if bi.either_exhausted() { break; }
        let Some(side) = bi.pick_side(|_| true) else { break };
        let (this, other) = bi.split(side);
        let Some(cur) = this.frontier.pop() else { break };
        expanded += 1;

        let depth = this.dist[cur.node] + 1.0;
        for (v, _) in graph.neighbors_at(cur.node) {
            if this.visited[v] { continue; }
            this.visited[v] = true;
            this.parent[v] = Some(cur.node);
            this.dist[v] = depth;
            if other.visited[v] {
                meeting = Some(v);
                break;
            }
            visited += 1;
            this.frontier.push_with(|seq| Entry { population: graph.population_at(v), seq, node: v });
        }

        let (f, b) = bi.frontier_sizes();
        frontier_max = frontier_max.max(f).max(b);
        iterations += 1;
    }

    let metrics = BfsMetrics { visited, frontier_max, explored_pct: visited as f64 / n as f64 * 100.0, iterations, timeout: false };
    let Some(m) = meeting else {
        debug!(start, end, visited, iterations, "bfs_unreachable");
        return PathResult::no_path(NoPathReason::Unreachable, elapsed_ms(t0), expanded).with_metrics(metrics);
    };

    let path = bi.path_through(m);
    match path_distance_at(graph, &path) {
        Ok(total) => {
            debug!(start, end, hops = path.len() - 1, total, visited, iterations, "bfs_done");
            PathResult::found(graph.ids_of(&path), total, elapsed_ms(t0), expanded).with_metrics(metrics)
        }
        Err(err) => {
            error!(start, end, %err, "bfs_broken_path");
            PathResult::no_path(NoPathReason::Unreachable, elapsed_ms(t0), expanded).with_metrics(metrics)
        }
    }
}
