use std::time::Instant;

use tracing::debug;

use crate::graph::GeoGraph;
use crate::models::{CityId, NoPathReason, PathResult};

use super::elapsed_ms;
use super::frontier::{BiSearch, Keyed, OrdF64};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    dist: OrdF64,
    population: u64,
    seq: u64,
    node: usize,
}

impl Keyed for Entry {
    fn node(&self) -> usize { self.node }
}

/// Bidirectional Dijkstra. Returns a minimum-weight route; among routes of
/// equal weight, the one whose cities add up to the smaller population.
///
/// Both sides keep tentative distances. Whenever a relaxed node already has
/// a distance from the other side, the sum is a candidate route. The loop
/// stops once the two frontier minima together can no longer beat the best
/// candidate. Within one side an equal-distance relaxation keeps the less
/// populous predecessor; meeting nodes that tie the best weight are compared
/// by whole-route population once the search is done.
pub fn dijkstra(graph: &GeoGraph, start: CityId, end: CityId) -> PathResult {
    let t0 = Instant::now();
    let (Some(s), Some(e)) = (graph.index_of(start), graph.index_of(end)) else {
        debug!(start, end, "dijkstra_unknown_endpoint");
        return PathResult::no_path(NoPathReason::UnknownEndpoint, elapsed_ms(t0), 0);
    };
    if s == e {
        return PathResult::found(vec![start], 0.0, elapsed_ms(t0), 0);
    }

    let mut bi: BiSearch<Entry> = BiSearch::new(graph.node_count());
    for (half, origin) in [(&mut bi.forward, s), (&mut bi.backward, e)] {
        half.dist[origin] = 0.0;
        half.frontier.push_with(|seq| Entry { dist: OrdF64(0.0), population: graph.population_at(origin), seq, node: origin });
    }

    let mut best = f64::INFINITY;
    // meeting nodes whose route weighs exactly `best`, in discovery order
    let mut meetings: Vec<usize> = Vec::new();
    let mut expanded = 0u64;

    loop {
        bi.forward.skip_settled();
        bi.backward.skip_settled();
        let (Some(top_f), Some(top_b)) = (bi.forward.frontier.peek(), bi.backward.frontier.peek()) else { break };
        if top_f.dist.0 + top_b.dist.0 >= best { break; }

        let Some(side) = bi.pick_side(|_| true) else { break };
        let (this, other) = bi.split(side);
        let Some(cur) = this.frontier.pop() else { break };
        let u = cur.node;
        this.visited[u] = true;
        expanded += 1;

        let du = this.dist[u];
        for (v, edge) in graph.neighbors_at(u) {
            if this.visited[v] { continue; }
            let nd = du + edge.weight;
            if nd < this.dist[v] {
                this.dist[v] = nd;
                this.parent[v] = Some(u);
                this.frontier.push_with(|seq| Entry { dist: OrdF64(nd), population: graph.population_at(v), seq, node: v });
            } else if nd == this.dist[v] && this.parent[v].is_some_and(|p| graph.population_at(u) < graph.population_at(p)) {
                this.parent[v] = Some(u);
            }
            if other.dist[v].is_finite() {
                let candidate = this.dist[v] + other.dist[v];
                if candidate < best {
                    best = candidate;
                    meetings.clear();
                    meetings.push(v);
                } else if candidate == best && !meetings.contains(&v) {
                    meetings.push(v);
                }
            }
        }
    }

    let route_population = |path: &[usize]| path.iter().fold(0u64, |acc, &i| acc.saturating_add(graph.population_at(i)));
    let Some(path) = meetings.iter().map(|&m| bi.path_through(m)).min_by_key(|p| route_population(p)) else {
        debug!(start, end, expanded, "dijkstra_unreachable");
        return PathResult::no_path(NoPathReason::Unreachable, elapsed_ms(t0), expanded);
    };
    debug!(start, end, hops = path.len() - 1, total = best, ties = meetings.len(), expanded, "dijkstra_done");
    PathResult::found(graph.ids_of(&path), best, elapsed_ms(t0), expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::models::City;

    /// Two routes from 1 to 4: a short one through a city of 900k and a
    /// longer one through two small towns.
    fn detour() -> GeoGraph {
        let cities = vec![
            City::new(1, "s", "S", 0.0, 0.0, 1_000),
            City::new(2, "big", "S", 0.0, 1.0, 900_000),
            City::new(3, "t1", "S", 1.0, 0.5, 1_000),
            City::new(4, "t", "S", 0.0, 2.0, 1_000),
            City::new(5, "t2", "S", 1.0, 1.5, 1_000),
        ];
        build(&cities, Some(1.2), None).unwrap()
    }

    #[test]
    fn shortest_route_wins_over_population() {
        let g = detour();
        let r = dijkstra(&g, 1, 4);
        assert_eq!(r.path, Some(vec![1, 2, 4]));
        assert!((r.total_distance - 2.0).abs() < 1e-12);
        assert!(r.expanded > 0);
    }

    #[test]
    fn exact_tie_goes_through_the_smaller_town() {
        // 1-2-4 and 1-3-4 both weigh 1 + sqrt(2); 3 is the smaller town
        let cities = vec![
            City::new(1, "A", "S", 0.0, 0.0, 100_000),
            City::new(2, "B", "S", 0.0, 1.0, 50_000),
            City::new(3, "C", "S", 1.0, 1.0, 10_000),
            City::new(4, "D", "S", 1.0, 2.0, 5_000),
        ];
        let g = build(&cities, Some(1.5), None).unwrap();
        let there = dijkstra(&g, 1, 4);
        assert_eq!(there.path, Some(vec![1, 3, 4]));
        assert!((there.total_distance - (1.0 + std::f64::consts::SQRT_2)).abs() < 1e-12);
        assert_eq!(dijkstra(&g, 4, 1).path, Some(vec![4, 3, 1]));
    }

    #[test]
    fn symmetric_distance() {
        let g = detour();
        let there = dijkstra(&g, 1, 4);
        let back = dijkstra(&g, 4, 1);
        assert!((there.total_distance - back.total_distance).abs() < 1e-12);
    }

    #[test]
    fn degenerate_endpoints() {
        let g = detour();
        assert_eq!(dijkstra(&g, 3, 3).path, Some(vec![3]));
        assert_eq!(dijkstra(&g, 3, 3).total_distance, 0.0);
        assert_eq!(dijkstra(&g, 3, 42).reason, Some(NoPathReason::UnknownEndpoint));
    }

    #[test]
    fn disconnected_pair() {
        let cities = vec![City::new(1, "a", "S", 0.0, 0.0, 1), City::new(2, "b", "S", 3.0, 3.0, 1)];
        let g = build(&cities, Some(1.0), None).unwrap();
        let r = dijkstra(&g, 1, 2);
        assert!(r.path.is_none());
        assert_eq!(r.reason, Some(NoPathReason::Unreachable));
        assert_eq!(r.total_distance, f64::INFINITY);
    }
}
