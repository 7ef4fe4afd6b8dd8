use serde::{Deserialize, Serialize};

use crate::distance::{angular_distance, haversine_km};
use crate::models::CityId;

use super::{GeoGraph, WeightMetric};

const WEIGHT_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Violation {
    SelfLoop,
    ExceedsRadius,
    ExceedsDistance,
    WeightMismatch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvalidEdge {
    pub a: CityId,
    pub b: CityId,
    pub angular_dist: f64,
    pub km_dist: f64,
    pub violations: Vec<Violation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeStats {
    pub min_angular_dist: f64,
    pub max_angular_dist: f64,
    pub min_km_dist: f64,
    pub max_km_dist: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub is_valid: bool,
    pub invalid_edges: Vec<InvalidEdge>,
    /// City pairs that satisfy the constraints but have no edge.
    pub missing_edges: Vec<(CityId, CityId)>,
    /// `None` for a graph without edges.
    pub stats: Option<EdgeStats>,
}

/// Re-checks every edge against the constraints stored in the graph and
/// every non-adjacent pair for a missing edge.
pub fn verify_constraints(graph: &GeoGraph) -> ConstraintReport {
    let c = graph.constraints();
    let metric = graph.metric();
    let mut invalid_edges = Vec::new();
    let mut stats: Option<EdgeStats> = None;

    for e in graph.edges() {
        let mut violations = Vec::new();
        if e.a == e.b { violations.push(Violation::SelfLoop); }
        if c.radius_deg.is_some_and(|r| e.angular_dist > r) { violations.push(Violation::ExceedsRadius); }
        if c.max_km.is_some_and(|d| e.km_dist > d) { violations.push(Violation::ExceedsDistance); }
        let expected = match metric {
            WeightMetric::Kilometres => e.km_dist,
            WeightMetric::Degrees => e.angular_dist,
        };
        if (e.weight - expected).abs() > WEIGHT_TOLERANCE { violations.push(Violation::WeightMismatch); }
        if !violations.is_empty() {
            invalid_edges.push(InvalidEdge { a: e.a, b: e.b, angular_dist: e.angular_dist, km_dist: e.km_dist, violations });
        }

        stats = Some(match stats {
            None => EdgeStats {
                min_angular_dist: e.angular_dist,
                max_angular_dist: e.angular_dist,
                min_km_dist: e.km_dist,
                max_km_dist: e.km_dist,
            },
            Some(s) => EdgeStats {
                min_angular_dist: s.min_angular_dist.min(e.angular_dist),
                max_angular_dist: s.max_angular_dist.max(e.angular_dist),
                min_km_dist: s.min_km_dist.min(e.km_dist),
                max_km_dist: s.max_km_dist.max(e.km_dist),
            },
        });
    }

    let mut missing_edges = Vec::new();
    let n = graph.node_count();
    for i in 0..n {
        for j in (i + 1)..n {
            if graph.edge_at(i, j).is_some() { continue; }
            let (a, b) = (graph.node_at(i), graph.node_at(j));
            if c.admits(angular_distance(a.coords(), b.coords()), haversine_km(a.coords(), b.coords())) {
                missing_edges.push((a.id, b.id));
            }
        }
    }

    ConstraintReport { is_valid: invalid_edges.is_empty() && missing_edges.is_empty(), invalid_edges, missing_edges, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::models::City;

    fn line() -> Vec<City> {
        (0..5).map(|i| City::new(i, format!("c{i}"), "S", 0.0, i as f64 * 0.5, 1000)).collect()
    }

    #[test]
    fn freshly_built_graph_is_valid() {
        let g = build(&line(), Some(0.75), None).unwrap();
        let r = verify_constraints(&g);
        assert!(r.is_valid, "{r:?}");
        let s = r.stats.unwrap();
        assert_eq!(s.min_angular_dist, 0.5);
        assert_eq!(s.max_angular_dist, 0.5);
        assert!(s.max_km_dist > 55.0 && s.max_km_dist < 56.0);
    }

    #[test]
    fn edgeless_graph_has_no_stats() {
        let g = build(&line(), Some(0.1), None).unwrap();
        let r = verify_constraints(&g);
        assert!(r.is_valid);
        assert!(r.stats.is_none());
    }

    #[test]
    fn detects_corrupted_edge_attributes() {
        let mut g = build(&line(), Some(0.75), Some(100.0)).unwrap();
        g.edges[0].angular_dist = 2.0;
        g.edges[1].weight += 1.0;
        let r = verify_constraints(&g);
        assert!(!r.is_valid);
        assert_eq!(r.invalid_edges.len(), 2);
        assert_eq!(r.invalid_edges[0].violations, vec![Violation::ExceedsRadius]);
        assert_eq!(r.invalid_edges[1].violations, vec![Violation::WeightMismatch]);
    }

    #[test]
    fn detects_missing_edges() {
        let mut g = build(&line(), Some(0.75), None).unwrap();
        // Drop the lookup entry for the first edge (0,1) as a stale index would
        g.edge_index.remove(&(0, 1));
        let r = verify_constraints(&g);
        assert!(!r.is_valid);
        assert_eq!(r.missing_edges, vec![(0, 1)]);
    }
}
