use serde::{Deserialize, Serialize};

use crate::models::CityId;

use super::GeoGraph;

/// Connectivity overview of a built graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub avg_degree: f64,
    pub density: f64,
    pub components: usize,
    pub isolated: Vec<CityId>,
    pub mean_angular_dist: Option<f64>,
    pub max_angular_dist: Option<f64>,
    pub mean_km_dist: Option<f64>,
    pub max_km_dist: Option<f64>,
}

impl GraphSummary {
    pub fn of(graph: &GeoGraph) -> Self {
        let n = graph.node_count();
        let m = graph.edge_count();
        let avg_degree = if n == 0 { 0.0 } else { 2.0 * m as f64 / n as f64 };
        let density = if n < 2 { 0.0 } else { 2.0 * m as f64 / (n as f64 * (n as f64 - 1.0)) };
        let isolated = (0..n).filter(|&i| graph.degree_at(i) == 0).map(|i| graph.id_at(i)).collect();

        let (mean_angular_dist, max_angular_dist, mean_km_dist, max_km_dist) = if m == 0 {
            (None, None, None, None)
        } else {
            let mut sum_a = 0.0;
            let mut sum_k = 0.0;
            let mut max_a = f64::MIN;
            let mut max_k = f64::MIN;
            for e in graph.edges() {
                sum_a += e.angular_dist;
                sum_k += e.km_dist;
                max_a = max_a.max(e.angular_dist);
                max_k = max_k.max(e.km_dist);
            }
            (Some(sum_a / m as f64), Some(max_a), Some(sum_k / m as f64), Some(max_k))
        };

        GraphSummary {
            nodes: n,
            edges: m,
            avg_degree,
            density,
            components: count_components(graph),
            isolated,
            mean_angular_dist,
            max_angular_dist,
            mean_km_dist,
            max_km_dist,
        }
    }
}

fn count_components(graph: &GeoGraph) -> usize {
    let n = graph.node_count();
    let mut seen = vec![false; n];
    let mut stack = Vec::new();
    let mut components = 0;
    for root in 0..n {
        if seen[root] { continue; }
        components += 1;
        seen[root] = true;
        stack.push(root);
        while let Some(u) = stack.pop() {
            for (v, _) in graph.neighbors_at(u) {
                if !seen[v] {
                    seen[v] = true;
                    stack.push(v);
                }
            }
        }
    }
    components
}
