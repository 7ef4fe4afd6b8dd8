use std::collections::HashMap;

use tracing::warn;

use crate::graph::{CityNode, GeoEdge, GeoGraph};
use crate::models::CityId;

/// Cost of stepping from `from` to `to` along `edge`, as seen by A*.
///
/// Any `Fn(&GeoGraph, &CityNode, &CityNode, &GeoEdge) -> f64` closure is a
/// cost model.
pub trait EdgeCost {
    fn cost(&self, graph: &GeoGraph, from: &CityNode, to: &CityNode, edge: &GeoEdge) -> f64;

    /// True only when the cost equals the edge weight, so the route A*
    /// optimises is the minimum-weight route. Unknown models answer false.
    fn preserves_weight_objective(&self) -> bool { false }
}

impl<F> EdgeCost for F
where
    F: Fn(&GeoGraph, &CityNode, &CityNode, &GeoEdge) -> f64,
{
    fn cost(&self, graph: &GeoGraph, from: &CityNode, to: &CityNode, edge: &GeoEdge) -> f64 {
        self(graph, from, to, edge)
    }
}

/// Edge weight plus an optional per-city penalty charged on entering the city.
#[derive(Clone, Debug, Default)]
pub struct WeightCost {
    penalties: HashMap<CityId, f64>,
}

impl WeightCost {
    pub fn new() -> Self { Self::default() }

    /// Adds a penalty for entering `city`. Negative or non-finite penalties
    /// are dropped.
    pub fn with_penalty(mut self, city: CityId, penalty: f64) -> Self {
        if penalty.is_finite() && penalty >= 0.0 {
            self.penalties.insert(city, penalty);
        } else {
            warn!(city, penalty, "ignoring invalid city penalty");
        }
        self
    }

    pub fn penalty(&self, city: CityId) -> f64 {
        self.penalties.get(&city).copied().unwrap_or(0.0)
    }

    pub fn has_penalties(&self) -> bool { !self.penalties.is_empty() }
}

impl EdgeCost for WeightCost {
    fn cost(&self, _: &GeoGraph, _: &CityNode, to: &CityNode, edge: &GeoEdge) -> f64 {
        edge.weight + self.penalty(to.id)
    }

    fn preserves_weight_objective(&self) -> bool { !self.has_penalties() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::models::City;

    fn pair() -> GeoGraph {
        build(&[City::new(1, "a", "S", 0.0, 0.0, 1), City::new(2, "b", "S", 0.0, 1.0, 1)], Some(1.0), None).unwrap()
    }

    #[test]
    fn plain_weight_cost() {
        let g = pair();
        let (a, b) = (g.node(1).unwrap(), g.node(2).unwrap());
        let e = g.edge(1, 2).unwrap();
        let c = WeightCost::new();
        assert_eq!(c.cost(&g, a, b, e), 1.0);
        assert!(c.preserves_weight_objective());
    }

    #[test]
    fn penalties_apply_on_entry_and_reject_bad_values() {
        let g = pair();
        let (a, b) = (g.node(1).unwrap(), g.node(2).unwrap());
        let e = g.edge(1, 2).unwrap();
        let c = WeightCost::new().with_penalty(2, 0.5).with_penalty(1, -3.0).with_penalty(1, f64::NAN);
        assert_eq!(c.cost(&g, a, b, e), 1.5);
        assert_eq!(c.cost(&g, b, a, e), 1.0);
        assert!(!c.preserves_weight_objective());
    }

    #[test]
    fn closures_default_to_unknown_objective() {
        let g = pair();
        let doubled = |_: &GeoGraph, _: &CityNode, _: &CityNode, e: &GeoEdge| e.weight * 2.0;
        let (a, b) = (g.node(1).unwrap(), g.node(2).unwrap());
        assert_eq!(doubled.cost(&g, a, b, g.edge(1, 2).unwrap()), 2.0);
        assert!(!doubled.preserves_weight_objective());
    }
}
