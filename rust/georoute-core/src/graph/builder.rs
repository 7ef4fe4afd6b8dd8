use std::collections::HashMap;
use std::time::Instant;

use tracing::info;

use crate::distance::{angular_distance, haversine_km};
use crate::error::ConstructionError;
use crate::models::{City, CityId};

use super::adjacency::Adjacency;
use super::fingerprint::Fnv1a64;
use super::{CityNode, Constraints, GeoEdge, GeoGraph, WeightMetric};

/// Builds the city graph with an exhaustive pairwise scan.
///
/// An edge joins two cities iff every supplied constraint holds: angular
/// distance `<= radius` and haversine distance `<= max_km`. The weight is
/// the km distance when `max_km` is given, the angular distance otherwise.
pub fn build(cities: &[City], radius: Option<f64>, max_km: Option<f64>) -> Result<GeoGraph, ConstructionError> {
    GeoGraph::build(cities, radius, max_km)
}

impl GeoGraph {
    pub fn build(cities: &[City], radius: Option<f64>, max_km: Option<f64>) -> Result<Self, ConstructionError> {
        let t0 = Instant::now();
        if radius.is_none() && max_km.is_none() {
            return Err(ConstructionError::MissingConstraint);
        }
        check_constraint("r", radius)?;
        check_constraint("d", max_km)?;
        let constraints = Constraints { radius_deg: radius, max_km };

        let mut nodes: Vec<CityNode> = Vec::with_capacity(cities.len());
        for c in cities {
            let (Some(lat), Some(lon)) = (c.latitude, c.longitude) else {
                return Err(ConstructionError::MissingCoordinates { id: c.id });
            };
            if !lat.is_finite() || !lon.is_finite() {
                return Err(ConstructionError::MissingCoordinates { id: c.id });
            }
            nodes.push(CityNode {
                id: c.id,
                name: c.name.clone(),
                state: c.state.clone(),
                latitude: lat,
                longitude: lon,
                population: c.population,
            });
        }
        // Deterministic: dense index order is ascending city id
        nodes.sort_by_key(|n| n.id);
        let mut index: HashMap<CityId, usize> = HashMap::with_capacity(nodes.len());
        for (i, n) in nodes.iter().enumerate() {
            if index.insert(n.id, i).is_some() {
                return Err(ConstructionError::DuplicateCity { id: n.id });
            }
        }

        let metric = constraints.metric();
        let mut edges: Vec<GeoEdge> = Vec::new();
        let mut pairs: Vec<(u32, u32)> = Vec::new();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (a, b) = (&nodes[i], &nodes[j]);
                let angular = angular_distance(a.coords(), b.coords());
                let km = haversine_km(a.coords(), b.coords());
                if !constraints.admits(angular, km) {
                    continue;
                }
                let weight = match metric {
                    WeightMetric::Kilometres => km,
                    WeightMetric::Degrees => angular,
                };
                edges.push(GeoEdge { a: a.id, b: b.id, weight, angular_dist: angular, km_dist: km });
                pairs.push((i as u32, j as u32));
            }
        }

        let edge_index: HashMap<(u32, u32), u32> = pairs.iter().enumerate().map(|(e, &p)| (p, e as u32)).collect();
        let adjacency = Adjacency::build(nodes.len(), &pairs);
        let fingerprint = fingerprint_of(&constraints, &nodes, &edges);

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            radius = ?radius,
            max_km = ?max_km,
            duration_ms = t0.elapsed().as_secs_f64() * 1000.0,
            "built geo graph"
        );

        Ok(GeoGraph { nodes, index, edges, edge_index, adjacency, constraints, fingerprint })
    }
}

fn check_constraint(name: &'static str, value: Option<f64>) -> Result<(), ConstructionError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ConstructionError::InvalidConstraint { name, value: v }),
        _ => Ok(()),
    }
}

fn fingerprint_of(constraints: &Constraints, nodes: &[CityNode], edges: &[GeoEdge]) -> u64 {
    let mut h = Fnv1a64::new();
    h.write_opt_f64(constraints.radius_deg);
    h.write_opt_f64(constraints.max_km);
    h.write_u64(nodes.len() as u64);
    for n in nodes {
        h.write_u32(n.id);
        h.write_f64(n.latitude);
        h.write_f64(n.longitude);
        h.write_u64(n.population);
    }
    h.write_u64(edges.len() as u64);
    for e in edges {
        h.write_u32(e.a);
        h.write_u32(e.b);
        h.write_f64(e.weight);
    }
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Vec<City> {
        vec![
            City::new(0, "A", "S", 0.0, 0.0, 100_000),
            City::new(1, "B", "S", 0.0, 1.0, 50_000),
            City::new(2, "C", "S", 1.0, 1.0, 10_000),
            City::new(3, "D", "S", 1.0, 2.0, 5_000),
        ]
    }

    #[test]
    fn requires_a_constraint() {
        assert_eq!(build(&cities(), None, None).unwrap_err(), ConstructionError::MissingConstraint);
    }

    #[test]
    fn rejects_missing_or_non_finite_coordinates() {
        let mut cs = cities();
        cs[2].longitude = None;
        assert_eq!(build(&cs, Some(1.0), None).unwrap_err(), ConstructionError::MissingCoordinates { id: 2 });
        let mut cs = cities();
        cs[1].latitude = Some(f64::NAN);
        assert_eq!(build(&cs, Some(1.0), None).unwrap_err(), ConstructionError::MissingCoordinates { id: 1 });
    }

    #[test]
    fn rejects_duplicate_ids_and_bad_constraints() {
        let mut cs = cities();
        cs[3].id = 0;
        assert_eq!(build(&cs, Some(1.0), None).unwrap_err(), ConstructionError::DuplicateCity { id: 0 });
        assert!(matches!(build(&cities(), Some(-1.0), None), Err(ConstructionError::InvalidConstraint { name: "r", .. })));
        assert!(matches!(build(&cities(), None, Some(f64::INFINITY)), Err(ConstructionError::InvalidConstraint { name: "d", .. })));
    }

    #[test]
    fn radius_scenario_edges() {
        let g = build(&cities(), Some(1.5), None).unwrap();
        // A-B, B-C, C-D at 1 degree; A-C and B-D at sqrt(2); A-D at sqrt(5) excluded
        assert_eq!(g.edge_count(), 5);
        assert!(g.edge(0, 2).is_some());
        assert!(g.edge(1, 3).is_some());
        assert!(g.edge(0, 3).is_none());
        for e in g.edges() {
            assert_eq!(e.weight, e.angular_dist);
            assert!(e.a < e.b);
        }
        assert_eq!(g.metric(), WeightMetric::Degrees);
    }

    #[test]
    fn both_constraints_are_conjunctive_and_weight_is_km() {
        // 1 degree of longitude at the equator is ~111 km
        let g = build(&cities(), Some(1.5), Some(120.0)).unwrap();
        assert!(g.edge(0, 1).is_some());
        assert!(g.edge(0, 2).is_none(), "sqrt(2) degrees is ~157 km");
        for e in g.edges() {
            assert_eq!(e.weight, e.km_dist);
            assert!(e.angular_dist <= 1.5 && e.km_dist <= 120.0);
        }
    }

    #[test]
    fn boundary_is_inclusive() {
        let cs = vec![City::new(1, "P", "S", 0.0, 0.0, 1), City::new(2, "Q", "S", 3.0, 4.0, 1)];
        assert_eq!(build(&cs, Some(5.0), None).unwrap().edge_count(), 1);
        assert_eq!(build(&cs, Some(4.999), None).unwrap().edge_count(), 0);
    }

    #[test]
    fn fingerprint_tracks_content_not_input_order() {
        let mut rev = cities();
        rev.reverse();
        let g1 = build(&cities(), Some(1.5), None).unwrap();
        let g2 = build(&rev, Some(1.5), None).unwrap();
        assert_eq!(g1.fingerprint(), g2.fingerprint());
        let g3 = build(&cities(), Some(1.2), None).unwrap();
        assert_ne!(g1.fingerprint(), g3.fingerprint());
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let g = build(&[], Some(1.0), None).unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }
}
