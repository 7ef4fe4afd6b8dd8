//! Immutable city graph built from pairwise distance constraints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::CityId;

pub mod adjacency;
pub mod analysis;
pub mod builder;
pub mod fingerprint;
pub mod verify;

pub use adjacency::Adjacency;
pub use analysis::GraphSummary;
pub use builder::build;
pub use verify::{verify_constraints, ConstraintReport, EdgeStats, InvalidEdge};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightMetric {
    /// Edge weight is the planar angular distance in degrees.
    Degrees,
    /// Edge weight is the haversine distance in kilometres.
    Kilometres,
}

/// Constraints a graph was built with. An edge exists iff every present
/// bound holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub radius_deg: Option<f64>,
    pub max_km: Option<f64>,
}

impl Constraints {
    pub fn admits(&self, angular: f64, km: f64) -> bool {
        self.radius_deg.map_or(true, |r| angular <= r) && self.max_km.map_or(true, |d| km <= d)
    }

    pub fn metric(&self) -> WeightMetric {
        if self.max_km.is_some() { WeightMetric::Kilometres } else { WeightMetric::Degrees }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityNode {
    pub id: CityId,
    pub name: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
}

impl CityNode {
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Undirected edge; `a < b` by city id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoEdge {
    pub a: CityId,
    pub b: CityId,
    pub weight: f64,
    pub angular_dist: f64,
    pub km_dist: f64,
}

/// Nodes are held in ascending city-id order; that order is the dense index
/// space the search engines work in.
#[derive(Clone, Debug)]
pub struct GeoGraph {
    pub(crate) nodes: Vec<CityNode>,
    pub(crate) index: HashMap<CityId, usize>,
    pub(crate) edges: Vec<GeoEdge>,
    pub(crate) edge_index: HashMap<(u32, u32), u32>,
    pub(crate) adjacency: Adjacency,
    pub(crate) constraints: Constraints,
    pub(crate) fingerprint: u64,
}

impl GeoGraph {
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }
    pub fn constraints(&self) -> Constraints { self.constraints }
    pub fn metric(&self) -> WeightMetric { self.constraints.metric() }

    /// Content identity computed once at construction.
    pub fn fingerprint(&self) -> u64 { self.fingerprint }

    pub fn contains(&self, id: CityId) -> bool { self.index.contains_key(&id) }

    pub fn node(&self, id: CityId) -> Option<&CityNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CityNode> + '_ { self.nodes.iter() }

    pub fn edges(&self) -> impl Iterator<Item = &GeoEdge> + '_ { self.edges.iter() }

    /// Edge between two cities in either order.
    pub fn edge(&self, a: CityId, b: CityId) -> Option<&GeoEdge> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        self.edge_at(ia, ib)
    }

    pub fn degree(&self, id: CityId) -> Option<usize> {
        self.index_of(id).map(|i| self.adjacency.degree(i))
    }

    /// Neighbours in ascending id order with the connecting edge.
    pub fn neighbors(&self, id: CityId) -> impl Iterator<Item = (CityId, &GeoEdge)> + '_ {
        let row = self.index_of(id).map(|i| self.adjacency.neighbors(i));
        let empty: &[u32] = &[];
        let (dst, edge) = row.unwrap_or((empty, empty));
        dst.iter().zip(edge.iter()).map(move |(&d, &e)| (self.nodes[d as usize].id, &self.edges[e as usize]))
    }

    pub(crate) fn index_of(&self, id: CityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn node_at(&self, i: usize) -> &CityNode { &self.nodes[i] }

    pub(crate) fn id_at(&self, i: usize) -> CityId { self.nodes[i].id }

    pub(crate) fn population_at(&self, i: usize) -> u64 { self.nodes[i].population }

    pub(crate) fn degree_at(&self, i: usize) -> usize { self.adjacency.degree(i) }

    pub(crate) fn edge_at(&self, a: usize, b: usize) -> Option<&GeoEdge> {
        let key = if a < b { (a as u32, b as u32) } else { (b as u32, a as u32) };
        self.edge_index.get(&key).map(|&e| &self.edges[e as usize])
    }

    /// `(neighbour index, edge)` pairs for a dense index.
    pub(crate) fn neighbors_at(&self, i: usize) -> impl Iterator<Item = (usize, &GeoEdge)> + '_ {
        let (dst, edge) = self.adjacency.neighbors(i);
        dst.iter().zip(edge.iter()).map(move |(&d, &e)| (d as usize, &self.edges[e as usize]))
    }

    pub(crate) fn ids_of(&self, path: &[usize]) -> Vec<CityId> {
        path.iter().map(|&i| self.id_at(i)).collect()
    }

    pub(crate) fn max_edge_weight(&self) -> Option<f64> {
        self.edges.iter().map(|e| e.weight).reduce(f64::max)
    }
}

#[allow(dead_code)]
fn _assert_send_sync() {
    fn assert_bound<T: Send + Sync>() {}
    assert_bound::<GeoGraph>();
}
