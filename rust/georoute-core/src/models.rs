use serde::{Deserialize, Deserializer, Serialize};

pub type CityId = u32;

/// A city record as supplied by the data-loading collaborator.
///
/// Coordinates are optional on input so that a record missing either one is
/// rejected by the graph builder instead of being silently placed at 0°.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub population: u64,
}

impl City {
    pub fn new(id: CityId, name: impl Into<String>, state: impl Into<String>, latitude: f64, longitude: f64, population: u64) -> Self {
        Self {
            id,
            name: name.into(),
            state: state.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            population,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoPathReason {
    UnknownEndpoint,
    Unreachable,
    Timeout,
    CostBound,
}

/// Diagnostics reported by the bidirectional BFS.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BfsMetrics {
    pub visited: usize,
    pub frontier_max: usize,
    pub explored_pct: f64,
    pub iterations: u64,
    pub timeout: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Option<Vec<CityId>>,
    /// `f64::INFINITY` when no path was found (serialised as `null`).
    #[serde(deserialize_with = "deserialize_distance")]
    pub total_distance: f64,
    pub elapsed_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BfsMetrics>,
    pub expanded: u64,
    pub reason: Option<NoPathReason>,
}

impl PathResult {
    pub fn found(path: Vec<CityId>, total_distance: f64, elapsed_ms: f64, expanded: u64) -> Self {
        Self { path: Some(path), total_distance, elapsed_ms, certainty: None, metrics: None, expanded, reason: None }
    }

    pub fn no_path(reason: NoPathReason, elapsed_ms: f64, expanded: u64) -> Self {
        Self { path: None, total_distance: f64::INFINITY, elapsed_ms, certainty: None, metrics: None, expanded, reason: Some(reason) }
    }

    pub fn with_certainty(mut self, certainty: f64) -> Self {
        self.certainty = Some(certainty);
        self
    }

    pub fn with_metrics(mut self, metrics: BfsMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of edges on the path, if any.
    pub fn hops(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }
}

/// Reads a route weight written by `serde_json`, where `null` stands for
/// `f64::INFINITY`.
pub(crate) fn deserialize_distance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}
