use thiserror::Error;

use crate::models::CityId;

/// Malformed construction input. Always a caller error, never a search outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("at least one of radius (r) or max distance (d) must be given")]
    MissingConstraint,
    #[error("city {id} has no usable latitude/longitude")]
    MissingCoordinates { id: CityId },
    #[error("city id {id} appears more than once")]
    DuplicateCity { id: CityId },
    #[error("constraint {name} must be a finite non-negative number, got {value}")]
    InvalidConstraint { name: &'static str, value: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// A path handed to `path_distance` steps between two cities with no edge.
    #[error("no edge between {from} and {to}; path and graph are out of sync")]
    MissingEdge { from: CityId, to: CityId },
    #[error("cost model alters the optimised objective; use AStarMode::BestEffort to accept a non-optimal route")]
    InadmissibleCost,
}
