use crate::error::SearchError;
use crate::graph::GeoGraph;
use crate::models::CityId;

/// Walks a predecessor chain from `node` back to its origin and returns it
/// origin-first. The walk is bounded by the chain length so a corrupted
/// (cyclic) predecessor table cannot loop forever.
pub fn trace_back(node: usize, parent: &[Option<usize>]) -> Vec<usize> {
    let mut path = vec![node];
    let mut cur = parent.get(node).copied().flatten();
    while let Some(p) = cur {
        if path.len() > parent.len() { break; }
        path.push(p);
        cur = parent.get(p).copied().flatten();
    }
    path.reverse();
    path
}

/// Stitches two half-paths at `meeting`: the chain back to the start
/// (reversed) followed by the chain forward to the end.
pub fn reconstruct_path(meeting: usize, from_start: &[Option<usize>], from_end: &[Option<usize>]) -> Vec<usize> {
    let mut path = trace_back(meeting, from_start);
    let mut cur = from_end.get(meeting).copied().flatten();
    let mut steps = 0;
    while let Some(n) = cur {
        if steps > from_end.len() { break; }
        path.push(n);
        cur = from_end.get(n).copied().flatten();
        steps += 1;
    }
    path
}

/// Sum of edge weights along a path of city ids. A step with no edge means
/// the path and the graph disagree.
pub fn path_distance(graph: &GeoGraph, path: &[CityId]) -> Result<f64, SearchError> {
    path.windows(2).try_fold(0.0, |acc, w| {
        graph
            .edge(w[0], w[1])
            .map(|e| acc + e.weight)
            .ok_or(SearchError::MissingEdge { from: w[0], to: w[1] })
    })
}

pub(crate) fn path_distance_at(graph: &GeoGraph, path: &[usize]) -> Result<f64, SearchError> {
    path.windows(2).try_fold(0.0, |acc, w| {
        graph
            .edge_at(w[0], w[1])
            .map(|e| acc + e.weight)
            .ok_or(SearchError::MissingEdge { from: graph.id_at(w[0]), to: graph.id_at(w[1]) })
    })
}
