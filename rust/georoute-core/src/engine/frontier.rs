//! Frontier plumbing shared by the search engines.
//!
//! `Frontier` is a min-first heap with an insertion counter. `BiSearch`
//! holds the forward and backward half-searches of the bidirectional engines
//! (BFS, Dijkstra, fuzzy): each engine picks a side, splits the state into
//! (this side, other side), expands one node with its own ordering key and
//! meeting rule, and finally stitches the two parent chains together.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::reconstruct::reconstruct_path;

/// `f64` ordered by `total_cmp`, usable inside heap keys.
#[derive(Clone, Copy, Debug)]
pub struct OrdF64(pub f64);

impl PartialEq for OrdF64 {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}
impl Eq for OrdF64 {}
impl PartialOrd for OrdF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> Ordering { self.0.total_cmp(&other.0) }
}

/// Heap entries name the dense node index they refer to.
pub trait Keyed: Ord {
    fn node(&self) -> usize;
}

pub struct Frontier<K: Ord> {
    heap: BinaryHeap<Reverse<K>>,
    seq: u64,
}

impl<K: Ord> Default for Frontier<K> {
    fn default() -> Self { Self { heap: BinaryHeap::new(), seq: 0 } }
}

impl<K: Ord> Frontier<K> {
    pub fn new() -> Self { Self::default() }

    /// Pushes the key built from the next insertion sequence number.
    pub fn push_with(&mut self, make: impl FnOnce(u64) -> K) {
        let key = make(self.seq);
        self.seq += 1;
        self.heap.push(Reverse(key));
    }

    pub fn pop(&mut self) -> Option<K> { self.heap.pop().map(|Reverse(k)| k) }
    pub fn peek(&self) -> Option<&K> { self.heap.peek().map(|Reverse(k)| k) }
    pub fn len(&self) -> usize { self.heap.len() }
    pub fn is_empty(&self) -> bool { self.heap.is_empty() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Forward,
    Backward,
}

pub struct HalfSearch<K: Ord> {
    pub frontier: Frontier<K>,
    pub parent: Vec<Option<usize>>,
    pub visited: Vec<bool>,
    /// Distance label of this side (hops for BFS, weight for the others).
    pub dist: Vec<f64>,
}

impl<K: Ord> HalfSearch<K> {
    pub fn new(nodes: usize) -> Self {
        Self {
            frontier: Frontier::new(),
            parent: vec![None; nodes],
            visited: vec![false; nodes],
            dist: vec![f64::INFINITY; nodes],
        }
    }
}

impl<K: Keyed> HalfSearch<K> {
    /// Drops heap tops whose node is already settled on this side.
    pub fn skip_settled(&mut self) {
        while let Some(top) = self.frontier.peek() {
            if !self.visited[top.node()] { break; }
            self.frontier.pop();
        }
    }
}

pub struct BiSearch<K: Ord> {
    pub forward: HalfSearch<K>,
    pub backward: HalfSearch<K>,
}

impl<K: Ord> BiSearch<K> {
    pub fn new(nodes: usize) -> Self {
        Self { forward: HalfSearch::new(nodes), backward: HalfSearch::new(nodes) }
    }

    pub fn either_exhausted(&self) -> bool {
        self.forward.frontier.is_empty() || self.backward.frontier.is_empty()
    }

    /// Among the sides accepted by `active`, the one with the smaller
    /// frontier; ties go forward.
    pub fn pick_side(&self, active: impl Fn(&HalfSearch<K>) -> bool) -> Option<Side> {
        match (active(&self.forward), active(&self.backward)) {
            (true, true) => {
                if self.forward.frontier.len() <= self.backward.frontier.len() { Some(Side::Forward) } else { Some(Side::Backward) }
            }
            (true, false) => Some(Side::Forward),
            (false, true) => Some(Side::Backward),
            (false, false) => None,
        }
    }

    /// `(this side, other side)` borrowed together.
    pub fn split(&mut self, side: Side) -> (&mut HalfSearch<K>, &mut HalfSearch<K>) {
        match side {
            Side::Forward => (&mut self.forward, &mut self.backward),
            Side::Backward => (&mut self.backward, &mut self.forward),
        }
    }

    pub fn frontier_sizes(&self) -> (usize, usize) {
        (self.forward.frontier.len(), self.backward.frontier.len())
    }

    /// Start-to-end node sequence through `meeting`.
    pub fn path_through(&self, meeting: usize) -> Vec<usize> {
        reconstruct_path(meeting, &self.forward.parent, &self.backward.parent)
    }
}

/// Mutable access to a per-side pair stored as `[forward, backward]`.
pub fn pair_mut<T>(pair: &mut [T; 2], side: Side) -> (&mut T, &mut T) {
    let [f, b] = pair;
    match side {
        Side::Forward => (f, b),
        Side::Backward => (b, f),
    }
}
