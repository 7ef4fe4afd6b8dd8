/// Compressed sparse row adjacency over dense node indices.
///
/// Every undirected edge is stored twice (once per endpoint) and carries the
/// index of the edge record it came from. Rows are sorted by neighbour index.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    pub nodes: usize,
    pub offsets: Vec<usize>,
    pub dst: Vec<u32>,
    pub edge: Vec<u32>,
}

impl Adjacency {
    pub fn build(nodes: usize, pairs: &[(u32, u32)]) -> Self {
        let mut counts = vec![0usize; nodes];
        for &(a, b) in pairs {
            counts[a as usize] += 1;
            counts[b as usize] += 1;
        }
        let mut offsets = vec![0usize; nodes + 1];
        for i in 0..nodes { offsets[i + 1] = offsets[i] + counts[i]; }
        let mut cur = offsets[..nodes].to_vec();
        let mut dst = vec![0u32; pairs.len() * 2];
        let mut edge = vec![0u32; pairs.len() * 2];
        for (ei, &(a, b)) in pairs.iter().enumerate() {
            for (from, to) in [(a, b), (b, a)] {
                let p = cur[from as usize];
                dst[p] = to;
                edge[p] = ei as u32;
                cur[from as usize] += 1;
            }
        }
        for u in 0..nodes {
            let (s, e) = (offsets[u], offsets[u + 1]);
            let mut row: Vec<(u32, u32)> = dst[s..e].iter().copied().zip(edge[s..e].iter().copied()).collect();
            row.sort_unstable();
            for (k, (d, ei)) in row.into_iter().enumerate() {
                dst[s + k] = d;
                edge[s + k] = ei;
            }
        }
        Adjacency { nodes, offsets, dst, edge }
    }

    pub fn neighbors(&self, u: usize) -> (&[u32], &[u32]) {
        let s = self.offsets[u];
        let e = self.offsets[u + 1];
        (&self.dst[s..e], &self.edge[s..e])
    }

    pub fn degree(&self, u: usize) -> usize {
        self.offsets[u + 1] - self.offsets[u]
    }
}
