//! Physical qubit connectivity.
//!
//! Describes which qubit pairs of a device can interact directly, plus
//! calibration blacklists of qubits and edges that must not be used.
//! The routing pass is the only consumer of [`Connectivity::shortest_path`];
//! the terminal validation passes use the exclusion queries.

use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use alsvin_ir::QubitId;

use crate::error::{TranspileError, TranspileResult};

/// The adjacency structure of a device.
///
/// Vertices are the qubit indices `[1, qubit_count]`. Excluded qubits and
/// edges stay in the graph but are invisible to every query, so a path
/// never runs through them.
#[derive(Debug, Clone)]
pub struct Connectivity {
    qubit_count: u32,
    graph: UnGraph<u32, ()>,
    excluded_qubits: FxHashSet<QubitId>,
    excluded_edges: FxHashSet<(QubitId, QubitId)>,
}

impl Connectivity {
    /// Build a connectivity from an explicit edge list.
    pub fn custom(qubit_count: u32, edges: &[(u32, u32)]) -> Self {
        let mut graph = UnGraph::new_undirected();
        for q in 1..=qubit_count {
            graph.add_node(q);
        }
        let mut connectivity = Self {
            qubit_count,
            graph,
            excluded_qubits: FxHashSet::default(),
            excluded_edges: FxHashSet::default(),
        };
        for &(a, b) in edges {
            connectivity.add_edge(QubitId(a), QubitId(b));
        }
        connectivity
    }

    /// Linear chain: qubit `i` adjacent to `i + 1`.
    pub fn line(qubit_count: u32) -> Self {
        let edges: Vec<(u32, u32)> = (1..qubit_count).map(|q| (q, q + 1)).collect();
        Self::custom(qubit_count, &edges)
    }

    /// Rectangular lattice of `rows x cols` qubits, row-major indexing,
    /// with nearest-neighbor edges.
    pub fn lattice(rows: u32, cols: u32) -> Self {
        let mut edges = vec![];
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c + 1;
                if c + 1 < cols {
                    edges.push((q, q + 1));
                }
                if r + 1 < rows {
                    edges.push((q, q + cols));
                }
            }
        }
        Self::custom(rows * cols, &edges)
    }

    /// Every qubit adjacent to every other.
    pub fn all_to_all(qubit_count: u32) -> Self {
        let mut edges = vec![];
        for a in 1..=qubit_count {
            for b in (a + 1)..=qubit_count {
                edges.push((a, b));
            }
        }
        Self::custom(qubit_count, &edges)
    }

    /// Mark qubits as unusable.
    #[must_use]
    pub fn with_excluded_qubits(mut self, qubits: impl IntoIterator<Item = u32>) -> Self {
        self.excluded_qubits
            .extend(qubits.into_iter().map(QubitId));
        self
    }

    /// Mark edges as unusable.
    #[must_use]
    pub fn with_excluded_edges(mut self, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.excluded_edges.extend(
            edges
                .into_iter()
                .map(|(a, b)| ordered(QubitId(a), QubitId(b))),
        );
        self
    }

    fn add_edge(&mut self, a: QubitId, b: QubitId) {
        let (na, nb) = (self.node(a), self.node(b));
        if !self.graph.contains_edge(na, nb) {
            self.graph.add_edge(na, nb, ());
        }
    }

    fn node(&self, qubit: QubitId) -> NodeIndex {
        NodeIndex::new(qubit.offset())
    }

    /// Number of qubits in the device.
    #[inline]
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Check a qubit against the declared range.
    #[inline]
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit.0 >= 1 && qubit.0 <= self.qubit_count
    }

    /// Check the exclusion blacklist for a qubit.
    #[inline]
    pub fn is_excluded_qubit(&self, qubit: QubitId) -> bool {
        self.excluded_qubits.contains(&qubit)
    }

    /// Check the exclusion blacklist for an edge.
    #[inline]
    pub fn is_excluded_edge(&self, a: QubitId, b: QubitId) -> bool {
        self.excluded_edges.contains(&ordered(a, b))
    }

    /// Usable neighbors of a qubit, ascending, exclusions filtered out.
    pub fn neighbors(&self, qubit: QubitId) -> Vec<QubitId> {
        if !self.contains(qubit) || self.is_excluded_qubit(qubit) {
            return vec![];
        }
        let mut out: Vec<QubitId> = self
            .graph
            .neighbors(self.node(qubit))
            .map(|n| QubitId(self.graph[n]))
            .filter(|&n| !self.is_excluded_qubit(n) && !self.is_excluded_edge(qubit, n))
            .collect();
        // petgraph yields neighbors in reverse insertion order; sort so
        // path queries are deterministic across identical builds
        out.sort_unstable();
        out
    }

    /// Check direct adjacency; excluded resources are never adjacent.
    pub fn are_adjacent(&self, a: QubitId, b: QubitId) -> bool {
        self.contains(a)
            && self.contains(b)
            && !self.is_excluded_qubit(a)
            && !self.is_excluded_qubit(b)
            && !self.is_excluded_edge(a, b)
            && self.graph.contains_edge(self.node(a), self.node(b))
    }

    /// Shortest path between two qubits, endpoints included.
    ///
    /// Breadth-first with ascending neighbor order, so the result is
    /// deterministic. Fails with [`TranspileError::NoPath`] when the
    /// endpoints are disconnected or every route crosses an exclusion.
    pub fn shortest_path(&self, from: QubitId, to: QubitId) -> TranspileResult<Vec<QubitId>> {
        let no_path = || TranspileError::NoPath { from, to };
        if !self.contains(from)
            || !self.contains(to)
            || self.is_excluded_qubit(from)
            || self.is_excluded_qubit(to)
        {
            return Err(no_path());
        }
        if from == to {
            return Ok(vec![from]);
        }

        let mut predecessor: FxHashMap<QubitId, QubitId> = FxHashMap::default();
        let mut queue = VecDeque::new();
        queue.push_back(from);
        predecessor.insert(from, from);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if predecessor.contains_key(&next) {
                    continue;
                }
                predecessor.insert(next, current);
                if next == to {
                    // Walk predecessors back to the start
                    let mut path = vec![to];
                    let mut cursor = to;
                    while cursor != from {
                        cursor = predecessor[&cursor];
                        path.push(cursor);
                    }
                    path.reverse();
                    return Ok(path);
                }
                queue.push_back(next);
            }
        }

        Err(no_path())
    }
}

fn ordered(a: QubitId, b: QubitId) -> (QubitId, QubitId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_adjacency() {
        let line = Connectivity::line(6);
        assert_eq!(line.qubit_count(), 6);
        assert!(line.are_adjacent(QubitId(1), QubitId(2)));
        assert!(line.are_adjacent(QubitId(2), QubitId(1)));
        assert!(!line.are_adjacent(QubitId(1), QubitId(3)));
        assert!(!line.are_adjacent(QubitId(6), QubitId(7)));
    }

    #[test]
    fn test_lattice_adjacency() {
        // 2x3 grid:
        //   1 - 2 - 3
        //   |   |   |
        //   4 - 5 - 6
        let lattice = Connectivity::lattice(2, 3);
        assert!(lattice.are_adjacent(QubitId(1), QubitId(2)));
        assert!(lattice.are_adjacent(QubitId(2), QubitId(5)));
        assert!(!lattice.are_adjacent(QubitId(3), QubitId(4)));
        assert!(!lattice.are_adjacent(QubitId(1), QubitId(5)));
    }

    #[test]
    fn test_all_to_all() {
        let full = Connectivity::all_to_all(4);
        for a in 1..=4u32 {
            for b in 1..=4u32 {
                if a != b {
                    assert!(full.are_adjacent(QubitId(a), QubitId(b)));
                }
            }
        }
    }

    #[test]
    fn test_shortest_path_on_line() {
        let line = Connectivity::line(6);
        let path = line.shortest_path(QubitId(1), QubitId(4)).unwrap();
        assert_eq!(path, vec![QubitId(1), QubitId(2), QubitId(3), QubitId(4)]);

        let trivial = line.shortest_path(QubitId(3), QubitId(3)).unwrap();
        assert_eq!(trivial, vec![QubitId(3)]);
    }

    #[test]
    fn test_shortest_path_deterministic_on_lattice() {
        let lattice = Connectivity::lattice(3, 3);
        // Two equal-length routes exist from 1 to 5; ascending neighbor
        // order must always pick the one through 2
        let path = lattice.shortest_path(QubitId(1), QubitId(5)).unwrap();
        assert_eq!(path, vec![QubitId(1), QubitId(2), QubitId(5)]);
    }

    #[test]
    fn test_excluded_qubit_blocks_path() {
        let line = Connectivity::line(5).with_excluded_qubits([3]);
        assert!(!line.are_adjacent(QubitId(2), QubitId(3)));
        let err = line.shortest_path(QubitId(1), QubitId(5)).unwrap_err();
        assert!(matches!(err, TranspileError::NoPath { .. }));
    }

    #[test]
    fn test_excluded_edge_reroutes() {
        // Ring of 4: 1-2-3-4-1; excluding edge 1-2 leaves the long way
        let ring = Connectivity::custom(4, &[(1, 2), (2, 3), (3, 4), (4, 1)])
            .with_excluded_edges([(1, 2)]);
        assert!(!ring.are_adjacent(QubitId(1), QubitId(2)));
        let path = ring.shortest_path(QubitId(1), QubitId(2)).unwrap();
        assert_eq!(path, vec![QubitId(1), QubitId(4), QubitId(3), QubitId(2)]);
    }

    #[test]
    fn test_neighbors_sorted_and_filtered() {
        let lattice = Connectivity::lattice(3, 3).with_excluded_qubits([6]);
        assert_eq!(
            lattice.neighbors(QubitId(5)),
            vec![QubitId(2), QubitId(4), QubitId(8)]
        );
    }
}
