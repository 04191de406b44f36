use hashbrown::HashSet;

use crate::graph::{ArcIndex, Graph, Path, VertexIndex};
use crate::heap::FibonacciHeap;

use super::dijkstra::Dijkstra;

/// Yen's K shortest loopless paths.
///
/// Each accepted path is re-examined spur point by spur point: the interior
/// of the root prefix is made unusable, the arcs that would reproduce an
/// already-found path are soft-removed, and a spur Dijkstra from the spur
/// vertex supplies a candidate. Candidates are ranked in a Fibonacci heap
/// keyed by total weight; arc-sequence signatures keep rediscovered
/// candidates from ever entering the heap twice.
#[derive(Default)]
pub struct Yens {
    dijkstra: Dijkstra,
}

impl Yens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends up to `k` loopless paths from `src` to `dst` to `results`,
    /// in non-decreasing total weight, and returns the appended count.
    /// Arc weights and vertex usability are fully restored before
    /// returning.
    pub fn find_shortest_paths<T>(
        &mut self,
        graph: &mut Graph<T>,
        src: VertexIndex,
        dst: VertexIndex,
        k: usize,
        results: &mut Vec<Path>,
    ) -> usize {
        let size = graph.vertex_count();
        debug_assert!(src.index() < size && dst.index() < size);
        if k == 0 {
            return 0;
        }

        let first = match self.dijkstra.shortest_path(graph, src, dst) {
            Some(path) => path,
            None => return 0,
        };
        let start = results.len();
        let mut candidates: FibonacciHeap<Path> = FibonacciHeap::new();
        let mut seen: HashSet<Vec<ArcIndex>> = HashSet::new();
        seen.insert(first.arcs().collect());
        results.push(first);

        while results.len() - start < k {
            let prev = results.last().expect("results holds the first path");

            for end in 0..prev.len() {
                let spur_arc = prev.nodes()[end].arc;
                let spur = graph.tail(spur_arc);
                let root = prev.root_path(end);

                // forbid every vertex strictly before the spur vertex, and
                // every arc that would retrace a found path past this root
                graph.enable_nodes(&root, false);
                graph.remove_arc(spur_arc);
                for found in &results[start..] {
                    if let Some(next) = found.next_node(&root) {
                        graph.remove_arc(next.arc);
                    }
                }

                let spur_path = self.dijkstra.shortest_path(graph, spur, dst);
                graph.enable_nodes(&root, true);

                if let Some(spur_path) = spur_path {
                    let mut candidate = root;
                    candidate.merge(spur_path);
                    if seen.insert(candidate.arcs().collect()) {
                        let weight = candidate.weight();
                        candidates.insert(candidate, weight);
                    }
                }
                graph.restore_removals();
            }

            match candidates.pop_min() {
                Some((path, _)) => results.push(path),
                None => break,
            }
        }
        results.len() - start
    }
}
