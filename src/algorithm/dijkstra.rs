use crate::graph::{ArcIndex, Graph, Path, PathNode, VertexIndex};
use crate::heap::{FibonacciHeap, Handle};

/// Single-source shortest path restricted to usable vertices.
///
/// The engine owns the per-pass working storage as side tables keyed by
/// vertex id (tentative distances, predecessor arcs, heap handles) and the
/// scratch vertex heap reused across passes, so the graph itself carries
/// only topology during a pass.
#[derive(Default)]
pub struct Dijkstra {
    dist: Vec<f64>,
    path_arc: Vec<Option<ArcIndex>>,
    handles: Vec<Option<Handle>>,
    heap: FibonacciHeap<VertexIndex>,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest path from `src` to `dst` honouring vertex usability and
    /// current arc weights, or `None` if `dst` is unreachable. Both
    /// endpoints must be usable. `src == dst` yields the empty path.
    pub fn shortest_path<T>(
        &mut self,
        graph: &Graph<T>,
        src: VertexIndex,
        dst: VertexIndex,
    ) -> Option<Path> {
        let size = graph.vertex_count();
        debug_assert!(src.index() < size && dst.index() < size);
        assert!(graph.is_usable(src) && graph.is_usable(dst));

        self.heap.clear();
        self.dist.clear();
        self.dist.resize(size, f64::INFINITY);
        self.path_arc.clear();
        self.path_arc.resize(size, None);
        self.handles.clear();
        self.handles.resize(size, None);

        for vertex in graph.vertices() {
            if graph.is_usable(vertex) {
                self.handles[vertex.index()] = Some(self.heap.insert(vertex, f64::INFINITY));
            }
        }
        self.dist[src.index()] = 0.0;
        let src_handle = self.handles[src.index()].expect("src was just inserted");
        self.heap.decrease_priority(src_handle, 0.0);

        while let Some((u, u_dist)) = self.heap.pop_min() {
            self.handles[u.index()] = None;
            if u == dst || u_dist.is_infinite() {
                break;
            }
            for arc in graph.outgoings(u) {
                let v = graph.head(arc);
                if !graph.is_usable(v) {
                    continue;
                }
                // settled vertices have dropped their handle
                let handle = match self.handles[v.index()] {
                    Some(handle) => handle,
                    None => continue,
                };
                let w = u_dist + graph.weight(arc);
                if w < self.dist[v.index()] {
                    self.dist[v.index()] = w;
                    self.path_arc[v.index()] = Some(arc);
                    self.heap.decrease_priority(handle, w);
                }
            }
        }
        self.heap.clear();

        if self.dist[dst.index()].is_infinite() {
            return None;
        }
        Some(self.backtrace(graph, dst))
    }

    /// Walks predecessor arcs from `dst` back to the source and reverses.
    fn backtrace<T>(&self, graph: &Graph<T>, dst: VertexIndex) -> Path {
        let mut nodes = vec![];
        let mut vertex = dst;
        while let Some(arc) = self.path_arc[vertex.index()] {
            nodes.push(PathNode { arc, weight: self.dist[vertex.index()] });
            vertex = graph.tail(arc);
        }
        nodes.reverse();
        Path::from_nodes(nodes)
    }
}
