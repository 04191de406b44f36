use std::iter;

use crate::utils::error::{Error, Result};

use super::path::Path;

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct VertexIndex(usize);

impl VertexIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for VertexIndex {
    fn from(ix: usize) -> Self {
        VertexIndex(ix)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ArcIndex(usize);

impl ArcIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ArcIndex {
    fn from(ix: usize) -> Self {
        ArcIndex(ix)
    }
}

#[derive(Clone, Debug)]
struct Vertex {
    first_arc: Option<ArcIndex>,
    usable: bool,
}

#[derive(Clone, Debug)]
struct Arc<T> {
    ends: (VertexIndex, VertexIndex),
    weight: f64,
    payload: T,
    next: Option<ArcIndex>,
}

/// Directed weighted graph with dense vertex ids and per-vertex outgoing
/// arc lists. Arc weights are mutable through the soft-removal mechanism
/// used by the KSP driver; `+∞` is the removal sentinel, Dijkstra never
/// improves a distance through it.
#[derive(Clone, Debug)]
pub struct Graph<T = ()> {
    vertices: Vec<Vertex>,
    arcs: Vec<Arc<T>>,
    pub(crate) removals: Vec<(ArcIndex, f64)>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Graph { vertices: vec![], arcs: vec![], removals: vec![] }
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_size(size: usize) -> Self {
        let mut graph = Self::new();
        graph.set_size(size);
        graph
    }
    /// Destroys any existing vertices and arcs and allocates `size` fresh
    /// vertices with ids `0..size`.
    pub fn set_size(&mut self, size: usize) {
        self.vertices.clear();
        self.vertices
            .extend(iter::repeat_with(|| Vertex { first_arc: None, usable: true }).take(size));
        self.arcs.clear();
        self.removals.clear();
    }
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }
    pub fn vertices(&self) -> impl Iterator<Item = VertexIndex> {
        (0..self.vertices.len()).map(VertexIndex::from)
    }

    /// Prepends an arc `s -> t` to `s`'s outgoing list. Parallel arcs are
    /// permitted; each is an independent arc.
    pub fn add_arc(&mut self, s: usize, t: usize, weight: f64, payload: T) -> Result<ArcIndex> {
        let size = self.vertices.len();
        if s >= size {
            return Err(Error::VertexOutOfRange(s, size));
        }
        if t >= size {
            return Err(Error::VertexOutOfRange(t, size));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight(s, t, weight));
        }
        let arc = ArcIndex(self.arcs.len());
        self.arcs.push(Arc {
            ends: (VertexIndex(s), VertexIndex(t)),
            weight,
            payload,
            next: self.vertices[s].first_arc,
        });
        self.vertices[s].first_arc = Some(arc);
        Ok(arc)
    }

    pub fn endpoints(&self, arc: ArcIndex) -> (VertexIndex, VertexIndex) {
        self.arcs[arc.index()].ends
    }
    pub fn tail(&self, arc: ArcIndex) -> VertexIndex {
        self.arcs[arc.index()].ends.0
    }
    pub fn head(&self, arc: ArcIndex) -> VertexIndex {
        self.arcs[arc.index()].ends.1
    }
    pub fn weight(&self, arc: ArcIndex) -> f64 {
        self.arcs[arc.index()].weight
    }
    pub fn payload(&self, arc: ArcIndex) -> &T {
        &self.arcs[arc.index()].payload
    }

    /// Outgoing arcs of `vertex` in enumeration order (most recently added
    /// first). The order is stable as long as no arc is added.
    pub fn outgoings(&self, vertex: VertexIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        iter::successors(self.vertices[vertex.index()].first_arc, move |&arc| {
            self.arcs[arc.index()].next
        })
    }

    pub fn is_usable(&self, vertex: VertexIndex) -> bool {
        self.vertices[vertex.index()].usable
    }
    pub(crate) fn set_usable(&mut self, vertex: VertexIndex, usable: bool) {
        self.vertices[vertex.index()].usable = usable;
    }

    /// Flips the usable flag on every vertex of `path` except the last
    /// node's head, which is the spur vertex and must stay usable.
    pub(crate) fn enable_nodes(&mut self, path: &Path, usable: bool) {
        let count = path.len();
        for (i, node) in path.nodes().iter().enumerate() {
            let (tail, head) = self.endpoints(node.arc);
            self.set_usable(tail, usable);
            if i + 1 < count {
                self.set_usable(head, usable);
            }
        }
    }

    /// Soft removal: records the arc's weight on the removal list and sets
    /// it to the sentinel. Removing an arc that is already removed in the
    /// current pass is a no-op, so restoration cannot record the sentinel
    /// as an original weight.
    pub(crate) fn remove_arc(&mut self, arc: ArcIndex) {
        let weight = self.arcs[arc.index()].weight;
        if weight.is_infinite() {
            return;
        }
        self.removals.push((arc, weight));
        self.arcs[arc.index()].weight = f64::INFINITY;
    }

    /// Restores every soft-removed arc to its recorded weight.
    pub(crate) fn restore_removals(&mut self) {
        for (arc, weight) in self.removals.drain(..) {
            self.arcs[arc.index()].weight = weight;
        }
    }

    /// Vertex ids visited by `path`, starting at its first tail. Empty for
    /// the empty path.
    pub fn vertex_sequence(&self, path: &Path) -> Vec<usize> {
        let mut sequence = vec![];
        for (i, node) in path.nodes().iter().enumerate() {
            let (tail, head) = self.endpoints(node.arc);
            if i == 0 {
                sequence.push(tail.index());
            }
            sequence.push(head.index());
        }
        sequence
    }

    /// Renders `path` as `"0 -> 1(5) -> 2(8)"`, each head annotated with
    /// the cumulative weight through its arc.
    pub fn format_path(&self, path: &Path) -> String {
        let mut out = String::new();
        for (i, node) in path.nodes().iter().enumerate() {
            let (tail, head) = self.endpoints(node.arc);
            if i == 0 {
                out.push_str(&format!("{} -> {}({})", tail.index(), head.index(), node.weight));
            } else {
                out.push_str(&format!(" -> {}({})", head.index(), node.weight));
            }
        }
        out
    }
}
