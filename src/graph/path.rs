use itertools::Itertools;

use super::graph::ArcIndex;

/// One step of a path: the arc taken and the cumulative weight from the
/// source through that arc.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathNode {
    pub arc: ArcIndex,
    pub weight: f64,
}

/// Ordered sequence of arcs where each arc's head is the next arc's tail.
/// The path's total weight is the cumulative weight of its last node, or
/// zero for the empty path. Candidate paths are ranked by storing whole
/// `Path` values in a `FibonacciHeap<Path>` keyed by `weight()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    nodes: Vec<PathNode>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }
    pub(crate) fn from_nodes(nodes: Vec<PathNode>) -> Self {
        let path = Path { nodes };
        path.assert_monotone();
        path
    }
    pub fn weight(&self) -> f64 {
        self.nodes.last().map_or(0.0, |node| node.weight)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }
    pub fn arcs(&self) -> impl Iterator<Item = ArcIndex> + '_ {
        self.nodes.iter().map(|node| node.arc)
    }

    pub fn push_back(&mut self, node: PathNode) {
        debug_assert!(self.weight() <= node.weight);
        self.nodes.push(node);
    }

    /// Deep copy of the prefix strictly before position `end`, cumulative
    /// weights preserved as-is.
    pub fn root_path(&self, end: usize) -> Path {
        Path { nodes: self.nodes[..end].to_vec() }
    }

    /// If this path extends `prefix` arc-for-arc, the node immediately
    /// after the prefix; `None` when the paths diverge or this path is no
    /// longer than the prefix.
    pub fn next_node(&self, prefix: &Path) -> Option<&PathNode> {
        if self.nodes.len() < prefix.nodes.len() {
            return None;
        }
        let shared = self
            .nodes
            .iter()
            .zip(&prefix.nodes)
            .all(|(mine, theirs)| mine.arc == theirs.arc);
        match shared {
            true => self.nodes.get(prefix.nodes.len()),
            false => None,
        }
    }

    /// Concatenates `other` after this path, re-adding this path's terminal
    /// cumulative weight to each incoming node so totals stay correct.
    /// Taking `other` by value consumes it.
    pub fn merge(&mut self, other: Path) {
        let offset = self.weight();
        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.weight += offset;
            node
        }));
        self.assert_monotone();
    }

    fn assert_monotone(&self) {
        debug_assert!(
            self.nodes
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.weight <= b.weight),
            "cumulative weights must be non-decreasing",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(arc: usize, weight: f64) -> PathNode {
        PathNode { arc: arc.into(), weight }
    }

    fn path_of(nodes: &[(usize, f64)]) -> Path {
        Path { nodes: nodes.iter().map(|&(arc, weight)| node(arc, weight)).collect() }
    }

    #[test]
    fn it_weighs_the_empty_path_as_zero() {
        let path = Path::new();
        assert_eq!(path.weight(), 0.0);
        assert!(path.is_empty());
    }

    #[test]
    fn it_copies_root_prefixes() {
        let path = path_of(&[(0, 1.0), (1, 3.0), (2, 6.0)]);
        let root = path.root_path(2);
        assert_eq!(root.nodes(), &[node(0, 1.0), node(1, 3.0)]);
        assert!(path.root_path(0).is_empty());
    }

    #[test]
    fn it_finds_the_node_after_a_shared_prefix() {
        let path = path_of(&[(0, 1.0), (1, 3.0), (2, 6.0)]);

        let shared = path_of(&[(0, 1.0), (1, 3.0)]);
        assert_eq!(path.next_node(&shared), Some(&node(2, 6.0)));

        let diverged = path_of(&[(0, 1.0), (9, 3.0)]);
        assert_eq!(path.next_node(&diverged), None);

        // a path is not an extension of itself
        assert_eq!(path.next_node(&path.clone()), None);

        let longer = path_of(&[(0, 1.0), (1, 3.0), (2, 6.0), (3, 7.0)]);
        assert_eq!(path.next_node(&longer), None);

        // every path extends the empty prefix
        assert_eq!(path.next_node(&Path::new()), Some(&node(0, 1.0)));
    }

    #[test]
    fn it_merges_with_weight_offsets() {
        let mut path = path_of(&[(0, 2.0), (1, 5.0)]);
        let spur = path_of(&[(7, 1.0), (8, 4.0)]);
        path.merge(spur);
        assert_eq!(path.nodes(), &[node(0, 2.0), node(1, 5.0), node(7, 6.0), node(8, 9.0)]);
        assert_eq!(path.weight(), 9.0);
    }

    #[test]
    fn it_adopts_the_other_list_when_empty() {
        let mut path = Path::new();
        path.merge(path_of(&[(3, 2.0), (4, 5.0)]));
        assert_eq!(path.nodes(), &[node(3, 2.0), node(4, 5.0)]);
    }
}
