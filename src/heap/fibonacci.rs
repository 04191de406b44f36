use ordered_float::OrderedFloat;

/// Upper bound on the degree of any root. Degree grows logarithmically with
/// heap size, so 64 covers any heap that fits in memory; crossing it means
/// the structure is corrupt.
pub const MAX_DEGREE: usize = 64;

/// Stable reference to a node living in a [`FibonacciHeap`]. Handles are
/// invalidated by `pop_min` (for the popped node) and by `clear`; slots are
/// never recycled in between, so a stale handle fails the occupancy
/// assertion instead of aliasing another node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Handle(usize);

impl Handle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    item: T,
    priority: OrderedFloat<f64>,
    // circular doubly-linked sibling ring
    next: usize,
    prev: usize,
    parent: Option<usize>,
    child: Option<usize>,
    degree: usize,
    marked: bool,
}

/// Mergeable min-priority queue with decrease-key, keyed by `f64` priority.
///
/// Nodes are owned by an internal arena and linked by index, so the sibling
/// rings and parent/child pointers of the classic structure never alias.
/// The payload type is arbitrary: the Dijkstra engine stores vertex indices,
/// the KSP driver stores whole candidate paths.
#[derive(Debug)]
pub struct FibonacciHeap<T> {
    nodes: Vec<Option<Node<T>>>,
    min_root: Option<usize>,
    len: usize,
}

impl<T> Default for FibonacciHeap<T> {
    fn default() -> Self {
        FibonacciHeap { nodes: vec![], min_root: None, len: 0 }
    }
}

impl<T> FibonacciHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.min_root.is_none()
    }
    pub fn len(&self) -> usize {
        self.len
    }
    /// Minimum item and its priority, without removing.
    pub fn peek(&self) -> Option<(&T, f64)> {
        let min = self.min_root?;
        let node = self.node(min);
        Some((&node.item, node.priority.into_inner()))
    }
    pub fn priority(&self, handle: Handle) -> f64 {
        self.node(handle.0).priority.into_inner()
    }
    /// Drops every node, payloads included, and resets the arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min_root = None;
        self.len = 0;
    }

    /// Inserts `item` as a singleton root and returns a handle for later
    /// `decrease_priority` calls.
    pub fn insert(&mut self, item: T, priority: f64) -> Handle {
        let priority = OrderedFloat(priority);
        let ix = self.nodes.len();
        self.nodes.push(Some(Node {
            item,
            priority,
            next: ix,
            prev: ix,
            parent: None,
            child: None,
            degree: 0,
            marked: false,
        }));
        match self.min_root {
            None => self.min_root = Some(ix),
            Some(min) => {
                self.insert_after(min, ix);
                if priority < self.node(min).priority {
                    self.min_root = Some(ix);
                }
            }
        }
        self.len += 1;
        Handle(ix)
    }

    /// Extracts the minimum item. Its children join the root ring, then the
    /// ring is consolidated so every remaining root has a distinct degree.
    pub fn pop_min(&mut self) -> Option<(T, f64)> {
        let min = self.min_root?;

        if self.node(min).next == min {
            self.min_root = None;
        } else {
            self.min_root = Some(self.node(min).next);
            self.unlink(min);
        }

        if let Some(child) = self.node(min).child {
            let mut node = child;
            loop {
                self.node_mut(node).parent = None;
                node = self.node(node).next;
                if node == child {
                    break;
                }
            }
            match self.min_root {
                None => self.min_root = Some(child),
                Some(root) => self.splice(root, child),
            }
            self.node_mut(min).child = None;
        }

        if self.min_root.is_some() {
            self.consolidate();
        }

        self.len -= 1;
        let node = self.nodes[min].take().expect("heap slot vacated twice");
        Some((node.item, node.priority.into_inner()))
    }

    /// Lowers the priority of a stored node. `priority` must be strictly
    /// smaller than the node's current priority.
    pub fn decrease_priority(&mut self, handle: Handle, priority: f64) {
        let ix = handle.0;
        let priority = OrderedFloat(priority);
        assert!(
            priority < self.node(ix).priority,
            "decrease_priority to a non-smaller priority",
        );
        self.node_mut(ix).priority = priority;

        if let Some(parent) = self.node(ix).parent {
            if priority < self.node(parent).priority {
                self.cut(ix);
            }
        }

        let min = self.min_root.expect("decrease_priority on an empty heap");
        if ix != min && priority < self.node(min).priority {
            self.min_root = Some(ix);
        }
    }

    fn node(&self, ix: usize) -> &Node<T> {
        self.nodes[ix].as_ref().expect("stale heap handle")
    }
    fn node_mut(&mut self, ix: usize) -> &mut Node<T> {
        self.nodes[ix].as_mut().expect("stale heap handle")
    }

    /// Splices node `ix` into the ring right after `at`.
    fn insert_after(&mut self, at: usize, ix: usize) {
        let after = self.node(at).next;
        self.node_mut(ix).prev = at;
        self.node_mut(ix).next = after;
        self.node_mut(at).next = ix;
        self.node_mut(after).prev = ix;
    }

    /// Interleaves two circular rings into one.
    fn splice(&mut self, head: usize, tail: usize) {
        let head_next = self.node(head).next;
        let tail_prev = self.node(tail).prev;
        self.node_mut(head).next = tail;
        self.node_mut(tail).prev = head;
        self.node_mut(head_next).prev = tail_prev;
        self.node_mut(tail_prev).next = head_next;
    }

    /// Bridges the neighbours of `ix`, removing it from its ring. The node's
    /// own links are left stale; callers overwrite them.
    fn unlink(&mut self, ix: usize) {
        debug_assert!(self.node(ix).next != ix);
        let next = self.node(ix).next;
        let prev = self.node(ix).prev;
        self.node_mut(next).prev = prev;
        self.node_mut(prev).next = next;
    }

    fn push_child(&mut self, parent: usize, child: usize) {
        match self.node(parent).child {
            None => {
                self.node_mut(child).next = child;
                self.node_mut(child).prev = child;
                self.node_mut(parent).child = Some(child);
            }
            Some(first) => self.insert_after(first, child),
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).degree += 1;
    }

    fn root_push(&mut self, map: &mut [Option<usize>; MAX_DEGREE], root: usize) {
        debug_assert!(map[self.node(root).degree].is_none());
        match self.min_root {
            None => {
                self.node_mut(root).next = root;
                self.node_mut(root).prev = root;
                self.min_root = Some(root);
            }
            Some(min) => {
                self.insert_after(min, root);
                if self.node(root).priority < self.node(min).priority {
                    self.min_root = Some(root);
                }
            }
        }
        map[self.node(root).degree] = Some(root);
    }

    fn root_remove(&mut self, map: &mut [Option<usize>; MAX_DEGREE], root: usize) {
        debug_assert_eq!(map[self.node(root).degree], Some(root));
        if self.min_root == Some(root) {
            if self.node(root).next == root {
                self.min_root = None;
            } else {
                self.min_root = Some(self.node(root).next);
                self.unlink(root);
            }
        } else {
            self.unlink(root);
        }
        map[self.node(root).degree] = None;
    }

    /// Walks every root, merging pairs of equal degree until all degrees are
    /// distinct, and reselects the minimum root. The lower-priority root of
    /// each merged pair becomes the parent.
    fn consolidate(&mut self) {
        let mut map: [Option<usize>; MAX_DEGREE] = [None; MAX_DEGREE];
        let mut cursor = self.min_root;
        self.min_root = None;

        while let Some(mut node) = cursor {
            cursor = match self.node(node).next {
                next if next == node => None,
                next => Some(next),
            };
            if cursor.is_some() {
                self.unlink(node);
            }

            loop {
                self.node_mut(node).marked = false;
                let degree = self.node(node).degree;
                assert!(degree < MAX_DEGREE, "fibonacci heap degree overflow");
                match map[degree] {
                    None => {
                        self.root_push(&mut map, node);
                        break;
                    }
                    Some(root) => {
                        self.root_remove(&mut map, root);
                        if self.node(root).priority < self.node(node).priority {
                            self.push_child(root, node);
                            node = root;
                        } else {
                            self.push_child(node, root);
                            self.node_mut(root).marked = false;
                        }
                    }
                }
            }
        }
    }

    /// Moves `ix` out of its parent's child ring into the root ring, then
    /// cascades upward: an unmarked ancestor is marked and the cascade
    /// stops, a marked one is cut in turn, roots stop it cold.
    fn cut(&mut self, mut ix: usize) {
        loop {
            let parent = self.node(ix).parent.expect("cut on a root");

            if self.node(parent).child == Some(ix) {
                if self.node(ix).next != ix {
                    let next = self.node(ix).next;
                    self.node_mut(parent).child = Some(next);
                    self.unlink(ix);
                } else {
                    self.node_mut(parent).child = None;
                }
            } else {
                self.unlink(ix);
            }

            self.node_mut(ix).parent = None;
            self.node_mut(parent).degree -= 1;

            let min = self.min_root.expect("cut on an empty heap");
            self.insert_after(min, ix);
            self.node_mut(ix).marked = false;

            if self.node(parent).parent.is_none() {
                break;
            }
            if !self.node(parent).marked {
                self.node_mut(parent).marked = true;
                break;
            }
            ix = parent;
        }
    }
}

#[cfg(test)]
impl<T> FibonacciHeap<T> {
    fn root_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![];
        if let Some(min) = self.min_root {
            let mut node = min;
            loop {
                degrees.push(self.node(node).degree);
                node = self.node(node).next;
                if node == min {
                    break;
                }
            }
        }
        degrees
    }

    /// Structural self-check: ring links are mutual, children respect the
    /// heap order, degrees count children, min_root is minimal among roots.
    fn assert_valid(&self) {
        let mut visited = 0;
        if let Some(min) = self.min_root {
            let mut node = min;
            loop {
                assert!(self.node(node).parent.is_none());
                assert!(self.node(min).priority <= self.node(node).priority);
                visited += self.assert_valid_tree(node);
                node = self.node(node).next;
                if node == min {
                    break;
                }
            }
        }
        assert_eq!(visited, self.len);
    }

    fn assert_valid_tree(&self, root: usize) -> usize {
        let mut count = 1;
        if let Some(child) = self.node(root).child {
            let mut node = child;
            let mut children = 0;
            loop {
                let next = self.node(node).next;
                assert_eq!(self.node(next).prev, node);
                assert_eq!(self.node(node).parent, Some(root));
                assert!(self.node(root).priority <= self.node(node).priority);
                children += 1;
                count += self.assert_valid_tree(node);
                node = next;
                if node == child {
                    break;
                }
            }
            assert_eq!(children, self.node(root).degree);
        } else {
            assert_eq!(self.node(root).degree, 0);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    #[test]
    fn it_pops_in_priority_order() {
        let mut rng = ChaChaRng::seed_from_u64(42);
        let mut values: Vec<f64> = (0..500).map(|i| i as f64).collect();
        values.shuffle(&mut rng);

        let mut heap = FibonacciHeap::new();
        for &value in &values {
            heap.insert(value as u32, value);
        }
        heap.assert_valid();

        let mut popped = vec![];
        while let Some((item, priority)) = heap.pop_min() {
            assert_eq!(item as f64, priority);
            popped.push(priority);
        }
        let sorted: Vec<f64> = (0..500).map(|i| i as f64).collect();
        assert_eq!(popped, sorted);
        assert!(heap.is_empty());
    }

    #[test]
    fn it_pops_nothing_from_an_empty_heap() {
        let mut heap: FibonacciHeap<()> = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.pop_min(), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn it_tracks_the_minimum_across_inserts() {
        let mut heap = FibonacciHeap::new();
        heap.insert("b", 2.0);
        heap.insert("c", 3.0);
        assert_eq!(heap.peek(), Some((&"b", 2.0)));
        heap.insert("a", 1.0);
        assert_eq!(heap.peek(), Some((&"a", 1.0)));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn it_reorders_after_decrease_priority() {
        let mut heap = FibonacciHeap::new();
        let mut handles = vec![];
        for i in 0..10 {
            handles.push(heap.insert(i, 10.0 + i as f64));
        }
        // surface some structure first
        heap.insert(99, 0.0);
        assert_eq!(heap.pop_min(), Some((99, 0.0)));

        heap.decrease_priority(handles[7], 1.0);
        heap.decrease_priority(handles[3], 2.0);
        heap.assert_valid();

        assert_eq!(heap.pop_min(), Some((7, 1.0)));
        assert_eq!(heap.pop_min(), Some((3, 2.0)));
        assert_eq!(heap.pop_min(), Some((0, 10.0)));
    }

    #[test]
    fn it_cascades_cuts_without_losing_nodes() {
        let mut rng = ChaChaRng::seed_from_u64(7);
        let mut heap = FibonacciHeap::new();
        let mut live = vec![];

        for round in 0..40 {
            for i in 0..25 {
                let priority = rng.gen_range(0.0..1000.0);
                live.push((heap.insert(round * 25 + i, priority), priority));
            }
            // popping builds trees; decreasing then tears them apart
            let (_, floor) = heap.pop_min().unwrap();
            live.retain(|&(handle, _)| heap.nodes[handle.index()].is_some());
            for entry in live.iter_mut() {
                if rng.gen_bool(0.3) && entry.1 > floor + 1.0 {
                    let target = floor + rng.gen_range(0.5..(entry.1 - floor));
                    heap.decrease_priority(entry.0, target);
                    entry.1 = target;
                }
            }
            heap.assert_valid();
        }

        let mut last = f64::NEG_INFINITY;
        while let Some((_, priority)) = heap.pop_min() {
            assert!(priority >= last);
            last = priority;
        }
    }

    #[test]
    fn it_leaves_distinct_root_degrees_after_pop() {
        let mut rng = ChaChaRng::seed_from_u64(3);
        let mut heap = FibonacciHeap::new();
        for i in 0..200 {
            heap.insert(i, rng.gen_range(0.0..100.0));
        }
        for _ in 0..50 {
            heap.pop_min().unwrap();
            let degrees = heap.root_degrees();
            let mut unique = degrees.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(degrees.len(), unique.len());
        }
    }

    #[test]
    fn it_accepts_reinsertion_after_pop() {
        let mut heap = FibonacciHeap::new();
        heap.insert('x', 5.0);
        let (item, _) = heap.pop_min().unwrap();
        let handle = heap.insert(item, 9.0);
        heap.insert('y', 7.0);
        heap.decrease_priority(handle, 1.0);
        assert_eq!(heap.pop_min(), Some(('x', 1.0)));
        assert_eq!(heap.pop_min(), Some(('y', 7.0)));
    }

    #[test]
    fn it_clears_all_nodes() {
        let mut heap = FibonacciHeap::new();
        for i in 0..10 {
            heap.insert(i, i as f64);
        }
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    #[should_panic(expected = "non-smaller priority")]
    fn it_rejects_a_non_decreasing_priority() {
        let mut heap = FibonacciHeap::new();
        let handle = heap.insert((), 1.0);
        heap.decrease_priority(handle, 1.0);
    }

    #[test]
    fn it_handles_infinity_priorities() {
        let mut heap = FibonacciHeap::new();
        let a = heap.insert(0, f64::INFINITY);
        let b = heap.insert(1, f64::INFINITY);
        heap.insert(2, f64::INFINITY);
        heap.decrease_priority(a, 3.0);
        heap.decrease_priority(b, 2.0);
        assert_eq!(heap.pop_min(), Some((1, 2.0)));
        assert_eq!(heap.pop_min(), Some((0, 3.0)));
        let (_, priority) = heap.pop_min().unwrap();
        assert!(priority.is_infinite());
    }
}
