//! Frontier of pending B&B nodes.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use super::SearchNode;
use crate::settings::NodeSelection;

/// Entry in the best-bound heap.
struct QueuedNode {
    node: SearchNode,
    seq: u64, // Insertion order, later wins ties
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher bound first, then most recent
        self.node
            .bound
            .total_cmp(&other.node.bound)
            .then(self.seq.cmp(&other.seq))
    }
}

enum Frontier {
    /// Stack or queue, depending on the strategy.
    List(VecDeque<SearchNode>),
    Heap(BinaryHeap<QueuedNode>),
}

/// Pending nodes, removed in the order given by a [`NodeSelection`].
pub struct NodeQueue {
    /// Node selection strategy.
    strategy: NodeSelection,

    frontier: Frontier,

    /// Count of nodes added.
    nodes_added: u64,

    /// Count of nodes popped.
    nodes_popped: u64,
}

impl NodeQueue {
    /// Create an empty queue with the given strategy.
    pub fn new(strategy: NodeSelection) -> Self {
        let frontier = match strategy {
            NodeSelection::DepthFirst | NodeSelection::BreadthFirst => {
                Frontier::List(VecDeque::new())
            }
            NodeSelection::BestBound => Frontier::Heap(BinaryHeap::new()),
        };
        Self {
            strategy,
            frontier,
            nodes_added: 0,
            nodes_popped: 0,
        }
    }

    /// Strategy this queue was built with.
    pub fn strategy(&self) -> NodeSelection {
        self.strategy
    }

    /// Add a node to the queue.
    pub fn push(&mut self, node: SearchNode) {
        match &mut self.frontier {
            Frontier::List(list) => list.push_back(node),
            Frontier::Heap(heap) => heap.push(QueuedNode { node, seq: self.nodes_added }),
        }
        self.nodes_added += 1;
    }

    /// Remove the next node to process.
    pub fn pop(&mut self) -> Option<SearchNode> {
        let node = match (&mut self.frontier, self.strategy) {
            (Frontier::List(list), NodeSelection::BreadthFirst) => list.pop_front(),
            (Frontier::List(list), _) => list.pop_back(),
            (Frontier::Heap(heap), _) => heap.pop().map(|q| q.node),
        }?;
        self.nodes_popped += 1;
        Some(node)
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of nodes in the queue.
    pub fn len(&self) -> usize {
        match &self.frontier {
            Frontier::List(list) => list.len(),
            Frontier::Heap(heap) => heap.len(),
        }
    }

    /// Get the total number of nodes added.
    pub fn total_added(&self) -> u64 {
        self.nodes_added
    }

    /// Get the total number of nodes popped.
    pub fn total_popped(&self) -> u64 {
        self.nodes_popped
    }

    /// Highest inherited bound among pending nodes (`-∞` when empty).
    pub fn best_bound(&self) -> f64 {
        match &self.frontier {
            Frontier::List(list) => list.iter().map(|n| n.bound).fold(f64::NEG_INFINITY, f64::max),
            Frontier::Heap(heap) => heap.peek().map_or(f64::NEG_INFINITY, |q| q.node.bound),
        }
    }
}
