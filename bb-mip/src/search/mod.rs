//! Branch-and-bound search tree management.

mod node;
mod queue;
mod branching;
mod tree;

pub use node::{BoundKind, BranchBound, SearchNode};
pub use queue::NodeQueue;
pub use branching::{first_fractional, is_integral, is_integral_value, BranchDecision, BranchingSelector};
pub use tree::{BranchAndBound, TreeStats};
