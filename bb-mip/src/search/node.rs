//! Search node representation.
//!
//! Nodes are immutable once built. A child stores only the single bound it
//! adds and an `Arc` to its parent. The full constraint set is rebuilt
//! when the node is solved.

use std::sync::Arc;

use crate::model::{Constraint, LinearExpr, MipProblem, VarId};

/// Which side of a fractional value a child keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// `x <= floor(value)`
    Floor,
    /// `x >= ceil(value)`
    Ceil,
}

/// The bounding constraint a child adds on top of its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchBound {
    /// Variable index.
    pub var: usize,

    /// Side of the split.
    pub kind: BoundKind,

    /// Fractional relaxation value the split was taken at.
    pub value: f64,
}

impl BranchBound {
    /// Create a "down" branch: x <= floor(value).
    pub fn floor(var: usize, value: f64) -> Self {
        Self { var, kind: BoundKind::Floor, value }
    }

    /// Create an "up" branch: x >= ceil(value).
    pub fn ceil(var: usize, value: f64) -> Self {
        Self { var, kind: BoundKind::Ceil, value }
    }

    /// Integer the variable is bounded by.
    pub fn bound(&self) -> f64 {
        match self.kind {
            BoundKind::Floor => self.value.floor(),
            BoundKind::Ceil => self.value.ceil(),
        }
    }

    /// Whether `x` lies on this side of the split.
    pub fn admits(&self, x: f64) -> bool {
        match self.kind {
            BoundKind::Floor => x <= self.bound(),
            BoundKind::Ceil => x >= self.bound(),
        }
    }

    /// The bound as a linear constraint.
    pub fn to_constraint(&self) -> Constraint {
        let expr = LinearExpr::new().term(VarId(self.var), 1.0);
        match self.kind {
            BoundKind::Floor => Constraint::le(expr, self.bound()),
            BoundKind::Ceil => Constraint::ge(expr, self.bound()),
        }
    }
}

/// A node in the B&B search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Unique node identifier.
    pub id: u64,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Relaxation value of the parent, an upper bound on every integral
    /// solution in this subtree. `+∞` for the root.
    pub bound: f64,

    /// Bound added relative to the parent (None for root).
    pub branch: Option<BranchBound>,

    parent: Option<Arc<SearchNode>>,
}

impl SearchNode {
    /// Create the root node.
    pub fn root() -> Self {
        Self {
            id: 0,
            depth: 0,
            bound: f64::INFINITY,
            branch: None,
            parent: None,
        }
    }

    /// Create a child node that adds `branch` to this node's constraints.
    ///
    /// `bound` is this node's relaxation value.
    pub fn derive_child(self: &Arc<Self>, id: u64, branch: BranchBound, bound: f64) -> Self {
        Self {
            id,
            depth: self.depth + 1,
            bound,
            branch: Some(branch),
            parent: Some(Arc::clone(self)),
        }
    }

    /// Parent node ID (None for root).
    pub fn parent_id(&self) -> Option<u64> {
        self.parent.as_ref().map(|p| p.id)
    }

    /// Bounds added along the path from the root, root first.
    pub fn branch_path(&self) -> Vec<BranchBound> {
        let mut path = Vec::with_capacity(self.depth);
        let mut node = Some(self);
        while let Some(current) = node {
            if let Some(branch) = current.branch {
                path.push(branch);
            }
            node = current.parent.as_deref();
        }
        path.reverse();
        path
    }

    /// Full constraint set of this node: the problem's constraints followed
    /// by the branch bounds in root-to-leaf order.
    pub fn constraints(&self, problem: &MipProblem) -> Vec<Constraint> {
        let mut constraints = problem.constraints().to_vec();
        constraints.extend(self.branch_path().iter().map(BranchBound::to_constraint));
        constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sense, Variable};

    fn two_var_problem() -> MipProblem {
        MipProblem::new(
            vec![Variable::integer("x"), Variable::integer("y")],
            vec![Constraint::le(
                LinearExpr::new().term(VarId(0), 1.0).term(VarId(1), 1.0),
                3.5,
            )],
            LinearExpr::new().term(VarId(0), 1.0).term(VarId(1), 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_root_node() {
        let root = SearchNode::root();
        assert_eq!(root.id, 0);
        assert!(root.parent_id().is_none());
        assert_eq!(root.depth, 0);
        assert!(root.branch.is_none());
        assert!(root.branch_path().is_empty());
        assert_eq!(root.bound, f64::INFINITY);
    }

    #[test]
    fn test_child_node() {
        let root = Arc::new(SearchNode::root());
        let child = root.derive_child(1, BranchBound::floor(0, 2.5), 3.5);

        assert_eq!(child.id, 1);
        assert_eq!(child.parent_id(), Some(0));
        assert_eq!(child.depth, 1);
        assert_eq!(child.bound, 3.5);
        assert_eq!(child.branch_path(), vec![BranchBound::floor(0, 2.5)]);
    }

    #[test]
    fn test_bounds() {
        // Down branch on x with value 2.7: x <= 2
        let down = BranchBound::floor(0, 2.7);
        assert_eq!(down.bound(), 2.0);
        assert!(down.admits(2.0));
        assert!(!down.admits(3.0));

        // Up branch on x with value 2.7: x >= 3
        let up = BranchBound::ceil(0, 2.7);
        assert_eq!(up.bound(), 3.0);
        assert!(up.admits(3.0));
        assert!(!up.admits(2.0));

        // Negative values round away from the split point
        assert_eq!(BranchBound::floor(0, -1.5).bound(), -2.0);
        assert_eq!(BranchBound::ceil(0, -1.5).bound(), -1.0);
    }

    #[test]
    fn test_children_partition_integers() {
        for &value in &[-3.25, -0.5, 0.1, 2.5, 7.999] {
            let down = BranchBound::floor(0, value);
            let up = BranchBound::ceil(0, value);

            // The fractional point itself is cut off by both children
            assert!(!down.admits(value));
            assert!(!up.admits(value));

            // Every integer lands in exactly one child
            for k in -10..=10 {
                let k = k as f64;
                assert!(down.admits(k) ^ up.admits(k), "value={} k={}", value, k);
            }
        }
    }

    #[test]
    fn test_constraint_chain() {
        let prob = two_var_problem();
        let root = Arc::new(SearchNode::root());
        assert_eq!(root.constraints(&prob), prob.constraints().to_vec());

        let child = Arc::new(root.derive_child(1, BranchBound::floor(0, 2.5), 3.5));
        let grandchild = child.derive_child(3, BranchBound::ceil(1, 1.5), 3.0);

        let constraints = grandchild.constraints(&prob);
        assert_eq!(constraints.len(), 3);
        assert_eq!(constraints[0], prob.constraints()[0]);

        // Parent's bound comes first, then the grandchild's own
        assert_eq!(constraints[1].sense, Sense::Le);
        assert_eq!(constraints[1].rhs, 2.0);
        assert_eq!(constraints[1].expr.terms(), &[(VarId(0), 1.0)]);
        assert_eq!(constraints[2].sense, Sense::Ge);
        assert_eq!(constraints[2].rhs, 2.0);
        assert_eq!(constraints[2].expr.terms(), &[(VarId(1), 1.0)]);

        // Deriving leaves the parent untouched
        assert_eq!(child.constraints(&prob).len(), 2);
    }
}
