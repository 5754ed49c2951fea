//! Branch-and-bound tree controller.

use std::sync::Arc;
use std::time::Instant;

use super::{is_integral, BranchDecision, BranchingSelector, NodeQueue, SearchNode};
use crate::error::{MipError, MipResult};
use crate::master::{Relaxation, RelaxationOutcome, RelaxationSolver};
use crate::model::{IncumbentTracker, MipProblem, MipSolution, MipStatus};
use crate::settings::MipSettings;

/// Branch-and-bound tree controller.
///
/// Manages the frontier, the incumbent and termination. Each call to
/// [`run`](Self::run) starts a fresh search.
pub struct BranchAndBound {
    /// Node queue.
    queue: NodeQueue,

    /// Branching variable selector.
    branching: BranchingSelector,

    /// Incumbent solution tracker.
    pub incumbent: IncumbentTracker,

    /// Next node ID to assign.
    next_node_id: u64,

    /// Counters for the current search.
    stats: TreeStats,

    /// Start time.
    start_time: Option<Instant>,

    /// Settings.
    settings: MipSettings,
}

impl BranchAndBound {
    /// Create a new B&B controller.
    pub fn new(settings: MipSettings) -> Self {
        Self {
            queue: NodeQueue::new(settings.node_selection),
            branching: BranchingSelector::new(settings.int_feas_tol),
            incumbent: IncumbentTracker::new(),
            next_node_id: 1, // 0 reserved for root
            stats: TreeStats::default(),
            start_time: None,
            settings,
        }
    }

    /// Explore the tree of `problem` until the frontier empties or a budget
    /// runs out.
    ///
    /// Infeasible, unbounded and failed relaxations prune their node. An
    /// error is returned only when the relaxation solver hands back a
    /// solution of the wrong size or an internal invariant breaks.
    pub fn run<S>(&mut self, problem: &MipProblem, solver: &mut S) -> MipResult<MipSolution>
    where
        S: RelaxationSolver + ?Sized,
    {
        self.initialize();

        let status = loop {
            if let Some(status) = self.check_termination() {
                break status;
            }
            let Some(node) = self.queue.pop() else {
                return Err(MipError::InternalError(
                    "frontier empty after termination check".to_string(),
                ));
            };
            self.process_node(problem, solver, node)?;
            self.log_progress();
        };

        if self.settings.verbose {
            log::info!(
                "Search finished: {:?} after {} nodes, incumbent {:.6e}, {:.1}s",
                status,
                self.stats.nodes_explored,
                self.incumbent.obj_val,
                self.elapsed_ms() as f64 / 1000.0,
            );
        }

        Ok(self.finalize(status))
    }

    /// Reset all search state and push the root node.
    fn initialize(&mut self) {
        self.queue = NodeQueue::new(self.settings.node_selection);
        self.incumbent = IncumbentTracker::new();
        self.next_node_id = 1;
        self.stats = TreeStats::default();
        self.start_time = Some(Instant::now());

        self.queue.push(SearchNode::root());
    }

    /// Solve one node and prune, accept or branch it.
    fn process_node<S>(&mut self, problem: &MipProblem, solver: &mut S, node: SearchNode) -> MipResult<()>
    where
        S: RelaxationSolver + ?Sized,
    {
        self.stats.nodes_explored += 1;
        self.stats.max_depth = self.stats.max_depth.max(node.depth);

        let relax = match solver.solve(problem, &node) {
            RelaxationOutcome::Optimal(relax) => relax,
            RelaxationOutcome::Infeasible => {
                self.stats.pruned_infeasible += 1;
                log::debug!("Node {}: infeasible, pruned", node.id);
                return Ok(());
            }
            RelaxationOutcome::Unbounded => {
                self.stats.unbounded += 1;
                log::debug!("Node {}: relaxation unbounded, pruned", node.id);
                return Ok(());
            }
            RelaxationOutcome::Failed(reason) => {
                self.relaxation_failed(&node, &reason);
                return Ok(());
            }
        };

        if relax.values.len() != problem.num_vars() {
            return Err(MipError::RelaxationError(format!(
                "node {} relaxation returned {} values for {} variables",
                node.id,
                relax.values.len(),
                problem.num_vars()
            )));
        }
        if !relax.objective.is_finite() || relax.values.iter().any(|v| !v.is_finite()) {
            self.relaxation_failed(&node, "non-finite relaxation solution");
            return Ok(());
        }

        if self.incumbent.dominates(relax.objective) {
            self.stats.pruned_by_bound += 1;
            log::debug!(
                "Node {}: bound {:.6e} <= incumbent {:.6e}, pruned",
                node.id,
                relax.objective,
                self.incumbent.obj_val
            );
            return Ok(());
        }

        if is_integral(problem, &relax.values, self.branching.tolerance()) {
            self.stats.integral_leaves += 1;
            return self.accept_integral(&node, relax);
        }

        let decision = self.branching.select(&relax.values, problem).ok_or_else(|| {
            MipError::InternalError(format!(
                "node {} is not integral but has no fractional variable",
                node.id
            ))
        })?;

        log::debug!(
            "Node {}: bound {:.6e}, branching on x{} = {:.6}",
            node.id,
            relax.objective,
            decision.var,
            decision.value
        );

        let parent = Arc::new(node);
        let (down, up) = self.branch(&parent, decision, relax.objective);
        self.queue.push(down);
        self.queue.push(up);
        self.stats.nodes_branched += 1;

        Ok(())
    }

    /// Record an integral relaxation as the new incumbent.
    fn accept_integral(&mut self, node: &SearchNode, relax: Relaxation) -> MipResult<()> {
        // The bound test already rejected anything not strictly better
        if !self.incumbent.update(&relax.values, relax.objective) {
            return Err(MipError::InternalError(format!(
                "node {} integral objective {:.6e} did not improve incumbent {:.6e}",
                node.id, relax.objective, self.incumbent.obj_val
            )));
        }

        if self.settings.verbose {
            log::info!(
                "New incumbent: obj={:.6e} at node {} (depth {})",
                relax.objective,
                node.id,
                node.depth
            );
        }

        Ok(())
    }

    fn relaxation_failed(&mut self, node: &SearchNode, reason: &str) {
        self.stats.relaxation_failures += 1;
        log::warn!("Node {}: relaxation failed ({}), pruned", node.id, reason);
    }

    /// Create child nodes from a branching decision.
    ///
    /// Returns the two child nodes (down, up).
    pub fn branch(
        &mut self,
        parent: &Arc<SearchNode>,
        decision: BranchDecision,
        bound: f64,
    ) -> (SearchNode, SearchNode) {
        let down_id = self.next_node_id;
        let up_id = self.next_node_id + 1;
        self.next_node_id += 2;

        let down_child = parent.derive_child(down_id, decision.down, bound);
        let up_child = parent.derive_child(up_id, decision.up, bound);

        (down_child, up_child)
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Check if time limit is exceeded.
    pub fn time_limit_exceeded(&self) -> bool {
        if let Some(limit) = self.settings.time_limit_ms {
            self.elapsed_ms() >= limit
        } else {
            false
        }
    }

    /// Check termination conditions.
    ///
    /// Returns Some(status) if we should terminate, None otherwise. An empty
    /// frontier wins over the budgets since the search is then complete.
    pub fn check_termination(&self) -> Option<MipStatus> {
        // Queue empty
        if self.queue.is_empty() {
            return Some(if self.incumbent.has_incumbent() {
                MipStatus::Optimal
            } else {
                MipStatus::Infeasible
            });
        }

        // Time limit
        if self.time_limit_exceeded() {
            return Some(MipStatus::TimeLimit);
        }

        // Node limit
        if self.stats.nodes_explored >= self.settings.max_nodes {
            return Some(MipStatus::NodeLimit);
        }

        None
    }

    /// Finalize the solve and return the solution.
    pub fn finalize(&self, status: MipStatus) -> MipSolution {
        MipSolution {
            status,
            obj_val: self.incumbent.best().map(|(obj, _)| obj),
            x: self.incumbent.solution.clone(),
            stats: self.stats(),
            solve_time_ms: self.elapsed_ms(),
        }
    }

    /// Log progress (if verbose).
    pub fn log_progress(&self) {
        if !self.settings.verbose || self.settings.log_freq == 0 {
            return;
        }

        if self.stats.nodes_explored % self.settings.log_freq != 0 {
            return;
        }

        log::info!(
            "Nodes: {} ({} open) | Best open: {:.6e} | Incumbent: {:.6e} | Pruned: {} | Time: {:.1}s",
            self.stats.nodes_explored,
            self.queue.len(),
            self.queue.best_bound(),
            self.incumbent.obj_val,
            self.stats.pruned_by_bound + self.stats.pruned_infeasible,
            self.elapsed_ms() as f64 / 1000.0,
        );
    }

    /// Get statistics for display.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes_open: self.queue.len() as u64,
            incumbent_updates: self.incumbent.update_count,
            elapsed_ms: self.elapsed_ms(),
            ..self.stats.clone()
        }
    }
}

/// Statistics from the B&B tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes whose relaxation was solved.
    pub nodes_explored: u64,
    /// Nodes split into two children.
    pub nodes_branched: u64,
    /// Nodes fathomed because their bound could not beat the incumbent.
    pub pruned_by_bound: u64,
    /// Nodes with an infeasible relaxation.
    pub pruned_infeasible: u64,
    /// Nodes with an unbounded relaxation.
    pub unbounded: u64,
    /// Nodes whose relaxation failed numerically.
    pub relaxation_failures: u64,
    /// Nodes with an integral relaxation solution.
    pub integral_leaves: u64,
    /// Strict incumbent improvements.
    pub incumbent_updates: u64,
    /// Deepest node explored.
    pub max_depth: usize,
    /// Nodes left on the frontier.
    pub nodes_open: u64,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, LinearExpr, VarId, Variable};
    use crate::search::BoundKind;
    use crate::settings::NodeSelection;

    /// One integer variable, 0 <= x <= 10, max x. The mock solvers below
    /// ignore the constraints and script the outcomes per branch path.
    fn one_var_problem() -> MipProblem {
        MipProblem::new(
            vec![Variable::integer("x")],
            vec![
                Constraint::ge(LinearExpr::new().term(VarId(0), 1.0), 0.0),
                Constraint::le(LinearExpr::new().term(VarId(0), 1.0), 10.0),
            ],
            LinearExpr::new().term(VarId(0), 1.0),
        )
        .unwrap()
    }

    /// Root at 2.5; floor child integral at 2.0, ceil child integral at 2.2.
    fn scripted(_: &MipProblem, node: &SearchNode) -> RelaxationOutcome {
        match node.branch.map(|b| b.kind) {
            None => RelaxationOutcome::optimal(2.5, vec![2.5]),
            Some(BoundKind::Floor) => RelaxationOutcome::optimal(2.0, vec![2.0]),
            Some(BoundKind::Ceil) => RelaxationOutcome::optimal(2.2, vec![3.0]),
        }
    }

    #[test]
    fn test_depth_first_prunes_by_bound() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let sol = tree.run(&prob, &mut scripted).unwrap();

        // Ceil child is popped first, then the floor child cannot beat it
        assert_eq!(sol.status, MipStatus::Optimal);
        assert_eq!(sol.obj_val, Some(2.2));
        assert_eq!(sol.x, Some(vec![3.0]));
        assert_eq!(sol.stats.nodes_explored, 3);
        assert_eq!(sol.stats.nodes_branched, 1);
        assert_eq!(sol.stats.integral_leaves, 1);
        assert_eq!(sol.stats.pruned_by_bound, 1);
        assert_eq!(sol.stats.incumbent_updates, 1);
        assert_eq!(sol.stats.max_depth, 1);
        assert_eq!(sol.stats.nodes_open, 0);
    }

    #[test]
    fn test_breadth_first_same_objective() {
        let prob = one_var_problem();
        let settings = MipSettings::default().with_node_selection(NodeSelection::BreadthFirst);
        let mut tree = BranchAndBound::new(settings);

        let sol = tree.run(&prob, &mut scripted).unwrap();

        // Floor child first, then the ceil child improves on it
        assert_eq!(sol.obj_val, Some(2.2));
        assert_eq!(sol.stats.integral_leaves, 2);
        assert_eq!(sol.stats.incumbent_updates, 2);
        assert_eq!(sol.stats.pruned_by_bound, 0);
    }

    #[test]
    fn test_tie_with_incumbent_is_pruned() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let mut solver = |_: &MipProblem, node: &SearchNode| match node.branch {
            None => RelaxationOutcome::optimal(2.5, vec![2.5]),
            Some(_) => RelaxationOutcome::optimal(2.0, vec![node.branch_path()[0].bound()]),
        };

        let sol = tree.run(&prob, &mut solver).unwrap();

        assert_eq!(sol.obj_val, Some(2.0));
        assert_eq!(sol.x, Some(vec![3.0]));
        assert_eq!(sol.stats.incumbent_updates, 1);
        assert_eq!(sol.stats.pruned_by_bound, 1);
    }

    #[test]
    fn test_children_carry_parent_bound() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());
        let mut seen = Vec::new();

        let mut solver = |p: &MipProblem, node: &SearchNode| {
            seen.push((node.id, node.bound, node.constraints(p).len()));
            scripted(p, node)
        };
        tree.run(&prob, &mut solver).unwrap();

        assert_eq!(
            seen,
            vec![(0, f64::INFINITY, 2), (2, 2.5, 3), (1, 2.5, 3)]
        );
    }

    #[test]
    fn test_failed_relaxations_are_counted() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let mut solver = |_: &MipProblem, _: &SearchNode| {
            RelaxationOutcome::Failed("singular basis".to_string())
        };
        let sol = tree.run(&prob, &mut solver).unwrap();

        assert_eq!(sol.status, MipStatus::Infeasible);
        assert!(sol.obj_val.is_none());
        assert!(sol.x.is_none());
        assert_eq!(sol.stats.relaxation_failures, 1);
        assert_eq!(sol.stats.pruned_infeasible, 0);
    }

    #[test]
    fn test_unbounded_root() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let mut solver = |_: &MipProblem, _: &SearchNode| RelaxationOutcome::Unbounded;
        let sol = tree.run(&prob, &mut solver).unwrap();

        assert_eq!(sol.status, MipStatus::Infeasible);
        assert_eq!(sol.stats.unbounded, 1);
    }

    #[test]
    fn test_non_finite_solution_is_a_failure() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let mut solver = |_: &MipProblem, _: &SearchNode| RelaxationOutcome::optimal(1.0, vec![f64::NAN]);
        let sol = tree.run(&prob, &mut solver).unwrap();

        assert_eq!(sol.status, MipStatus::Infeasible);
        assert_eq!(sol.stats.relaxation_failures, 1);
    }

    #[test]
    fn test_wrong_solution_size() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let mut solver = |_: &MipProblem, _: &SearchNode| RelaxationOutcome::optimal(1.0, vec![1.0, 2.0]);
        let err = tree.run(&prob, &mut solver).unwrap_err();

        assert!(matches!(err, MipError::RelaxationError(_)));
    }

    #[test]
    fn test_node_limit() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default().with_max_nodes(1));

        let sol = tree.run(&prob, &mut scripted).unwrap();

        assert_eq!(sol.status, MipStatus::NodeLimit);
        assert!(sol.x.is_none());
        assert_eq!(sol.stats.nodes_explored, 1);
        assert_eq!(sol.stats.nodes_open, 2);
    }

    #[test]
    fn test_time_limit() {
        let prob = one_var_problem();
        let mut settings = MipSettings::default();
        settings.time_limit_ms = Some(0);
        let mut tree = BranchAndBound::new(settings);

        let sol = tree.run(&prob, &mut scripted).unwrap();

        assert_eq!(sol.status, MipStatus::TimeLimit);
        assert_eq!(sol.stats.nodes_explored, 0);
    }

    #[test]
    fn test_rerun_starts_fresh() {
        let prob = one_var_problem();
        let mut tree = BranchAndBound::new(MipSettings::default());

        let first = tree.run(&prob, &mut scripted).unwrap();
        let second = tree.run(&prob, &mut scripted).unwrap();

        assert_eq!(first.obj_val, second.obj_val);
        assert_eq!(first.x, second.x);
        assert_eq!(first.stats.nodes_explored, second.stats.nodes_explored);
        assert_eq!(second.stats.incumbent_updates, 1);
    }
}
