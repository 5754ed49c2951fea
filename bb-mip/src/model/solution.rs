//! MIP solution types.

use super::expr::VarId;
use crate::search::TreeStats;
use crate::settings::NO_INCUMBENT;

/// Status of the MIP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    /// Search tree exhausted; the incumbent is optimal.
    Optimal,

    /// Search tree exhausted without finding an integral solution.
    Infeasible,

    /// Node limit reached, best solution (if any) returned.
    NodeLimit,

    /// Time limit reached, best solution (if any) returned.
    TimeLimit,
}

impl MipStatus {
    /// Returns true if optimality was proven.
    pub fn is_optimal(&self) -> bool {
        matches!(self, MipStatus::Optimal)
    }

    /// Returns true if the search stopped on a budget.
    pub fn is_limit(&self) -> bool {
        matches!(self, MipStatus::NodeLimit | MipStatus::TimeLimit)
    }
}

/// Complete MIP solution with diagnostics.
#[derive(Debug, Clone)]
pub struct MipSolution {
    /// Solve status.
    pub status: MipStatus,

    /// Objective value of the best integral solution, if one was found.
    pub obj_val: Option<f64>,

    /// Best integral assignment, one value per variable.
    pub x: Option<Vec<f64>>,

    /// Search statistics.
    pub stats: TreeStats,

    /// Total solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl MipSolution {
    /// Returns true if an integral solution was found.
    pub fn has_solution(&self) -> bool {
        self.x.is_some()
    }

    /// Value of `var` in the best solution.
    pub fn value(&self, var: VarId) -> Option<f64> {
        self.x.as_ref().and_then(|x| x.get(var.index()).copied())
    }
}

/// Tracks the best known integral solution (incumbent).
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    /// Current best solution (if any).
    pub solution: Option<Vec<f64>>,

    /// Objective value of incumbent.
    /// Initialized to [`NO_INCUMBENT`] for maximization.
    pub obj_val: f64,

    /// Number of times incumbent was updated.
    pub update_count: u64,
}

impl Default for IncumbentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IncumbentTracker {
    /// Create a new incumbent tracker.
    pub fn new() -> Self {
        Self {
            solution: None,
            obj_val: NO_INCUMBENT,
            update_count: 0,
        }
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        self.solution.is_some()
    }

    /// Whether a relaxation bound of `bound` cannot beat the incumbent.
    pub fn dominates(&self, bound: f64) -> bool {
        bound <= self.obj_val
    }

    /// Try to update incumbent with a new solution.
    ///
    /// Returns true if the incumbent was improved. Only strict improvements
    /// are accepted, so the objective never decreases.
    pub fn update(&mut self, x: &[f64], obj: f64) -> bool {
        if obj > self.obj_val {
            self.solution = Some(x.to_vec());
            self.obj_val = obj;
            self.update_count += 1;
            true
        } else {
            false
        }
    }

    /// Best (objective, assignment), or None before the first update.
    pub fn best(&self) -> Option<(f64, &[f64])> {
        self.solution.as_deref().map(|x| (self.obj_val, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incumbent_tracker() {
        let mut tracker = IncumbentTracker::new();

        assert!(!tracker.has_incumbent());
        assert_eq!(tracker.obj_val, f64::NEG_INFINITY);
        assert!(tracker.best().is_none());

        // First solution
        assert!(tracker.update(&[1.0, 2.0], 10.0));
        assert!(tracker.has_incumbent());
        assert_eq!(tracker.obj_val, 10.0);
        assert_eq!(tracker.update_count, 1);

        // Worse solution (rejected)
        assert!(!tracker.update(&[2.0, 3.0], 5.0));
        assert_eq!(tracker.obj_val, 10.0);
        assert_eq!(tracker.update_count, 1);

        // Tie (rejected)
        assert!(!tracker.update(&[0.0, 0.0], 10.0));
        assert_eq!(tracker.best(), Some((10.0, &[1.0, 2.0][..])));

        // Better solution (accepted)
        assert!(tracker.update(&[0.5, 1.0], 15.0));
        assert_eq!(tracker.obj_val, 15.0);
        assert_eq!(tracker.update_count, 2);
    }

    #[test]
    fn test_monotone_over_sequence() {
        let mut tracker = IncumbentTracker::new();
        let mut last = tracker.obj_val;

        for obj in [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0] {
            tracker.update(&[obj], obj);
            assert!(tracker.obj_val >= last);
            last = tracker.obj_val;
        }

        assert_eq!(tracker.obj_val, 9.0);
        assert_eq!(tracker.update_count, 4);
    }

    #[test]
    fn test_dominates() {
        let mut tracker = IncumbentTracker::new();
        assert!(!tracker.dominates(-1e300));

        tracker.update(&[1.0], 3.0);
        assert!(tracker.dominates(3.0));
        assert!(tracker.dominates(2.5));
        assert!(!tracker.dominates(3.5));
    }

    #[test]
    fn test_status_methods() {
        assert!(MipStatus::Optimal.is_optimal());
        assert!(!MipStatus::NodeLimit.is_optimal());
        assert!(MipStatus::TimeLimit.is_limit());
        assert!(!MipStatus::Infeasible.is_limit());
    }
}
