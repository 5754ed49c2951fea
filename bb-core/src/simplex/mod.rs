//! Two-phase primal simplex.
//!
//! Phase 1 minimizes the sum of one artificial per row starting from the
//! all-artificial basis. Basic artificials left at zero are pivoted out
//! where possible; phase 2 then optimizes the real costs with artificials
//! barred from re-entering. Both phases use Bland's rule, so degenerate
//! problems cannot cycle.

mod standard;
mod tableau;

use std::time::Instant;

use crate::error::CoreResult;
use crate::linalg::sparse;
use crate::problem::{ProblemData, SolveInfo, SolveResult, SolveStatus, SolverSettings};

use standard::StandardForm;
use tableau::{PhaseOutcome, Tableau};

/// Solve a linear program in canonical form.
pub fn solve_simplex(prob: &ProblemData, settings: &SolverSettings) -> CoreResult<SolveResult> {
    prob.validate()?;
    let start = Instant::now();

    let Some(sf) = StandardForm::from_problem(prob) else {
        if settings.verbose {
            log::debug!("simplex: crossed variable bounds, problem infeasible");
        }
        return Ok(SolveResult::without_solution(
            SolveStatus::PrimalInfeasible,
            SolveInfo::default(),
        ));
    };

    let mut tab = Tableau::new(&sf, settings.tol_pivot);
    let info = |tab: &Tableau| SolveInfo {
        iters: tab.iters(),
        solve_time_ms: start.elapsed().as_millis() as u64,
    };

    let costs = tab.phase1_costs();
    tab.set_objective(&costs);
    match tab.run(false, settings.max_iter) {
        PhaseOutcome::Optimal => {}
        // The phase 1 objective is bounded below by zero
        PhaseOutcome::Unbounded | PhaseOutcome::NumericalError => {
            return Ok(SolveResult::without_solution(SolveStatus::NumericalError, info(&tab)));
        }
        PhaseOutcome::MaxIters => {
            return Ok(SolveResult::without_solution(SolveStatus::MaxIters, info(&tab)));
        }
    }

    let b_scale = 1.0 + sf.b.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if tab.objective() > settings.tol_feas * b_scale {
        if settings.verbose {
            log::debug!(
                "simplex: phase 1 residual {:.3e} after {} pivots, infeasible",
                tab.objective(),
                tab.iters()
            );
        }
        return Ok(SolveResult::without_solution(SolveStatus::PrimalInfeasible, info(&tab)));
    }

    tab.drive_out_artificials();
    let costs = tab.phase2_costs(&sf.c);
    tab.set_objective(&costs);

    let status = match tab.run(true, settings.max_iter) {
        PhaseOutcome::Optimal => SolveStatus::Optimal,
        PhaseOutcome::Unbounded => SolveStatus::Unbounded,
        PhaseOutcome::MaxIters => SolveStatus::MaxIters,
        PhaseOutcome::NumericalError => SolveStatus::NumericalError,
    };

    if status != SolveStatus::Optimal {
        if settings.verbose {
            log::debug!("simplex: phase 2 stopped with {} after {} pivots", status, tab.iters());
        }
        return Ok(SolveResult::without_solution(status, info(&tab)));
    }

    let x = sf.recover(&tab.primal());
    let ax = sparse::mul_vec(&prob.A, &x);
    let s: Vec<f64> = prob.b.iter().zip(&ax).map(|(b, ax)| b - ax).collect();
    let obj_val: f64 = prob.q.iter().zip(&x).map(|(q, x)| q * x).sum();

    if settings.verbose {
        log::debug!("simplex: optimal obj={:.6e} after {} pivots", obj_val, tab.iters());
    }

    Ok(SolveResult {
        status,
        x,
        s,
        obj_val,
        info: info(&tab),
    })
}
