//! A solver that uses [clarabel](https://oxfordcontrol.github.io/ClarabelDocs/stable/), a pure rust solver.
//!
//! Clarabel solves `min c·x` subject to `A·x + s = b, s ≥ 0`. Recipe rows come
//! first in `A`, followed by one row per finite variable bound, so the dual
//! of recipe `i` is `z[i]`.

use clarabel::algebra::CscMatrix;
use clarabel::solver::implementations::default::DefaultSettingsBuilder;
use clarabel::solver::SupportedConeT::NonnegativeConeT;
use clarabel::solver::{DefaultSolver, IPSolver, SolverStatus};

use crate::builder::ProductionModel;
use crate::objective::Objective;
use crate::solvers::{RawSolution, ResolutionError, SolutionStatus, SolverBackend};
use crate::variable::Variable;

/// Interior point iterates stop short of the bounds they converge to
pub const BOUND_TOLERANCE: f64 = 1e-5;

/// The [clarabel](https://oxfordcontrol.github.io/ClarabelDocs/stable/) backend
#[derive(Debug, Default, Clone, Copy)]
pub struct Clarabel {
    /// Whether clarabel prints its progress
    pub verbose: bool,
}

impl SolverBackend for Clarabel {
    fn name(&self) -> &'static str {
        "Clarabel"
    }

    fn solve(
        &self,
        model: &ProductionModel,
        objective: &Objective,
    ) -> Result<RawSolution, ResolutionError> {
        let n_variables = model.num_variables();
        // clarabel minimises; the maximised objective is negated, which makes
        // the duals the shadow prices of the original problem
        let mut objective_vector = vec![0.; n_variables];
        for (var, obj) in objective.expression().linear_coefficients() {
            objective_vector[var.index()] = -obj;
        }

        let mut matrix = CscMatrixBuilder::new(n_variables);
        let mut constraint_values = Vec::with_capacity(model.num_constraints() + 2 * n_variables);
        for constraint in model.constraints() {
            matrix.add_row(constraint.expression().linear_coefficients());
            constraint_values.push(constraint.upper_bound());
        }
        for (var, def) in model.variables().iter_variables_with_def() {
            if def.min() != f64::NEG_INFINITY {
                matrix.add_row(std::iter::once((var, -1.)));
                constraint_values.push(-def.min());
            }
            if def.max() != f64::INFINITY {
                matrix.add_row(std::iter::once((var, 1.)));
                constraint_values.push(def.max());
            }
        }
        let cones = [NonnegativeConeT(constraint_values.len())];

        let mut settings = DefaultSettingsBuilder::default();
        settings.verbose(self.verbose).tol_feas(1e-9);
        let settings = settings
            .build()
            .map_err(|e| ResolutionError::Other(format!("invalid clarabel settings: {}", e)))?;
        let mut solver = DefaultSolver::new(
            &CscMatrix::zeros((n_variables, n_variables)),
            &objective_vector,
            &matrix.build(),
            &constraint_values,
            &cones,
            settings,
        )
        .map_err(|e| ResolutionError::Other(format!("invalid clarabel problem: {:?}", e)))?;
        solver.solve();

        let status = match solver.solution.status {
            SolverStatus::Solved => SolutionStatus::Optimal,
            SolverStatus::AlmostSolved => SolutionStatus::Feasible,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                return Err(ResolutionError::Infeasible)
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                return Err(ResolutionError::Unbounded)
            }
            SolverStatus::Unsolved => return Err(ResolutionError::Other("Unsolved".into())),
            SolverStatus::MaxIterations => {
                return Err(ResolutionError::Other("Max iterations reached".into()))
            }
            SolverStatus::MaxTime => {
                return Err(ResolutionError::Other("Time limit reached".into()))
            }
            SolverStatus::NumericalError => {
                return Err(ResolutionError::Other("Numerical error".into()))
            }
            SolverStatus::InsufficientProgress => {
                return Err(ResolutionError::Other("No progress".into()))
            }
            SolverStatus::CallbackTerminated => {
                return Err(ResolutionError::Other("Callback terminated".into()))
            }
        };
        let solution = &solver.solution;
        Ok(RawSolution {
            status,
            values: solution.x.clone(),
            flows: solution.z[..model.num_constraints()].to_vec(),
            iterations: Some(u64::from(solution.iterations)),
        })
    }

    fn bound_tolerance(&self) -> f64 {
        BOUND_TOLERANCE
    }
}

struct CscMatrixBuilder {
    /// Indicates the row index of the corresponding element in `nzval`
    rowval: Vec<Vec<usize>>,
    /// All non-zero values in the matrix, in column-major order
    nzval: Vec<Vec<f64>>,
    n_rows: usize,
    n_cols: usize,
}

impl CscMatrixBuilder {
    fn new(n_cols: usize) -> Self {
        Self {
            rowval: vec![Vec::new(); n_cols],
            nzval: vec![Vec::new(); n_cols],
            n_rows: 0,
            n_cols,
        }
    }

    fn add_row(&mut self, row: impl IntoIterator<Item = (Variable, f64)>) {
        for (var, value) in row {
            self.rowval[var.index()].push(self.n_rows);
            self.nzval[var.index()].push(value);
        }
        self.n_rows += 1;
    }

    fn build(self) -> CscMatrix<f64> {
        let mut colptr = Vec::with_capacity(self.n_cols + 1);
        let mut end = 0;
        colptr.push(end);
        for col in &self.rowval {
            end += col.len();
            colptr.push(end);
        }
        CscMatrix::new(
            self.n_rows,
            self.n_cols,
            colptr,
            self.rowval.concat(),
            self.nzval.concat(),
        )
    }
}
