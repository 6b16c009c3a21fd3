//! A solver that uses [highs](https://docs.rs/highs), a parallel C++ solver.

use highs::HighsModelStatus;

use crate::builder::ProductionModel;
use crate::objective::Objective;
use crate::solvers::{RawSolution, ResolutionError, SolutionStatus, SolverBackend};

/// The [highs](https://docs.rs/highs) backend.
///
/// The safe highs API does not expose the simplex iteration count, so
/// [RawSolution::iterations] is always `None` for this backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct Highs {
    /// Whether HiGHS should display verbose logging information to the console
    pub verbose: bool,
}

/// Translate the model into a highs row problem
fn highs_problem(model: &ProductionModel, objective: &Objective) -> highs::RowProblem {
    let mut problem = highs::RowProblem::default();
    let columns: Vec<highs::Col> = model
        .variables()
        .iter_variables_with_def()
        .map(|(var, def)| problem.add_column(objective.coefficient(var), def.min()..def.max()))
        .collect();
    for constraint in model.constraints() {
        let factors = constraint
            .expression()
            .linear_coefficients()
            .map(|(variable, factor)| (columns[variable.index()], factor));
        problem.add_row(..=constraint.upper_bound(), factors);
    }
    problem
}

/// Decide whether a model status comes with a usable primal solution
fn classify(status: HighsModelStatus) -> Result<SolutionStatus, ResolutionError> {
    match status {
        HighsModelStatus::Optimal => Ok(SolutionStatus::Optimal),
        HighsModelStatus::ReachedTimeLimit
        | HighsModelStatus::ReachedIterationLimit
        | HighsModelStatus::ObjectiveBound
        | HighsModelStatus::ObjectiveTarget => Ok(SolutionStatus::Feasible),
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            Err(ResolutionError::Infeasible)
        }
        HighsModelStatus::Unbounded => Err(ResolutionError::Unbounded),
        HighsModelStatus::NotSet
        | HighsModelStatus::LoadError
        | HighsModelStatus::ModelError
        | HighsModelStatus::PresolveError
        | HighsModelStatus::SolveError
        | HighsModelStatus::PostsolveError
        | HighsModelStatus::ModelEmpty
        | HighsModelStatus::Unknown => Err(ResolutionError::Other(format!("{:?}", status))),
    }
}

impl SolverBackend for Highs {
    fn name(&self) -> &'static str {
        "HiGHS"
    }

    fn solve(
        &self,
        model: &ProductionModel,
        objective: &Objective,
    ) -> Result<RawSolution, ResolutionError> {
        let mut highs_model = highs_problem(model, objective).optimise(highs::Sense::Maximise);
        if self.verbose {
            highs_model.set_option(&b"output_flag"[..], true);
            highs_model.set_option(&b"log_to_console"[..], true);
        } else {
            highs_model.set_option(&b"output_flag"[..], false);
        }

        let solved = highs_model
            .try_solve()
            .map_err(|status| ResolutionError::Other(format!("HiGHS run failed: {:?}", status)))?;
        let status = classify(solved.status())?;
        let solution = solved.get_solution();
        // HiGHS reports the duals of binding `<=` rows of a maximisation as negative numbers
        let flows = solution.dual_rows().iter().map(|dual| -dual).collect();
        Ok(RawSolution {
            status,
            values: solution.columns().to_vec(),
            flows,
            iterations: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;
    use crate::builder::{ModelBuilder, ProductivityTable};
    use crate::cost::CostModel;
    use crate::objective::{compose, DemandWeighting, ObjectiveWeights};
    use crate::recipe::{Ingredient, Product, Recipe};

    #[test]
    fn can_solve_easy() {
        let costs = CostModel {
            special: [("ore".to_string(), 2.)].into_iter().collect(),
            ..CostModel::default()
        };
        let table = ProductivityTable::default();
        let mut builder = ModelBuilder::new(&costs, &table);
        let smelt = Recipe {
            category: "smelting".into(),
            productivity: false,
            ingredients: vec![Ingredient::item("ore", 1.)],
            products: vec![Product::new("plate", 1.)],
        };
        builder.add_recipe("smelt", &smelt).unwrap();
        let mut model = builder.build();
        let weighting = DemandWeighting::Flat {
            demand: Default::default(),
        };
        let objective = compose(&mut model, &weighting, &ObjectiveWeights::default());
        let solution = Highs::default().solve(&model, &objective).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        let ore = model.variable("ore").unwrap();
        let plate = model.variable("plate").unwrap();
        assert_float_eq!(solution.values[ore.index()], 2., abs <= 1e-6);
        assert_float_eq!(solution.values[plate.index()], 3., abs <= 1e-6);
        assert_float_eq!(solution.flows[0], 0.001, abs <= 1e-6);
    }

    #[test]
    fn only_statuses_with_an_incumbent_are_accepted() {
        assert_eq!(classify(HighsModelStatus::Optimal), Ok(SolutionStatus::Optimal));
        for stopped in [
            HighsModelStatus::ReachedTimeLimit,
            HighsModelStatus::ReachedIterationLimit,
            HighsModelStatus::ObjectiveBound,
            HighsModelStatus::ObjectiveTarget,
        ] {
            assert_eq!(classify(stopped), Ok(SolutionStatus::Feasible));
        }
        assert_eq!(
            classify(HighsModelStatus::Unknown),
            Err(ResolutionError::Other("Unknown".to_string()))
        );
        assert_eq!(
            classify(HighsModelStatus::SolveError),
            Err(ResolutionError::Other("SolveError".to_string()))
        );
        assert_eq!(
            classify(HighsModelStatus::Infeasible),
            Err(ResolutionError::Infeasible)
        );
        assert_eq!(
            classify(HighsModelStatus::Unbounded),
            Err(ResolutionError::Unbounded)
        );
    }
}
