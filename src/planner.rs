//! One planning run: build the model, compose the objective, solve, analyze.
use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};

use crate::builder::{ModelBuilder, ModelError, ProductionModel};
use crate::config::PlannerConfig;
use crate::data::DataError;
use crate::objective::{compose, DemandWeighting};
use crate::recipe::RecipeBook;
use crate::solution::{analyze, Solution, SolutionReport};
use crate::solvers::{self, ConfigError, ResolutionError, SolutionStatus, SolverBackend};

/// Any reason a planning run can fail
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid recipe data: {0}")]
    Model(#[from] ModelError),
    #[error("the solver could not solve the problem: {0}")]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Data(#[from] DataError),
}

/// The result of a successful (possibly suboptimal) run
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub status: SolutionStatus,
    pub solution: Solution,
    pub report: SolutionReport,
    /// Resources no recipe produces and that are not special raw resources,
    /// demand targets included
    pub unproduced: BTreeSet<String>,
    pub objective_value: f64,
    pub iterations: Option<u64>,
    pub solver: &'static str,
}

/// Runs the whole pipeline with one solver backend
pub struct Planner {
    config: PlannerConfig,
    backend: Box<dyn SolverBackend>,
}

impl Planner {
    /// Use the backend named in the configuration
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        let backend = config.solver.create(config.verbose_solver)?;
        Ok(Planner { config, backend })
    }

    /// Use a custom backend
    pub fn with_backend(config: PlannerConfig, backend: Box<dyn SolverBackend>) -> Self {
        Planner { config, backend }
    }

    /// The configuration of the run
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Turn the recipes into a model. Fails on invalid recipe data.
    pub fn build_model(&self, recipes: &RecipeBook) -> Result<ProductionModel, ModelError> {
        let mut builder = ModelBuilder::new(&self.config.costs, &self.config.productivity)
            .with_policy(self.config.cost_policy)
            .with_max_cost(self.config.max_cost);
        builder.add_recipes(recipes)?;
        let model = builder.build();
        let unproduced = model.unproduced();
        info!("Couldn't find recipes for {} items", unproduced.len());
        debug!("{:?}", unproduced);
        info!("Number of variables = {}", model.num_variables());
        info!("Number of constraints = {}", model.num_constraints());
        Ok(model)
    }

    /// Solve for the given demand. Nothing is written to disk.
    pub fn run(
        &self,
        recipes: &RecipeBook,
        weighting: &DemandWeighting,
    ) -> Result<PlanOutcome, PlanError> {
        let mut model = self.build_model(recipes)?;
        let objective = compose(&mut model, weighting, &self.config.weights);
        let unproduced = model.unproduced();
        let result = solvers::solve(self.backend.as_ref(), &model, &objective)?;

        for target in weighting.targets() {
            if let Some(value) = result.values.get(&target) {
                info!("{} = {}", target, value);
            }
        }
        info!("Total objective cost = {}", result.objective_value);

        let report = analyze(&result.values, self.config.max_cost, result.bound_tolerance);
        Ok(PlanOutcome {
            status: result.status,
            report,
            unproduced,
            objective_value: result.objective_value,
            iterations: result.iterations,
            solver: result.solver,
            solution: Solution::from(result),
        })
    }

    /// Solve and write the solution artifacts into `out_dir`.
    ///
    /// Artifacts are only written when the solver returned a usable solution.
    pub fn run_and_save(
        &self,
        recipes: &RecipeBook,
        weighting: &DemandWeighting,
        out_dir: &Path,
    ) -> Result<PlanOutcome, PlanError> {
        let outcome = self.run(recipes, weighting)?;
        outcome.solution.save(out_dir)?;
        Ok(outcome)
    }
}
