//! Solver backends and the driver that interprets their results.
//!
//! A backend hands the model to an external LP engine and returns raw
//! column values and row duals. [solve] then attaches resource and recipe
//! names, decides whether the termination status is acceptable, and logs
//! what happened.
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::builder::ProductionModel;
use crate::objective::Objective;
use crate::solution::VALUE_TOLERANCE;

#[cfg(feature = "clarabel")]
pub mod clarabel;
#[cfg(feature = "highs")]
pub mod highs;

/// How good the returned solution is
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum SolutionStatus {
    /// Proven optimal
    Optimal,
    /// Feasible, but the solver stopped before proving optimality
    Feasible,
}

/// Represents an error that occurred when solving a problem
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ResolutionError {
    /// The objective can be made infinitely large without violating any constraints.
    #[error("the problem is unbounded")]
    Unbounded,
    /// There exists no solution that satisfies all of the constraints
    #[error("the problem is infeasible")]
    Infeasible,
    /// Another error occurred
    #[error("the solver failed: {0}")]
    Other(String),
}

/// The requested solver cannot be used
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown solver backend '{0}'")]
    UnknownBackend(String),
    #[error("solver backend '{0}' was not compiled in (enable the cargo feature of the same name)")]
    BackendUnavailable(Backend),
}

/// What a backend returns: values indexed by column, flows indexed by row
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: SolutionStatus,
    pub values: Vec<f64>,
    /// Row duals, signed so that a positive flow means relaxing the row raises the objective
    pub flows: Vec<f64>,
    pub iterations: Option<u64>,
}

/// An external LP engine
pub trait SolverBackend {
    /// Identity of the engine, for logs
    fn name(&self) -> &'static str;

    /// Solve the model for the objective, in a single blocking call
    fn solve(
        &self,
        model: &ProductionModel,
        objective: &Objective,
    ) -> Result<RawSolution, ResolutionError>;

    /// How far from a bound a returned value may be while still sitting on it.
    /// Relative to the bound for large bounds, absolute near zero.
    fn bound_tolerance(&self) -> f64 {
        VALUE_TOLERANCE
    }
}

/// The engines this crate can talk to
#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Highs,
    Clarabel,
}

impl Default for Backend {
    #[cfg(any(feature = "highs", not(feature = "clarabel")))]
    fn default() -> Self {
        Backend::Highs
    }

    #[cfg(all(feature = "clarabel", not(feature = "highs")))]
    fn default() -> Self {
        Backend::Clarabel
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Backend::Highs => "highs",
            Backend::Clarabel => "clarabel",
        })
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "highs" => Ok(Backend::Highs),
            "clarabel" => Ok(Backend::Clarabel),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

impl Backend {
    /// The backends compiled into this build, the default one first
    pub fn available() -> Vec<Backend> {
        #[allow(unused_mut)]
        let mut backends = vec![];
        #[cfg(feature = "highs")]
        backends.push(Backend::Highs);
        #[cfg(feature = "clarabel")]
        backends.push(Backend::Clarabel);
        backends
    }

    /// Instantiate the backend, if it was compiled in
    pub fn create(self, verbose: bool) -> Result<Box<dyn SolverBackend>, ConfigError> {
        match self {
            #[cfg(feature = "highs")]
            Backend::Highs => Ok(Box::new(highs::Highs { verbose })),
            #[cfg(feature = "clarabel")]
            Backend::Clarabel => Ok(Box::new(clarabel::Clarabel { verbose })),
            #[allow(unreachable_patterns)]
            unavailable => {
                let _ = verbose;
                Err(ConfigError::BackendUnavailable(unavailable))
            }
        }
    }
}

/// A classified solution with names attached
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: SolutionStatus,
    /// Resource name → solved value
    pub values: BTreeMap<String, f64>,
    /// Recipe name → flow
    pub flows: BTreeMap<String, f64>,
    pub objective_value: f64,
    pub iterations: Option<u64>,
    pub solver: &'static str,
    /// See [SolverBackend::bound_tolerance]
    pub bound_tolerance: f64,
}

/// Run the backend once and interpret its answer.
///
/// Suboptimal but feasible solutions are accepted with a warning; every other
/// non-optimal outcome is an error.
pub fn solve(
    backend: &dyn SolverBackend,
    model: &ProductionModel,
    objective: &Objective,
) -> Result<SolveResult, ResolutionError> {
    info!("Solving with {}", backend.name());
    let raw = backend.solve(model, objective)?;
    if raw.values.len() != model.num_variables() || raw.flows.len() != model.num_constraints() {
        return Err(ResolutionError::Other(format!(
            "{} returned {} values and {} duals for {} variables and {} constraints",
            backend.name(),
            raw.values.len(),
            raw.flows.len(),
            model.num_variables(),
            model.num_constraints()
        )));
    }
    if raw.status == SolutionStatus::Feasible {
        warn!("The problem does not have an optimal solution!");
        warn!("A potentially suboptimal solution was found");
    }
    match raw.iterations {
        Some(iterations) => info!("Problem solved in {} iterations", iterations),
        None => info!("Problem solved"),
    }
    let objective_value = objective.eval_with(&raw.values);
    let values = model
        .variables()
        .iter_variables_with_def()
        .map(|(var, def)| (def.name().to_string(), raw.values[var.index()]))
        .collect();
    let flows = model
        .constraints()
        .iter()
        .zip(&raw.flows)
        .map(|(constraint, &flow)| (constraint.name().to_string(), flow))
        .collect();
    Ok(SolveResult {
        status: raw.status,
        values,
        flows,
        objective_value,
        iterations: raw.iterations,
        solver: backend.name(),
        bound_tolerance: backend.bound_tolerance(),
    })
}
