//! Planner configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```json
//! {
//!   "solver": "clarabel",
//!   "productivity": { "default": 0.5 },
//!   "lab": { "auxiliary": null }
//! }
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::{CostPolicy, ProductivityTable};
use crate::cost::CostModel;
use crate::data::{read_json, DataError};
use crate::objective::{LabParameters, ObjectiveWeights};
use crate::solvers::Backend;
use crate::variable::MAX_COST;

/// All the knobs of a planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Upper bound of resources without a special cap
    pub max_cost: f64,
    pub costs: CostModel,
    pub productivity: ProductivityTable,
    pub cost_policy: CostPolicy,
    pub weights: ObjectiveWeights,
    pub lab: LabParameters,
    pub solver: Backend,
    /// Let the solver print its own progress
    pub verbose_solver: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_cost: MAX_COST,
            costs: CostModel::default(),
            productivity: ProductivityTable::default(),
            cost_policy: CostPolicy::default(),
            weights: ObjectiveWeights::default(),
            lab: LabParameters::default(),
            solver: Backend::default(),
            verbose_solver: false,
        }
    }
}

impl PlannerConfig {
    /// Read a configuration file
    pub fn load(file: &Path) -> Result<Self, DataError> {
        read_json(file)
    }
}
