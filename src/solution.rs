//! What is left of a solve once the solver is gone: resource values, recipe
//! flows, and the diagnostics derived from them.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::{debug, info};

use crate::data::{read_json, write_json, DataError};
use crate::solvers::SolveResult;

/// File holding resource name → solved value
pub const SOLUTION_FILE: &str = "solutions.json";
/// File holding recipe name → flow
pub const FLOW_FILE: &str = "flow_values.json";

/// Values closer than this to a bound are considered on the bound, for
/// solvers that return vertices.
pub const VALUE_TOLERANCE: f64 = 1e-9;

/// Solved values and flows, keyed by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solution {
    values: BTreeMap<String, f64>,
    flows: BTreeMap<String, f64>,
}

impl From<SolveResult> for Solution {
    fn from(result: SolveResult) -> Self {
        Solution {
            values: result.values,
            flows: result.flows,
        }
    }
}

impl Solution {
    /// Assemble a solution from its two maps
    pub fn new(values: BTreeMap<String, f64>, flows: BTreeMap<String, f64>) -> Self {
        Solution { values, flows }
    }

    /// The solved value of a resource
    pub fn value(&self, resource: &str) -> Option<f64> {
        self.values.get(resource).copied()
    }

    /// The flow of a recipe
    pub fn flow(&self, recipe: &str) -> Option<f64> {
        self.flows.get(recipe).copied()
    }

    /// Resource name → solved value
    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    /// Recipe name → flow
    pub fn flows(&self) -> &BTreeMap<String, f64> {
        &self.flows
    }

    /// Write [SOLUTION_FILE] and [FLOW_FILE] into `dir`
    pub fn save(&self, dir: &Path) -> Result<(), DataError> {
        write_json(&dir.join(SOLUTION_FILE), &self.values)?;
        write_json(&dir.join(FLOW_FILE), &self.flows)?;
        info!("Wrote {} and {} to {}", SOLUTION_FILE, FLOW_FILE, dir.display());
        Ok(())
    }

    /// Read the artifacts written by [Solution::save]
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        Ok(Solution {
            values: read_json(&dir.join(SOLUTION_FILE))?,
            flows: read_json(&dir.join(FLOW_FILE))?,
        })
    }
}

/// Resources at the extremes of the solution
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolutionReport {
    /// Resources whose value reached the default upper bound: the optimizer
    /// wanted more of them than is allowed
    pub saturated: BTreeSet<String>,
    /// Resources worth nothing at this optimum
    pub zero_valued: BTreeSet<String>,
}

/// Partition the resources into saturated and zero-valued ones.
///
/// `tolerance` is relative to `max_cost` for saturation and absolute for zero.
pub fn analyze(values: &BTreeMap<String, f64>, max_cost: f64, tolerance: f64) -> SolutionReport {
    let mut report = SolutionReport::default();
    for (name, &value) in values {
        if (value - max_cost).abs() <= tolerance * max_cost.abs().max(1.) {
            report.saturated.insert(name.clone());
        } else if value.abs() <= tolerance {
            report.zero_valued.insert(name.clone());
        }
    }
    info!("Bloody expensive items: {}", report.saturated.len());
    debug!("Bloody expensive: {:?}", report.saturated);
    info!("Zero cost items: {}", report.zero_valued.len());
    debug!("Zero cost: {:?}", report.zero_valued);
    report
}
