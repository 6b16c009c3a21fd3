//! The objective: what the plan is trying to maximise.
//!
//! Every resource gets a tiny uniform weight so the solver has no reason to
//! leave anything at zero, and demand targets get a weight proportional to
//! how many of them are needed.
use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::builder::ProductionModel;
use crate::expression::LinearExpression;
use crate::variable::Variable;

/// Weight given to every resource.
pub const BASE_WEIGHT: f64 = 0.001;
/// Weight of one unit of demand.
pub const DEMAND_SCALE: f64 = 1. / 1000.;

/// Static weights of the objective
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub base: f64,
    pub demand_scale: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        ObjectiveWeights {
            base: BASE_WEIGHT,
            demand_scale: DEMAND_SCALE,
        }
    }
}

/// How research is carried out by the labs.
///
/// Labs consume an auxiliary resource for as long as they research, and
/// their productivity bonus shortens the research time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabParameters {
    /// Resource consumed while researching, if any
    pub auxiliary: Option<String>,
    /// Units of the auxiliary resource consumed per second by one consumer
    pub consumption_per_second: f64,
    /// Consumers per lab
    pub units_per_lab: f64,
    /// Average productivity bonus of a lab
    pub average_productivity: f64,
}

impl Default for LabParameters {
    fn default() -> Self {
        LabParameters {
            auxiliary: Some("brain-cartridge-03".to_string()),
            consumption_per_second: 0.05,
            units_per_lab: 288. / 128.,
            average_productivity: 0.75 * 16.,
        }
    }
}

impl LabParameters {
    /// Fraction of the nominal research time actually spent, and of the science packs actually needed
    pub fn time_factor(&self) -> f64 {
        1. / (1. + self.average_productivity)
    }

    /// How much of the auxiliary resource researching for `research_time` seconds consumes
    pub fn auxiliary_demand(&self, research_time: f64) -> f64 {
        research_time * self.time_factor() * self.consumption_per_second * self.units_per_lab
    }
}

/// How the demand counts are turned into objective weights
#[derive(Debug, Clone, PartialEq)]
pub enum DemandWeighting {
    /// Counts are used as they are
    Flat { demand: BTreeMap<String, f64> },
    /// Counts are amortized over productivity-boosted labs, and the auxiliary
    /// resource consumed by the labs becomes a demand target too
    TimeAmortized {
        demand: BTreeMap<String, f64>,
        research_time: f64,
        lab: LabParameters,
    },
}

impl DemandWeighting {
    /// The effective demand of every target
    ///
    /// ```
    /// # use recipe_lp::objective::{DemandWeighting, LabParameters};
    /// let lab = LabParameters { auxiliary: None, average_productivity: 1., ..Default::default() };
    /// let weighting = DemandWeighting::TimeAmortized {
    ///     demand: [("red-pack".to_string(), 10.)].into_iter().collect(),
    ///     research_time: 100.,
    ///     lab,
    /// };
    /// assert_eq!(weighting.demand_counts(), vec![("red-pack".to_string(), 5.)]);
    /// ```
    pub fn demand_counts(&self) -> Vec<(String, f64)> {
        match self {
            DemandWeighting::Flat { demand } => demand
                .iter()
                .map(|(name, &count)| (name.clone(), count))
                .collect(),
            DemandWeighting::TimeAmortized {
                demand,
                research_time,
                lab,
            } => {
                let factor = lab.time_factor();
                let mut counts: Vec<_> = demand
                    .iter()
                    .map(|(name, &count)| (name.clone(), count * factor))
                    .collect();
                if let Some(auxiliary) = &lab.auxiliary {
                    counts.push((auxiliary.clone(), lab.auxiliary_demand(*research_time)));
                }
                counts
            }
        }
    }

    /// Names of the demand targets, including the auxiliary resource
    pub fn targets(&self) -> Vec<String> {
        self.demand_counts()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }
}

/// A linear function of the resource variables, always maximised
#[derive(Debug, Clone)]
pub struct Objective {
    pub(crate) expression: LinearExpression,
}

impl Objective {
    /// The weight of a variable
    pub fn coefficient(&self, variable: Variable) -> f64 {
        self.expression.coefficient(variable)
    }

    /// The linear expression
    pub fn expression(&self) -> &LinearExpression {
        &self.expression
    }

    /// Evaluate the objective given the values of the variables, indexed by column
    pub fn eval_with(&self, values: &[f64]) -> f64 {
        self.expression.eval_with(values)
    }
}

/// Build the maximisation objective.
///
/// Demand targets that no recipe mentions are registered in the model so they
/// still get a variable. Weights add up: a demand target gets both the base
/// weight and its demand weight.
pub fn compose(
    model: &mut ProductionModel,
    weighting: &DemandWeighting,
    weights: &ObjectiveWeights,
) -> Objective {
    let demand = weighting.demand_counts();
    for (name, _) in &demand {
        if model.variable(name).is_none() {
            warn!("Demand target {} is not used by any recipe", name);
            model.register(name);
        }
    }
    let mut expression = LinearExpression::new();
    for variable in model.variables().iter() {
        expression.add_term(variable, weights.base);
    }
    for (name, count) in demand {
        let variable = model.register(&name);
        expression.add_term(variable, count * weights.demand_scale);
    }
    Objective { expression }
}
