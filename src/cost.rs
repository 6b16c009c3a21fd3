//! Logistics costs of moving resources around.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cost of moving one discrete item.
pub const COST_PER_ITEM: f64 = 1.;
/// Cost of moving one unit of fluid: a fluid wagon carries 25 000 units where
/// a cargo wagon carries 40 stacks of 100 items.
pub const COST_PER_FLUID: f64 = 40. * 100. / 25_000.;

/// How a resource is transported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    /// Discrete units on belts and in chests
    #[default]
    Item,
    /// Continuous flow in pipes
    Fluid,
}

/// Per-unit logistics costs and the caps of special raw resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Cost of one item
    pub item: f64,
    /// Cost of one unit of fluid
    pub fluid: f64,
    /// Raw resources whose rate is capped at a fixed cost
    pub special: BTreeMap<String, f64>,
}

impl Default for CostModel {
    fn default() -> Self {
        let special = [
            ("guano", COST_PER_ITEM),
            ("mova", COST_PER_ITEM),
            ("crude-oil", COST_PER_FLUID),
            ("raw-gas", COST_PER_FLUID),
            ("tar", COST_PER_FLUID),
            ("steam", COST_PER_FLUID),
        ]
        .into_iter()
        .map(|(name, cost)| (name.to_string(), cost))
        .collect();
        CostModel {
            item: COST_PER_ITEM,
            fluid: COST_PER_FLUID,
            special,
        }
    }
}

impl CostModel {
    /// Cost of moving one unit of a resource carried by `medium`
    pub fn unit_cost(&self, medium: Medium) -> f64 {
        match medium {
            Medium::Item => self.item,
            Medium::Fluid => self.fluid,
        }
    }

    /// The cap of a special raw resource, `None` for ordinary resources
    pub fn special_cap(&self, name: &str) -> Option<f64> {
        self.special.get(name).copied()
    }

    /// Iterate over the special resources and their caps
    pub fn special_caps(&self) -> impl Iterator<Item = (&str, f64)> {
        self.special.iter().map(|(name, &cap)| (name.as_str(), cap))
    }
}
