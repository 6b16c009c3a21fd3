//! Turns recipes into one mass-balance constraint each.
//!
//! For a recipe, the constraint reads
//!
//! ```text
//! Σ yield(product) · x[product] − Σ amount(ingredient) · x[ingredient] <= logistics cost
//! ```
//!
//! where `x` are the resource variables, `yield` includes productivity and
//! probability, and the logistics cost is what it takes to bring the
//! ingredients to the building. Recipes may not create value beyond the
//! transport cost of their inputs.
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, ConstraintReference};
use crate::cost::CostModel;
use crate::expression::LinearExpression;
use crate::recipe::{Product, Recipe, RecipeBook};
use crate::variable::{Variable, VariableRegistry, MAX_COST};

/// Bonus applied to recipes whose category has no override.
pub const DEFAULT_PRODUCTIVITY: f64 = 0.6;

/// Invalid recipe data, detected while building the model
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The catalyst part of a product is larger than the product itself
    #[error("recipe '{recipe}': catalyst amount {catalyst} of '{product}' exceeds its amount {amount}")]
    CatalystExceedsAmount {
        recipe: String,
        product: String,
        catalyst: f64,
        amount: f64,
    },

    /// The product has neither `amount` nor `amount_min`/`amount_max`
    #[error("recipe '{recipe}': product '{product}' has no amount")]
    MissingAmount { recipe: String, product: String },
}

/// Productivity bonus per recipe category.
///
/// Categories served by slower tiers of buildings get a lower bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductivityTable {
    pub default: f64,
    pub categories: BTreeMap<String, f64>,
}

impl Default for ProductivityTable {
    fn default() -> Self {
        // Molecular assembler and particle accelerator lag behind in building tier
        let categories = [("nano", 0.4), ("pa", 0.4), ("mining", 0.5)]
            .into_iter()
            .map(|(category, rate)| (category.to_string(), rate))
            .collect();
        ProductivityTable {
            default: DEFAULT_PRODUCTIVITY,
            categories,
        }
    }
}

impl ProductivityTable {
    /// The productivity bonus of a category
    pub fn rate(&self, category: &str) -> f64 {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(self.default)
    }
}

/// What goes into the logistics cost of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostPolicy {
    /// Only moving the ingredients costs something
    #[default]
    Ingredients,
    /// Moving the products out of the building costs as well
    IngredientsAndProducts,
}

/// The effective amount of `product` emitted by one execution of `recipe`:
/// nominal amount, plus the productivity bonus on the non-catalyst part,
/// scaled by the probability.
pub fn product_yield(
    recipe_name: &str,
    recipe: &Recipe,
    product: &Product,
    productivity: &ProductivityTable,
) -> Result<f64, ModelError> {
    let nominal = product
        .nominal_amount()
        .ok_or_else(|| ModelError::MissingAmount {
            recipe: recipe_name.to_string(),
            product: product.name.clone(),
        })?;
    if product.catalyst_amount > nominal {
        return Err(ModelError::CatalystExceedsAmount {
            recipe: recipe_name.to_string(),
            product: product.name.clone(),
            catalyst: product.catalyst_amount,
            amount: nominal,
        });
    }
    let mut final_amount = nominal;
    if recipe.productivity {
        final_amount += productivity.rate(&recipe.category) * (nominal - product.catalyst_amount);
    }
    Ok(final_amount * product.probability)
}

/// Builds a [ProductionModel] one recipe at a time.
pub struct ModelBuilder<'a> {
    costs: &'a CostModel,
    productivity: &'a ProductivityTable,
    policy: CostPolicy,
    variables: VariableRegistry,
    constraints: Vec<Constraint>,
    produced: BTreeSet<String>,
}

impl<'a> ModelBuilder<'a> {
    /// Create a builder whose variables are bounded by `[0, MAX_COST]`
    pub fn new(costs: &'a CostModel, productivity: &'a ProductivityTable) -> Self {
        ModelBuilder {
            costs,
            productivity,
            policy: CostPolicy::default(),
            variables: VariableRegistry::new(MAX_COST),
            constraints: vec![],
            produced: BTreeSet::new(),
        }
    }

    /// Change what is included in the logistics cost
    pub fn with_policy(mut self, policy: CostPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Change the upper bound of resources without a special cap
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.variables = VariableRegistry::new(max_cost);
        self
    }

    /// Add the constraint of one recipe.
    ///
    /// Coefficients are accumulated in a local expression and committed once,
    /// so no constraint is added if a product is invalid.
    pub fn add_recipe(
        &mut self,
        name: &str,
        recipe: &Recipe,
    ) -> Result<ConstraintReference, ModelError> {
        let mut expression = LinearExpression::new();
        let mut logistics_cost = 0.;
        for ingredient in &recipe.ingredients {
            let variable = self.variables.get_or_create(&ingredient.name);
            expression.add_term(variable, -ingredient.amount);
            logistics_cost += ingredient.amount * self.costs.unit_cost(ingredient.medium);
        }
        let mut products = Vec::with_capacity(recipe.products.len());
        for product in &recipe.products {
            let final_amount = product_yield(name, recipe, product, self.productivity)?;
            let variable = self.variables.get_or_create(&product.name);
            expression.add_term(variable, final_amount);
            if self.policy == CostPolicy::IngredientsAndProducts {
                logistics_cost += final_amount * self.costs.unit_cost(product.medium);
            }
            products.push(product.name.as_str());
        }
        self.produced.extend(products.into_iter().map(str::to_string));
        let index = self.constraints.len();
        let constraint = Constraint::new(name, expression, logistics_cost);
        trace!("{}", constraint.display(&self.variables));
        self.constraints.push(constraint);
        Ok(ConstraintReference { index })
    }

    /// Add every recipe of the book
    pub fn add_recipes(&mut self, recipes: &RecipeBook) -> Result<(), ModelError> {
        for (name, recipe) in recipes {
            self.add_recipe(name, recipe)?;
        }
        Ok(())
    }

    /// Cap the special raw resources and return the finished model
    pub fn build(mut self) -> ProductionModel {
        let mut specials = BTreeSet::new();
        for (name, cap) in self.costs.special_caps() {
            let variable = self.variables.get_or_create(name);
            self.variables.set_max(variable, cap);
            specials.insert(name.to_string());
        }
        debug!(
            "Built model with {} variables and {} constraints",
            self.variables.len(),
            self.constraints.len()
        );
        ProductionModel {
            variables: self.variables,
            constraints: self.constraints,
            produced: self.produced,
            specials,
        }
    }
}

/// The variables and constraints of a production problem, before the objective is chosen.
#[derive(Debug, Clone)]
pub struct ProductionModel {
    pub(crate) variables: VariableRegistry,
    pub(crate) constraints: Vec<Constraint>,
    produced: BTreeSet<String>,
    specials: BTreeSet<String>,
}

impl ProductionModel {
    /// Build the model of all recipes of the book
    pub fn from_recipes(
        recipes: &RecipeBook,
        costs: &CostModel,
        productivity: &ProductivityTable,
        policy: CostPolicy,
    ) -> Result<Self, ModelError> {
        let mut builder = ModelBuilder::new(costs, productivity).with_policy(policy);
        builder.add_recipes(recipes)?;
        Ok(builder.build())
    }

    /// The resource variables
    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    /// Register a resource that no recipe mentions, e.g. a demand target
    pub(crate) fn register(&mut self, name: &str) -> Variable {
        self.variables.get_or_create(name)
    }

    /// The variable of a resource
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.variables.get(name)
    }

    /// One constraint per recipe, in insertion order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The constraint of a recipe
    pub fn constraint(&self, recipe: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == recipe)
    }

    /// True if at least one recipe has this resource among its products
    pub fn is_produced(&self, name: &str) -> bool {
        self.produced.contains(name)
    }

    /// Resources that are neither produced by a recipe nor special raw resources.
    pub fn unproduced(&self) -> BTreeSet<String> {
        self.variables
            .iter_variables_with_def()
            .map(|(_, def)| def.name())
            .filter(|name| !self.specials.contains(*name) && !self.produced.contains(*name))
            .map(str::to_string)
            .collect()
    }

    /// Number of resource variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Ingredient;

    fn recipe(category: &str, productivity: bool, products: Vec<Product>) -> Recipe {
        Recipe {
            category: category.to_string(),
            productivity,
            ingredients: vec![Ingredient::item("ore", 1.)],
            products,
        }
    }

    #[test]
    fn productivity_overrides() {
        let table = ProductivityTable::default();
        assert_eq!(table.rate("nano"), 0.4);
        assert_eq!(table.rate("mining"), 0.5);
        assert_eq!(table.rate("crafting"), DEFAULT_PRODUCTIVITY);
    }

    #[test]
    fn yield_with_catalyst() {
        let table = ProductivityTable::default();
        let mut product = Product::new("plate", 10.);
        product.catalyst_amount = 4.;
        product.probability = 0.5;
        let r = recipe("mining", true, vec![product.clone()]);
        // (10 + 0.5 * (10 - 4)) * 0.5
        assert_eq!(product_yield("r", &r, &product, &table), Ok(6.5));
    }

    #[test]
    fn range_uses_midpoint() {
        let table = ProductivityTable::default();
        let product = Product {
            amount: None,
            amount_min: Some(1.),
            amount_max: Some(5.),
            ..Product::new("nugget", 0.)
        };
        let r = recipe("crafting", false, vec![product.clone()]);
        assert_eq!(product_yield("r", &r, &product, &table), Ok(3.));
    }

    #[test]
    fn missing_amount() {
        let table = ProductivityTable::default();
        let product = Product {
            amount: None,
            ..Product::new("nothing", 0.)
        };
        let r = recipe("crafting", false, vec![product.clone()]);
        assert!(matches!(
            product_yield("r", &r, &product, &table),
            Err(ModelError::MissingAmount { .. })
        ));
    }

    #[test]
    fn failed_recipe_adds_nothing() {
        let costs = CostModel::default();
        let table = ProductivityTable::default();
        let mut builder = ModelBuilder::new(&costs, &table);
        let mut product = Product::new("plate", 1.);
        product.catalyst_amount = 2.;
        assert!(builder
            .add_recipe("bad", &recipe("crafting", true, vec![product]))
            .is_err());
        let model = builder.build();
        assert_eq!(model.num_constraints(), 0);
        assert!(!model.is_produced("plate"));
    }

    #[test]
    fn products_cost_policy() {
        let costs = CostModel::default();
        let table = ProductivityTable::default();
        let mut builder =
            ModelBuilder::new(&costs, &table).with_policy(CostPolicy::IngredientsAndProducts);
        builder
            .add_recipe("smelt", &recipe("smelting", false, vec![Product::new("plate", 2.)]))
            .unwrap();
        let model = builder.build();
        assert_eq!(model.constraint("smelt").unwrap().upper_bound(), 3.);
    }
}
