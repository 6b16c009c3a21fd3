//! Production planning for crafting-game economies, as a linear program.
//!
//! Every resource gets a variable, every recipe a constraint saying that its
//! products cannot be worth more than its ingredients plus the cost of
//! bringing them in. The objective rewards demanded goods, and the dual value
//! of each recipe constraint tells how much the plan relies on that recipe.
//!
//! ```rust
//! # #[cfg(feature = "highs")] {
//! use recipe_lp::{Ingredient, Planner, PlannerConfig, Product, Recipe, RecipeBook};
//! use recipe_lp::objective::DemandWeighting;
//!
//! let mut recipes = RecipeBook::new();
//! recipes.insert("iron-gear-wheel".to_string(), Recipe {
//!     category: "crafting".to_string(),
//!     productivity: false,
//!     ingredients: vec![Ingredient::item("iron-plate", 2.)],
//!     products: vec![Product::new("iron-gear-wheel", 1.)],
//! });
//! let demand = DemandWeighting::Flat {
//!     demand: [("iron-gear-wheel".to_string(), 10.)].into_iter().collect(),
//! };
//! let mut config = PlannerConfig::default();
//! config.costs.special.insert("iron-plate".to_string(), 1.);
//! let outcome = Planner::new(config)?.run(&recipes, &demand)?;
//! assert!(outcome.solution.flow("iron-gear-wheel").unwrap() > 0.);
//! # }
//! # Ok::<_, recipe_lp::PlanError>(())
//! ```

pub use builder::{ModelBuilder, ModelError, ProductionModel};
pub use constraint::Constraint;
pub use expression::LinearExpression;
pub use planner::{PlanError, PlanOutcome, Planner};
pub use config::PlannerConfig;
pub use recipe::{Ingredient, Product, Recipe, RecipeBook};
pub use solution::Solution;
pub use solvers::{Backend, ResolutionError, SolverBackend};
pub use variable::Variable;

pub mod builder;
pub mod config;
pub mod constraint;
pub mod cost;
pub mod data;
mod expression;
pub mod flow;
pub mod objective;
pub mod planner;
pub mod recipe;
pub mod solution;
pub mod solvers;
pub mod variable;
