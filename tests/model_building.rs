//! How recipes become constraints, and demand becomes an objective.

use std::collections::BTreeMap;

use float_eq::assert_float_eq;
use recipe_lp::builder::{CostPolicy, ModelError, ProductivityTable, DEFAULT_PRODUCTIVITY};
use recipe_lp::cost::{CostModel, COST_PER_FLUID};
use recipe_lp::objective::{compose, DemandWeighting, LabParameters, ObjectiveWeights};
use recipe_lp::variable::MAX_COST;
use recipe_lp::{Ingredient, ModelBuilder, Product, ProductionModel, Recipe, RecipeBook};

fn recipe(
    category: &str,
    productivity: bool,
    ingredients: Vec<Ingredient>,
    products: Vec<Product>,
) -> Recipe {
    Recipe {
        category: category.to_string(),
        productivity,
        ingredients,
        products,
    }
}

fn build(recipes: &[(&str, Recipe)]) -> Result<ProductionModel, ModelError> {
    let book: RecipeBook = recipes
        .iter()
        .map(|(name, recipe)| (name.to_string(), recipe.clone()))
        .collect();
    ProductionModel::from_recipes(
        &book,
        &CostModel::default(),
        &ProductivityTable::default(),
        CostPolicy::Ingredients,
    )
}

fn coefficient(model: &ProductionModel, recipe: &str, resource: &str) -> f64 {
    let variable = model.variable(resource).expect("resource has a variable");
    model.constraint(recipe).expect("recipe has a constraint").coefficient(variable)
}

#[test]
fn ingredient_and_product_net_out() {
    let model = build(&[(
        "wash",
        recipe(
            "crafting",
            false,
            vec![Ingredient::fluid("water", 10.), Ingredient::item("dirty-ore", 1.)],
            vec![Product::new("water", 4.), Product::new("ore", 1.)],
        ),
    )])
    .unwrap();
    assert_float_eq!(coefficient(&model, "wash", "water"), -6., abs <= 1e-12);
    assert_float_eq!(coefficient(&model, "wash", "dirty-ore"), -1., abs <= 1e-12);
    assert_float_eq!(coefficient(&model, "wash", "ore"), 1., abs <= 1e-12);
    assert_eq!(model.constraint("wash").unwrap().expression().len(), 3);
}

#[test]
fn full_catalyst_with_productivity_nets_to_zero() {
    let mut catalyst = Product::new("water", 10.);
    catalyst.catalyst_amount = 10.;
    let model = build(&[(
        "boil",
        recipe(
            "chemistry",
            true,
            vec![Ingredient::fluid("water", 10.)],
            vec![catalyst, Product::new("steam-cell", 1.)],
        ),
    )])
    .unwrap();
    assert_float_eq!(coefficient(&model, "boil", "water"), 0., abs <= 1e-12);
    assert_float_eq!(
        coefficient(&model, "boil", "steam-cell"),
        1. + DEFAULT_PRODUCTIVITY,
        abs <= 1e-12
    );
}

#[test]
fn no_productivity_means_amount_times_probability() {
    let mut product = Product::new("rare-gem", 3.);
    product.probability = 0.25;
    let model = build(&[(
        "sift",
        // "nano" has a productivity override, which must not matter here
        recipe("nano", false, vec![Ingredient::item("sand", 1.)], vec![product]),
    )])
    .unwrap();
    assert_float_eq!(coefficient(&model, "sift", "rare-gem"), 0.75, abs <= 1e-12);
}

#[test]
fn default_productivity_bonus() {
    let model = build(&[(
        "gears",
        recipe(
            "crafting",
            true,
            vec![Ingredient::item("iron-plate", 2.)],
            vec![Product::new("iron-gear-wheel", 5.)],
        ),
    )])
    .unwrap();
    assert_float_eq!(
        coefficient(&model, "gears", "iron-gear-wheel"),
        5. * (1. + DEFAULT_PRODUCTIVITY),
        abs <= 1e-12
    );
}

#[test]
fn category_productivity_override() {
    let model = build(&[(
        "drill",
        recipe(
            "mining",
            true,
            vec![Ingredient::item("drill-bit", 1.)],
            vec![Product::new("ore", 10.)],
        ),
    )])
    .unwrap();
    assert_float_eq!(coefficient(&model, "drill", "ore"), 15., abs <= 1e-12);
}

#[test]
fn catalyst_larger_than_amount_is_rejected() {
    let mut product = Product::new("plate", 1.);
    product.catalyst_amount = 2.;
    let result = build(&[(
        "broken",
        recipe("crafting", false, vec![Ingredient::item("ore", 1.)], vec![product]),
    )]);
    assert_eq!(
        result.err(),
        Some(ModelError::CatalystExceedsAmount {
            recipe: "broken".to_string(),
            product: "plate".to_string(),
            catalyst: 2.,
            amount: 1.,
        })
    );
}

#[test]
fn logistics_cost_is_the_upper_bound() {
    let model = build(&[(
        "mix",
        recipe(
            "chemistry",
            false,
            vec![Ingredient::item("coal", 2.), Ingredient::fluid("water", 100.)],
            vec![Product::new("plastic-bar", 1.)],
        ),
    )])
    .unwrap();
    assert_float_eq!(
        model.constraint("mix").unwrap().upper_bound(),
        2. + 100. * COST_PER_FLUID,
        abs <= 1e-9
    );
}

#[test]
fn products_cost_only_with_the_alternative_policy() {
    let costs = CostModel::default();
    let table = ProductivityTable::default();
    let smelt = recipe(
        "smelting",
        false,
        vec![Ingredient::item("ore", 1.)],
        vec![Product::new("plate", 1.)],
    );

    let mut default_builder = ModelBuilder::new(&costs, &table);
    default_builder.add_recipe("smelt", &smelt).unwrap();
    let mut costly_builder =
        ModelBuilder::new(&costs, &table).with_policy(CostPolicy::IngredientsAndProducts);
    costly_builder.add_recipe("smelt", &smelt).unwrap();

    assert_eq!(default_builder.build().constraints()[0].upper_bound(), 1.);
    assert_eq!(costly_builder.build().constraints()[0].upper_bound(), 2.);
}

#[test]
fn special_resources_are_capped() {
    let model = build(&[(
        "distill",
        recipe(
            "oil-processing",
            false,
            vec![Ingredient::fluid("crude-oil", 100.)],
            vec![Product::new("petroleum-gas", 50.)],
        ),
    )])
    .unwrap();
    let registry = model.variables();
    let crude = registry.definition(model.variable("crude-oil").unwrap());
    assert_eq!(crude.max(), COST_PER_FLUID);
    let guano = registry.definition(model.variable("guano").unwrap());
    assert_eq!(guano.max(), 1.);
    let gas = registry.definition(model.variable("petroleum-gas").unwrap());
    assert_eq!((gas.min(), gas.max()), (0., MAX_COST));
}

#[test]
fn one_constraint_per_recipe() {
    let model = build(&[
        (
            "a",
            recipe("crafting", false, vec![Ingredient::item("x", 1.)], vec![Product::new("y", 1.)]),
        ),
        (
            "b",
            recipe("crafting", false, vec![Ingredient::item("y", 1.)], vec![Product::new("x", 1.)]),
        ),
    ])
    .unwrap();
    assert_eq!(model.num_constraints(), 2);
    // x and y, plus the six special raw resources
    assert_eq!(model.num_variables(), 8);
}

#[test]
fn resources_without_recipes() {
    let model = build(&[
        (
            "smelt",
            recipe(
                "smelting",
                false,
                vec![Ingredient::item("ore", 1.), Ingredient::fluid("steam", 5.)],
                vec![Product::new("plate", 1.)],
            ),
        ),
        (
            "gear",
            recipe(
                "crafting",
                false,
                vec![Ingredient::item("plate", 2.), Ingredient::item("grease", 1.)],
                vec![Product::new("gear", 1.)],
            ),
        ),
    ])
    .unwrap();
    let unproduced: Vec<_> = model.unproduced().into_iter().collect();
    assert_eq!(unproduced, vec!["grease".to_string(), "ore".to_string()]);
    assert!(model.is_produced("plate"));
}

#[test]
fn demand_weights_add_to_the_base_weight() {
    let mut model = build(&[(
        "pack",
        recipe(
            "crafting",
            false,
            vec![Ingredient::item("gear", 1.)],
            vec![Product::new("red-pack", 1.)],
        ),
    )])
    .unwrap();
    let weighting = DemandWeighting::Flat {
        demand: [("red-pack".to_string(), 10.)].into_iter().collect(),
    };
    let objective = compose(&mut model, &weighting, &ObjectiveWeights::default());
    let pack = model.variable("red-pack").unwrap();
    let gear = model.variable("gear").unwrap();
    assert_float_eq!(objective.coefficient(pack), 0.011, abs <= 1e-12);
    assert_float_eq!(objective.coefficient(gear), 0.001, abs <= 1e-12);
}

#[test]
fn time_amortized_demand() {
    let mut model = build(&[(
        "pack",
        recipe(
            "crafting",
            false,
            vec![Ingredient::item("gear", 1.)],
            vec![Product::new("red-pack", 1.)],
        ),
    )])
    .unwrap();
    let lab = LabParameters::default();
    let weighting = DemandWeighting::TimeAmortized {
        demand: [("red-pack".to_string(), 13.)].into_iter().collect(),
        research_time: 1300.,
        lab: lab.clone(),
    };
    let objective = compose(&mut model, &weighting, &ObjectiveWeights::default());

    // 13 packs shared by labs with +1200% productivity: one pack's worth of weight
    let pack = model.variable("red-pack").unwrap();
    assert_float_eq!(objective.coefficient(pack), 0.002, abs <= 1e-12);

    let cartridge = model
        .variable("brain-cartridge-03")
        .expect("the auxiliary resource gets a variable");
    assert_float_eq!(
        objective.coefficient(cartridge),
        0.001 + lab.auxiliary_demand(1300.) / 1000.,
        abs <= 1e-12
    );
}

#[test]
fn unknown_demand_target_gets_a_variable() {
    let mut model = build(&[]).unwrap();
    let weighting = DemandWeighting::Flat {
        demand: BTreeMap::from([("space-science-pack".to_string(), 2.)]),
    };
    let objective = compose(&mut model, &weighting, &ObjectiveWeights::default());
    let pack = model.variable("space-science-pack").unwrap();
    assert_float_eq!(objective.coefficient(pack), 0.003, abs <= 1e-12);
    assert!(model.unproduced().contains("space-science-pack"));
}
