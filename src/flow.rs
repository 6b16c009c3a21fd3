//! Traces one resource through the recipes that produce and consume it.
use std::fmt::{Display, Formatter};

use crate::recipe::RecipeBook;
use crate::solution::Solution;

/// Data missing from the persisted artifacts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InspectError {
    #[error("resource '{0}' is not part of the solution")]
    UnknownResource(String),
    #[error("no flow recorded for recipe '{0}'")]
    MissingFlow(String),
    #[error("ingredient '{ingredient}' of recipe '{recipe}' is not part of the solution")]
    MissingIngredientValue { recipe: String, ingredient: String },
}

/// A recipe consuming the inspected resource
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerUse {
    pub recipe: String,
    pub category: String,
    pub flow: f64,
}

/// One ingredient of a producing recipe, with its solved value
#[derive(Debug, Clone, PartialEq)]
pub struct InputUse {
    pub name: String,
    pub amount: f64,
    pub value: f64,
}

/// A recipe producing the inspected resource
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerUse {
    pub recipe: String,
    pub category: String,
    pub flow: f64,
    pub inputs: Vec<InputUse>,
}

/// Everything known about the flow of one resource
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub resource: String,
    pub value: f64,
    pub as_ingredient: Vec<ConsumerUse>,
    pub as_product: Vec<ProducerUse>,
}

/// Find every recipe using `resource` as an ingredient or a product.
///
/// A recipe is listed at most once per role, even if it mentions the resource twice.
pub fn inspect(
    resource: &str,
    recipes: &RecipeBook,
    solution: &Solution,
) -> Result<FlowReport, InspectError> {
    let value = solution
        .value(resource)
        .ok_or_else(|| InspectError::UnknownResource(resource.to_string()))?;
    let flow_of = |recipe: &str| {
        solution
            .flow(recipe)
            .ok_or_else(|| InspectError::MissingFlow(recipe.to_string()))
    };

    let mut as_ingredient = vec![];
    for (name, recipe) in recipes {
        if recipe.ingredients.iter().any(|i| i.name == resource) {
            as_ingredient.push(ConsumerUse {
                recipe: name.clone(),
                category: recipe.category.clone(),
                flow: flow_of(name)?,
            });
        }
    }

    let mut as_product = vec![];
    for (name, recipe) in recipes {
        if !recipe.products.iter().any(|p| p.name == resource) {
            continue;
        }
        let inputs = recipe
            .ingredients
            .iter()
            .map(|ingredient| {
                let value = solution.value(&ingredient.name).ok_or_else(|| {
                    InspectError::MissingIngredientValue {
                        recipe: name.clone(),
                        ingredient: ingredient.name.clone(),
                    }
                })?;
                Ok(InputUse {
                    name: ingredient.name.clone(),
                    amount: ingredient.amount,
                    value,
                })
            })
            .collect::<Result<Vec<_>, InspectError>>()?;
        as_product.push(ProducerUse {
            recipe: name.clone(),
            category: recipe.category.clone(),
            flow: flow_of(name)?,
            inputs,
        });
    }

    Ok(FlowReport {
        resource: resource.to_string(),
        value,
        as_ingredient,
        as_product,
    })
}

impl Display for FlowReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} cost = {}", self.resource, self.value)?;
        writeln!(f, "As ingredient")?;
        for consumer in &self.as_ingredient {
            writeln!(
                f,
                "Flow: {}   Recipe: {} in {}",
                consumer.flow, consumer.recipe, consumer.category
            )?;
        }
        writeln!(f, "As product")?;
        for producer in &self.as_product {
            writeln!(
                f,
                "Flow: {}   Recipe: {} in {}",
                producer.flow, producer.recipe, producer.category
            )?;
            for input in &producer.inputs {
                write!(f, "{} = {} x {}   ", input.name, input.amount, input.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
