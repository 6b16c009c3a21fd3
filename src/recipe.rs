//! Recipe data as found in `recipes.json`.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cost::Medium;

/// All recipes, keyed by recipe name, in the order of the recipe file
pub type RecipeBook = IndexMap<String, Recipe>;

/// A conversion rule consuming ingredients and emitting products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Building or process tier; selects the productivity rate
    #[serde(default)]
    pub category: String,
    /// Whether productivity bonuses apply to the products
    #[serde(default)]
    pub productivity: bool,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A resource consumed by a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub medium: Medium,
}

/// A resource emitted by a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
    /// Part of the amount that is given back unchanged and gets no productivity bonus
    #[serde(default)]
    pub catalyst_amount: f64,
    #[serde(default = "certain")]
    pub probability: f64,
    #[serde(rename = "type", default)]
    pub medium: Medium,
}

fn certain() -> f64 {
    1.
}

impl Product {
    /// A product with a fixed amount, no catalyst, always produced
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Product {
            name: name.into(),
            amount: Some(amount),
            amount_min: None,
            amount_max: None,
            catalyst_amount: 0.,
            probability: 1.,
            medium: Medium::Item,
        }
    }

    /// The amount before productivity and probability: the fixed amount,
    /// or the middle of the `[amount_min, amount_max]` range.
    pub fn nominal_amount(&self) -> Option<f64> {
        match (self.amount, self.amount_min, self.amount_max) {
            (Some(amount), _, _) => Some(amount),
            (None, Some(min), Some(max)) => Some((min + max) / 2.),
            _ => None,
        }
    }
}

impl Ingredient {
    /// An ingredient carried as items
    pub fn item(name: impl Into<String>, amount: f64) -> Self {
        Ingredient {
            name: name.into(),
            amount,
            medium: Medium::Item,
        }
    }

    /// An ingredient carried as fluid
    pub fn fluid(name: impl Into<String>, amount: f64) -> Self {
        Ingredient {
            name: name.into(),
            amount,
            medium: Medium::Fluid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recipe() {
        let json = r#"{
            "category": "chemistry",
            "productivity": true,
            "ingredients": [
                {"name": "water", "amount": 100, "type": "fluid"},
                {"name": "coal", "amount": 2, "type": "item"}
            ],
            "products": [
                {"name": "tar", "amount_min": 10, "amount_max": 30, "probability": 0.5, "type": "fluid"},
                {"name": "coal", "amount": 1, "catalyst_amount": 1, "probability": 1}
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.productivity);
        assert_eq!(recipe.ingredients[0], Ingredient::fluid("water", 100.));
        assert_eq!(recipe.products[0].nominal_amount(), Some(20.));
        assert_eq!(recipe.products[0].probability, 0.5);
        assert_eq!(recipe.products[1].catalyst_amount, 1.);
    }

    #[test]
    fn defaults() {
        let product: Product = serde_json::from_str(r#"{"name": "gear"}"#).unwrap();
        assert_eq!(product.nominal_amount(), None);
        assert_eq!(product.probability, 1.);
        assert_eq!(product.medium, Medium::Item);
    }

    #[test]
    fn book_keeps_file_order() {
        let json = r#"{
            "zinc-plate": {"category": "smelting", "products": [{"name": "zinc", "amount": 1}]},
            "alloy": {"category": "crafting", "products": [{"name": "alloy", "amount": 1}]},
            "mixing": {"category": "chemistry", "products": [{"name": "slurry", "amount": 1}]}
        }"#;
        let book: RecipeBook = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = book.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zinc-plate", "alloy", "mixing"]);
    }
}
