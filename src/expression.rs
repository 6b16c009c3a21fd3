use std::fmt::{Debug, Formatter};

use fnv::FnvHashMap as HashMap;

use crate::variable::{FormatWithVars, Variable};

/// A linear expression without a constant component.
///
/// Adding a term for a variable that is already present accumulates into the
/// existing coefficient, so a resource consumed and produced by the same
/// recipe ends up with a single net coefficient.
#[derive(Default, Clone, PartialEq)]
pub struct LinearExpression {
    pub(crate) coefficients: HashMap<Variable, f64>,
}

impl LinearExpression {
    /// Create an empty expression
    pub fn new() -> Self {
        LinearExpression {
            coefficients: HashMap::default(),
        }
    }

    /// Add `coefficient * variable` to the expression
    ///
    /// ```
    /// # use recipe_lp::{LinearExpression, variable::VariableRegistry};
    /// let mut registry = VariableRegistry::default();
    /// let water = registry.get_or_create("water");
    /// let mut expr = LinearExpression::new();
    /// expr.add_term(water, -10.);
    /// expr.add_term(water, 4.);
    /// assert_eq!(expr.coefficient(water), -6.);
    /// ```
    pub fn add_term(&mut self, variable: Variable, coefficient: f64) {
        *self.coefficients.entry(variable).or_default() += coefficient;
    }

    /// The coefficient of a variable, 0 if the variable does not appear
    pub fn coefficient(&self, variable: Variable) -> f64 {
        self.coefficients.get(&variable).copied().unwrap_or(0.)
    }

    /// An iterator over variables and their coefficients
    pub fn linear_coefficients(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.coefficients.iter().map(|(&var, &c)| (var, c))
    }

    /// Number of variables with a coefficient
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// True if no variable has a coefficient
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Evaluate the expression given the values of the variables, indexed by column
    pub fn eval_with(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .map(|(var, coefficient)| coefficient * values[var.index()])
            .sum()
    }
}

impl FormatWithVars for LinearExpression {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, mut variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        let mut terms: Vec<_> = self.linear_coefficients().collect();
        terms.sort_by_key(|&(var, _)| var);
        let mut first = true;
        for (var, coeff) in terms {
            if coeff != 0f64 {
                if first {
                    first = false;
                } else {
                    write!(f, " + ")?;
                }
                if (coeff - 1.).abs() > f64::EPSILON {
                    write!(f, "{} ", coeff)?;
                }
                variable_format(f, var)?;
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl Debug for LinearExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}
