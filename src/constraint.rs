//! Constraints define the inequalities that must hold in the solution.
//!
//! Every recipe contributes exactly one constraint of the form
//! `expression <= upper_bound`, with no lower bound.
use core::fmt::{Debug, Formatter};

use crate::expression::LinearExpression;
use crate::variable::{FormatWithVars, Variable, VariableRegistry};

/// A named `expression <= upper_bound` row.
#[derive(Clone)]
pub struct Constraint {
    /// Name of the recipe this constraint comes from
    pub(crate) name: String,
    pub(crate) expression: LinearExpression,
    pub(crate) upper_bound: f64,
}

impl Constraint {
    /// Create a constraint from an already accumulated expression
    pub fn new(name: impl Into<String>, expression: LinearExpression, upper_bound: f64) -> Self {
        Constraint {
            name: name.into(),
            expression,
            upper_bound,
        }
    }

    /// The name of the constraint
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constrained expression
    pub fn expression(&self) -> &LinearExpression {
        &self.expression
    }

    /// The right hand side of the inequality
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Shortcut for `self.expression().coefficient(variable)`
    pub fn coefficient(&self, variable: Variable) -> f64 {
        self.expression.coefficient(variable)
    }

    /// Display the constraint with resource names instead of column indices
    pub fn display<'a>(&'a self, variables: &'a VariableRegistry) -> impl std::fmt::Display + 'a {
        Named {
            constraint: self,
            variables,
        }
    }
}

impl FormatWithVars for Constraint {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        self.expression.format_with(f, variable_format)?;
        write!(f, " <= {}", self.upper_bound)
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}

struct Named<'a> {
    constraint: &'a Constraint,
    variables: &'a VariableRegistry,
}

impl std::fmt::Display for Named<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.constraint.name)?;
        self.constraint
            .format_with(f, |f, var| write!(f, "{}", self.variables.name(var)))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// A constraint reference contains the sequence id of the constraint within the model
pub struct ConstraintReference {
    pub(crate) index: usize,
}

impl ConstraintReference {
    /// Position of the constraint, which is also its row in the solver
    pub fn index(&self) -> usize {
        self.index
    }
}
