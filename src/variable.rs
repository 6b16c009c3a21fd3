//! A [Variable] is the decision variable attached to one named resource.
//! Its solved value is the resource's steady-state rate in the plan.
//!
//! Variables are created by the [VariableRegistry] the first time a recipe
//! mentions the resource. Each variable has a [VariableDefinition] that stores
//! its name and bounds.
use std::fmt::Formatter;

use fnv::FnvHashMap as HashMap;

/// Upper bound given to every resource that has no explicit cap.
///
/// It is large enough never to bind a meaningful plan, so a resource whose
/// solved value reaches it is reported as saturated.
pub const MAX_COST: f64 = 10_000_000.;

/// A handle to a resource variable.
///
/// ## Warning
/// `Eq` is implemented on this type, but `v1 == v2` is only meaningful for
/// variables coming from the same [VariableRegistry].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    /// A variable is nothing more than an index into the `definitions` of a VariableRegistry.
    /// That's why it can be `Copy`.
    index: usize,
}

impl Variable {
    fn at(index: usize) -> Self {
        Self { index }
    }

    /// Position of the variable in its registry, which is also its column in the solver.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An element that can be displayed if you give a variable display function
pub trait FormatWithVars {
    /// Write the element to the formatter. See [std::fmt::Display]
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result;

    /// Write the elements, naming the variables v0, v1, ... vn
    fn format_debug(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_with(f, |f, var| write!(f, "v{}", var.index()))
    }
}

/// The name and bounds of a resource variable.
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition {
    pub(crate) name: String,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl VariableDefinition {
    fn new(name: &str, max: f64) -> Self {
        VariableDefinition {
            name: name.to_string(),
            min: 0.,
            max,
        }
    }

    /// Name of the resource
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower bound, always 0: production rates are never negative
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Owns one variable per resource name.
///
/// The registry is filled in a single pass while recipes are turned into
/// constraints, and is read afterwards to build the objective and to map
/// solver columns back to resource names.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    by_name: HashMap<String, Variable>,
    definitions: Vec<VariableDefinition>,
    default_max: f64,
}

impl Default for VariableRegistry {
    fn default() -> Self {
        VariableRegistry::new(MAX_COST)
    }
}

impl VariableRegistry {
    /// Create an empty registry whose variables will be bounded by `[0, default_max]`
    pub fn new(default_max: f64) -> Self {
        VariableRegistry {
            by_name: HashMap::default(),
            definitions: vec![],
            default_max,
        }
    }

    /// Return the variable of the resource, creating it on first reference.
    ///
    /// ```
    /// # use recipe_lp::variable::VariableRegistry;
    /// let mut registry = VariableRegistry::default();
    /// let a = registry.get_or_create("iron-plate");
    /// let b = registry.get_or_create("iron-plate");
    /// assert_eq!(a, b);
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn get_or_create(&mut self, name: &str) -> Variable {
        if let Some(&variable) = self.by_name.get(name) {
            return variable;
        }
        let variable = Variable::at(self.definitions.len());
        self.definitions
            .push(VariableDefinition::new(name, self.default_max));
        self.by_name.insert(name.to_string(), variable);
        variable
    }

    /// Look up a resource without creating it
    pub fn get(&self, name: &str) -> Option<Variable> {
        self.by_name.get(name).copied()
    }

    /// Replace the upper bound of a variable
    pub fn set_max(&mut self, variable: Variable, max: f64) {
        self.definitions[variable.index()].max = max;
    }

    /// The definition of a variable
    pub fn definition(&self, variable: Variable) -> &VariableDefinition {
        &self.definitions[variable.index()]
    }

    /// The resource name of a variable
    pub fn name(&self, variable: Variable) -> &str {
        &self.definitions[variable.index()].name
    }

    /// The upper bound given to variables without an explicit cap
    pub fn default_max(&self) -> f64 {
        self.default_max
    }

    /// Iterate over the variables in creation order, with their definitions
    pub fn iter_variables_with_def(
        &self,
    ) -> impl Iterator<Item = (Variable, &VariableDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (Variable::at(i), def))
    }

    /// Iterate over all variables in creation order
    pub fn iter(&self) -> impl Iterator<Item = Variable> {
        (0..self.definitions.len()).map(Variable::at)
    }

    /// Returns the number of registered resources
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when no resource was registered
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
