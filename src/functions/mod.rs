pub mod conditional;
pub mod exponential;
pub mod hyperbolic;
pub mod trigonometric;

use crate::ast::{ASTNode, Context, EvaluationError, Value};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Calling convention of the built-in functions: the evaluation context plus the
/// unevaluated argument expressions.
pub type NativeFunction = fn(&Context<'_>, &[ASTNode]) -> Result<Value, EvaluationError>;

pub type Function =
    Arc<dyn Fn(&Context<'_>, &[ASTNode]) -> Result<Value, EvaluationError> + Send + Sync>;

/// Dispatches function calls by name.
///
/// Arguments arrive unevaluated; an implementation solves the ones it needs against
/// `ctx`, which is what allows short-circuiting functions such as `if`.
pub trait Functions: Send + Sync {
    fn call(
        &self,
        ctx: &Context<'_>,
        name: &str,
        args: &[ASTNode],
    ) -> Result<Value, EvaluationError>;
}

fn math_catalog() -> impl Iterator<Item = &'static (&'static str, NativeFunction)> {
    trigonometric::FUNCTIONS
        .iter()
        .chain(hyperbolic::FUNCTIONS)
        .chain(exponential::FUNCTIONS)
}

/// The built-in math functions, without any allocation or registration step.
#[derive(Debug, Copy, Clone, Default)]
pub struct DefaultFunctions;

impl Functions for DefaultFunctions {
    fn call(
        &self,
        ctx: &Context<'_>,
        name: &str,
        args: &[ASTNode],
    ) -> Result<Value, EvaluationError> {
        let (_, function) = math_catalog()
            .find(|(candidate, _)| *candidate == name)
            .ok_or_else(|| EvaluationError::UndefinedFunction {
                name: name.to_string(),
            })?;
        function(ctx, args)
    }
}

/// Named functions supplied by the host, on top of (or instead of) the built-ins.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    /// An empty registry; every call fails with `UndefinedFunction`.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The math catalog plus `if`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        trigonometric::register(&mut registry);
        hyperbolic::register(&mut registry);
        exponential::register(&mut registry);
        conditional::register(&mut registry);
        registry
    }

    /// Registers `function` under `name`, replacing any previous function of that name.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&Context<'_>, &[ASTNode]) -> Result<Value, EvaluationError> + Send + Sync + 'static,
    {
        debug!("Registering function '{}'", name);
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    pub(crate) fn register_table(&mut self, table: &[(&str, NativeFunction)]) {
        for (name, function) in table {
            self.register_function(name, *function);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl Functions for FunctionRegistry {
    fn call(
        &self,
        ctx: &Context<'_>,
        name: &str,
        args: &[ASTNode],
    ) -> Result<Value, EvaluationError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| EvaluationError::UndefinedFunction {
                name: name.to_string(),
            })?;
        function(ctx, args)
    }
}
