pub mod ast;
pub mod functions;
pub mod resolver;

pub use ast::{
    ASTNode, ChainTerm, CompileError, ComparisonOperator, Context, EvaluationError, Operator,
    Parser, ParserConfig, SyntaxError, Value,
};
pub use expressions_macros::expression_fn;
pub use functions::{DefaultFunctions, FunctionRegistry, Functions};
pub use resolver::{EmptyResolver, MapResolver, MissingVariable, Resolver};

use log::debug;
use rayon::prelude::*;
use thiserror::Error;

/// Failure of the one-shot [`evaluate_expression`] entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// Compiles `expression` with the default parser configuration.
pub fn compile(expression: &str) -> Result<ASTNode, CompileError> {
    Parser::parse_expression(expression)
}

/// Compiles and evaluates `expression` once, against the default math functions.
pub fn evaluate_expression(expression: &str, resolver: &dyn Resolver) -> Result<Value, Error> {
    let ast = compile(expression)?;
    Ok(ast.solve(&Context::with_resolver(resolver))?)
}

/// Owns the function registry and parser settings used by a host.
///
/// A compiled tree is immutable, so it can be evaluated any number of times and from
/// many threads; every evaluation gets a fresh [`Context`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    functions: FunctionRegistry,
    config: ParserConfig,
}

impl Evaluator {
    /// Evaluator with the default functions (math catalog and `if`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self {
            functions,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&Context<'_>, &[ASTNode]) -> Result<Value, EvaluationError> + Send + Sync + 'static,
    {
        self.functions.register_function(name, function);
    }

    pub fn parse_expression(&self, expression: &str) -> Result<ASTNode, CompileError> {
        Parser::parse_expression_with(expression, &self.config)
    }

    /// Parses and evaluates an expression in one step.
    ///
    /// # Examples
    ///
    /// ```
    /// use expressions_rs::{Evaluator, MapResolver, Value};
    ///
    /// let evaluator = Evaluator::new();
    /// let resolver: MapResolver = [("x", 4.5), ("y", 2.0)].into_iter().collect();
    /// let result = evaluator.evaluate_expression("(5 + x) * y", &resolver).unwrap();
    /// assert_eq!(result, Value::Number(19.0));
    /// ```
    pub fn evaluate_expression(
        &self,
        expression: &str,
        resolver: &dyn Resolver,
    ) -> Result<Value, Error> {
        let ast = self.parse_expression(expression)?;
        Ok(self.evaluate_ast(&ast, resolver)?)
    }

    pub fn evaluate_ast(
        &self,
        ast: &ASTNode,
        resolver: &dyn Resolver,
    ) -> Result<Value, EvaluationError> {
        ast.solve(&Context::new(resolver, &self.functions))
    }

    /// Evaluates one shared tree against every resolver in parallel. Results keep the
    /// order of `resolvers`; a failing evaluation does not affect the others.
    pub fn evaluate_batch<R>(
        &self,
        ast: &ASTNode,
        resolvers: &[R],
    ) -> Vec<Result<Value, EvaluationError>>
    where
        R: Resolver,
    {
        debug!("Evaluating {} against {} resolvers", ast, resolvers.len());
        resolvers
            .par_iter()
            .map(|resolver| self.evaluate_ast(ast, resolver))
            .collect()
    }
}
