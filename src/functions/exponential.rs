use super::{FunctionRegistry, NativeFunction};
use crate::ast::{ASTNode, Context, EvaluationError, Value};
use expressions_macros::expression_fn;

pub const FUNCTIONS: &[(&str, NativeFunction)] = &[("log", log), ("sqrt", sqrt)];

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_table(FUNCTIONS);
}

/// Natural logarithm.
#[expression_fn]
pub fn log(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.ln()))
}

/// `sqrt(x)` is the square root, `sqrt(x, n)` the n-th root `x^(1/n)`.
#[expression_fn]
pub fn sqrt(x: f64, n: Option<f64>) -> Result<Value, EvaluationError> {
    let root = match n {
        Some(n) => x.powf(1.0 / n),
        None => x.sqrt(),
    };
    Ok(Value::Number(root))
}
