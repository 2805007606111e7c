use super::{FunctionRegistry, NativeFunction};
use crate::ast::{ASTNode, Context, EvaluationError, Value};
use expressions_macros::expression_fn;

pub const FUNCTIONS: &[(&str, NativeFunction)] = &[
    ("cosh", cosh),
    ("acosh", acosh),
    ("sinh", sinh),
    ("asinh", asinh),
    ("atanh", atanh),
];

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_table(FUNCTIONS);
}

#[expression_fn]
pub fn cosh(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.cosh()))
}

#[expression_fn]
pub fn acosh(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.acosh()))
}

#[expression_fn]
pub fn sinh(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.sinh()))
}

#[expression_fn]
pub fn asinh(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.asinh()))
}

#[expression_fn]
pub fn atanh(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.atanh()))
}
