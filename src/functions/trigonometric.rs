use super::{FunctionRegistry, NativeFunction};
use crate::ast::{ASTNode, Context, EvaluationError, Value};
use expressions_macros::expression_fn;

pub const FUNCTIONS: &[(&str, NativeFunction)] = &[
    ("cos", cos),
    ("acos", acos),
    ("sin", sin),
    ("asin", asin),
    ("tan", tan),
    ("atan", atan),
    ("atan2", atan2),
];

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_table(FUNCTIONS);
}

#[expression_fn]
pub fn cos(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.cos()))
}

#[expression_fn]
pub fn acos(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.acos()))
}

#[expression_fn]
pub fn sin(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.sin()))
}

#[expression_fn]
pub fn asin(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.asin()))
}

#[expression_fn]
pub fn tan(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.tan()))
}

#[expression_fn]
pub fn atan(x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(x.atan()))
}

/// Four-quadrant arctangent of `y / x`.
#[expression_fn]
pub fn atan2(y: f64, x: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(y.atan2(x)))
}
