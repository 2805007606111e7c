use expressions_rs::{evaluate_expression, expression_fn, FunctionRegistry, MapResolver};
use expressions_rs::{ASTNode, Context, EvaluationError, Evaluator, Value};
use log::debug;

#[expression_fn]
fn hypot(a: f64, b: f64) -> Result<Value, EvaluationError> {
    Ok(Value::Number(a.hypot(b)))
}

#[expression_fn]
fn label(name: String, value: f64) -> Result<Value, EvaluationError> {
    Ok(Value::String(format!("{name}={value}")))
}

fn main() {
    pretty_env_logger::init();

    let resolver: MapResolver = [("x", 4.5), ("y", 2.0)].into_iter().collect();
    for expression in ["(5+x)*y", "cos(0.1)", "sqrt(8, 3)", "x >= y", "'a' == 1"] {
        match evaluate_expression(expression, &resolver) {
            Ok(result) => println!("{expression} = {result}"),
            Err(err) => println!("{expression}: {err}"),
        }
    }

    let mut registry = FunctionRegistry::with_defaults();
    registry.register_function("hypot", hypot);
    registry.register_function("label", label);
    let evaluator = Evaluator::with_functions(registry);
    debug!("functions: {:?}", evaluator.functions().names());

    for expression in [
        "hypot(3, 4)",
        "label('side', hypot(x, y))",
        "if(x > 10, 'big', 'small')",
        "hypot(1)",
        "z * 2",
    ] {
        match evaluator.evaluate_expression(expression, &resolver) {
            Ok(result) => println!("{expression} = {result}"),
            Err(err) => println!("{expression}: {err}"),
        }
    }
}
