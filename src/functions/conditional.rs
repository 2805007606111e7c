use super::FunctionRegistry;
use crate::ast::{ASTNode, Context, EvaluationError, Value};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_function("if", conditional);
}

/// `if(condition, then, else)`. Only the branch selected by the truthiness of the
/// condition is evaluated, so the other one may reference anything.
pub fn conditional(ctx: &Context<'_>, args: &[ASTNode]) -> Result<Value, EvaluationError> {
    let [condition, then_branch, else_branch] = args else {
        return Err(EvaluationError::Arity {
            name: "if".to_string(),
            expected: 3,
        });
    };

    if condition.solve(ctx)?.is_truthy() {
        then_branch.solve(ctx)
    } else {
        else_branch.solve(ctx)
    }
}
