use crate::ast::{ASTNode, ChainTerm, Context, EvaluationError, Value};
use log::trace;

impl ASTNode {
    /// Evaluates the tree against `ctx`. The tree is never modified, and the first
    /// failing sub-expression aborts the whole evaluation.
    pub fn solve(&self, ctx: &Context<'_>) -> Result<Value, EvaluationError> {
        trace!("Solving {:?}", self);
        match self {
            ASTNode::Literal(value) => Ok(value.clone()),

            ASTNode::Field(name) => ctx
                .resolver()
                .resolve(name)
                .ok_or_else(|| EvaluationError::UnresolvedVariable { name: name.clone() }),

            ASTNode::Chain { head, terms } => {
                let head = head.solve(ctx)?.as_number()?;
                let result = fold_chain(head, terms, ctx)?;
                Ok(Value::Number(result))
            }

            ASTNode::Comparison {
                left,
                operator,
                right,
            } => {
                let left_value = left.solve(ctx)?;
                let right_value = right.solve(ctx)?;
                Ok(Value::Boolean(operator.apply(&left_value, &right_value)?))
            }

            ASTNode::Group(inner) => inner.solve(ctx),

            ASTNode::FunctionCall { name, args } => ctx.functions().call(ctx, name, args),
        }
    }
}

/// Left-to-right fold: every term applies its operator to the running value.
fn fold_chain(
    head: f64,
    terms: &[ChainTerm],
    ctx: &Context<'_>,
) -> Result<f64, EvaluationError> {
    terms.iter().try_fold(head, |accumulated, term| {
        let operand = term.operand.solve(ctx)?.as_number()?;
        Ok(term.operator.apply(accumulated, operand))
    })
}
