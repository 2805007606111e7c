use std::fmt;

mod context;
mod error;
mod evaluator;
mod parser;
mod value;

pub use context::Context;
pub use error::{CompileError, EvaluationError, SyntaxError};
pub use parser::{ExpressionParser as Parser, ParserConfig, DEFAULT_MAX_DEPTH};
pub use value::Value;

/// Compiled expression tree. Built once by the parser and never mutated afterwards,
/// so a single tree can be evaluated repeatedly and concurrently.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Literal(Value),
    Field(String),
    /// Left-to-right fold of same-precedence operators: `head op1 t1 op2 t2 ...`.
    Chain {
        head: Box<ASTNode>,
        terms: Vec<ChainTerm>,
    },
    Comparison {
        left: Box<ASTNode>,
        operator: ComparisonOperator,
        right: Box<ASTNode>,
    },
    /// Bracketed sub-expression, evaluates exactly like its inner node.
    Group(Box<ASTNode>),
    /// Arguments stay unevaluated; the callee decides what to evaluate and when.
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainTerm {
    pub operator: Operator,
    pub operand: ASTNode,
}

impl ChainTerm {
    pub fn new(operator: Operator, operand: ASTNode) -> Self {
        Self { operator, operand }
    }
}

impl ASTNode {
    pub fn number(value: f64) -> Self {
        ASTNode::Literal(Value::Number(value))
    }

    pub fn string(value: &str) -> Self {
        ASTNode::Literal(Value::String(value.to_string()))
    }

    pub fn field(name: &str) -> Self {
        ASTNode::Field(name.to_string())
    }

    pub fn chain(head: ASTNode, terms: Vec<(Operator, ASTNode)>) -> Self {
        ASTNode::Chain {
            head: Box::new(head),
            terms: terms
                .into_iter()
                .map(|(operator, operand)| ChainTerm::new(operator, operand))
                .collect(),
        }
    }

    pub fn comparison(left: ASTNode, operator: ComparisonOperator, right: ASTNode) -> Self {
        ASTNode::Comparison {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn group(inner: ASTNode) -> Self {
        ASTNode::Group(Box::new(inner))
    }

    pub fn call(name: &str, args: Vec<ASTNode>) -> Self {
        ASTNode::FunctionCall {
            name: name.to_string(),
            args,
        }
    }

    /// Nesting depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let children = match self {
            ASTNode::Literal(_) | ASTNode::Field(_) => 0,
            ASTNode::Chain { head, terms } => terms
                .iter()
                .map(|term| term.operand.depth())
                .fold(head.depth(), usize::max),
            ASTNode::Comparison { left, right, .. } => left.depth().max(right.depth()),
            ASTNode::Group(inner) => inner.depth(),
            ASTNode::FunctionCall { args, .. } => {
                args.iter().map(ASTNode::depth).max().unwrap_or(0)
            }
        };
        children + 1
    }

    /// How tightly the rendered node holds together: comparisons 0, chains the
    /// precedence of their loosest operator, everything else binds like an atom.
    fn binding(&self) -> u8 {
        if self.as_signed_atom().is_some() {
            return ATOM_BINDING;
        }
        match self {
            ASTNode::Comparison { .. } => 0,
            ASTNode::Chain { head, terms } => terms
                .iter()
                .map(|term| term.operator.precedence())
                .min()
                .map_or_else(|| head.binding(), |loosest| loosest.min(head.binding())),
            _ => ATOM_BINDING,
        }
    }

    /// A chain of the shape `0 ± atom`, which is what a signed atom compiles to.
    fn as_signed_atom(&self) -> Option<(Operator, &ASTNode)> {
        let ASTNode::Chain { head, terms } = self else {
            return None;
        };
        match (head.as_ref(), terms.as_slice()) {
            (ASTNode::Literal(Value::Number(zero)), [term])
                if *zero == 0.0
                    && matches!(term.operator, Operator::Add | Operator::Subtract)
                    && !matches!(
                        term.operand,
                        ASTNode::Chain { .. } | ASTNode::Comparison { .. }
                    ) =>
            {
                Some((term.operator, &term.operand))
            }
            _ => None,
        }
    }
}

/// Renders source text. Trees produced by the parser re-compile to an equal tree;
/// hand-built trees get brackets wherever the grammar would otherwise regroup them,
/// so the text always evaluates like the tree.
impl fmt::Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((sign, operand)) = self.as_signed_atom() {
            return write!(f, "{}{}", sign, operand);
        }
        match self {
            ASTNode::Literal(Value::String(s)) if s.contains('"') => write!(f, "'{}'", s),
            ASTNode::Literal(Value::String(s)) => write!(f, "\"{}\"", s),
            ASTNode::Literal(value) => write!(f, "{}", value),
            ASTNode::Field(name) => f.write_str(name),
            ASTNode::Chain { head, terms } => {
                let mut text = head.to_string();
                let mut binding = head.binding();
                for term in terms {
                    let strength = term.operator.precedence();
                    // The fold so far binds looser than this operator.
                    if binding < strength {
                        text = format!("({})", text);
                    }
                    if term.operand.binding() <= strength {
                        text = format!("{} {} ({})", text, term.operator, term.operand);
                    } else {
                        text = format!("{} {} {}", text, term.operator, term.operand);
                    }
                    binding = strength;
                }
                f.write_str(&text)
            }
            ASTNode::Comparison {
                left,
                operator,
                right,
            } => {
                let side = |node: &ASTNode| match node {
                    ASTNode::Comparison { .. } => format!("({})", node),
                    _ => node.to_string(),
                };
                write!(f, "{} {} {}", side(left), operator, side(right))
            }
            ASTNode::Group(inner) => write!(f, "({})", inner),
            ASTNode::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

const ATOM_BINDING: u8 = 4;

impl Operator {
    /// 1 for `+ -`, 2 for `* / %`, 3 for `^`.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 2,
            Operator::Power => 3,
        }
    }

    /// Applies the operator with IEEE semantics: dividing by zero gives an infinity or
    /// NaN. `%` rounds both sides to the nearest integer first.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Modulo => left.round() % right.round(),
            Operator::Power => left.powf(right),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for Operator {
    type Error = EvaluationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Modulo),
            "^" => Ok(Operator::Power),
            _ => Err(EvaluationError::UnsupportedOperator {
                op: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    /// Ordering operators need two numbers. `==` and `!=` never coerce: values with
    /// different tags are simply unequal, so `"1" == 1` is `false` rather than an error.
    pub fn apply(&self, left: &Value, right: &Value) -> Result<bool, EvaluationError> {
        let numeric = |compare: fn(&f64, &f64) -> bool| -> Result<bool, EvaluationError> {
            Ok(compare(&left.as_number()?, &right.as_number()?))
        };
        match self {
            ComparisonOperator::Equal => Ok(left == right),
            ComparisonOperator::NotEqual => Ok(left != right),
            ComparisonOperator::LessThan => numeric(f64::lt),
            ComparisonOperator::GreaterThan => numeric(f64::gt),
            ComparisonOperator::LessThanOrEqual => numeric(f64::le),
            ComparisonOperator::GreaterThanOrEqual => numeric(f64::ge),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for ComparisonOperator {
    type Error = EvaluationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "<" => Ok(ComparisonOperator::LessThan),
            ">" => Ok(ComparisonOperator::GreaterThan),
            "<=" => Ok(ComparisonOperator::LessThanOrEqual),
            ">=" => Ok(ComparisonOperator::GreaterThanOrEqual),
            "==" => Ok(ComparisonOperator::Equal),
            "!=" => Ok(ComparisonOperator::NotEqual),
            _ => Err(EvaluationError::UnsupportedOperator {
                op: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_from_symbol() {
        assert_eq!(Operator::try_from("^"), Ok(Operator::Power));
        assert_eq!(
            ComparisonOperator::try_from(">="),
            Ok(ComparisonOperator::GreaterThanOrEqual)
        );
        assert_eq!(
            Operator::try_from("invalid operator"),
            Err(EvaluationError::UnsupportedOperator {
                op: "invalid operator".to_string()
            })
        );
        assert!(ComparisonOperator::try_from("=>").is_err());
    }

    #[test]
    fn test_operator_apply() {
        assert_eq!(Operator::Add.apply(1.0, 1.5), 2.5);
        assert_eq!(Operator::Subtract.apply(2.0, 1.0), 1.0);
        assert_eq!(Operator::Multiply.apply(2.0, 1.5), 3.0);
        assert_eq!(Operator::Divide.apply(2.0, 1.8), 2.0 / 1.8);
        assert_eq!(Operator::Power.apply(4.0, 2.0), 16.0);
        assert_eq!(Operator::Power.apply(3.6, 1.8), 3.6f64.powf(1.8));
    }

    #[test]
    fn test_modulo_rounds_operands() {
        assert_eq!(Operator::Modulo.apply(7.0, 3.0), 1.0);
        assert_eq!(Operator::Modulo.apply(7.6, 2.5), 2.0); // 8 % 3
        assert_eq!(Operator::Modulo.apply(-7.0, 3.0), -1.0);
        assert!(Operator::Modulo.apply(5.0, 0.2).is_nan()); // 5 % 0
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        assert_eq!(Operator::Divide.apply(1.0, 0.0), f64::INFINITY);
        assert_eq!(Operator::Divide.apply(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(Operator::Divide.apply(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_equality_does_not_coerce() {
        let eq = ComparisonOperator::Equal;
        assert_eq!(eq.apply(&Value::from("a"), &Value::from(1)), Ok(false));
        assert_eq!(eq.apply(&Value::from("1"), &Value::from(1)), Ok(false));
        assert_eq!(eq.apply(&Value::Null, &Value::Boolean(false)), Ok(false));
        assert_eq!(eq.apply(&Value::Null, &Value::Null), Ok(true));
        assert_eq!(
            ComparisonOperator::NotEqual.apply(&Value::from("a"), &Value::from(1)),
            Ok(true)
        );
    }

    #[test]
    fn test_ordering_requires_numbers() {
        let lt = ComparisonOperator::LessThan;
        assert_eq!(lt.apply(&Value::from(1), &Value::from(2)), Ok(true));
        assert_eq!(
            lt.apply(&Value::from("a"), &Value::from(2)),
            Err(EvaluationError::TypeMismatch {
                value: Value::from("a")
            })
        );
        assert!(lt.apply(&Value::from(1), &Value::Boolean(true)).is_err());
    }

    #[test]
    fn test_depth() {
        assert_eq!(ASTNode::number(1.0).depth(), 1);
        let ast = ASTNode::chain(
            ASTNode::number(1.0),
            vec![(
                Operator::Add,
                ASTNode::group(ASTNode::call("cos", vec![ASTNode::field("x")])),
            )],
        );
        assert_eq!(ast.depth(), 4);
    }

    #[test]
    fn test_display_signed_atom() {
        let negated = ASTNode::chain(
            ASTNode::number(0.0),
            vec![(Operator::Subtract, ASTNode::field("x"))],
        );
        let ast = ASTNode::chain(ASTNode::number(2.0), vec![(Operator::Multiply, negated)]);
        assert_eq!(ast.to_string(), "2 * -x");
    }

    #[test]
    fn test_display_brackets_hand_built_chains() {
        let sum = ASTNode::chain(
            ASTNode::number(1.0),
            vec![(Operator::Add, ASTNode::number(2.0))],
        );

        let product = ASTNode::chain(
            sum.clone(),
            vec![(Operator::Multiply, ASTNode::number(3.0))],
        );
        assert_eq!(product.to_string(), "(1 + 2) * 3");

        let mixed = ASTNode::chain(
            ASTNode::number(1.0),
            vec![
                (Operator::Add, ASTNode::number(2.0)),
                (Operator::Multiply, ASTNode::number(3.0)),
                (Operator::Subtract, ASTNode::number(4.0)),
            ],
        );
        assert_eq!(mixed.to_string(), "(1 + 2) * 3 - 4");

        let right = ASTNode::chain(ASTNode::number(5.0), vec![(Operator::Subtract, sum)]);
        assert_eq!(right.to_string(), "5 - (1 + 2)");

        let compared = ASTNode::comparison(
            ASTNode::comparison(
                ASTNode::number(1.0),
                ComparisonOperator::LessThan,
                ASTNode::number(2.0),
            ),
            ComparisonOperator::Equal,
            ASTNode::number(1.0),
        );
        assert_eq!(compared.to_string(), "(1 < 2) == 1");

        let ctx = Context::default();
        for tree in [product, mixed, right, compared] {
            let reparsed = Parser::parse_expression(&tree.to_string()).unwrap();
            assert_eq!(reparsed.solve(&ctx), tree.solve(&ctx), "{}", tree);
        }
    }

    #[test]
    fn test_display_strings_and_calls() {
        let ast = ASTNode::comparison(
            ASTNode::call("f", vec![ASTNode::string("a\"b"), ASTNode::number(1.5)]),
            ComparisonOperator::NotEqual,
            ASTNode::string("c"),
        );
        assert_eq!(ast.to_string(), "f('a\"b', 1.5) != \"c\"");
    }
}
