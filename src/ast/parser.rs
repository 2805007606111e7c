use crate::ast::{
    ASTNode, ChainTerm, CompileError, ComparisonOperator, Operator, SyntaxError, Value,
};
use log::debug;
use pest::error::{Error as PestError, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest bracket/call nesting accepted. Deeper input is rejected before the
    /// grammar runs so it can never exhaust the stack.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Parser)]
#[grammar = "./expression.pest"]
pub struct ExpressionParser;

type BuildResult = Result<ASTNode, CompileError>;

impl ExpressionParser {
    pub fn parse_expression(input: &str) -> BuildResult {
        Self::parse_expression_with(input, &ParserConfig::default())
    }

    pub fn parse_expression_with(input: &str, config: &ParserConfig) -> BuildResult {
        debug!("Parsing expression: {}", input);
        check_nesting(input, config.max_depth)?;

        let parse_result = ExpressionParser::parse(Rule::expression, input)
            .map_err(syntax_error)?
            .next()
            .ok_or_else(|| SyntaxError::new("failed to parse expression", (1, 1)))?;
        debug!("Parse result: {:#?}", parse_result);

        let position = line_col(&parse_result);
        let mut pairs = parse_result.into_inner();
        Self::build_expression(next_pair(&mut pairs, position, "expression")?)
    }

    fn build_expression(pair: Pair<Rule>) -> BuildResult {
        match pair.as_rule() {
            Rule::comparison => Self::build_comparison(pair),
            _ => Err(unsupported(&pair)),
        }
    }

    /// `sum (relop sum)?`; without an operator the lone sum is the expression.
    fn build_comparison(pair: Pair<Rule>) -> BuildResult {
        debug!("Building comparison expression: {:?}", pair.as_str());
        let position = line_col(&pair);
        let mut pairs = pair.into_inner();
        let left = Self::build_sum(next_pair(&mut pairs, position, "comparison")?)?;

        let Some(operator_pair) = pairs.next() else {
            return Ok(left);
        };
        let operator = ComparisonOperator::try_from(operator_pair.as_str())
            .map_err(|_| unsupported(&operator_pair))?;

        let right = Self::build_sum(next_pair(&mut pairs, position, "comparison")?)?;
        Ok(ASTNode::Comparison {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn build_sum(pair: Pair<Rule>) -> BuildResult {
        Self::build_chain(pair, Self::build_product)
    }

    fn build_product(pair: Pair<Rule>) -> BuildResult {
        Self::build_chain(pair, Self::build_power)
    }

    fn build_power(pair: Pair<Rule>) -> BuildResult {
        Self::build_chain(pair, Self::build_signed_atom)
    }

    /// Folds `operand (op operand)*` into a chain; a lone operand is returned as is.
    fn build_chain(
        pair: Pair<Rule>,
        build_operand: fn(Pair<Rule>) -> BuildResult,
    ) -> BuildResult {
        debug!("Building {:?} chain: {:?}", pair.as_rule(), pair.as_str());
        let position = line_col(&pair);
        let mut pairs = pair.into_inner();
        let head = build_operand(next_pair(&mut pairs, position, "chain")?)?;

        let mut terms = Vec::new();
        while let Some(operator_pair) = pairs.next() {
            let operator =
                Operator::try_from(operator_pair.as_str()).map_err(|_| unsupported(&operator_pair))?;
            let operand =
                build_operand(next_pair(&mut pairs, line_col(&operator_pair), "chain")?)?;
            terms.push(ChainTerm::new(operator, operand));
        }

        if terms.is_empty() {
            Ok(head)
        } else {
            Ok(ASTNode::Chain {
                head: Box::new(head),
                terms,
            })
        }
    }

    /// `-atom` becomes the chain `0 - atom`.
    fn build_signed_atom(pair: Pair<Rule>) -> BuildResult {
        let position = line_col(&pair);
        let mut pairs = pair.into_inner();
        let first = next_pair(&mut pairs, position, "signed atom")?;

        if first.as_rule() != Rule::sign {
            return Self::build_atom(first);
        }
        let sign = Operator::try_from(first.as_str()).map_err(|_| unsupported(&first))?;
        let atom = Self::build_atom(next_pair(&mut pairs, position, "signed atom")?)?;
        Ok(ASTNode::Chain {
            head: Box::new(ASTNode::Literal(Value::Number(0.0))),
            terms: vec![ChainTerm::new(sign, atom)],
        })
    }

    fn build_atom(pair: Pair<Rule>) -> BuildResult {
        debug!("Building atom: {:?}", pair);
        match pair.as_rule() {
            Rule::number => {
                let value = pair.as_str().parse::<f64>().map_err(|e| {
                    SyntaxError::new(
                        format!("invalid number '{}': {}", pair.as_str(), e),
                        line_col(&pair),
                    )
                })?;
                if !value.is_finite() {
                    return Err(SyntaxError::new(
                        format!("number '{}' is out of range", pair.as_str()),
                        line_col(&pair),
                    )
                    .into());
                }
                Ok(ASTNode::Literal(Value::Number(value)))
            }
            Rule::string => {
                let text = pair.as_str();
                // Both delimiters are single-byte quotes.
                let inner = &text[1..text.len() - 1];
                Ok(ASTNode::Literal(Value::String(inner.to_string())))
            }
            Rule::variable => Ok(ASTNode::Field(pair.as_str().to_string())),
            Rule::group => {
                let position = line_col(&pair);
                let mut pairs = pair.into_inner();
                let inner = Self::build_expression(next_pair(&mut pairs, position, "group")?)?;
                Ok(ASTNode::Group(Box::new(inner)))
            }
            Rule::function_call => Self::build_function_call(pair),
            _ => Err(unsupported(&pair)),
        }
    }

    fn build_function_call(pair: Pair<Rule>) -> BuildResult {
        let position = line_col(&pair);
        let mut inner = pair.into_inner();
        let name = next_pair(&mut inner, position, "function call")?
            .as_str()
            .to_string();

        let args = match inner.next() {
            Some(arguments) => arguments
                .into_inner()
                .map(Self::build_expression)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(ASTNode::FunctionCall { name, args })
    }
}

fn line_col(pair: &Pair<Rule>) -> (usize, usize) {
    pair.as_span().start_pos().line_col()
}

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    (line, column): (usize, usize),
    what: &str,
) -> Result<Pair<'i, Rule>, CompileError> {
    pairs
        .next()
        .ok_or_else(|| CompileError::UnsupportedConstruct {
            construct: format!("incomplete {}", what),
            line,
            column,
        })
}

fn unsupported(pair: &Pair<Rule>) -> CompileError {
    let (line, column) = line_col(pair);
    CompileError::UnsupportedConstruct {
        construct: format!("{:?} '{}'", pair.as_rule(), pair.as_str()),
        line,
        column,
    }
}

fn syntax_error(error: PestError<Rule>) -> CompileError {
    let error = error.renamed_rules(|rule| {
        let name = match rule {
            Rule::comparison => "expression",
            Rule::relop => "comparison operator",
            Rule::additive_op | Rule::multiplicative_op | Rule::pow_op => "operator",
            Rule::sum | Rule::product | Rule::power | Rule::signed_atom => "operand",
            Rule::function_call => "function call",
            Rule::arguments => "arguments",
            Rule::number => "number",
            Rule::string => "string",
            Rule::variable | Rule::identifier => "identifier",
            Rule::group => "bracket",
            Rule::EOI => "end of input",
            other => return format!("{:?}", other),
        };
        name.to_string()
    });
    let position = match error.line_col {
        LineColLocation::Pos(position) => position,
        LineColLocation::Span(start, _) => start,
    };
    SyntaxError::new(error.variant.message(), position).into()
}

/// Rejects input whose bracket nesting exceeds `max_depth`. Brackets inside string
/// literals do not count.
fn check_nesting(input: &str, max_depth: usize) -> Result<(), SyntaxError> {
    let (mut line, mut column) = (1, 0);
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        if c == '\n' {
            line += 1;
            column = 0;
            continue;
        }
        column += 1;

        match quote {
            Some(delimiter) if c == delimiter => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => {
                    depth += 1;
                    if depth > max_depth {
                        return Err(SyntaxError::new(
                            format!("expression is nested deeper than {} levels", max_depth),
                            (line, column),
                        ));
                    }
                }
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    Ok(())
}
