use expressions_rs::{
    ASTNode, ComparisonOperator, Evaluator, MapResolver, MissingVariable, Operator,
};

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::new();

    let parsed = evaluator
        .parse_expression("price * 1.1 > limit")
        .expect("Failed to parse");

    let built = ASTNode::comparison(
        ASTNode::chain(
            ASTNode::field("price"),
            vec![(Operator::Multiply, ASTNode::number(1.1))],
        ),
        ComparisonOperator::GreaterThan,
        ASTNode::field("limit"),
    );
    assert_eq!(parsed, built);
    println!("AST: {parsed} (depth {})", parsed.depth());

    for price in [80.0, 95.0, 120.0] {
        let resolver: MapResolver = [("price", price), ("limit", 100.0)].into_iter().collect();
        match evaluator.evaluate_ast(&parsed, &resolver) {
            Ok(result) => println!("price {price}: {result}"),
            Err(err) => println!("price {price}: {err}"),
        }
    }

    let ast = evaluator
        .parse_expression("if(discount, price - discount, price)")
        .expect("Failed to parse");
    let resolver: MapResolver = [("price", 120.0)].into_iter().collect();
    println!("strict: {:?}", evaluator.evaluate_ast(&ast, &resolver));
    let resolver = resolver.with_missing(MissingVariable::Null);
    println!("lenient: {:?}", evaluator.evaluate_ast(&ast, &resolver));
}
