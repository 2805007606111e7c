use expressions_rs::{Evaluator, MapResolver, Value};

fn main() {
    pretty_env_logger::init();

    let resolvers: Vec<MapResolver> = vec![
        [("price", 120.0), ("volume", 3000.0)].into_iter().collect(),
        [("price", 80.0), ("volume", 6000.0)].into_iter().collect(),
        [("price", 150.0)].into_iter().collect(),
    ];

    let evaluator = Evaluator::new();
    let ast = evaluator
        .parse_expression("if(price > 100, volume * price, 0)")
        .expect("Failed to parse");

    for (i, result) in evaluator.evaluate_batch(&ast, &resolvers).iter().enumerate() {
        match result {
            Ok(Value::Number(turnover)) => println!("Result {i}: turnover {turnover}"),
            Ok(other) => println!("Result {i}: {other}"),
            Err(err) => println!("Result {i}: error: {err}"),
        }
    }
}
