use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evalexpr::{build_operator_tree, DefaultNumericTypes};
use expressions_rs::{compile, Context, EmptyResolver, Evaluator, MapResolver};

/// Benchmark simple arithmetic expressions
fn benchmark_simple_arithmetic(c: &mut Criterion) {
    let _ = pretty_env_logger::try_init();
    let mut group = c.benchmark_group("Simple arithmetic Expression Evaluation");

    let evaluator = Evaluator::new();

    let expr = "2 + 3 * 4";
    let compiled = compile(expr).unwrap();
    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();

    group.bench_function("compiled_arithmetic", |b| {
        b.iter(|| evaluator.evaluate_expression(black_box(expr), &EmptyResolver))
    });

    group.bench_function("precompiled_arithmetic", |b| {
        b.iter(|| black_box(&compiled).solve(&Context::default()))
    });

    group.bench_function("native_rust_arithmetic", |b| {
        b.iter(|| black_box(2.0 + 3.0 * 4.0))
    });

    group.bench_function("meval_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });

    group.bench_function("evalexpr_arithmetic", |b| {
        b.iter(|| evalexpr::eval(black_box(expr)).unwrap())
    });

    group.bench_function("precompiled_evalexpr_arithmetic", |b| {
        b.iter(|| precompiled_evalexpr.eval().unwrap())
    });
}

/// Benchmark complex arithmetic expressions
fn benchmark_complex_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Complex arithmetic Expression Evaluation");

    let evaluator = Evaluator::new();

    let expr = "(10 + 20) * 3 / (4 - 1) + 5 ^ 2 % 7";
    let compiled = compile(expr).unwrap();

    group.bench_function("compiled_complex_arithmetic", |b| {
        b.iter(|| evaluator.evaluate_expression(black_box(expr), &EmptyResolver))
    });

    group.bench_function("precompiled_complex_arithmetic", |b| {
        b.iter(|| black_box(&compiled).solve(&Context::default()))
    });

    group.bench_function("native_rust_complex_arithmetic", |b| {
        b.iter(|| black_box((10.0 + 20.0) * 3.0 / (4.0 - 1.0) + 25.0f64.round() % 7.0))
    });

    group.bench_function("meval_complex_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });
}

/// Benchmark variable lookups
fn benchmark_variables(c: &mut Criterion) {
    let mut group = c.benchmark_group("Variable Evaluation");

    let evaluator = Evaluator::new();

    let expr = "(5 + x) * y";
    let compiled = compile(expr).unwrap();
    let resolver: MapResolver = [("x", 4.5), ("y", 2.0)].into_iter().collect();
    let meval_fn = expr
        .parse::<meval::Expr>()
        .unwrap()
        .bind2("x", "y")
        .unwrap();

    group.bench_function("compiled_variables", |b| {
        b.iter(|| evaluator.evaluate_expression(black_box(expr), &resolver))
    });

    group.bench_function("precompiled_variables", |b| {
        b.iter(|| evaluator.evaluate_ast(black_box(&compiled), &resolver))
    });

    group.bench_function("native_rust_variables", |b| {
        b.iter(|| black_box((5.0 + black_box(4.5)) * black_box(2.0)))
    });

    group.bench_function("precompiled_meval_variables", |b| {
        b.iter(|| meval_fn(black_box(4.5), black_box(2.0)))
    });
}

/// Benchmark comparisons
fn benchmark_comparisons(c: &mut Criterion) {
    let mut group = c.benchmark_group("Comparison Evaluation");

    let evaluator = Evaluator::new();

    let expr = "2 + 3 >= 5";
    let compiled = compile(expr).unwrap();
    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();

    group.bench_function("compiled_comparison", |b| {
        b.iter(|| evaluator.evaluate_expression(black_box(expr), &EmptyResolver))
    });

    group.bench_function("precompiled_comparison", |b| {
        b.iter(|| black_box(&compiled).solve(&Context::default()))
    });

    group.bench_function("evalexpr_comparison", |b| {
        b.iter(|| evalexpr::eval(black_box(expr)).unwrap())
    });

    group.bench_function("precompiled_evalexpr_comparison", |b| {
        b.iter(|| precompiled_evalexpr.eval().unwrap())
    });
}

/// Benchmark function calls
fn benchmark_function_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("Function Call Evaluation");

    let evaluator = Evaluator::new();

    let expr = "cos(0.1) + sqrt(16)";
    let compiled = compile(expr).unwrap();

    group.bench_function("compiled_function_call", |b| {
        b.iter(|| evaluator.evaluate_expression(black_box(expr), &EmptyResolver))
    });

    group.bench_function("precompiled_function_call", |b| {
        b.iter(|| evaluator.evaluate_ast(black_box(&compiled), &EmptyResolver))
    });

    group.bench_function("precompiled_default_functions_call", |b| {
        b.iter(|| black_box(&compiled).solve(&Context::default()))
    });

    group.bench_function("native_rust_function_call", |b| {
        b.iter(|| black_box(black_box(0.1f64).cos() + black_box(16.0f64).sqrt()))
    });

    group.bench_function("meval_function_call", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });
}

/// Benchmark one tree against many resolvers
fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Evaluation");

    let evaluator = Evaluator::new();
    let ast = compile("if(price > 100, volume * price, 0)").unwrap();
    let resolvers: Vec<MapResolver> = (0..1000)
        .map(|i| {
            [("price", 50.0 + i as f64 / 10.0), ("volume", i as f64)]
                .into_iter()
                .collect()
        })
        .collect();

    group.bench_function("parallel_batch", |b| {
        b.iter(|| evaluator.evaluate_batch(black_box(&ast), &resolvers))
    });

    group.bench_function("sequential_batch", |b| {
        b.iter(|| {
            resolvers
                .iter()
                .map(|resolver| evaluator.evaluate_ast(black_box(&ast), resolver))
                .collect::<Vec<_>>()
        })
    });
}

/// Grouping benchmarks
criterion_group!(
    benches,
    benchmark_simple_arithmetic,
    benchmark_complex_arithmetic,
    benchmark_variables,
    benchmark_comparisons,
    benchmark_function_calls,
    benchmark_batch,
);
criterion_main!(benches);
