use RustedTaylor::symbolic::symbolic_engine::Expr;
use RustedTaylor::taylor::taylor_expander::TaylorExpander;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_two_variables(c: &mut Criterion) {
    let f = Expr::parse_expression("exp(x)*sin(y) + x^3*y").unwrap();
    let vars = Expr::Symbols("x, y");
    let point = vec![Expr::Const(0.5), Expr::Const(1.0)];
    let expander = TaylorExpander::new();
    c.bench_function("exp(x)*sin(y), order 6", |b| {
        b.iter(|| expander.series(black_box(&f), &vars, &point, 6))
    });
}

fn bench_parallel(c: &mut Criterion) {
    let f = Expr::parse_expression("sin(x + y)*exp(z) + x*y*z").unwrap();
    let vars = Expr::Symbols("x, y, z");
    let point = vec![Expr::Const(0.1), Expr::Const(0.2), Expr::Const(0.3)];
    let mut group = c.benchmark_group("three variables, order 4");
    for parallel in [false, true] {
        let expander = TaylorExpander::new().with_parallel(parallel);
        group.bench_function(format!("parallel = {}", parallel), |b| {
            b.iter(|| expander.series(black_box(&f), &vars, &point, 4))
        });
    }
    group.finish();
}

fn bench_without_simplification(c: &mut Criterion) {
    let f = Expr::parse_expression("exp(x)*ln(1 + y)").unwrap();
    let vars = Expr::Symbols("x, y");
    let point = vec![Expr::Const(0.0), Expr::Const(0.0)];
    let expander = TaylorExpander::new().with_simplify(false);
    c.bench_function("exp(x)*ln(1 + y), order 4, no simplification", |b| {
        b.iter(|| expander.series(black_box(&f), &vars, &point, 4))
    });
}

criterion_group!(
    benches,
    bench_two_variables,
    bench_parallel,
    bench_without_simplification
);
criterion_main!(benches);
