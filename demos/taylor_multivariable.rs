use RustedTaylor::symbolic::symbolic_engine::Expr;
use RustedTaylor::symbols;
use RustedTaylor::taylor::taylor_expander::{TaylorExpander, taylor_expand};

fn main() {
    // around a numeric point
    let f = Expr::parse_expression("exp(x)*sin(y)").unwrap();
    let vars = Expr::Symbols("x, y");
    let point = vec![Expr::Const(0.0), Expr::Const(0.0)];
    let series = TaylorExpander::new().series(&f, &vars, &point, 3).unwrap();
    println!("f = {}", f);
    for term in &series.terms {
        println!(
            "order {} along [{}]: {}",
            term.order,
            series.path_label(term),
            term.to_expr()
        );
    }
    let (xv, yv) = (0.1, 0.2);
    let exact = f.eval_expression(&["x", "y"], &[xv, yv]).unwrap();
    let approx = series.eval(&[xv, yv]).unwrap();
    println!("f(0.1, 0.2) = {}, series = {}, error = {:e}", exact, approx, (exact - approx).abs());

    // around a symbolic point
    let (x, a) = symbols!(x, a);
    let g = x.clone().ln();
    let t = taylor_expand(&g, &[x], &[a], 2).unwrap();
    println!("ln(x) around a: {}", t.simplify());
}
