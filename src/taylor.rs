/// # Taylor expansion
/// truncated multivariate Taylor series of symbolic expressions around numeric or
/// symbolic points
///# Example
/// ```
/// use RustedTaylor::symbolic::symbolic_engine::Expr;
/// use RustedTaylor::taylor::taylor_expander::taylor_expand;
/// let f = Expr::parse_expression("x^2").unwrap();
/// let x = Expr::Var("x".to_string());
/// let x0 = Expr::Var("x0".to_string());
/// let t = taylor_expand(&f, &[x], &[x0], 2).unwrap();
/// // x0^2 + 2*x0*(x - x0) + (x - x0)^2 == x^2
/// let value = t.eval_expression(&["x", "x0"], &[1.5, 0.25]).unwrap();
/// assert!((value - 2.25).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod taylor_expander;
/// errors of the expander
pub mod taylor_errors;
///____________________________________________________________________________________________________________________________
/// expansion task from a text document: parse, set up logging, expand, save the terms
///# Example
/// ```
/// use RustedTaylor::taylor::taylor_task::TaylorTask;
/// let input = "expansion\n expression: exp(x)*ln(1 + y)\n variables: x, y\n point: 0, 0\n order: 2\nsettings\n loglevel: off";
/// let task: TaylorTask = input.parse().unwrap();
/// let series = task.solve().unwrap();
/// assert_eq!(series.len(), 6);
/// ```
pub mod taylor_task;
