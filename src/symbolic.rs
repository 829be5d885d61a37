#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedTaylor::symbolic::symbolic_engine::Expr;
/// let input = "x^2.3* log(x+y+y^2.6)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify(&["x", "y"]).unwrap();
/// println!("{}, Rust function: {}  \n", input, parsed_function(&[1.0, 2.0]));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) differentiates it with respect to named variables
/// 3) substitutes variables by numbers or by other expressions
/// 4) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use RustedTaylor::symbolic::symbolic_engine::Expr;
/// let input = "exp(x)+log(y)";
///   // here you've got symbolic expression
///   let parsed_expression = Expr::parse_expression(input).unwrap();
///   println!(" parsed_expression {}", parsed_expression);
///   // return vec of all arguments
///   let all = parsed_expression.all_arguments_are_variables();
///   assert_eq!(all, vec!["x".to_string(), "y".to_string()]);
///   // differentiate with respect to x and y
///   let df_dx = parsed_expression.diff("x");
///   let df_dy = parsed_expression.diff("y");
///   println!("df_dx = {}, df_dy = {}", df_dx, df_dy);
///   // put x = 0 and evaluate the derivative at y = 1
///   let df_dx_at_0 = df_dx.set_variable("x", 0.0).simplify();
///   assert_eq!(df_dx_at_0, Expr::Const(1.0));
///   let f_res = parsed_expression.eval_expression(&["x", "y"], &[0.0, 1.0]).unwrap();
///   assert_eq!(f_res, 1.0);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// errors of parsing, differentiation, substitution and evaluation
pub mod symbolic_errors;
/// algebraic simplification: constant folding and collection of like terms
pub mod symbolic_simplify;

mod symbolic_engine_tests;
