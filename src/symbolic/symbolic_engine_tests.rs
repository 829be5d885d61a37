//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::symbolic_errors::SymbolicError;
    use crate::symbols;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[test]
    fn test_add_assign() {
        let mut expr = Expr::Var("x".to_string());
        expr += Expr::Const(2.0);
        let expected = Expr::Add(
            Box::new(Expr::Var("x".to_string())),
            Box::new(Expr::Const(2.0)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_neg() {
        let expr = Expr::Var("x".to_string());
        let neg_expr = -expr;
        let expected = Expr::Mul(
            Box::new(Expr::Const(-1.0)),
            Box::new(Expr::Var("x".to_string())),
        );
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_combined_operations() {
        let mut expr = Expr::Var("x".to_string());
        expr += Expr::Const(2.0);
        expr *= Expr::Const(3.0);
        expr -= Expr::Const(1.0);
        expr /= Expr::Const(2.0);
        let expected = Expr::Div(
            Box::new(Expr::Sub(
                Box::new(Expr::Mul(
                    Box::new(Expr::Add(
                        Box::new(Expr::Var("x".to_string())),
                        Box::new(Expr::Const(2.0)),
                    )),
                    Box::new(Expr::Const(3.0)),
                )),
                Box::new(Expr::Const(1.0)),
            )),
            Box::new(Expr::Const(2.0)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_diff() {
        let x = Expr::Var("x".to_string());
        let f = Expr::Pow(Box::new(x.clone()), Box::new(Expr::Const(2.0)));
        let df_dx = f.diff("x");
        let C = Expr::Const(2.0);
        let C1 = Expr::Const(1.0);
        let expected_result = C.clone() * Expr::pow(x.clone(), C.clone() - C1.clone()) * C1.clone();
        assert_eq!(df_dx, expected_result);
        assert_eq!(df_dx.simplify(), Expr::Const(2.0) * x);
    }

    #[test]
    fn test_diff_other_variable_is_zero() {
        let f = Expr::parse_expression("y^3*sin(y)").unwrap();
        assert_eq!(f.diff("x").simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_diff_wrt() {
        let (x, y) = symbols!(x, y);
        let f = x.clone() * y.clone();
        assert_eq!(f.diff_wrt(&x).unwrap(), f.diff("x"));
        let not_a_symbol = x.clone() + y.clone();
        assert_eq!(
            f.diff_wrt(&not_a_symbol),
            Err(SymbolicError::NotAVariable("(x + y)".to_string()))
        );
        assert!(matches!(
            f.diff_wrt(&Expr::Const(1.0)),
            Err(SymbolicError::NotAVariable(_))
        ));
    }

    /// analytical derivatives against central differences
    #[test]
    fn test_diff_matches_finite_differences() {
        let cases = [
            "exp(x)*ln(x)",
            "sin(x)*cos(x)",
            "tg(x) + ctg(x)",
            "arcsin(x/2) + arccos(x/3)",
            "arctg(x) + arcctg(x^2)",
            "x^x",
            "(x^2 + 1)/(x - 3)",
        ];
        let h = 1e-6;
        for input in cases {
            let f = Expr::parse_expression(input).unwrap();
            let df = f.diff("x");
            for x0 in [0.4, 0.7, 1.1] {
                let numerical = (f.eval_expression(&["x"], &[x0 + h]).unwrap()
                    - f.eval_expression(&["x"], &[x0 - h]).unwrap())
                    / (2.0 * h);
                let analytical = df.eval_expression(&["x"], &[x0]).unwrap();
                assert_relative_eq!(analytical, numerical, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_n_th_derivative1D() {
        let f = Expr::parse_expression("x^4").unwrap();
        let d3 = f.n_th_derivative1D("x", 3);
        assert_relative_eq!(d3.eval_expression(&["x"], &[2.0]).unwrap(), 48.0);
        assert_eq!(f.n_th_derivative1D("x", 0), f.simplify());
        assert_eq!(f.n_th_derivative1D("x", 5), Expr::Const(0.0));
    }

    #[test]
    fn test_set_variable() {
        let vector_of_symbolic_vars = Expr::Symbols("a, b, c");
        let (a, b, c) = (
            vector_of_symbolic_vars[0].clone(),
            vector_of_symbolic_vars[1].clone(),
            vector_of_symbolic_vars[2].clone(),
        );
        let symbolic_expression = a + Expr::exp(b * c);
        let expression_with_const = symbolic_expression.set_variable("a", 1.0);
        assert_eq!(expression_with_const.to_string(), "(1 + exp((b * c)))");

        let mut values = HashMap::new();
        values.insert("b".to_string(), 0.0);
        values.insert("c".to_string(), 5.0);
        let all_set = expression_with_const.set_variable_from_map(&values);
        assert_eq!(all_set.simplify(), Expr::Const(2.0));
    }

    #[test]
    fn test_substitute_is_simultaneous() {
        let (x, y) = symbols!(x, y);
        let f = x.clone() - y.clone();
        let swapped = f
            .substitute(&[(x.clone(), y.clone()), (y.clone(), x.clone())])
            .unwrap();
        assert_eq!(swapped, y - x);
    }

    #[test]
    fn test_substitute_in_order_rewrites_earlier_values() {
        let (x, y) = symbols!(x, y);
        let f = x.clone() * y.clone();
        let pairs = vec![("x".to_string(), y.clone()), ("y".to_string(), Expr::Const(0.0))];
        assert_eq!(
            f.substitute_in_order(&pairs),
            Expr::Const(0.0) * Expr::Const(0.0)
        );
        // reversed order leaves the inserted y alone
        let reversed = vec![("y".to_string(), Expr::Const(0.0)), ("x".to_string(), y.clone())];
        assert_eq!(f.substitute_in_order(&reversed), y * Expr::Const(0.0));
    }

    #[test]
    fn test_substitute_symbolic_value() {
        let (x, a) = symbols!(x, a);
        let f = Expr::parse_expression("x^2 + x").unwrap();
        let g = f.substitute(&[(x, a.clone() + Expr::Const(1.0))]).unwrap();
        assert!(!g.contains_variable("x"));
        assert!(g.contains_variable("a"));
        assert_relative_eq!(g.eval_expression(&["a"], &[2.0]).unwrap(), 12.0);
    }

    #[test]
    fn test_substitute_rejects_non_symbol_key() {
        let x = Expr::Var("x".to_string());
        let key = Expr::Const(3.0);
        assert_eq!(
            x.substitute(&[(key, Expr::Const(1.0))]),
            Err(SymbolicError::NotAVariable("3".to_string()))
        );
    }

    #[test]
    fn test_eval_expression_unknown_variable() {
        let f = Expr::parse_expression("x + y").unwrap();
        assert_eq!(
            f.eval_expression(&["x"], &[1.0]),
            Err(SymbolicError::UnknownVariable("y".to_string()))
        );
        assert_eq!(f.eval_expression(&["x", "y"], &[1.0, 2.0]), Ok(3.0));
    }

    #[test]
    fn test_lambdify() {
        let f = Expr::parse_expression("x*y + 1").unwrap();
        let closure = f.clone().lambdify(&["x", "y"]).unwrap();
        assert_eq!(closure(&[2.0, 3.0]), 7.0);
        assert!(matches!(
            f.lambdify(&["x"]),
            Err(SymbolicError::UnknownVariable(name)) if name == "y"
        ));
    }

    #[test]
    fn test_all_arguments_are_variables() {
        let f = Expr::parse_expression("z*exp(x) + x*y + z").unwrap();
        assert_eq!(
            f.all_arguments_are_variables(),
            vec!["x".to_string(), "y".to_string(), "z".to_string()]
        );
        assert!(Expr::Const(1.0).all_arguments_are_variables().is_empty());
    }

    #[test]
    fn test_symbols() {
        let (x, y, z) = symbols!(x, y, z);
        assert_eq!(Expr::Symbols("x, y,z ,"), vec![x, y, z]);
    }
}
