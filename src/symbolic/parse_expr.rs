//! Turns a string into a symbolic expression.
//!
//! Recursive-descent grammar built from `nom` combinators:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | power
//! power  := atom ('^' unary)?          right-associative
//! atom   := number | '(' expr ')' | function '(' expr ')' | identifier
//! ```
//!
//! # Example
//! ```
//! use RustedTaylor::symbolic::symbolic_engine::Expr;
//! let parsed = Expr::parse_expression("exp(x)*ln(1 + y)").unwrap();
//! assert_eq!(parsed.to_string(), "(exp(x) * ln((1 + y)))");
//! ```
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::SymbolicError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{map_res, recognize},
    multi::{fold_many0, many0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded},
};

/// Builds the node for a named one-argument function.
///
/// Both the mathematical notation (tg, arctg) and the usual programming names
/// (tan, atan) are accepted; `log` is the natural logarithm.
fn function_by_name(name: &str) -> Option<fn(Expr) -> Expr> {
    let build: fn(Expr) -> Expr = match name {
        "exp" => |arg| Expr::Exp(Box::new(arg)),
        "ln" | "log" => |arg| Expr::Ln(Box::new(arg)),
        "sin" => |arg| Expr::sin(Box::new(arg)),
        "cos" => |arg| Expr::cos(Box::new(arg)),
        "tg" | "tan" => |arg| Expr::tg(Box::new(arg)),
        "ctg" | "cot" => |arg| Expr::ctg(Box::new(arg)),
        "arcsin" | "asin" => |arg| Expr::arcsin(Box::new(arg)),
        "arccos" | "acos" => |arg| Expr::arccos(Box::new(arg)),
        "arctg" | "atan" | "arctan" => |arg| Expr::arctg(Box::new(arg)),
        "arcctg" | "acot" => |arg| Expr::arcctg(Box::new(arg)),
        _ => return None,
    };
    Some(build)
}

fn parse_number(input: &str) -> IResult<&str, Expr> {
    map_res(recognize_float, |s: &str| s.parse::<f64>().map(Expr::Const)).parse(input)
}

/// identifier: letter or underscore followed by letters, digits, underscores
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn parse_parens(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), parse_expr, preceded(multispace0, char(')'))).parse(input)
}

/// A known function name followed by a bracket is a call, any other identifier is a symbol
fn parse_symbol_or_call(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = parse_identifier(input)?;
    if let Some(build) = function_by_name(name) {
        let (after_ws, _) = multispace0(rest)?;
        if after_ws.starts_with('(') {
            let (rest, arg) = parse_parens(after_ws)?;
            return Ok((rest, build(arg)));
        }
    }
    Ok((rest, Expr::Var(name.to_string())))
}

fn parse_atom(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    alt((parse_number, parse_parens, parse_symbol_or_call)).parse(input)
}

fn parse_power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = parse_atom(input)?;
    let (after_ws, _) = multispace0(input)?;
    if let Some(rest) = after_ws.strip_prefix('^') {
        let (rest, exponent) = parse_unary(rest)?;
        return Ok((rest, Expr::Pow(Box::new(base), Box::new(exponent))));
    }
    Ok((input, base))
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    match input.strip_prefix('-') {
        Some(rest) => {
            let (rest, operand) = parse_unary(rest)?;
            let negated = match operand {
                Expr::Const(val) => Expr::Const(-val),
                other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
            };
            Ok((rest, negated))
        }
        None => parse_power(input),
    }
}

fn parse_term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = parse_unary(input)?;
    fold_many0(
        pair(preceded(multispace0, one_of("*/")), parse_unary),
        move || first.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(Box::new(acc), Box::new(rhs)),
            _ => Expr::Div(Box::new(acc), Box::new(rhs)),
        },
    )
    .parse(input)
}

fn parse_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = parse_term(input)?;
    fold_many0(
        pair(preceded(multispace0, one_of("+-")), parse_term),
        move || first.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(Box::new(acc), Box::new(rhs)),
            _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
        },
    )
    .parse(input)
}

/// Parses the whole string into an expression; leftover input is an error.
pub fn parse_expression_func(input: &str) -> Result<Expr, SymbolicError> {
    if input.trim().is_empty() {
        return Err(SymbolicError::Parse("empty expression".to_string()));
    }
    match parse_expr(input) {
        Ok((rest, expr)) => {
            let rest = rest.trim();
            if rest.is_empty() {
                Ok(expr)
            } else {
                Err(SymbolicError::Parse(format!(
                    "unexpected '{}' in '{}'",
                    rest, input
                )))
            }
        }
        Err(e) => Err(SymbolicError::Parse(format!("{} in '{}'", e, input))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_parse_number_and_symbol() {
        assert_eq!(parse_expression_func("2.5").unwrap(), Expr::Const(2.5));
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(1e-3));
        assert_eq!(parse_expression_func(" theta_1 ").unwrap(), var("theta_1"));
    }

    #[test]
    fn test_precedence() {
        let parsed = parse_expression_func("x + 2*y").unwrap();
        assert_eq!(parsed, var("x") + Expr::Const(2.0) * var("y"));
        let parsed = parse_expression_func("(x + 2)*y").unwrap();
        assert_eq!(parsed, (var("x") + Expr::Const(2.0)) * var("y"));
    }

    #[test]
    fn test_left_associative_minus_and_division() {
        let parsed = parse_expression_func("x - y - z").unwrap();
        assert_eq!(parsed, (var("x") - var("y")) - var("z"));
        let parsed = parse_expression_func("x / y / z").unwrap();
        assert_eq!(parsed, (var("x") / var("y")) / var("z"));
    }

    #[test]
    fn test_power_is_right_associative() {
        let parsed = parse_expression_func("x^2^3").unwrap();
        assert_eq!(
            parsed,
            var("x").pow(Expr::Const(2.0).pow(Expr::Const(3.0)))
        );
        let parsed = parse_expression_func("2*x^-1").unwrap();
        assert_eq!(parsed, Expr::Const(2.0) * var("x").pow(Expr::Const(-1.0)));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(parse_expression_func("-3").unwrap(), Expr::Const(-3.0));
        assert_eq!(
            parse_expression_func("-x^2").unwrap(),
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(var("x").pow(Expr::Const(2.0)))
            )
        );
    }

    #[test]
    fn test_functions_and_aliases() {
        assert_eq!(
            parse_expression_func("tan(x)").unwrap(),
            parse_expression_func("tg(x)").unwrap()
        );
        assert_eq!(
            parse_expression_func("log(x)").unwrap(),
            Expr::Ln(Box::new(var("x")))
        );
        assert_eq!(
            parse_expression_func("arctan(x)").unwrap(),
            Expr::arctg(Box::new(var("x")))
        );
        // a function name without brackets is an ordinary symbol
        assert_eq!(parse_expression_func("exp").unwrap(), var("exp"));
    }

    #[test]
    fn test_display_round_trip_evaluates_the_same() {
        let input = "x^2.3*ln(x + y + y^2.6) - exp(x - y)/(x + y)";
        let parsed = parse_expression_func(input).unwrap();
        let reparsed = parse_expression_func(&parsed.to_string()).unwrap();
        let a = parsed.eval_expression(&["x", "y"], &[1.3, 0.4]).unwrap();
        let b = reparsed.eval_expression(&["x", "y"], &[1.3, 0.4]).unwrap();
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_expression_func(""), Err(SymbolicError::Parse(_))));
        assert!(matches!(parse_expression_func("x +"), Err(SymbolicError::Parse(_))));
        assert!(matches!(parse_expression_func("(x + 1"), Err(SymbolicError::Parse(_))));
        assert!(matches!(parse_expression_func("f(x)"), Err(SymbolicError::Parse(_))));
        assert!(matches!(parse_expression_func("x y"), Err(SymbolicError::Parse(_))));
    }
}
