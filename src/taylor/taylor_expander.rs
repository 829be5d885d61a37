//! # Multivariate Taylor expansion
//!
//! Builds the truncated Taylor series of a symbolic expression around a point without
//! merging mixed partial derivatives: every differentiation path is its own term.
//!
//! For order `k` the expander keeps a [`GenerationFrontier`], two position-paired lists
//! `D[k]` (derivatives) and `F[k]` (monomials). The next generation is produced by
//! walking the previous one in order (outer loop) and the variables in caller order
//! (inner loop):
//! ```text
//! d' = d/dv_j (d)
//! f' = f * (v_j - p_j)
//! T += (1/k!) * d'(v -> p) * f'
//! ```
//! so `|D[k]| = |D[k-1]| * |variables|`. Identical mixed partials such as `d2/dxdy` and
//! `d2/dydx` each contribute with the plain `1/k!` factor and their sum gives the usual
//! multinomial weight.
//!
//! # Example
//! ```
//! use RustedTaylor::symbolic::symbolic_engine::Expr;
//! use RustedTaylor::taylor::taylor_expander::TaylorExpander;
//! let f = Expr::parse_expression("x*y").unwrap();
//! let vars = Expr::Symbols("x, y");
//! let point = vec![Expr::Const(0.0), Expr::Const(0.0)];
//! let series = TaylorExpander::new().series(&f, &vars, &point, 2).unwrap();
//! // 2 first order terms and 4 second order terms
//! assert_eq!(series.len(), 6);
//! let value = series.eval(&[3.0, 5.0]).unwrap();
//! assert!((value - 15.0).abs() < 1e-12);
//! ```

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::taylor::taylor_errors::TaylorError;
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tabled::{builder::Builder, settings::Style};

/// Highest order whose `k!` is an exact `f64`; `max_order` above it is capped.
pub const MAX_EXACT_ORDER: usize = 22;

/// Guards against the `|variables|^order` growth of the expansion.
///
/// `max_order` defaults to 20 and never takes effect above [`MAX_EXACT_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionLimits {
    pub max_order: usize,
    /// total number of generated terms over all orders (the zero order term is not counted)
    pub max_terms: usize,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        ExpansionLimits {
            max_order: 20,
            max_terms: 1_000_000,
        }
    }
}

/// One generated term `factor * coefficient * monomial`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaylorTerm {
    pub order: usize,
    /// indices of the variables in the order they were differentiated by
    pub path: Vec<usize>,
    /// derivative along `path` with the variables replaced by the point
    pub coefficient: Expr,
    /// `1/k!`, kept as a quotient of two integer constants
    pub factor: Expr,
    /// product of `(v_j - p_j)` along `path`
    pub monomial: Expr,
}

impl TaylorTerm {
    pub fn to_expr(&self) -> Expr {
        Expr::Mul(
            Box::new(Expr::Mul(
                Box::new(self.factor.clone()),
                Box::new(self.coefficient.clone()),
            )),
            Box::new(self.monomial.clone()),
        )
    }

    /// true when the substituted derivative is the constant zero
    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }
}

/// Result of an expansion: the zero order term plus all generated terms in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaylorSeries {
    pub variables: Vec<Expr>,
    pub point: Vec<Expr>,
    pub order: usize,
    /// the expression with the variables replaced by the point, not simplified
    pub zero_order: Expr,
    pub terms: Vec<TaylorTerm>,
}

impl TaylorSeries {
    /// Folds the terms into one expression: `((T0 + t1) + t2) + ...`
    pub fn to_expr(&self) -> Expr {
        let mut total = self.zero_order.clone();
        for term in &self.terms {
            total += term.to_expr();
        }
        total
    }

    /// number of generated terms, the zero order term excluded
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms_of_order(&self, order: usize) -> impl Iterator<Item = &TaylorTerm> {
        self.terms.iter().filter(move |term| term.order == order)
    }

    pub fn nonzero_terms(&self) -> usize {
        self.terms.iter().filter(|term| !term.is_zero()).count()
    }

    /// Differentiation path of a term written with variable names, e.g. `x,y`
    pub fn path_label(&self, term: &TaylorTerm) -> String {
        term.path
            .iter()
            .map(|&j| self.variables[j].to_string())
            .join(",")
    }

    /// Evaluates the series with the expansion variables set to `values`.
    ///
    /// A symbolic expansion point must be made numeric first, otherwise its symbols are
    /// reported as [`SymbolicError::UnknownVariable`].
    pub fn eval(&self, values: &[f64]) -> Result<f64, SymbolicError> {
        let names: Vec<&str> = self.variables.iter().filter_map(|v| v.var_name()).collect();
        self.to_expr().eval_expression(&names, values)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FrontierEntry {
    path: Vec<usize>,
    derivative: Expr,
    monomial: Expr,
}

/// Derivatives `D[k]` and monomials `F[k]` of one order, paired by position.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFrontier {
    pub order: usize,
    entries: Vec<FrontierEntry>,
}

impl GenerationFrontier {
    /// `D[0] = [expression]`, `F[0] = [1]`
    pub fn root(expression: &Expr) -> Self {
        GenerationFrontier {
            order: 0,
            entries: vec![FrontierEntry {
                path: Vec::new(),
                derivative: expression.clone(),
                monomial: Expr::Const(1.0),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn derivatives(&self) -> impl Iterator<Item = &Expr> {
        self.entries.iter().map(|entry| &entry.derivative)
    }

    pub fn monomials(&self) -> impl Iterator<Item = &Expr> {
        self.entries.iter().map(|entry| &entry.monomial)
    }
}

/// Validated variables and everything precomputed from the point
struct ExpansionContext<'a> {
    names: Vec<&'a str>,
    /// `v_j - p_j`
    shifts: Vec<Expr>,
    /// `(v_j, p_j)` in caller order, substituted one after another
    replacements: Vec<(String, Expr)>,
    simplify: bool,
}

impl ExpansionContext<'_> {
    /// Children of one frontier entry, one per variable, in variable order
    fn children(
        &self,
        entry: &FrontierEntry,
        order: usize,
        factor: &Expr,
    ) -> Vec<(FrontierEntry, TaylorTerm)> {
        self.names
            .iter()
            .zip(&self.shifts)
            .enumerate()
            .map(|(j, (name, shift))| {
                let mut derivative = entry.derivative.diff(name);
                if self.simplify {
                    derivative = derivative.simplify();
                }
                let monomial =
                    Expr::Mul(Box::new(entry.monomial.clone()), Box::new(shift.clone()));
                let mut path = entry.path.clone();
                path.push(j);

                let mut coefficient = derivative.substitute_in_order(&self.replacements);
                if self.simplify {
                    coefficient = coefficient.simplify();
                }
                let term = TaylorTerm {
                    order,
                    path: path.clone(),
                    coefficient,
                    factor: factor.clone(),
                    monomial: monomial.clone(),
                };
                (
                    FrontierEntry {
                        path,
                        derivative,
                        monomial,
                    },
                    term,
                )
            })
            .collect()
    }
}

/// `1/k!` as `Div(Const(1), Const(k!))`
pub fn factorial_factor(k: usize) -> Expr {
    let factorial: f64 = (1..=k).map(|i| i as f64).product();
    Expr::Div(Box::new(Expr::Const(1.0)), Box::new(Expr::Const(factorial)))
}

/// `n + n^2 + ... + n^order`, `None` on overflow
pub fn generated_terms(variables: usize, order: usize) -> Option<usize> {
    let mut total: usize = 0;
    let mut layer: usize = 1;
    for _ in 0..order {
        layer = layer.checked_mul(variables)?;
        total = total.checked_add(layer)?;
    }
    Some(total)
}

/// Unfactored multivariate Taylor expander
#[derive(Debug, Clone)]
pub struct TaylorExpander {
    /// simplify every derivative right after it is taken (and every substituted coefficient)
    pub simplify: bool,
    /// compute the children of the frontier entries on the rayon thread pool
    pub parallel: bool,
    pub limits: ExpansionLimits,
}

impl Default for TaylorExpander {
    fn default() -> Self {
        TaylorExpander {
            simplify: true,
            parallel: false,
            limits: ExpansionLimits::default(),
        }
    }
}

impl TaylorExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_limits(mut self, limits: ExpansionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Truncated Taylor series of `expression` around `variables = point` as one expression.
    ///
    /// # Errors
    /// - [`TaylorError::DimensionMismatch`] if `variables` and `point` differ in length
    /// - [`TaylorError::Symbolic`] if some variable is not a symbol
    /// - the limit and validation errors of [`TaylorExpander::series`]
    pub fn expand(
        &self,
        expression: &Expr,
        variables: &[Expr],
        point: &[Expr],
        order: usize,
    ) -> Result<Expr, TaylorError> {
        Ok(self.series(expression, variables, point, order)?.to_expr())
    }

    /// Same as [`TaylorExpander::expand`] but keeps every term separately.
    pub fn series(
        &self,
        expression: &Expr,
        variables: &[Expr],
        point: &[Expr],
        order: usize,
    ) -> Result<TaylorSeries, TaylorError> {
        let context = self.validate(variables, point, order)?;
        let begin = Instant::now();
        info!(
            "expanding {} around ({}) up to order {}",
            expression,
            context
                .names
                .iter()
                .zip(point)
                .map(|(name, p)| format!("{} = {}", name, p))
                .join(", "),
            order
        );

        let zero_order = expression.substitute_in_order(&context.replacements);
        let mut frontier = GenerationFrontier::root(expression);
        let mut terms = Vec::new();
        let mut stats = Vec::with_capacity(order);
        for k in 1..=order {
            let factor = factorial_factor(k);
            let generated: Vec<Vec<(FrontierEntry, TaylorTerm)>> = if self.parallel {
                frontier
                    .entries
                    .par_iter()
                    .map(|entry| context.children(entry, k, &factor))
                    .collect()
            } else {
                frontier
                    .entries
                    .iter()
                    .map(|entry| context.children(entry, k, &factor))
                    .collect()
            };

            let mut entries = Vec::with_capacity(frontier.len() * context.names.len());
            let mut nonzero = 0;
            for (entry, term) in generated.into_iter().flatten() {
                if !term.is_zero() {
                    nonzero += 1;
                }
                entries.push(entry);
                terms.push(term);
            }
            debug!("order {}: {} terms, {} nonzero", k, entries.len(), nonzero);
            stats.push((k, entries.len(), nonzero));
            frontier = GenerationFrontier { order: k, entries };
        }

        self.log_statistics(&stats, begin.elapsed());
        Ok(TaylorSeries {
            variables: variables.to_vec(),
            point: point.to_vec(),
            order,
            zero_order,
            terms,
        })
    }

    /// Runs every check before any symbolic work
    fn validate<'a>(
        &self,
        variables: &'a [Expr],
        point: &[Expr],
        order: usize,
    ) -> Result<ExpansionContext<'a>, TaylorError> {
        if variables.len() != point.len() {
            return Err(TaylorError::DimensionMismatch {
                variables: variables.len(),
                point: point.len(),
            });
        }
        if variables.is_empty() {
            return Err(TaylorError::NoVariables);
        }
        let mut names: Vec<&str> = Vec::with_capacity(variables.len());
        for variable in variables {
            let name = variable.as_variable()?;
            if names.contains(&name) {
                return Err(TaylorError::DuplicateVariable(name.to_string()));
            }
            names.push(name);
        }
        let max_order = self.limits.max_order.min(MAX_EXACT_ORDER);
        if order > max_order {
            return Err(TaylorError::OrderLimitExceeded {
                order,
                max: max_order,
            });
        }
        match generated_terms(names.len(), order) {
            Some(terms) if terms <= self.limits.max_terms => {}
            terms => {
                return Err(TaylorError::TermLimitExceeded {
                    terms: terms.unwrap_or(usize::MAX),
                    max: self.limits.max_terms,
                });
            }
        }

        let shifts = names
            .iter()
            .zip(point)
            .map(|(name, p)| {
                Expr::Sub(Box::new(Expr::Var(name.to_string())), Box::new(p.clone()))
            })
            .collect();
        let replacements = names
            .iter()
            .zip(point)
            .map(|(name, p)| (name.to_string(), p.clone()))
            .collect();
        Ok(ExpansionContext {
            names,
            shifts,
            replacements,
            simplify: self.simplify,
        })
    }

    fn log_statistics(&self, per_order: &[(usize, usize, usize)], elapsed: Duration) {
        let mut builder = Builder::default();
        builder.push_record([
            "order".to_string(),
            "terms".to_string(),
            "nonzero terms".to_string(),
        ]);
        for (k, terms, nonzero) in per_order {
            builder.push_record([k.to_string(), terms.to_string(), nonzero.to_string()]);
        }
        let total: usize = per_order.iter().map(|(_, terms, _)| terms).sum();
        let total_nonzero: usize = per_order.iter().map(|(_, _, nonzero)| nonzero).sum();
        builder.push_record([
            "total".to_string(),
            total.to_string(),
            total_nonzero.to_string(),
        ]);
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        info!("\n \n EXPANSION STATISTICS \n \n {}", table.to_string());
        info!("time elapsed, ms: {}", elapsed.as_millis());
    }
}

/// Expands with the default [`TaylorExpander`] settings.
pub fn taylor_expand(
    expression: &Expr,
    variables: &[Expr],
    point: &[Expr],
    order: usize,
) -> Result<Expr, TaylorError> {
    TaylorExpander::default().expand(expression, variables, point, order)
}

impl Expr {
    /// Taylor series of the expression around `variables = point`, see [`TaylorExpander`].
    pub fn taylor_series(
        &self,
        variables: &[Expr],
        point: &[Expr],
        order: usize,
    ) -> Result<Expr, TaylorError> {
        taylor_expand(self, variables, point, order)
    }
}
