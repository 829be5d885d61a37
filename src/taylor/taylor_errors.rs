use crate::symbolic::symbolic_errors::SymbolicError;
use std::fmt;

/// Errors of the Taylor expander.
///
/// Every check runs before the first derivative is taken, so a failed expansion never
/// produces a partial series.
#[derive(Debug, Clone, PartialEq)]
pub enum TaylorError {
    /// variable list and expansion point have different lengths
    DimensionMismatch { variables: usize, point: usize },
    /// nothing to expand in
    NoVariables,
    /// the same variable is listed twice
    DuplicateVariable(String),
    /// requested order is above the configured limit
    OrderLimitExceeded { order: usize, max: usize },
    /// the expansion would generate more terms than allowed
    TermLimitExceeded { terms: usize, max: usize },
    /// passed through from differentiation or substitution
    Symbolic(SymbolicError),
}

impl fmt::Display for TaylorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaylorError::DimensionMismatch { variables, point } => write!(
                f,
                "{} variables given but the expansion point has {} coordinates",
                variables, point
            ),
            TaylorError::NoVariables => write!(f, "No expansion variables given"),
            TaylorError::DuplicateVariable(name) => {
                write!(f, "Variable '{}' is listed more than once", name)
            }
            TaylorError::OrderLimitExceeded { order, max } => {
                write!(f, "Order {} exceeds the maximum order {}", order, max)
            }
            TaylorError::TermLimitExceeded { terms, max } => write!(
                f,
                "Expansion would generate {} terms, the limit is {}",
                terms, max
            ),
            TaylorError::Symbolic(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TaylorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaylorError::Symbolic(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SymbolicError> for TaylorError {
    fn from(err: SymbolicError) -> Self {
        TaylorError::Symbolic(err)
    }
}
