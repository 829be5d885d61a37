//! Error type shared by the symbolic engine: parsing, differentiation, substitution and
//! numerical evaluation all report failures through [`SymbolicError`].

use std::fmt;

/// Errors raised by the symbolic engine
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicError {
    /// the input string is not a valid expression
    Parse(String),
    /// an expression was used where a single symbol is required
    /// (differentiation axis or substitution key)
    NotAVariable(String),
    /// evaluation met a variable without a value
    UnknownVariable(String),
}

impl fmt::Display for SymbolicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolicError::Parse(msg) => write!(f, "Parsing error: {}", msg),
            SymbolicError::NotAVariable(expr) => {
                write!(f, "Expression '{}' is not a variable", expr)
            }
            SymbolicError::UnknownVariable(name) => {
                write!(f, "No value given for variable '{}'", name)
            }
        }
    }
}

impl std::error::Error for SymbolicError {}
