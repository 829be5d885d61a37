#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
//! Symbolic multivariate Taylor expansion.
//!
//! - [`symbolic`]: expression tree, parser, analytic derivatives and simplification
//! - [`taylor`]: the unfactored Taylor expander and text tasks driving it
//! - [`Utils`]: task document parser, logger setup and CSV export
pub mod Utils;
pub mod symbolic;
pub mod taylor;
