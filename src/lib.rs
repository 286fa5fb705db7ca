//! erroneous_kernel
//!
//! A small symbolic algebra kernel: an expression tree over a fixed set of
//! operators, with symbolic differentiation, pattern-based rewriting, a
//! fixed-point simplifier, numeric evaluation, and a compact binary codec.
//!
//! # Modules
//!
//! - `expr`: the expression AST and its structural operations.
//! - `numeric`: scalar/array numeric values and their binary codec.
//! - `bytestring`: the length-prefixed byte blob codec.
//! - `match_engine`: pattern matching with wildcards.
//! - `substitute`: bottom-up tree rewriting.
//! - `simplify`: the fixed-point simplifier and its rule table.
//! - `diff`: symbolic differentiation.
//! - `eval`: numeric evaluation.
//! - `codec`: expression serialization (variable table + preorder body).
//! - `error`: the shared error type.

pub mod bytestring;
pub mod codec;
pub mod diff;
pub mod error;
pub mod eval;
pub mod expr;
pub mod match_engine;
pub mod numeric;
pub mod simplify;
pub mod substitute;

pub use codec::{deserialize, serialize};
pub use diff::diff;
pub use error::{KernelError, Result};
pub use eval::{evaluate, Environment};
pub use expr::{abs, cos, exp, log, sign, sin, Expr, Variable};
pub use match_engine::{match_expr, Bindings};
pub use numeric::{ArrayData, NumericArray, NumericValue};
pub use simplify::simplify;
pub use substitute::substitute;
