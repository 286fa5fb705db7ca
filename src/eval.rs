//! Numeric evaluation of expression trees (component H).

use std::collections::HashMap;

use crate::error::{KernelError, Result};
use crate::expr::Expr;
use crate::numeric::NumericValue;

/// A binding from variable identity to a concrete numeric value.
pub type Environment = HashMap<Vec<u8>, NumericValue>;

/// Evaluate `expr` under `env`. Fails if the tree contains a wildcard or
/// references a variable missing from `env`.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<NumericValue> {
    match expr {
        Expr::Constant(value) => Ok(value.clone()),
        Expr::Variable(var) => env.get(&var.identity).cloned().ok_or_else(|| {
            KernelError::Evaluation(format!("unbound variable {:?}", var.display_name()))
        }),
        Expr::Wildcard(_) => Err(KernelError::Evaluation(
            "wildcards cannot be evaluated".into(),
        )),
        Expr::Plus(a, b) => evaluate(a, env)?.add(&evaluate(b, env)?),
        Expr::Minus(a, b) => evaluate(a, env)?.sub(&evaluate(b, env)?),
        Expr::Neg(a) => Ok(evaluate(a, env)?.neg()),
        Expr::Times(a, b) => evaluate(a, env)?.mul(&evaluate(b, env)?),
        Expr::Divide(a, b) => evaluate(a, env)?.div(&evaluate(b, env)?),
        Expr::Modulo(a, b) => evaluate(a, env)?.rem(&evaluate(b, env)?),
        Expr::Power(a, b) => evaluate(a, env)?.pow(&evaluate(b, env)?),
        Expr::Exp(a) => Ok(evaluate(a, env)?.exp()),
        Expr::Log(a) => Ok(evaluate(a, env)?.log()),
        Expr::Cos(a) => Ok(evaluate(a, env)?.cos()),
        Expr::Sin(a) => Ok(evaluate(a, env)?.sin()),
        // Absolute value, not logarithm — see the numeric module's note.
        Expr::Abs(a) => Ok(evaluate(a, env)?.abs()),
        Expr::Sign(a) => Ok(evaluate(a, env)?.sign()),
    }
}
