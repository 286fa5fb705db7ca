//! Symbolic differentiation (component G).

use crate::error::{KernelError, Result};
use crate::expr::{Expr, Variable};
use crate::simplify::simplify;

/// Whether `expr`, and every node in its subtree, is marked
/// differentiable. Unlike a literal transcription of the node-local check,
/// this walks the whole tree: a `Wildcard` or `Sign` anywhere beneath the
/// root disqualifies differentiation of the root.
pub fn is_differentiable(expr: &Expr) -> bool {
    if expr.is_non_differentiable_node() {
        return false;
    }
    expr.terms().iter().all(|t| is_differentiable(t))
}

/// Differentiate `expr` with respect to `var`, then simplify the result.
pub fn diff(expr: &Expr, var: &Variable) -> Result<Expr> {
    let raw = diff_raw(expr, var)?;
    simplify(&raw, None)
}

/// Differentiate `expr` with respect to `var` using the per-constructor
/// rules, without simplifying. The public [`diff`] pipes this through the
/// simplifier; callers composing larger derivations may prefer the raw form.
pub fn diff_raw(expr: &Expr, var: &Variable) -> Result<Expr> {
    if !is_differentiable(expr) {
        return Err(KernelError::NonDifferentiable(format!(
            "{} contains a non-differentiable node",
            expr.head()
        )));
    }
    diff_unchecked(expr, var)
}

fn diff_unchecked(expr: &Expr, var: &Variable) -> Result<Expr> {
    Ok(match expr {
        Expr::Constant(_) => Expr::from(0i32),
        Expr::Variable(v) => {
            if v == var {
                Expr::from(1i32)
            } else {
                Expr::from(0i32)
            }
        }
        Expr::Wildcard(_) | Expr::Sign(_) => {
            unreachable!("non-differentiable nodes are rejected by diff_raw")
        }
        Expr::Plus(a, b) => diff_unchecked(a, var)? + diff_unchecked(b, var)?,
        Expr::Minus(a, b) => diff_unchecked(a, var)? - diff_unchecked(b, var)?,
        Expr::Neg(a) => -diff_unchecked(a, var)?,
        Expr::Times(a, b) => {
            let a_prime = diff_unchecked(a, var)?;
            let b_prime = diff_unchecked(b, var)?;
            (a.as_ref().clone() * b_prime) + (a_prime * b.as_ref().clone())
        }
        Expr::Divide(a, b) => {
            let a_prime = diff_unchecked(a, var)?;
            let b_prime = diff_unchecked(b, var)?;
            let numerator =
                (a_prime * b.as_ref().clone()) - (a.as_ref().clone() * b_prime);
            numerator / b.as_ref().clone().pow(2i32)
        }
        // Smooth-part derivative; the jump discontinuity at multiples of
        // `b` is intentionally not modeled. See DESIGN.md.
        Expr::Modulo(a, _b) => diff_unchecked(a, var)?,
        Expr::Power(a, b) => {
            let a_prime = diff_unchecked(a, var)?;
            let b_prime = diff_unchecked(b, var)?;
            let log_term = (a.as_ref().clone() * b_prime) * crate::expr::log(a.as_ref().clone());
            let power_term = b.as_ref().clone() * a_prime;
            (log_term + power_term) * a.as_ref().clone().pow(b.as_ref().clone() - 1i32)
        }
        Expr::Exp(a) => {
            let a_prime = diff_unchecked(a, var)?;
            crate::expr::exp(a.as_ref().clone()) * a_prime
        }
        Expr::Log(a) => {
            let a_prime = diff_unchecked(a, var)?;
            a_prime / a.as_ref().clone()
        }
        Expr::Cos(a) => {
            let a_prime = diff_unchecked(a, var)?;
            -(crate::expr::sin(a.as_ref().clone()) * a_prime)
        }
        Expr::Sin(a) => {
            let a_prime = diff_unchecked(a, var)?;
            crate::expr::cos(a.as_ref().clone()) * a_prime
        }
        Expr::Abs(a) => {
            let a_prime = diff_unchecked(a, var)?;
            crate::expr::sign(a.as_ref().clone()) * a_prime
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{evaluate, Environment};
    use crate::numeric::NumericValue;
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Variable {
        Variable::new(name)
    }

    #[test]
    fn diff_of_constant_is_zero() {
        let e = Expr::from(5i32);
        assert_eq!(diff(&e, &var("x")).unwrap(), Expr::from(0i32));
    }

    #[test]
    fn diff_of_same_variable_is_one() {
        let e = Expr::var("x");
        assert_eq!(diff(&e, &var("x")).unwrap(), Expr::from(1i32));
    }

    #[test]
    fn diff_of_other_variable_is_zero() {
        let e = Expr::var("y");
        assert_eq!(diff(&e, &var("x")).unwrap(), Expr::from(0i32));
    }

    #[test]
    fn sign_node_blocks_differentiation_anywhere_in_tree() {
        let e = Expr::var("x") + crate::expr::sign(Expr::var("y"));
        assert!(diff(&e, &var("x")).is_err());
    }

    #[test]
    fn wildcard_node_blocks_differentiation() {
        let e = Expr::wildcard(0) + Expr::var("x");
        assert!(diff(&e, &var("x")).is_err());
    }

    #[test]
    fn scenario_s1_square_sum_derivative() {
        let x = Expr::var("x");
        let y = Expr::var("y");
        let e = (x.clone() + y.clone()).pow(2i32);
        let d = diff(&e, &var("x")).unwrap();
        let env: Environment = [
            (b"x".to_vec(), NumericValue::Int(1)),
            (b"y".to_vec(), NumericValue::Int(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(evaluate(&d, &env).unwrap(), NumericValue::Int(6));
    }

    #[test]
    fn scenario_s6_sin_cos_derivatives_at_zero() {
        let x = Expr::var("x");
        let dsin = diff(&crate::expr::sin(x.clone()), &var("x")).unwrap();
        let dcos = diff(&crate::expr::cos(x.clone()), &var("x")).unwrap();
        let env: Environment = [(b"x".to_vec(), NumericValue::Float(0.0))].into_iter().collect();
        let sin_at_zero = evaluate(&dsin, &env).unwrap();
        let cos_at_zero = evaluate(&dcos, &env).unwrap();
        match sin_at_zero {
            NumericValue::Float(v) => assert!((v - 1.0).abs() < 1e-9),
            other => panic!("expected float, got {other:?}"),
        }
        match cos_at_zero {
            NumericValue::Float(v) => assert!(v.abs() < 1e-9),
            other => panic!("expected float, got {other:?}"),
        }
    }
}
