//! Pattern matching against expression trees (component D).

use std::collections::HashMap;

use crate::error::{KernelError, Result};
use crate::expr::Expr;

/// A successful match's wildcard captures.
pub type Bindings = HashMap<u32, Expr>;

/// Match `pattern` (which may contain wildcards) against `expr` (which must
/// not). Returns `Ok(None)` for an ordinary failed match — that outcome is
/// expected and cheap, not an error.
pub fn match_expr(pattern: &Expr, expr: &Expr) -> Result<Option<Bindings>> {
    if !expr.wildcard_numbers().is_empty() {
        return Err(KernelError::Match(
            "the expression being matched against must not contain wildcards".into(),
        ));
    }

    let mut captures: HashMap<u32, Vec<Expr>> = HashMap::new();
    if !collect(pattern, expr, &mut captures) {
        return Ok(None);
    }

    let mut bindings = Bindings::new();
    for (id, captured) in captures {
        let representative = &captured[0];
        if captured.iter().any(|c| c != representative) {
            return Ok(None);
        }
        bindings.insert(id, representative.clone());
    }
    Ok(Some(bindings))
}

fn collect(pattern: &Expr, expr: &Expr, captures: &mut HashMap<u32, Vec<Expr>>) -> bool {
    match pattern {
        Expr::Wildcard(n) => {
            captures.entry(*n).or_default().push(expr.clone());
            true
        }
        Expr::Constant(value) => matches!(expr, Expr::Constant(other) if other == value),
        Expr::Variable(var) => matches!(expr, Expr::Variable(other) if other == var),
        _ => {
            if pattern.head() != expr.head() {
                return false;
            }
            let pattern_terms = pattern.terms();
            let expr_terms = expr.terms();
            if pattern_terms.len() != expr_terms.len() {
                return false;
            }
            pattern_terms
                .iter()
                .zip(expr_terms.iter())
                .all(|(p, e)| collect(p, e, captures))
        }
    }
}
