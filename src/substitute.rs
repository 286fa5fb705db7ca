//! Bottom-up tree rewriting (component E).

use crate::error::{KernelError, Result};
use crate::expr::Expr;
use crate::match_engine::{match_expr, Bindings};

/// Rewrite every subtree of `root` that matches `source` into an
/// instantiation of `target`, walking children before parents.
pub fn substitute(root: &Expr, source: &Expr, target: &Expr) -> Result<Expr> {
    let source_wildcards = source.wildcard_numbers();
    let target_wildcards = target.wildcard_numbers();
    if !target_wildcards.is_subset(&source_wildcards) {
        return Err(KernelError::Substitution(
            "target pattern references a wildcard absent from the source pattern".into(),
        ));
    }
    rewrite_node(root, source, target)
}

fn rewrite_node(node: &Expr, source: &Expr, target: &Expr) -> Result<Expr> {
    let rebuilt = rebuild_children(node, source, target)?;
    match match_expr(source, &rebuilt)? {
        Some(bindings) => instantiate(target, &bindings),
        None => Ok(rebuilt),
    }
}

fn rebuild_children(node: &Expr, source: &Expr, target: &Expr) -> Result<Expr> {
    macro_rules! binary {
        ($variant:ident, $a:expr, $b:expr) => {
            Expr::$variant(
                Box::new(rewrite_node($a, source, target)?),
                Box::new(rewrite_node($b, source, target)?),
            )
        };
    }
    macro_rules! unary {
        ($variant:ident, $a:expr) => {
            Expr::$variant(Box::new(rewrite_node($a, source, target)?))
        };
    }

    Ok(match node {
        Expr::Constant(_) | Expr::Variable(_) => node.clone(),
        Expr::Wildcard(_) => {
            return Err(KernelError::Substitution(
                "cannot substitute through a wildcard node".into(),
            ))
        }
        Expr::Plus(a, b) => binary!(Plus, a, b),
        Expr::Minus(a, b) => binary!(Minus, a, b),
        Expr::Times(a, b) => binary!(Times, a, b),
        Expr::Divide(a, b) => binary!(Divide, a, b),
        Expr::Modulo(a, b) => binary!(Modulo, a, b),
        Expr::Power(a, b) => binary!(Power, a, b),
        Expr::Neg(a) => unary!(Neg, a),
        Expr::Exp(a) => unary!(Exp, a),
        Expr::Log(a) => unary!(Log, a),
        Expr::Cos(a) => unary!(Cos, a),
        Expr::Sin(a) => unary!(Sin, a),
        Expr::Abs(a) => unary!(Abs, a),
        Expr::Sign(a) => unary!(Sign, a),
    })
}

/// Instantiate a target pattern by replacing each of its wildcards with the
/// subtree captured for that id.
fn instantiate(target: &Expr, bindings: &Bindings) -> Result<Expr> {
    let mut result = target.clone();
    for (id, captured) in bindings {
        result = result.wildcard_substitute(*id, captured);
    }
    Ok(result)
}
