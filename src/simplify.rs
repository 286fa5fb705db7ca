//! Fixed-point simplification driven by constant folding and a literal
//! rule table (component F).

use std::sync::OnceLock;

use log::warn;

use crate::error::Result;
use crate::eval::{evaluate, Environment};
use crate::expr::{exp, log, Expr};
use crate::substitute::substitute;

const DEFAULT_MAX_ITERS: u32 = 100;

type Rule = (Expr, Expr);

/// The literal, ordered rule table (§6.3). Built once and shared by every
/// call to [`simplify`].
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES
        .get_or_init(|| {
            let w0 = || Expr::wildcard(0);
            let w1 = || Expr::wildcard(1);
            let w2 = || Expr::wildcard(2);
            let zero = || Expr::from(0i32);
            let one = || Expr::from(1i32);

            vec![
                (w0() + zero(), w0()),
                (zero() + w0(), w0()),
                (one() * w0(), w0()),
                (w0() * one(), w0()),
                (w0() - zero(), w0()),
                (w0() / one(), w0()),
                (w0().pow(1i32), w0()),
                (zero() * w0(), zero()),
                (w0() * zero(), zero()),
                (one().pow(w0()), one()),
                (w0().pow(0i32), one()),
                (w0() - (-w1()), w0() + w1()),
                (-(-w0()), w0()),
                (w0() + (-w1()), w0() - w1()),
                ((-w0()) + w1(), w1() - w0()),
                (log(one()), zero()),
                (exp(zero()), one()),
                (w0().pow(w1()) * w0().pow(w2()), w0().pow(w1() + w2())),
                (exp(w0()) * exp(w1()), exp(w0() + w1())),
                (log(w0()) + log(w1()), log(w0() * w1())),
            ]
        })
        .as_slice()
}

/// Run the simplifier to a fixed point (or until `max_iters`, default 100).
/// Reaching the cap without converging is logged as a warning, not an error.
pub fn simplify(expr: &Expr, max_iters: Option<u32>) -> Result<Expr> {
    let max_iters = max_iters.unwrap_or(DEFAULT_MAX_ITERS);
    let mut current = expr.clone();

    for _ in 0..max_iters {
        let mut next = fold_constants(&current);
        for (source, target) in rules() {
            next = substitute(&next, source, target)?;
        }
        if next == current {
            return Ok(next);
        }
        current = next;
    }

    warn!("simplifier reached max_iters ({max_iters}) without reaching a fixed point");
    Ok(current)
}

/// Depth-first constant folding: a node whose children all reduce to
/// concrete numeric values is replaced by the evaluated `Constant`.
fn fold_constants(expr: &Expr) -> Expr {
    match expr {
        Expr::Constant(_) | Expr::Variable(_) | Expr::Wildcard(_) => expr.clone(),
        _ => {
            let folded_children: Vec<Expr> = expr.terms().into_iter().map(fold_constants).collect();
            let rebuilt = rebuild(expr, &folded_children);
            if folded_children
                .iter()
                .all(|c| matches!(c, Expr::Constant(_)))
            {
                if let Ok(value) = evaluate(&rebuilt, &Environment::new()) {
                    return Expr::Constant(value);
                }
            }
            rebuilt
        }
    }
}

fn rebuild(expr: &Expr, children: &[Expr]) -> Expr {
    match expr {
        Expr::Plus(..) => Expr::Plus(Box::new(children[0].clone()), Box::new(children[1].clone())),
        Expr::Minus(..) => Expr::Minus(Box::new(children[0].clone()), Box::new(children[1].clone())),
        Expr::Times(..) => Expr::Times(Box::new(children[0].clone()), Box::new(children[1].clone())),
        Expr::Divide(..) => Expr::Divide(Box::new(children[0].clone()), Box::new(children[1].clone())),
        Expr::Modulo(..) => Expr::Modulo(Box::new(children[0].clone()), Box::new(children[1].clone())),
        Expr::Power(..) => Expr::Power(Box::new(children[0].clone()), Box::new(children[1].clone())),
        Expr::Neg(_) => Expr::Neg(Box::new(children[0].clone())),
        Expr::Exp(_) => Expr::Exp(Box::new(children[0].clone())),
        Expr::Log(_) => Expr::Log(Box::new(children[0].clone())),
        Expr::Cos(_) => Expr::Cos(Box::new(children[0].clone())),
        Expr::Sin(_) => Expr::Sin(Box::new(children[0].clone())),
        Expr::Abs(_) => Expr::Abs(Box::new(children[0].clone())),
        Expr::Sign(_) => Expr::Sign(Box::new(children[0].clone())),
        leaf => leaf.clone(),
    }
}
