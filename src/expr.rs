//! The expression AST and its structural operations (component C).
//!
//! `Expr` is the tagged-variant tree described in the data model: a small,
//! closed set of leaf and operator nodes. Construction goes through
//! operator overloading and free functions rather than explicit variant
//! names, so that composing expressions reads like ordinary arithmetic.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg as StdNeg, Rem, Sub};

use crate::numeric::{NumericArray, NumericValue};

/// A symbolic leaf. Equality, ordering and hashing are keyed only on
/// `identity` — the `alias` is a display affordance and never affects
/// whether two variables denote the same thing.
#[derive(Debug, Clone)]
pub struct Variable {
    pub identity: Vec<u8>,
    pub alias: Option<String>,
}

impl Variable {
    pub fn new(identity: impl Into<Vec<u8>>) -> Self {
        Variable {
            identity: identity.into(),
            alias: None,
        }
    }

    pub fn with_alias(identity: impl Into<Vec<u8>>, alias: impl Into<String>) -> Self {
        Variable {
            identity: identity.into(),
            alias: Some(alias.into()),
        }
    }

    /// The string used for display: the alias if present, otherwise a
    /// best-effort decoding of the identity bytes.
    pub fn display_name(&self) -> String {
        match &self.alias {
            Some(a) => a.clone(),
            None => String::from_utf8_lossy(&self.identity).into_owned(),
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

/// The expression tree. Every interior node owns its children exclusively;
/// trees are never mutated in place, only rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(NumericValue),
    Variable(Variable),
    /// Pattern-only placeholder. Never valid inside a tree handed to the
    /// evaluator or the codec.
    Wildcard(u32),
    Plus(Box<Expr>, Box<Expr>),
    Minus(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Times(Box<Expr>, Box<Expr>),
    Divide(Box<Expr>, Box<Expr>),
    Modulo(Box<Expr>, Box<Expr>),
    Power(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Cos(Box<Expr>),
    Sin(Box<Expr>),
    Abs(Box<Expr>),
    Sign(Box<Expr>),
}

impl Expr {
    pub fn var(identity: impl Into<Vec<u8>>) -> Expr {
        Expr::Variable(Variable::new(identity))
    }

    pub fn var_aliased(identity: impl Into<Vec<u8>>, alias: impl Into<String>) -> Expr {
        Expr::Variable(Variable::with_alias(identity, alias))
    }

    pub fn wildcard(id: u32) -> Expr {
        Expr::Wildcard(id)
    }

    /// The tag name of this node, stable across encode/decode and used as
    /// the matcher's "same constructor" discriminant.
    pub fn head(&self) -> &'static str {
        match self {
            Expr::Constant(_) => "Constant",
            Expr::Variable(_) => "Variable",
            Expr::Wildcard(_) => "Wildcard",
            Expr::Plus(..) => "Plus",
            Expr::Minus(..) => "Minus",
            Expr::Neg(_) => "Neg",
            Expr::Times(..) => "Times",
            Expr::Divide(..) => "Divide",
            Expr::Modulo(..) => "Modulo",
            Expr::Power(..) => "Power",
            Expr::Exp(_) => "Exp",
            Expr::Log(_) => "Log",
            Expr::Cos(_) => "Cos",
            Expr::Sin(_) => "Sin",
            Expr::Abs(_) => "Abs",
            Expr::Sign(_) => "Sign",
        }
    }

    /// This node's direct children, in evaluation/encoding order.
    pub fn terms(&self) -> Vec<&Expr> {
        match self {
            Expr::Constant(_) | Expr::Variable(_) | Expr::Wildcard(_) => vec![],
            Expr::Plus(a, b)
            | Expr::Minus(a, b)
            | Expr::Times(a, b)
            | Expr::Divide(a, b)
            | Expr::Modulo(a, b)
            | Expr::Power(a, b) => vec![a, b],
            Expr::Neg(a)
            | Expr::Exp(a)
            | Expr::Log(a)
            | Expr::Cos(a)
            | Expr::Sin(a)
            | Expr::Abs(a)
            | Expr::Sign(a) => vec![a],
        }
    }

    /// Whether this single node is marked non-differentiable. Does not
    /// recurse — see [`crate::diff::is_differentiable`] for the whole-tree
    /// check the differentiator actually uses.
    pub fn is_non_differentiable_node(&self) -> bool {
        matches!(self, Expr::Wildcard(_) | Expr::Sign(_))
    }

    /// The set of wildcard ids appearing anywhere in this subtree.
    pub fn wildcard_numbers(&self) -> HashSet<u32> {
        let mut out = HashSet::new();
        self.collect_wildcard_numbers(&mut out);
        out
    }

    fn collect_wildcard_numbers(&self, out: &mut HashSet<u32>) {
        if let Expr::Wildcard(n) = self {
            out.insert(*n);
        }
        for child in self.terms() {
            child.collect_wildcard_numbers(out);
        }
    }

    /// Replace every `Wildcard(id)` leaf with `replacement`.
    pub fn wildcard_substitute(&self, id: u32, replacement: &Expr) -> Expr {
        match self {
            Expr::Wildcard(n) if *n == id => replacement.clone(),
            Expr::Constant(_) | Expr::Variable(_) | Expr::Wildcard(_) => self.clone(),
            Expr::Plus(a, b) => Expr::Plus(
                Box::new(a.wildcard_substitute(id, replacement)),
                Box::new(b.wildcard_substitute(id, replacement)),
            ),
            Expr::Minus(a, b) => Expr::Minus(
                Box::new(a.wildcard_substitute(id, replacement)),
                Box::new(b.wildcard_substitute(id, replacement)),
            ),
            Expr::Times(a, b) => Expr::Times(
                Box::new(a.wildcard_substitute(id, replacement)),
                Box::new(b.wildcard_substitute(id, replacement)),
            ),
            Expr::Divide(a, b) => Expr::Divide(
                Box::new(a.wildcard_substitute(id, replacement)),
                Box::new(b.wildcard_substitute(id, replacement)),
            ),
            Expr::Modulo(a, b) => Expr::Modulo(
                Box::new(a.wildcard_substitute(id, replacement)),
                Box::new(b.wildcard_substitute(id, replacement)),
            ),
            Expr::Power(a, b) => Expr::Power(
                Box::new(a.wildcard_substitute(id, replacement)),
                Box::new(b.wildcard_substitute(id, replacement)),
            ),
            Expr::Neg(a) => Expr::Neg(Box::new(a.wildcard_substitute(id, replacement))),
            Expr::Exp(a) => Expr::Exp(Box::new(a.wildcard_substitute(id, replacement))),
            Expr::Log(a) => Expr::Log(Box::new(a.wildcard_substitute(id, replacement))),
            Expr::Cos(a) => Expr::Cos(Box::new(a.wildcard_substitute(id, replacement))),
            Expr::Sin(a) => Expr::Sin(Box::new(a.wildcard_substitute(id, replacement))),
            Expr::Abs(a) => Expr::Abs(Box::new(a.wildcard_substitute(id, replacement))),
            Expr::Sign(a) => Expr::Sign(Box::new(a.wildcard_substitute(id, replacement))),
        }
    }

    /// Structural equality. Exposed by name to match the component design's
    /// vocabulary; `Expr` also implements [`PartialEq`] directly.
    pub fn full_identity(&self, other: &Expr) -> bool {
        self == other
    }

    pub fn pow(self, rhs: impl Into<Expr>) -> Expr {
        Expr::Power(Box::new(self), Box::new(rhs.into()))
    }
}

impl From<i32> for Expr {
    fn from(v: i32) -> Self {
        Expr::Constant(NumericValue::Int(v))
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Constant(NumericValue::from(v))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Constant(NumericValue::Float(v))
    }
}

impl From<NumericArray> for Expr {
    fn from(v: NumericArray) -> Self {
        Expr::Constant(NumericValue::Array(v))
    }
}

impl From<NumericValue> for Expr {
    fn from(v: NumericValue) -> Self {
        Expr::Constant(v)
    }
}

impl From<Variable> for Expr {
    fn from(v: Variable) -> Self {
        Expr::Variable(v)
    }
}

impl<T: Into<Expr>> Add<T> for Expr {
    type Output = Expr;
    fn add(self, rhs: T) -> Expr {
        Expr::Plus(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> Sub<T> for Expr {
    type Output = Expr;
    fn sub(self, rhs: T) -> Expr {
        Expr::Minus(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> Mul<T> for Expr {
    type Output = Expr;
    fn mul(self, rhs: T) -> Expr {
        Expr::Times(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> Div<T> for Expr {
    type Output = Expr;
    fn div(self, rhs: T) -> Expr {
        Expr::Divide(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> Rem<T> for Expr {
    type Output = Expr;
    fn rem(self, rhs: T) -> Expr {
        Expr::Modulo(Box::new(self), Box::new(rhs.into()))
    }
}

impl StdNeg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

pub fn exp(a: impl Into<Expr>) -> Expr {
    Expr::Exp(Box::new(a.into()))
}

pub fn log(a: impl Into<Expr>) -> Expr {
    Expr::Log(Box::new(a.into()))
}

pub fn sin(a: impl Into<Expr>) -> Expr {
    Expr::Sin(Box::new(a.into()))
}

pub fn cos(a: impl Into<Expr>) -> Expr {
    Expr::Cos(Box::new(a.into()))
}

pub fn abs(a: impl Into<Expr>) -> Expr {
    Expr::Abs(Box::new(a.into()))
}

pub fn sign(a: impl Into<Expr>) -> Expr {
    Expr::Sign(Box::new(a.into()))
}
