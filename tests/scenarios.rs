//! End-to-end scenarios exercising construction, differentiation, matching,
//! simplification and serialization together.

use std::collections::HashMap;

use erroneous_kernel::{
    cos, deserialize, diff, evaluate, exp, match_expr, serialize, sign, simplify, sin, Environment,
    Expr, NumericValue, Variable,
};
use pretty_assertions::assert_eq;

fn env(pairs: &[(&str, i32)]) -> Environment {
    pairs
        .iter()
        .map(|(k, v)| (k.as_bytes().to_vec(), NumericValue::Int(*v)))
        .collect()
}

#[test]
fn s1_derivative_of_square_sum() {
    let x = Expr::var("x");
    let y = Expr::var("y");
    let expression = (x + y).pow(2i32);
    let derivative = diff(&expression, &Variable::new("x")).unwrap();
    let result = evaluate(&derivative, &env(&[("x", 1), ("y", 2)])).unwrap();
    assert_eq!(result, NumericValue::Int(6));
}

#[test]
fn s2_additive_identity_and_multiplicative_annihilator() {
    let x = Expr::var("x");
    assert_eq!(simplify(&(x.clone() + 0i32), None).unwrap(), x);

    let complicated = (x.clone() + Expr::from(1i32)) * sign(x);
    assert_eq!(
        simplify(&(Expr::from(0i32) * complicated), None).unwrap(),
        Expr::from(0i32)
    );
}

#[test]
fn s3_exp_product_collapses_to_exp_of_sum() {
    let x = Expr::var("x");
    let y = Expr::var("y");
    let tree = exp(x.clone()) * exp(y.clone());
    assert_eq!(simplify(&tree, None).unwrap(), exp(x + y));
}

#[test]
fn s4_repeated_wildcard_requires_structural_equality() {
    let pattern = Expr::wildcard(0) + Expr::wildcard(0);
    let x = Expr::var("x");
    let y = Expr::var("y");

    assert_eq!(match_expr(&pattern, &(x.clone() + y)).unwrap(), None);

    let bound = match_expr(&pattern, &(x.clone() + x.clone())).unwrap();
    assert_eq!(bound, Some(HashMap::from([(0, x)])));
}

#[test]
fn s5_serialization_round_trip_preserves_alias() {
    let x = Expr::var_aliased("x", "x");
    let tree = x.pow(2i32) + Expr::from(1i32);
    let encoded = serialize(&tree).unwrap();
    let decoded = deserialize(&encoded).unwrap();
    assert_eq!(decoded, tree);
    assert_eq!(&encoded[0..2], &[0u8, 1u8]);
}

#[test]
fn s6_sin_cos_derivatives_at_zero() {
    let x = Expr::var("x");
    let dsin = diff(&sin(x.clone()), &Variable::new("x")).unwrap();
    let dcos = diff(&cos(x), &Variable::new("x")).unwrap();

    let at_zero: Environment = [(b"x".to_vec(), NumericValue::Float(0.0))]
        .into_iter()
        .collect();

    match evaluate(&dsin, &at_zero).unwrap() {
        NumericValue::Float(v) => assert!((v - 1.0).abs() < 1e-9),
        other => panic!("expected float, got {other:?}"),
    }
    match evaluate(&dcos, &at_zero).unwrap() {
        NumericValue::Float(v) => assert!(v.abs() < 1e-9),
        other => panic!("expected float, got {other:?}"),
    }
}
