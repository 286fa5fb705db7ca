//! Black-box checks of the nine testable properties.

use erroneous_kernel::{
    deserialize, diff, evaluate, match_expr, serialize, simplify, substitute, ArrayData, Environment,
    Expr, NumericArray, NumericValue, Variable,
};
use pretty_assertions::assert_eq;

fn env(pairs: &[(&str, i32)]) -> Environment {
    pairs
        .iter()
        .map(|(k, v)| (k.as_bytes().to_vec(), NumericValue::Int(*v)))
        .collect()
}

#[test]
fn property_1_differentiation_of_leaves() {
    let v = Variable::new("x");
    assert_eq!(diff(&Expr::from(7i32), &v).unwrap(), Expr::from(0i32));
    assert_eq!(diff(&Expr::var("x"), &v).unwrap(), Expr::from(1i32));
    assert_eq!(diff(&Expr::var("y"), &v).unwrap(), Expr::from(0i32));
}

#[test]
fn property_2_linearity_of_differentiation() {
    let x = Expr::var("x");
    let y = Expr::var("y");
    let v = Variable::new("x");

    let e1 = x.clone() * y.clone();
    let e2 = x.clone().pow(2i32);
    let a = 3i32;
    let b = 5i32;

    let combined = diff(&(Expr::from(a) * e1.clone() + Expr::from(b) * e2.clone()), &v).unwrap();
    let separately = diff(&(Expr::from(a) * e1), &v).unwrap() + diff(&(Expr::from(b) * e2), &v).unwrap();

    let grid = [("x", 1, "y", 1), ("x", 2, "y", -1), ("x", -3, "y", 4)];
    for (xk, xv, yk, yv) in grid {
        let e = env(&[(xk, xv), (yk, yv)]);
        let lhs = evaluate(&combined, &e).unwrap();
        let rhs = evaluate(&separately, &e).unwrap();
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn property_3_simplifier_idempotence() {
    let x = Expr::var("x");
    let trees = vec![
        x.clone() + Expr::from(0i32),
        Expr::from(0i32) * (x.clone() + Expr::from(1i32)),
        (x.clone().pow(1i32)) * Expr::from(1i32),
        erroneous_kernel::exp(x.clone()) * erroneous_kernel::exp(Expr::var("y")),
    ];
    for tree in trees {
        let once = simplify(&tree, None).unwrap();
        let twice = simplify(&once, None).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn property_4_simplifier_soundness_on_a_grid() {
    let x = Expr::var("x");
    let y = Expr::var("y");
    let tree = (x.clone() + Expr::from(0i32)) * (Expr::from(1i32) * y.clone())
        - (Expr::from(0i32) * x.clone());
    let simplified = simplify(&tree, None).unwrap();

    for (xv, yv) in [(1, 2), (-3, 4), (0, 0), (5, -5)] {
        let e = env(&[("x", xv), ("y", yv)]);
        assert_eq!(
            evaluate(&tree, &e).unwrap(),
            evaluate(&simplified, &e).unwrap()
        );
    }
}

#[test]
fn property_5_matching_correctness() {
    let pattern = Expr::wildcard(0) + Expr::wildcard(1);
    let target = Expr::var("x") * Expr::var("y");
    assert_eq!(match_expr(&pattern, &target).unwrap(), None);

    let matching_target = Expr::var("x") + Expr::var("y");
    let bindings = match_expr(&pattern, &matching_target).unwrap().unwrap();
    let mut reinstantiated = pattern.clone();
    for (id, captured) in &bindings {
        reinstantiated = reinstantiated.wildcard_substitute(*id, captured);
    }
    assert_eq!(reinstantiated, matching_target);
}

#[test]
fn property_6_numeric_codec_round_trip_for_scalars_and_arrays() {
    let values = vec![
        NumericValue::Int(-17),
        NumericValue::Float(2.5),
        NumericValue::Array(NumericArray {
            shape: vec![2, 2],
            data: ArrayData::Int(vec![1, 2, 3, 4]),
        }),
        NumericValue::Array(NumericArray {
            shape: vec![3],
            data: ArrayData::Float(vec![1.5, -2.5, 0.0]),
        }),
    ];
    for v in values {
        let encoded = v.encode().unwrap();
        let (decoded, size) = NumericValue::decode(&encoded).unwrap();
        assert_eq!(decoded, v);
        assert_eq!(size, encoded.len());
    }
}

#[test]
fn property_7_bytestring_codec_tolerates_trailing_padding() {
    use erroneous_kernel::bytestring::{decode_bytestring, encode_bytestring};

    for payload in [&b""[..], &b"a"[..], &b"hello kernel"[..]] {
        let mut encoded = encode_bytestring(payload).unwrap();
        let expected_len = encoded.len();
        encoded.extend_from_slice(b"\xff\xff\xff");
        let (decoded, size) = decode_bytestring(&encoded).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(size, expected_len);
    }
}

#[test]
fn property_8_expression_codec_round_trip() {
    let x = Expr::var_aliased("x", "ex");
    let y = Expr::var("y");
    let trees = vec![
        x.clone() + y.clone(),
        (x.clone() * y.clone()).pow(2i32),
        erroneous_kernel::sin(x.clone()) - erroneous_kernel::cos(y.clone()),
        Expr::from(3i32) % Expr::from(2i32),
    ];
    for tree in trees {
        let encoded = serialize(&tree).unwrap();
        let decoded = deserialize(&encoded).unwrap();
        assert_eq!(decoded, tree);
    }
}

#[test]
fn property_9_variable_table_encoding_order() {
    let tree = Expr::var("b") + Expr::var("a") + Expr::var("c");
    let encoded = serialize(&tree).unwrap();
    // count == 3, entries sorted by identity bytes: a, b, c
    assert_eq!(&encoded[0..2], &[0, 3]);
    let decoded = deserialize(&encoded).unwrap();
    assert_eq!(decoded, tree);
}

#[test]
fn substitution_rejects_target_wildcard_absent_from_source() {
    let source = Expr::wildcard(0);
    let target = Expr::wildcard(5);
    assert!(substitute(&Expr::var("x"), &source, &target).is_err());
}
