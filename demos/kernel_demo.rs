//! A walkthrough of the kernel: build an expression, differentiate it,
//! evaluate both forms, then round-trip it through the binary codec.
//!
//! Run with `cargo run --example kernel_demo`, or treat it as a reading
//! companion to the unit tests: it exercises the same operations end to end.

use erroneous_kernel::{deserialize, diff, evaluate, serialize, simplify, Environment, Expr, Variable};

fn main() {
    let x = Expr::var_aliased("x", "x");
    let y = Expr::var_aliased("y", "y");

    let expression = (x.clone() + y.clone()).pow(2i32);
    println!("expression: {expression:?}");

    let x_var = Variable::new("x");
    let derivative = diff(&expression, &x_var).expect("differentiable");
    println!("d/dx: {derivative:?}");

    let env: Environment = [
        (b"x".to_vec(), erroneous_kernel::NumericValue::Int(1)),
        (b"y".to_vec(), erroneous_kernel::NumericValue::Int(2)),
    ]
    .into_iter()
    .collect();

    let value = evaluate(&expression, &env).expect("fully bound");
    let derivative_value = evaluate(&derivative, &env).expect("fully bound");
    println!("value at (x=1, y=2): {value:?}");
    println!("derivative value at (x=1, y=2): {derivative_value:?}");

    let simplified = simplify(&derivative, None).expect("simplifies");
    println!("simplified derivative: {simplified:?}");

    let encoded = serialize(&expression).expect("wildcard-free");
    println!("encoded length: {} bytes", encoded.len());
    let decoded = deserialize(&encoded).expect("well-formed wire data");
    assert_eq!(decoded, expression);
    println!("round-trip ok");
}
