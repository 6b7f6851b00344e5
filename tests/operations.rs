use calclog::{
    error::CalcError,
    operations::{
        Operation, OperationRegistry,
        builtin::{Addition, Division, Modulus, Multiplication, Power, Subtraction},
    },
    types::Operand,
};

fn eval(op: &dyn Operation, a: impl Into<Operand>, b: impl Into<Operand>) -> Result<f64, CalcError> {
    op.evaluate(&a.into(), &b.into())
}

#[test]
fn basic_arithmetic() {
    let cases: [(&dyn Operation, i64, i64, f64); 12] = [
        (&Addition, 3, 5, 8.0),
        (&Addition, -1, 1, 0.0),
        (&Subtraction, 10, 5, 5.0),
        (&Subtraction, 5, 10, -5.0),
        (&Multiplication, 3, 7, 21.0),
        (&Multiplication, -1, 10, -10.0),
        (&Division, 10, 2, 5.0),
        (&Division, 5, 2, 2.5),
        (&Division, 0, 1, 0.0),
        (&Modulus, 10, 3, 1.0),
        (&Modulus, 20, 6, 2.0),
        (&Modulus, 5, 5, 0.0),
    ];
    for (op, a, b, expected) in cases {
        assert_eq!(eval(op, a, b), Ok(expected), "{} {a} {b}", op.name());
    }
}

#[test]
fn power_handles_negative_and_fractional_exponents() {
    assert_eq!(eval(&Power, 2, 3), Ok(8.0));
    assert_eq!(eval(&Power, 5, 0), Ok(1.0));
    assert_eq!(eval(&Power, 4, 0.5), Ok(2.0));
    let small = eval(&Power, 10, -2).unwrap();
    assert!((small - 0.01).abs() < 1e-15);
}

#[test]
fn zero_divisor_is_rejected() {
    assert_eq!(eval(&Division, 5, 0), Err(CalcError::DivisionByZero));
    assert_eq!(eval(&Modulus, 5, 0), Err(CalcError::DivisionByZero));
    assert_eq!(eval(&Division, 5.0, 0.0), Err(CalcError::DivisionByZero));
}

#[test]
fn every_operation_rejects_non_numeric_operands() {
    let ops: [&dyn Operation; 6] = [&Addition, &Subtraction, &Multiplication, &Division, &Power, &Modulus];
    let bad: [(Operand, Operand); 4] = [
        (Operand::Int(5), Operand::from("x")),
        (Operand::from("y"), Operand::Int(3)),
        (Operand::Null, Operand::Int(4)),
        (Operand::from("a"), Operand::from("b")),
    ];
    for op in ops {
        for (a, b) in &bad {
            let err = op.evaluate(a, b).unwrap_err();
            assert!(matches!(err, CalcError::InvalidOperand { .. }), "{}: {err}", op.name());
        }
    }

    let err = eval(&Power, None::<i32>, 4).unwrap_err();
    assert_eq!(err.to_string(), "Invalid types: a is null, b is int. Expected int or float.");
}

#[test]
fn registry_get_is_silent_for_unknown_names() {
    let registry = OperationRegistry::load();
    assert!(registry.get("sqrt").is_none());
    assert_eq!(registry.get("power").map(|op| op.name().to_string()), Some("power".to_string()));
    assert_eq!(registry.len(), 6);
}
