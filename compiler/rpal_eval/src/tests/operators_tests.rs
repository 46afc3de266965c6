use pretty_assertions::assert_eq;
use rpal_ir::{BinaryOp, ErrorKind};

use crate::operators::evaluate_binary;
use crate::value::Value;

fn int_op(a: i64, b: i64, op: BinaryOp) -> Value {
    evaluate_binary(Value::int(a), Value::int(b), op).unwrap()
}

#[test]
fn integer_arithmetic() {
    assert_eq!(int_op(2, 3, BinaryOp::Add), Value::int(5));
    assert_eq!(int_op(5, 3, BinaryOp::Sub), Value::int(2));
    assert_eq!(int_op(2, 3, BinaryOp::Mul), Value::int(6));
    assert_eq!(int_op(7, 2, BinaryOp::Div), Value::int(3));
    assert_eq!(int_op(-7, 2, BinaryOp::Div), Value::int(-3));
    assert_eq!(int_op(2, 10, BinaryOp::Pow), Value::int(1024));
    assert_eq!(int_op(5, 0, BinaryOp::Pow), Value::int(1));
}

#[test]
fn integer_comparisons() {
    assert_eq!(int_op(2, 3, BinaryOp::Ls), Value::Bool(true));
    assert_eq!(int_op(3, 3, BinaryOp::Le), Value::Bool(true));
    assert_eq!(int_op(3, 2, BinaryOp::Gr), Value::Bool(true));
    assert_eq!(int_op(2, 3, BinaryOp::Ge), Value::Bool(false));
    assert_eq!(int_op(2, 2, BinaryOp::Eq), Value::Bool(true));
    assert_eq!(int_op(2, 2, BinaryOp::NotEq), Value::Bool(false));
}

#[test]
fn division_by_zero() {
    let err = evaluate_binary(Value::int(1), Value::int(0), BinaryOp::Div).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DivisionByZero);
}

#[test]
fn overflow_is_reported_per_operation() {
    let cases = [
        (i64::MAX, 1, BinaryOp::Add, "addition"),
        (i64::MIN, 1, BinaryOp::Sub, "subtraction"),
        (i64::MAX, 2, BinaryOp::Mul, "multiplication"),
        (i64::MIN, -1, BinaryOp::Div, "division"),
        (2, 64, BinaryOp::Pow, "exponentiation"),
    ];
    for (a, b, op, operation) in cases {
        let err = evaluate_binary(Value::int(a), Value::int(b), op).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IntegerOverflow { operation });
    }
}

#[test]
fn negative_exponent_is_rejected() {
    let err = evaluate_binary(Value::int(2), Value::int(-1), BinaryOp::Pow).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
}

#[test]
fn boolean_connectives() {
    let t = Value::Bool(true);
    let f = Value::Bool(false);
    assert_eq!(
        evaluate_binary(t.clone(), f.clone(), BinaryOp::Or).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(t.clone(), f.clone(), BinaryOp::And).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        evaluate_binary(f.clone(), f, BinaryOp::Eq).unwrap(),
        Value::Bool(true)
    );
    assert!(evaluate_binary(t.clone(), t, BinaryOp::Add).is_err());
}

#[test]
fn string_equality() {
    assert_eq!(
        evaluate_binary(Value::string("a"), Value::string("a"), BinaryOp::Eq).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::string("a"), Value::string("b"), BinaryOp::NotEq).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn strings_order_lexicographically() {
    let cmp = |a: &str, b: &str, op: BinaryOp| {
        evaluate_binary(Value::string(a), Value::string(b), op).unwrap()
    };
    assert_eq!(cmp("a", "b", BinaryOp::Ls), Value::Bool(true));
    assert_eq!(cmp("b", "a", BinaryOp::Ge), Value::Bool(true));
    assert_eq!(cmp("ab", "a", BinaryOp::Gr), Value::Bool(true));
    assert_eq!(cmp("abc", "abd", BinaryOp::Le), Value::Bool(true));
    assert_eq!(cmp("abc", "abc", BinaryOp::Le), Value::Bool(true));
    assert_eq!(cmp("", "a", BinaryOp::Gr), Value::Bool(false));
}

#[test]
fn string_arithmetic_names_integer_operands() {
    let err = evaluate_binary(Value::string("a"), Value::string("b"), BinaryOp::Add).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: "integer operands".to_string(),
            got: "string + string".to_string(),
        }
    );
    let err = evaluate_binary(Value::string("a"), Value::string("b"), BinaryOp::And).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: "truthvalue operands".to_string(),
            got: "string & string".to_string(),
        }
    );
}

#[test]
fn mixed_operands_are_type_errors() {
    let err = evaluate_binary(Value::int(1), Value::string("a"), BinaryOp::Add).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: "integer operands".to_string(),
            got: "integer + string".to_string(),
        }
    );
    let err = evaluate_binary(Value::int(1), Value::string("a"), BinaryOp::Ls).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: "two integers or two strings".to_string(),
            got: "integer ls string".to_string(),
        }
    );
    assert!(evaluate_binary(Value::int(1), Value::int(2), BinaryOp::Or).is_err());
}

#[test]
fn aug_extends_tuples() {
    let tuple = Value::tuple(vec![Value::int(1), Value::int(2)]);
    assert_eq!(
        evaluate_binary(tuple, Value::int(3), BinaryOp::Aug).unwrap(),
        Value::tuple(vec![Value::int(1), Value::int(2), Value::int(3)])
    );
    assert_eq!(
        evaluate_binary(Value::nil(), Value::nil(), BinaryOp::Aug).unwrap(),
        Value::tuple(vec![Value::nil()])
    );
    assert!(evaluate_binary(Value::int(1), Value::int(2), BinaryOp::Aug).is_err());
}
