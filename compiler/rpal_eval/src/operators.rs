//! Binary operators (CSE rule 6).
//!
//! Operand types are checked here rather than at generation time: RPAL is
//! dynamically typed, so `1 + 'a'` is well-formed until it runs.

use rpal_ir::errors::{division_by_zero, integer_overflow, type_mismatch};
use rpal_ir::{BinaryOp, Error, RpalResult};

use crate::value::Value;

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> RpalResult<Value> {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// What `op` accepts, for mismatch messages.
fn expected_operands(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow => {
            "integer operands"
        }
        BinaryOp::Gr | BinaryOp::Ge | BinaryOp::Ls | BinaryOp::Le => {
            "two integers or two strings"
        }
        BinaryOp::Or | BinaryOp::And => "truthvalue operands",
        BinaryOp::Eq | BinaryOp::NotEq => "operands of the same kind",
        BinaryOp::Aug => "a tuple on the left of `aug`",
    }
}

#[cold]
fn operand_mismatch(op: BinaryOp, left: &Value, right: &Value) -> Error {
    type_mismatch(
        expected_operands(op),
        format!("{} {} {}", left.type_name(), op.as_symbol(), right.type_name()),
    )
}

/// Apply `op` to `left` and `right`.
///
/// `left` is the operand written first in the source.
#[expect(
    clippy::needless_pass_by_value,
    reason = "the machine pops owned values and `aug` reuses them"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> RpalResult<Value> {
    if op == BinaryOp::Aug {
        return augment(&left, right);
    }
    let result = match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        _ => None,
    };
    result.unwrap_or_else(|| Err(operand_mismatch(op, &left, &right)))
}

/// Integer operators. `None` when `op` does not apply to integers.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> Option<RpalResult<Value>> {
    let result = match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        // Truncates toward zero.
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Pow => power(a, b),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Gr => Ok(Value::Bool(a > b)),
        BinaryOp::Ge => Ok(Value::Bool(a >= b)),
        BinaryOp::Ls => Ok(Value::Bool(a < b)),
        BinaryOp::Le => Ok(Value::Bool(a <= b)),
        BinaryOp::Or | BinaryOp::And | BinaryOp::Aug => return None,
    };
    Some(result)
}

fn power(base: i64, exponent: i64) -> RpalResult<Value> {
    let exponent = u32::try_from(exponent)
        .map_err(|_| type_mismatch("a non-negative exponent", exponent.to_string()))?;
    checked_arith(base.checked_pow(exponent), "exponentiation")
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> Option<RpalResult<Value>> {
    let result = match op {
        BinaryOp::Or => a || b,
        BinaryOp::And => a && b,
        BinaryOp::Eq => a == b,
        BinaryOp::NotEq => a != b,
        _ => return None,
    };
    Some(Ok(Value::Bool(result)))
}

/// String equality and lexicographic (byte-wise) ordering.
fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> Option<RpalResult<Value>> {
    let result = match op {
        BinaryOp::Eq => a == b,
        BinaryOp::NotEq => a != b,
        BinaryOp::Gr => a > b,
        BinaryOp::Ge => a >= b,
        BinaryOp::Ls => a < b,
        BinaryOp::Le => a <= b,
        _ => return None,
    };
    Some(Ok(Value::Bool(result)))
}

/// `t aug v`: a new tuple holding the items of `t` followed by `v`.
///
/// `nil aug v` yields the 1-tuple `(v)`.
fn augment(tuple: &Value, item: Value) -> RpalResult<Value> {
    let Value::Tuple(items) = tuple else {
        return Err(type_mismatch(
            expected_operands(BinaryOp::Aug),
            tuple.type_name(),
        ));
    };
    let mut extended = Vec::with_capacity(items.len().saturating_add(1));
    extended.extend(items.iter().cloned());
    extended.push(item);
    Ok(Value::tuple(extended))
}
