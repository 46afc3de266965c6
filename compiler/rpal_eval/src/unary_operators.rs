//! Unary operators (CSE rule 7).

use rpal_ir::errors::{integer_overflow, type_mismatch};
use rpal_ir::{RpalResult, UnaryOp};

use crate::value::Value;

/// Apply `op` to `operand`.
///
/// `Print` has no arithmetic meaning and returns its operand; emitting the
/// output is the machine's job, since it owns the print handler.
pub fn evaluate_unary(operand: Value, op: UnaryOp) -> RpalResult<Value> {
    match (op, operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Print, value) => Ok(value),
        (UnaryOp::Not, other) => Err(type_mismatch("truthvalue", other.type_name())),
        (UnaryOp::Neg, other) => Err(type_mismatch("integer", other.type_name())),
    }
}
