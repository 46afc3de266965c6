//! Primitive functions of the root environment.

use std::rc::Rc;

use rpal_ir::errors::{integer_overflow, type_mismatch};
use rpal_ir::{RpalResult, StringLookup};

use crate::print_handler::PrintHandlerImpl;
use crate::value::{Builtin, Value};

/// Apply `builtin` to `arg`, after the arguments already collected in
/// `pending` (empty unless the builtin is curried).
///
/// Returns a [`Value::Partial`] until the builtin has all its arguments.
pub fn apply_builtin(
    builtin: Builtin,
    pending: &[Value],
    arg: Value,
    out: &PrintHandlerImpl,
    names: &dyn StringLookup,
) -> RpalResult<Value> {
    if pending.len().saturating_add(1) < builtin.arity() {
        let mut args = Vec::with_capacity(builtin.arity());
        args.extend(pending.iter().cloned());
        args.push(arg);
        return Ok(Value::Partial(builtin, Rc::from(args)));
    }

    match builtin {
        Builtin::Print => {
            out.println(&arg.display(names).to_string());
            Ok(arg)
        }
        Builtin::Conc => match (pending.first(), &arg) {
            (Some(Value::Str(a)), Value::Str(b)) => {
                let mut joined = String::with_capacity(a.len().saturating_add(b.len()));
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::string(&joined))
            }
            (Some(Value::Str(_)), other) => Err(type_mismatch("string", other.type_name())),
            (Some(other), _) => Err(type_mismatch("string", other.type_name())),
            (None, _) => Err(type_mismatch("string", "nothing")),
        },
        Builtin::Stem => {
            let s = expect_string(&arg)?;
            let end = s.chars().next().map_or(0, char::len_utf8);
            Ok(Value::string(&s[..end]))
        }
        Builtin::Stern => {
            let s = expect_string(&arg)?;
            let start = s.chars().next().map_or(0, char::len_utf8);
            Ok(Value::string(&s[start..]))
        }
        Builtin::IsInteger => Ok(Value::Bool(matches!(arg, Value::Int(_)))),
        Builtin::IsString => Ok(Value::Bool(matches!(arg, Value::Str(_)))),
        Builtin::IsTruthValue => Ok(Value::Bool(matches!(arg, Value::Bool(_)))),
        Builtin::IsFunction => Ok(Value::Bool(arg.is_function())),
        Builtin::IsTuple => Ok(Value::Bool(matches!(arg, Value::Tuple(_)))),
        Builtin::IsDummy => Ok(Value::Bool(matches!(arg, Value::Dummy))),
        Builtin::Order => {
            let items = expect_tuple(&arg)?;
            i64::try_from(items.len())
                .map(Value::Int)
                .map_err(|_| integer_overflow("Order"))
        }
        Builtin::Null => Ok(Value::Bool(expect_tuple(&arg)?.is_empty())),
        Builtin::ItoS => match arg {
            Value::Int(n) => Ok(Value::string(&n.to_string())),
            other => Err(type_mismatch("integer", other.type_name())),
        },
    }
}

fn expect_string(value: &Value) -> RpalResult<&str> {
    match value {
        Value::Str(s) => Ok(s.as_ref()),
        other => Err(type_mismatch("string", other.type_name())),
    }
}

fn expect_tuple(value: &Value) -> RpalResult<&[Value]> {
    match value {
        Value::Tuple(items) => Ok(items.as_slice()),
        other => Err(type_mismatch("tuple", other.type_name())),
    }
}
