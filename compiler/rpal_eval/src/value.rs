//! Runtime values of the CSE machine.
//!
//! Values are cheap to clone: strings and tuples are reference counted, and
//! closures carry an [`EnvId`] handle rather than the environment itself.
//! Nested tuples can be arbitrarily deep, so their teardown is iterative
//! and their formatting grows the stack on demand.

use std::fmt;
use std::mem;
use std::ops::Deref;
use std::rc::Rc;

use rpal_stack::ensure_sufficient_stack;

use rpal_ir::{ControlId, Name, StringLookup};

use crate::environment::EnvId;

/// A function value: a body, its bound variables, and the environment
/// that was current when the lambda was evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    pub body: ControlId,
    pub params: Rc<[Name]>,
    pub env: EnvId,
}

/// Primitive functions bound in the root environment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Conc,
    Stem,
    Stern,
    IsInteger,
    IsString,
    IsTruthValue,
    IsFunction,
    IsTuple,
    IsDummy,
    Order,
    Null,
    ItoS,
}

impl Builtin {
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Print => "Print",
            Builtin::Conc => "Conc",
            Builtin::Stem => "Stem",
            Builtin::Stern => "Stern",
            Builtin::IsInteger => "Isinteger",
            Builtin::IsString => "Isstring",
            Builtin::IsTruthValue => "Istruthvalue",
            Builtin::IsFunction => "Isfunction",
            Builtin::IsTuple => "Istuple",
            Builtin::IsDummy => "Isdummy",
            Builtin::Order => "Order",
            Builtin::Null => "Null",
            Builtin::ItoS => "ItoS",
        }
    }

    /// Number of arguments consumed before the builtin fires.
    ///
    /// `Conc` is curried: `Conc 'a' 'b'` applies twice.
    pub const fn arity(self) -> usize {
        match self {
            Builtin::Conc => 2,
            _ => 1,
        }
    }
}

/// Tuple payload.
///
/// Dropping a tuple releases nested tuples from a worklist instead of
/// recursing, so a list built by a long recursion (`(n, (n - 1, ...))`)
/// can be freed on any stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuple(Rc<[Value]>);

impl Tuple {
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl Deref for Tuple {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl Drop for Tuple {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_nested(&mut self.0, &mut pending);
        while let Some(mut items) = pending.pop() {
            detach_nested(&mut items, &mut pending);
        }
    }
}

/// Move the payloads of tuples directly inside `items` onto `pending`.
///
/// Only uniquely owned slices are touched; a shared one just loses a
/// reference when it is dropped.
fn detach_nested(items: &mut Rc<[Value]>, pending: &mut Vec<Rc<[Value]>>) {
    let Some(slots) = Rc::get_mut(items) else {
        return;
    };
    for slot in slots {
        if let Value::Tuple(inner) = slot {
            if !inner.0.is_empty() {
                pending.push(mem::replace(&mut inner.0, Rc::from([])));
            }
        }
    }
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    /// Tuples are 1-indexed by application; `nil` is the empty tuple.
    Tuple(Tuple),
    Dummy,
    Closure(Closure),
    /// Recursive closure produced by applying `Y*`.
    Eta(Closure),
    /// The fixed-point combinator.
    YStar,
    Builtin(Builtin),
    /// A curried builtin that has received some, but not all, arguments.
    Partial(Builtin, Rc<[Value]>),
}

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Tuple(Rc::from(items)))
    }

    /// The empty tuple.
    pub fn nil() -> Self {
        Value::Tuple(Tuple(Rc::from([])))
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            Value::Closure(_)
                | Value::Eta(_)
                | Value::YStar
                | Value::Builtin(_)
                | Value::Partial(..)
        )
    }

    /// Type name used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "truthvalue",
            Value::Str(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::Dummy => "dummy",
            Value::Closure(_) => "function",
            Value::Eta(_) => "recursive function",
            Value::YStar => "fixed-point combinator",
            Value::Builtin(_) | Value::Partial(..) => "builtin function",
        }
    }

    /// Render the value the way `Print` shows it.
    ///
    /// Names are resolved through `names` so closures can list their
    /// bound variables.
    pub fn display<'a>(&'a self, names: &'a dyn StringLookup) -> ValueDisplay<'a> {
        ValueDisplay { value: self, names }
    }
}

/// Borrowed formatter returned by [`Value::display`].
pub struct ValueDisplay<'a> {
    value: &'a Value,
    names: &'a dyn StringLookup,
}

impl ValueDisplay<'_> {
    fn closure(&self, f: &mut fmt::Formatter<'_>, kind: &str, closure: &Closure) -> fmt::Result {
        write!(f, "[{kind} closure: ")?;
        for (i, param) in closure.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(self.names.lookup(*param))?;
        }
        write!(f, ": {}]", closure.body.raw())
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Tuple(items) if items.is_empty() => f.write_str("nil"),
            Value::Tuple(items) => ensure_sufficient_stack(|| {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.display(self.names))?;
                }
                f.write_str(")")
            }),
            Value::Dummy => f.write_str("dummy"),
            Value::Closure(closure) => self.closure(f, "lambda", closure),
            Value::Eta(closure) => self.closure(f, "eta", closure),
            Value::YStar => f.write_str("Y*"),
            Value::Builtin(builtin) | Value::Partial(builtin, _) => f.write_str(builtin.name()),
        }
    }
}
