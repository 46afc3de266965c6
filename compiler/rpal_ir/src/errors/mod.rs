//! Error taxonomy shared by every pass.
//!
//! `ErrorKind` carries structured data for each failure; factory functions
//! (`unbound_variable(...)`, `division_by_zero()`, ...) are the public way to
//! build an [`Error`] and keep `kind` and `message` in sync.
//!
//! Every error is fatal to the run. Nothing in the pipeline catches and
//! resumes.

use std::fmt;

/// Result alias used across the workspace.
pub type RpalResult<T> = Result<T, Error>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    // Compile time
    /// A construct has the wrong arity or the wrong kind of child.
    MalformedNode {
        construct: &'static str,
        detail: String,
    },
    /// The generator met a shape it cannot flatten.
    MalformedControlInput { detail: String },

    // Lookup
    UnboundVariable { name: String },

    // Operands
    TypeMismatch { expected: String, got: String },
    DivisionByZero,
    IntegerOverflow { operation: &'static str },
    IndexOutOfRange { index: i64, len: usize },
    ArityMismatch { expected: usize, got: usize },

    // Machine
    UnknownControlItem { item: String },
    StepBudgetExceeded { budget: u64 },
    MachineInvariant { detail: String },
}

impl ErrorKind {
    /// Stable short name, used in logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedNode { .. } => "MalformedNode",
            Self::MalformedControlInput { .. } => "MalformedControlInput",
            Self::UnboundVariable { .. } => "UnboundVariable",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::DivisionByZero => "DivisionByZero",
            Self::IntegerOverflow { .. } => "IntegerOverflow",
            Self::IndexOutOfRange { .. } => "IndexOutOfRange",
            Self::ArityMismatch { .. } => "ArityMismatch",
            Self::UnknownControlItem { .. } => "UnknownControlItem",
            Self::StepBudgetExceeded { .. } => "StepBudgetExceeded",
            Self::MachineInvariant { .. } => "MachineInvariant",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedNode { construct, detail } => {
                write!(f, "malformed `{construct}` node: {detail}")
            }
            Self::MalformedControlInput { detail } => {
                write!(f, "cannot generate control structure: {detail}")
            }
            Self::UnboundVariable { name } => write!(f, "unbound variable: {name}"),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "tuple index {index} out of range 1..={len}")
            }
            Self::ArityMismatch { expected, got } => {
                let arg_word = if *expected == 1 { "value" } else { "values" };
                write!(f, "expected a tuple of {expected} {arg_word}, got {got}")
            }
            Self::UnknownControlItem { item } => write!(f, "no rule applies to `{item}`"),
            Self::StepBudgetExceeded { budget } => {
                write!(f, "step budget of {budget} exhausted")
            }
            Self::MachineInvariant { detail } => write!(f, "machine invariant violated: {detail}"),
        }
    }
}

/// Pipeline error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    /// Equals `kind.to_string()` for factory-built errors.
    pub message: String,
}

impl Error {
    pub fn from_kind(kind: ErrorKind) -> Self {
        Error {
            message: kind.to_string(),
            kind,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

// Compile-time errors

#[cold]
pub fn malformed_node(construct: &'static str, detail: impl Into<String>) -> Error {
    Error::from_kind(ErrorKind::MalformedNode {
        construct,
        detail: detail.into(),
    })
}

/// `MalformedNode` for a child-count violation.
#[cold]
pub fn wrong_child_count(construct: &'static str, expected: &str, got: usize) -> Error {
    malformed_node(construct, format!("expected {expected} children, got {got}"))
}

#[cold]
pub fn malformed_control_input(detail: impl Into<String>) -> Error {
    Error::from_kind(ErrorKind::MalformedControlInput {
        detail: detail.into(),
    })
}

// Runtime errors

#[cold]
pub fn unbound_variable(name: &str) -> Error {
    Error::from_kind(ErrorKind::UnboundVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Error {
    Error::from_kind(ErrorKind::TypeMismatch {
        expected: expected.into(),
        got: got.into(),
    })
}

#[cold]
pub fn division_by_zero() -> Error {
    Error::from_kind(ErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> Error {
    Error::from_kind(ErrorKind::IntegerOverflow { operation })
}

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> Error {
    Error::from_kind(ErrorKind::IndexOutOfRange { index, len })
}

#[cold]
pub fn arity_mismatch(expected: usize, got: usize) -> Error {
    Error::from_kind(ErrorKind::ArityMismatch { expected, got })
}

#[cold]
pub fn unknown_control_item(item: impl Into<String>) -> Error {
    Error::from_kind(ErrorKind::UnknownControlItem { item: item.into() })
}

#[cold]
pub fn step_budget_exceeded(budget: u64) -> Error {
    Error::from_kind(ErrorKind::StepBudgetExceeded { budget })
}

#[cold]
pub fn machine_invariant(detail: impl Into<String>) -> Error {
    Error::from_kind(ErrorKind::MachineInvariant {
        detail: detail.into(),
    })
}
