//! Shared types for the RPAL evaluation pipeline.
//!
//! Every pass in the workspace speaks in terms of the types defined here:
//!
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`Node`] / [`Label`] / [`Token`]: the AST handed over by the parser and
//!   rewritten in place by the Standardizer
//! - [`ControlTable`] / [`ControlItem`]: the flat control structures the
//!   generator produces and the CSE machine executes
//! - [`Error`] / [`ErrorKind`]: the single error taxonomy used by all passes
//!
//! # Pipeline Position
//!
//! ```text
//! (external parser) → Node → rpal_canon::standardize → rpal_canon::generate
//!     → ControlTable → rpal_eval::Machine → Value
//! ```

pub mod ast;
pub mod control;
pub mod errors;
mod interner;
mod name;

pub use ast::{BinaryOp, Label, Node, Tag, Token, UnaryOp};
pub use control::{ControlId, ControlItem, ControlStructure, ControlTable, LambdaSpec};
pub use errors::{Error, ErrorKind, RpalResult};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
