#![deny(clippy::arithmetic_side_effects)]
//! CSE (Control-Stack-Environment) machine for RPAL.
//!
//! This crate executes the control structures produced by
//! `rpal_canon::generate` against a tree of lexical environments.
//!
//! # Architecture
//!
//! - [`Machine`]: the fetch-decide-act loop over an explicit control stack
//!   and operand stack; one instance per run, no shared state
//! - [`Environments`]: append-only arena of scopes, addressed by [`EnvId`];
//!   closures hold an `EnvId`, so a scope outlives the frame that made it
//! - [`evaluate_binary`] / [`evaluate_unary`]: operator rules 6 and 7
//! - [`apply_builtin`]: `Print`, `Conc`, `Stem`, the type predicates, ...
//! - [`PrintHandlerImpl`]: where `print` output goes (stdout, buffer, nowhere)
//!
//! # Example
//!
//! ```text
//! let table = rpal_canon::generate(&ast)?;
//! let mut machine = MachineBuilder::new(&table, &interner).build()?;
//! let value = machine.run()?;
//! ```

mod builtins;
mod environment;
mod machine;
mod operators;
mod print_handler;
mod unary_operators;
mod value;

pub use builtins::apply_builtin;
pub use environment::{primitive_bindings, EnvId, Environments};
pub use machine::{Machine, MachineBuilder, MachineConfig};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use unary_operators::evaluate_unary;
pub use value::{Builtin, Closure, Tuple, Value, ValueDisplay};

#[cfg(test)]
mod tests;
