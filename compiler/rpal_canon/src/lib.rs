//! Compile-time passes of the RPAL pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! (parser) → Node → **standardize** → **generate** → ControlTable → rpal_eval
//! ```
//!
//! # What Happens Here
//!
//! 1. **Standardization** ([`standardize`]): the sugared constructs `let`,
//!    `where`, `fcn_form`, `and`, `within`, `@`, `rec` and multi-binder
//!    `lambda` are rewritten in place, bottom-up, into `gamma`/`lambda`/`tau`
//!    form. Conditionals (`->`), tuples and operators are already canonical.
//!
//! 2. **Generation** ([`generate`]): the standardized tree is flattened into
//!    numbered control structures. Every `lambda` body and every conditional
//!    branch becomes its own structure, referenced by index.
//!
//! Both passes reject malformed input before the machine ever runs:
//! `MalformedNode` from standardization, `MalformedControlInput` from
//! generation.

mod generate;
mod standardize;

pub use generate::generate;
pub use standardize::standardize;

use rpal_ir::{Label, Node};

/// Short description of a node's label for error messages.
pub(crate) fn label_text(node: &Node) -> &'static str {
    match &node.label {
        Label::Tag(tag) => tag.as_str(),
        Label::Binary(op) => op.as_symbol(),
        Label::Unary(op) => op.as_symbol(),
        Label::Leaf(_) => "leaf",
    }
}
