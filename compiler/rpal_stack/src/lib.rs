//! Stack growth guard for the recursive AST passes.
//!
//! The Standardizer and the control-structure generator walk the AST
//! recursively. Programs with long `where` chains or deeply curried
//! functions produce trees deep enough to exhaust the default thread stack,
//! so every recursive step goes through [`ensure_sufficient_stack`]. The
//! CSE machine uses it the same way when formatting nested tuples.
//!
//! On native targets the `stacker` crate allocates a fresh stack segment
//! when the remaining space drops below the red zone. On `wasm32` the guard
//! is a passthrough.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn walk(node: &mut Node) -> Result<(), Error> {
///     ensure_sufficient_stack(|| {
///         for child in &mut node.children {
///             walk(child)?;
///         }
///         rewrite(node)
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// `wasm32` manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
