//! String interner for identifiers.
//!
//! Interned strings are leaked to `'static` and never freed; a program's
//! identifier set is small and lives as long as the pipeline.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Interner mapping identifier text to [`Name`] handles.
///
/// Lookups take a read lock; only the first sighting of a string takes the
/// write lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner holding the pre-interned primitive names.
    pub fn new() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        for (index, &text) in Name::PRE_INTERNED.iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "pre-interned table has 17 entries"
            )]
            let name = Name::from_raw(index as u32);
            table.map.insert(text, name);
            table.strings.push(text);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().map.get(s) {
            return Ok(name);
        }

        let mut guard = self.table.write();
        // Another writer may have won the race.
        if let Some(&name) = guard.map.get(s) {
            return Ok(name);
        }

        let raw = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(raw);
        guard.strings.push(leaked);
        guard.map.insert(leaked, name);
        Ok(name)
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    ///
    /// # Panics
    /// Panics if `name` came from a different interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().strings[name.index()]
    }

    /// Number of interned strings, including the pre-interned ones.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether only the pre-interned names are present.
    pub fn is_empty(&self) -> bool {
        self.len() <= Name::PRE_INTERNED.len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned names, for code that only needs to print them.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Reference-counted handle to a [`StringInterner`].
///
/// The embedder interns identifiers while building the AST and hands the
/// same interner to the machine for error messages and value printing.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
