//! Interned identifier handle.

use std::fmt;

/// Interned string identifier.
///
/// A 32-bit index into a [`StringInterner`](crate::StringInterner). Two names
/// from the same interner are equal exactly when their strings are equal.
///
/// The primitive names of the root environment are pre-interned at fixed
/// indices, so they are available as constants without an interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);
    /// `Print`
    pub const PRINT: Name = Name(1);
    /// `print`
    pub const PRINT_LOWER: Name = Name(2);
    /// `nil`
    pub const NIL: Name = Name(3);
    /// `Y`, the fixed-point combinator introduced by `rec`.
    pub const Y: Name = Name(4);
    /// `Conc`
    pub const CONC: Name = Name(5);
    /// `Stem`
    pub const STEM: Name = Name(6);
    /// `Stern`
    pub const STERN: Name = Name(7);
    /// `Isinteger`
    pub const ISINTEGER: Name = Name(8);
    /// `Isstring`
    pub const ISSTRING: Name = Name(9);
    /// `Istruthvalue`
    pub const ISTRUTHVALUE: Name = Name(10);
    /// `Isfunction`
    pub const ISFUNCTION: Name = Name(11);
    /// `Istuple`
    pub const ISTUPLE: Name = Name(12);
    /// `Isdummy`
    pub const ISDUMMY: Name = Name(13);
    /// `Order`
    pub const ORDER: Name = Name(14);
    /// `Null`
    pub const NULL: Name = Name(15);
    /// `ItoS`
    pub const ITOS: Name = Name(16);

    /// Strings interned at construction, in index order.
    pub(crate) const PRE_INTERNED: [&'static str; 17] = [
        "",
        "Print",
        "print",
        "nil",
        "Y",
        "Conc",
        "Stem",
        "Stern",
        "Isinteger",
        "Isstring",
        "Istruthvalue",
        "Isfunction",
        "Istuple",
        "Isdummy",
        "Order",
        "Null",
        "ItoS",
    ];

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
