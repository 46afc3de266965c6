//! Operator labels that survive standardization.

/// Binary operators, applied by CSE rule 6.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Gr,
    Ge,
    Ls,
    Le,

    // Logical
    Or,
    And,

    // Tuples
    Aug,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
            Self::Eq => "eq",
            Self::NotEq => "ne",
            Self::Gr => "gr",
            Self::Ge => "ge",
            Self::Ls => "ls",
            Self::Le => "le",
            Self::Or => "or",
            Self::And => "&",
            Self::Aug => "aug",
        }
    }

    /// Parse the label an RPAL parser emits for this operator.
    ///
    /// Accepts the symbolic spellings of the comparisons (`>`, `>=`, `<`,
    /// `<=`) as aliases.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "**" => Self::Pow,
            "eq" => Self::Eq,
            "ne" => Self::NotEq,
            "gr" | ">" => Self::Gr,
            "ge" | ">=" => Self::Ge,
            "ls" | "<" => Self::Ls,
            "le" | "<=" => Self::Le,
            "or" => Self::Or,
            "&" => Self::And,
            "aug" => Self::Aug,
            _ => return None,
        })
    }
}

/// Unary operators, applied by CSE rule 7.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    /// Emits the operand and leaves it as the result.
    Print,
}

impl UnaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Neg => "neg",
            Self::Print => "print",
        }
    }

    /// Parse the label an RPAL parser emits for this operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "not" => Some(Self::Not),
            "neg" => Some(Self::Neg),
            "print" => Some(Self::Print),
            _ => None,
        }
    }
}
