//! Control structures: the flat, numbered instruction sequences the CSE
//! machine executes.
//!
//! Structure 0 is the program body. Lambda bodies and conditional branches
//! each get their own structure and are referenced by [`ControlId`]. The
//! table is immutable once generated.

use std::fmt::{self, Write as _};
use std::rc::Rc;

use crate::ast::{BinaryOp, Token, UnaryOp};
use crate::{Name, StringLookup};

/// Index of a control structure in a [`ControlTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(u32);

impl ControlId {
    /// The program entry structure.
    pub const ENTRY: ControlId = ControlId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        ControlId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "δ{}", self.0)
    }
}

/// Lambda descriptor as generated.
///
/// The defining environment is not known until the machine reaches the
/// descriptor (rule 2), so it lives on the runtime closure value instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaSpec {
    /// Structure computing the body.
    pub body: ControlId,
    /// One name binds the argument; several destructure an argument tuple.
    pub params: Rc<[Name]>,
}

/// One element of a control structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlItem {
    /// Identifier or literal, resolved by rule 1.
    Leaf(Token),
    Gamma,
    Binary(BinaryOp),
    Unary(UnaryOp),
    Lambda(LambdaSpec),
    /// Build a tuple from this many operands.
    Tau(usize),
    /// Conditional targets, consumed by `Beta`.
    Branch {
        then_branch: ControlId,
        else_branch: ControlId,
    },
    Beta,
}

impl ControlItem {
    /// Render this item the way CSE traces usually write it.
    pub fn describe(&self, names: &dyn StringLookup) -> String {
        match self {
            ControlItem::Leaf(token) => describe_token(token, names),
            ControlItem::Gamma => "gamma".to_owned(),
            ControlItem::Binary(op) => op.as_symbol().to_owned(),
            ControlItem::Unary(op) => op.as_symbol().to_owned(),
            ControlItem::Lambda(spec) => {
                let params: Vec<&str> = spec.params.iter().map(|&p| names.lookup(p)).collect();
                format!("λ{}[{}]", spec.body.raw(), params.join(","))
            }
            ControlItem::Tau(n) => format!("τ{n}"),
            ControlItem::Branch {
                then_branch,
                else_branch,
            } => format!("{then_branch}|{else_branch}"),
            ControlItem::Beta => "β".to_owned(),
        }
    }
}

fn describe_token(token: &Token, names: &dyn StringLookup) -> String {
    match token {
        Token::Identifier(name) => names.lookup(*name).to_owned(),
        Token::Integer(value) => value.to_string(),
        Token::String(value) => format!("'{value}'"),
        Token::True => "true".to_owned(),
        Token::False => "false".to_owned(),
        Token::Nil => "nil".to_owned(),
        Token::Dummy => "dummy".to_owned(),
    }
}

/// A numbered control structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlStructure {
    id: ControlId,
    items: Vec<ControlItem>,
}

impl ControlStructure {
    pub fn new(id: ControlId, items: Vec<ControlItem>) -> Self {
        ControlStructure { id, items }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    /// Items in generation order; the last item is executed first.
    pub fn items(&self) -> &[ControlItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All control structures of a program, indexed by [`ControlId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlTable {
    structures: Vec<ControlStructure>,
}

impl ControlTable {
    /// Build a table. Structure `i` must carry id `i`.
    pub fn new(structures: Vec<ControlStructure>) -> Self {
        debug_assert!(structures
            .iter()
            .enumerate()
            .all(|(i, cs)| cs.id.index() == i));
        ControlTable { structures }
    }

    pub fn get(&self, id: ControlId) -> Option<&ControlStructure> {
        self.structures.get(id.index())
    }

    /// The program body, structure 0.
    pub fn entry(&self) -> Option<&ControlStructure> {
        self.get(ControlId::ENTRY)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// One line per structure, e.g. `δ0: gamma λ1[x] 3`.
    pub fn dump(&self, names: &dyn StringLookup) -> String {
        let mut out = String::new();
        for cs in &self.structures {
            let items: Vec<String> = cs.items.iter().map(|item| item.describe(names)).collect();
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{}: {}", cs.id, items.join(" "));
        }
        out
    }
}
