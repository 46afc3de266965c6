//! AST produced by the parser and rewritten by the Standardizer.
//!
//! A [`Node`] is a label plus an ordered list of children. Labels are either
//! structural tags (`let`, `gamma`, `->`, ...), operators, or leaf tokens.
//! Arity is not enforced by construction; the Standardizer and generator
//! check each construct's arity before using it.

mod operators;

use std::fmt;
use std::rc::Rc;

use crate::Name;

pub use operators::{BinaryOp, UnaryOp};

/// Leaf token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Identifier(Name),
    Integer(i64),
    String(Rc<str>),
    True,
    False,
    Nil,
    Dummy,
}

/// Structural tags.
///
/// After standardization only `Gamma`, `Lambda`, `Tau`, `Comma` and `Arrow`
/// remain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Let,
    Where,
    FcnForm,
    And,
    Within,
    /// Infix application `E1 @ N E2`.
    At,
    Rec,
    Lambda,
    Gamma,
    Tau,
    Comma,
    Equals,
    /// Conditional `B -> T | E`.
    Arrow,
}

impl Tag {
    /// The label an RPAL parser writes for this construct.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Where => "where",
            Self::FcnForm => "fcn_form",
            Self::And => "and",
            Self::Within => "within",
            Self::At => "@",
            Self::Rec => "rec",
            Self::Lambda => "lambda",
            Self::Gamma => "gamma",
            Self::Tau => "tau",
            Self::Comma => ",",
            Self::Equals => "=",
            Self::Arrow => "->",
        }
    }

    /// Parse a structural label.
    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "let" => Self::Let,
            "where" => Self::Where,
            "fcn_form" => Self::FcnForm,
            "and" => Self::And,
            "within" => Self::Within,
            "@" => Self::At,
            "rec" => Self::Rec,
            "lambda" => Self::Lambda,
            "gamma" => Self::Gamma,
            "tau" => Self::Tau,
            "," => Self::Comma,
            "=" => Self::Equals,
            "->" => Self::Arrow,
            _ => return None,
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Label {
    Tag(Tag),
    Binary(BinaryOp),
    Unary(UnaryOp),
    Leaf(Token),
}

impl Label {
    /// Parse a non-leaf label: a structural tag or an operator.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Tag::from_label(keyword)
            .map(Label::Tag)
            .or_else(|| BinaryOp::from_symbol(keyword).map(Label::Binary))
            .or_else(|| UnaryOp::from_symbol(keyword).map(Label::Unary))
    }
}

impl From<Tag> for Label {
    fn from(tag: Tag) -> Self {
        Label::Tag(tag)
    }
}

impl From<BinaryOp> for Label {
    fn from(op: BinaryOp) -> Self {
        Label::Binary(op)
    }
}

impl From<UnaryOp> for Label {
    fn from(op: UnaryOp) -> Self {
        Label::Unary(op)
    }
}

impl From<Token> for Label {
    fn from(token: Token) -> Self {
        Label::Leaf(token)
    }
}

/// AST node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub label: Label,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(label: impl Into<Label>, children: Vec<Node>) -> Self {
        Node {
            label: label.into(),
            children,
        }
    }

    pub fn leaf(token: Token) -> Self {
        Node::new(token, Vec::new())
    }

    pub fn identifier(name: Name) -> Self {
        Node::leaf(Token::Identifier(name))
    }

    pub fn integer(value: i64) -> Self {
        Node::leaf(Token::Integer(value))
    }

    pub fn string(value: &str) -> Self {
        Node::leaf(Token::String(Rc::from(value)))
    }

    /// `gamma(rator, rand)`
    pub fn gamma(rator: Node, rand: Node) -> Self {
        Node::new(Tag::Gamma, vec![rator, rand])
    }

    /// `lambda(binder, body)`
    pub fn lambda(binder: Node, body: Node) -> Self {
        Node::new(Tag::Lambda, vec![binder, body])
    }

    /// `=(binder, value)`
    pub fn equals(binder: Node, value: Node) -> Self {
        Node::new(Tag::Equals, vec![binder, value])
    }

    /// `op(left, right)`
    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::new(op, vec![left, right])
    }

    /// The structural tag, if this is a tagged node.
    pub fn tag(&self) -> Option<Tag> {
        match self.label {
            Label::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.label, Label::Leaf(_))
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}
