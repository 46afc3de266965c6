//! AST standardization.
//!
//! Rewrites, applied bottom-up so every node sees canonical children:
//!
//! ```text
//! let X = E in P          → gamma(lambda(X, P), E)
//! P where X = E           → gamma(lambda(X, P), E)
//! fcn_form P V1..Vn E     → =(P, lambda(V1, ... lambda(Vn, E)))
//! and (X1=E1)..(Xn=En)    → =(,(X1..Xn), tau(E1..En))
//! within (X1=E1) (X2=E2)  → =(X2, gamma(lambda(X1, E2), E1))
//! @ E1 N E2               → gamma(gamma(N, E1), E2)
//! rec (X = E)             → =(X, gamma(Y, lambda(X, E)))
//! lambda V1..Vn E         → lambda(V1, ... lambda(Vn, E))
//! ```
//!
//! `=` nodes only survive until their enclosing `let`/`where`/`within`/`and`
//! consumes them.

use rpal_ir::errors::{malformed_node, wrong_child_count};
use rpal_ir::{Name, Node, RpalResult, Tag};
use rpal_stack::ensure_sufficient_stack;

use crate::label_text;

/// Standardize `root` in place.
///
/// On error the tree is left partially rewritten.
pub fn standardize(root: &mut Node) -> RpalResult<()> {
    let mut rewrites = 0usize;
    standardize_node(root, &mut rewrites)?;
    tracing::debug!(rewrites, nodes = root.size(), "standardization complete");
    Ok(())
}

fn standardize_node(node: &mut Node, rewrites: &mut usize) -> RpalResult<()> {
    if node.is_leaf() {
        return Ok(());
    }

    ensure_sufficient_stack(|| {
        for child in &mut node.children {
            standardize_node(child, rewrites)?;
        }

        let Some(tag) = node.tag() else {
            return Ok(());
        };
        let rewritten = match tag {
            Tag::Let => rewrite_let(node)?,
            Tag::Where => rewrite_where(node)?,
            Tag::FcnForm => rewrite_fcn_form(node)?,
            Tag::And => rewrite_and(node)?,
            Tag::Within => rewrite_within(node)?,
            Tag::At => rewrite_infix(node)?,
            Tag::Rec => rewrite_rec(node)?,
            Tag::Lambda => {
                check_min(node, 2)?;
                if node.children.len() == 2 {
                    return Ok(());
                }
                curry_lambda(node)?
            }
            Tag::Gamma | Tag::Tau | Tag::Comma | Tag::Equals | Tag::Arrow => return Ok(()),
        };
        *node = rewritten;
        *rewrites += 1;
        Ok(())
    })
}

// Arity checks

fn check_exact(node: &Node, count: usize) -> RpalResult<()> {
    if node.children.len() == count {
        Ok(())
    } else {
        Err(wrong_child_count(
            label_text(node),
            &format!("exactly {count}"),
            node.children.len(),
        ))
    }
}

fn check_min(node: &Node, count: usize) -> RpalResult<()> {
    if node.children.len() >= count {
        Ok(())
    } else {
        Err(wrong_child_count(
            label_text(node),
            &format!("at least {count}"),
            node.children.len(),
        ))
    }
}

/// Split an `=` definition into its binder and value.
fn split_definition(node: Node, context: Tag) -> RpalResult<(Node, Node)> {
    if node.tag() != Some(Tag::Equals) {
        return Err(malformed_node(
            context.as_str(),
            format!("expected an `=` definition, found `{}`", label_text(&node)),
        ));
    }
    check_exact(&node, 2)?;
    let mut parts = node.children.into_iter();
    match (parts.next(), parts.next()) {
        (Some(binder), Some(value)) => Ok((binder, value)),
        _ => Err(wrong_child_count("=", "exactly 2", 0)),
    }
}

fn take_pair(node: &mut Node) -> RpalResult<(Node, Node)> {
    check_exact(node, 2)?;
    let mut children = std::mem::take(&mut node.children).into_iter();
    match (children.next(), children.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(wrong_child_count(label_text(node), "exactly 2", 0)),
    }
}

/// `lambda(V1, lambda(V2, ... lambda(Vn, body)))`
fn curry(binders: Vec<Node>, body: Node) -> Node {
    binders
        .into_iter()
        .rev()
        .fold(body, |inner, binder| Node::lambda(binder, inner))
}

// Rewrites

fn rewrite_let(node: &mut Node) -> RpalResult<Node> {
    let (definition, body) = take_pair(node)?;
    let (binder, value) = split_definition(definition, Tag::Let)?;
    Ok(Node::gamma(Node::lambda(binder, body), value))
}

fn rewrite_where(node: &mut Node) -> RpalResult<Node> {
    let (body, definition) = take_pair(node)?;
    let (binder, value) = split_definition(definition, Tag::Where)?;
    Ok(Node::gamma(Node::lambda(binder, body), value))
}

fn rewrite_fcn_form(node: &mut Node) -> RpalResult<Node> {
    check_min(node, 3)?;
    let mut children = std::mem::take(&mut node.children);
    let name = children.remove(0);
    let Some(body) = children.pop() else {
        return Err(wrong_child_count("fcn_form", "at least 3", 1));
    };
    Ok(Node::equals(name, curry(children, body)))
}

fn rewrite_and(node: &mut Node) -> RpalResult<Node> {
    check_min(node, 2)?;
    let definitions = std::mem::take(&mut node.children);
    let mut binders = Vec::with_capacity(definitions.len());
    let mut values = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let (binder, value) = split_definition(definition, Tag::And)?;
        binders.push(binder);
        values.push(value);
    }
    Ok(Node::equals(
        Node::new(Tag::Comma, binders),
        Node::new(Tag::Tau, values),
    ))
}

fn rewrite_within(node: &mut Node) -> RpalResult<Node> {
    let (outer, inner) = take_pair(node)?;
    let (outer_binder, outer_value) = split_definition(outer, Tag::Within)?;
    let (inner_binder, inner_value) = split_definition(inner, Tag::Within)?;
    Ok(Node::equals(
        inner_binder,
        Node::gamma(Node::lambda(outer_binder, inner_value), outer_value),
    ))
}

fn rewrite_infix(node: &mut Node) -> RpalResult<Node> {
    check_exact(node, 3)?;
    let mut children = std::mem::take(&mut node.children).into_iter();
    match (children.next(), children.next(), children.next()) {
        (Some(left), Some(function), Some(right)) => {
            Ok(Node::gamma(Node::gamma(function, left), right))
        }
        _ => Err(wrong_child_count("@", "exactly 3", 0)),
    }
}

fn rewrite_rec(node: &mut Node) -> RpalResult<Node> {
    check_exact(node, 1)?;
    let Some(definition) = std::mem::take(&mut node.children).pop() else {
        return Err(wrong_child_count("rec", "exactly 1", 0));
    };
    let (binder, value) = split_definition(definition, Tag::Rec)?;
    // The inner binder is an independent copy; the outer one names the fixed point.
    let inner_binder = binder.clone();
    Ok(Node::equals(
        binder,
        Node::gamma(Node::identifier(Name::Y), Node::lambda(inner_binder, value)),
    ))
}

fn curry_lambda(node: &mut Node) -> RpalResult<Node> {
    let mut children = std::mem::take(&mut node.children);
    let Some(body) = children.pop() else {
        return Err(wrong_child_count("lambda", "at least 2", 0));
    };
    Ok(curry(children, body))
}
