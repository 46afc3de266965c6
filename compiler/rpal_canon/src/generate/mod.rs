//! Control-structure generation.
//!
//! Flattens a standardized tree into a [`ControlTable`]. Structures are
//! numbered in allocation order: the program is structure 0, and each
//! `lambda` body or conditional branch is allocated (and generated,
//! depth-first) at the moment the generator reaches it.
//!
//! Items are appended in pre-order (`op, left, right`). The machine pushes
//! a structure's items in order and executes from the top, so the last
//! item runs first: right operands are evaluated before left ones, and a
//! conditional's test runs before its `β`.

use std::rc::Rc;

use rpal_ir::errors::malformed_control_input;
use rpal_ir::{
    ControlId, ControlItem, ControlStructure, ControlTable, LambdaSpec, Label, Name, Node,
    RpalResult, Tag, Token,
};
use rpal_stack::ensure_sufficient_stack;

use crate::label_text;

/// Generate the control structures for a standardized program.
pub fn generate(root: &Node) -> RpalResult<ControlTable> {
    let mut generator = Generator::default();
    let entry = generator.structure(root)?;
    debug_assert_eq!(entry, ControlId::ENTRY);
    let table = generator.finish()?;
    tracing::debug!(structures = table.len(), "control structures generated");
    Ok(table)
}

#[derive(Default)]
struct Generator {
    structures: Vec<Vec<ControlItem>>,
}

impl Generator {
    /// Allocate the next index and generate `node` into it.
    fn structure(&mut self, node: &Node) -> RpalResult<ControlId> {
        let raw = u32::try_from(self.structures.len())
            .map_err(|_| malformed_control_input("too many control structures"))?;
        let id = ControlId::new(raw);
        self.structures.push(Vec::new());

        let mut items = Vec::new();
        self.flatten(node, &mut items)?;
        self.structures[id.index()] = items;
        Ok(id)
    }

    fn flatten(&mut self, node: &Node, items: &mut Vec<ControlItem>) -> RpalResult<()> {
        ensure_sufficient_stack(|| match &node.label {
            Label::Leaf(token) => {
                expect_children(node, 0)?;
                items.push(ControlItem::Leaf(token.clone()));
                Ok(())
            }
            Label::Tag(Tag::Lambda) => {
                expect_children(node, 2)?;
                let params = bound_variables(&node.children[0])?;
                let body = self.structure(&node.children[1])?;
                items.push(ControlItem::Lambda(LambdaSpec { body, params }));
                Ok(())
            }
            Label::Tag(Tag::Arrow) => {
                expect_children(node, 3)?;
                let then_branch = self.structure(&node.children[1])?;
                let else_branch = self.structure(&node.children[2])?;
                items.push(ControlItem::Branch {
                    then_branch,
                    else_branch,
                });
                items.push(ControlItem::Beta);
                self.flatten(&node.children[0], items)
            }
            Label::Tag(Tag::Tau) => {
                items.push(ControlItem::Tau(node.children.len()));
                self.flatten_children(node, items)
            }
            Label::Tag(Tag::Gamma) => {
                expect_children(node, 2)?;
                items.push(ControlItem::Gamma);
                self.flatten_children(node, items)
            }
            Label::Binary(op) => {
                expect_children(node, 2)?;
                items.push(ControlItem::Binary(*op));
                self.flatten_children(node, items)
            }
            Label::Unary(op) => {
                expect_children(node, 1)?;
                items.push(ControlItem::Unary(*op));
                self.flatten_children(node, items)
            }
            Label::Tag(tag) => Err(malformed_control_input(format!(
                "`{tag}` cannot appear in a standardized tree"
            ))),
        })
    }

    fn flatten_children(&mut self, node: &Node, items: &mut Vec<ControlItem>) -> RpalResult<()> {
        for child in &node.children {
            self.flatten(child, items)?;
        }
        Ok(())
    }

    /// Check every reference and wrap the structures up as a table.
    fn finish(self) -> RpalResult<ControlTable> {
        let count = self.structures.len();
        for (index, items) in self.structures.iter().enumerate() {
            if items.is_empty() {
                return Err(malformed_control_input(format!(
                    "control structure {index} is empty"
                )));
            }
            for item in items {
                let targets = match item {
                    ControlItem::Lambda(spec) => [Some(spec.body), None],
                    ControlItem::Branch {
                        then_branch,
                        else_branch,
                    } => [Some(*then_branch), Some(*else_branch)],
                    _ => [None, None],
                };
                if let Some(missing) = targets.into_iter().flatten().find(|id| id.index() >= count)
                {
                    return Err(malformed_control_input(format!(
                        "control structure {index} refers to missing {missing}"
                    )));
                }
            }
        }

        let structures = self
            .structures
            .into_iter()
            .enumerate()
            .map(|(index, items)| {
                // Indices were allocated from u32 in `structure`.
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "bounded by the u32 allocation check"
                )]
                let id = ControlId::new(index as u32);
                ControlStructure::new(id, items)
            })
            .collect();
        Ok(ControlTable::new(structures))
    }
}

fn expect_children(node: &Node, count: usize) -> RpalResult<()> {
    if node.children.len() == count {
        return Ok(());
    }
    Err(malformed_control_input(format!(
        "`{}` expects {count} children, got {}",
        label_text(node),
        node.children.len()
    )))
}

/// Names bound by a lambda: one identifier, or a `,` list of identifiers.
fn bound_variables(binder: &Node) -> RpalResult<Rc<[Name]>> {
    match &binder.label {
        Label::Leaf(Token::Identifier(name)) if binder.children.is_empty() => {
            Ok(Rc::from(vec![*name]))
        }
        Label::Tag(Tag::Comma) if !binder.children.is_empty() => binder
            .children
            .iter()
            .map(|child| match &child.label {
                Label::Leaf(Token::Identifier(name)) if child.children.is_empty() => Ok(*name),
                _ => Err(malformed_control_input(format!(
                    "lambda parameter list contains `{}`",
                    label_text(child)
                ))),
            })
            .collect::<RpalResult<Vec<Name>>>()
            .map(Rc::from),
        _ => Err(malformed_control_input(format!(
            "lambda binds `{}` instead of a name",
            label_text(binder)
        ))),
    }
}
