//! The CSE machine.
//!
//! State is a control stack of pending work, an operand stack of computed
//! values, and the environment arena. Each step pops the top of the control
//! stack and applies exactly one rule, chosen by that item and, for `gamma`,
//! by the operand on top of the stack:
//!
//! | rule | control top          | operand top        |
//! |------|----------------------|--------------------|
//! | 1    | name or literal      | -                  |
//! | 2    | `λ`                  | -                  |
//! | 3/4  | `gamma`              | single-param closure |
//! | 5    | environment marker   | value over marker  |
//! | 6    | binary operator      | two values         |
//! | 7    | unary operator       | one value          |
//! | 8    | `β`                  | truthvalue         |
//! | 9    | `τn`                 | n values           |
//! | 10   | `gamma`              | non-empty tuple    |
//! | 11   | `gamma`              | multi-param closure |
//! | 12   | `gamma`              | `Y*`               |
//! | 13   | `gamma`              | eta closure        |
//!
//! Applying a builtin (`Print`, `Conc`, ...) is the remaining `gamma` case.
//! The machine borrows the control table, so items are pushed as references
//! and the body of a closure is never copied.

mod builder;

use std::fmt;

use rpal_ir::errors::{
    arity_mismatch, index_out_of_range, machine_invariant, malformed_control_input,
    step_budget_exceeded, type_mismatch, unknown_control_item,
};
use rpal_ir::{
    BinaryOp, ControlId, ControlItem, ControlTable, LambdaSpec, Name, RpalResult, StringInterner,
    Token, UnaryOp,
};

use crate::builtins::apply_builtin;
use crate::environment::{EnvId, Environments};
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::value::{Builtin, Closure, Value};

pub use builder::{MachineBuilder, MachineConfig};

/// An entry on the control stack.
#[derive(Copy, Clone)]
enum Control<'t> {
    Item(&'t ControlItem),
    /// A `gamma` pushed by rule 13 rather than loaded from the table.
    Apply,
    /// Closes the scope of this environment when reached.
    Env(EnvId),
}

/// An entry on the operand stack.
enum Operand {
    Value(Value),
    Env(EnvId),
}

/// Rule names, for tracing.
#[derive(Copy, Clone, Debug)]
enum Rule {
    Lookup,
    MakeClosure,
    ApplyClosure,
    ExitScope,
    Binary,
    Unary,
    Branch,
    BuildTuple,
    IndexTuple,
    ApplyMulti,
    FixedPoint,
    Unfold,
    Builtin,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = match self {
            Rule::Lookup => 1,
            Rule::MakeClosure => 2,
            Rule::ApplyClosure => 4,
            Rule::ExitScope => 5,
            Rule::Binary => 6,
            Rule::Unary => 7,
            Rule::Branch => 8,
            Rule::BuildTuple => 9,
            Rule::IndexTuple => 10,
            Rule::ApplyMulti => 11,
            Rule::FixedPoint => 12,
            Rule::Unfold => 13,
            Rule::Builtin => return f.write_str("builtin"),
        };
        write!(f, "rule {number}")
    }
}

/// A CSE machine loaded with one program.
///
/// Built by [`MachineBuilder`]. A machine runs once; after [`run`](Self::run)
/// returns, the stacks are spent.
pub struct Machine<'t> {
    table: &'t ControlTable,
    names: &'t StringInterner,
    config: MachineConfig,
    envs: Environments,
    control: Vec<Control<'t>>,
    stack: Vec<Operand>,
    current: Option<EnvId>,
    steps: u64,
}

impl<'t> Machine<'t> {
    /// Run until the control stack is empty and return the single value
    /// left on the operand stack.
    #[tracing::instrument(level = "debug", skip_all, fields(structures = self.table.len()))]
    pub fn run(&mut self) -> RpalResult<Value> {
        while let Some(top) = self.control.pop() {
            self.charge_step()?;
            self.step(top)?;
        }
        let value = self.finish()?;
        tracing::debug!(
            steps = self.steps,
            environments = self.envs.len(),
            "machine halted"
        );
        Ok(value)
    }

    /// Rule applications so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Environments created so far, `e0` included.
    pub fn environment_count(&self) -> usize {
        self.envs.len()
    }

    fn charge_step(&mut self) -> RpalResult<()> {
        self.steps = self.steps.saturating_add(1);
        match self.config.step_budget {
            Some(budget) if self.steps > budget => Err(step_budget_exceeded(budget)),
            _ => Ok(()),
        }
    }

    fn step(&mut self, top: Control<'t>) -> RpalResult<()> {
        match top {
            Control::Env(env) => self.exit_scope(env),
            Control::Apply => self.apply(top),
            Control::Item(item) => match item {
                ControlItem::Leaf(token) => self.load(token),
                ControlItem::Lambda(spec) => self.make_closure(spec),
                ControlItem::Gamma => self.apply(top),
                ControlItem::Binary(op) => self.binary(*op),
                ControlItem::Unary(op) => self.unary(*op),
                ControlItem::Beta => self.branch(),
                ControlItem::Tau(arity) => self.build_tuple(*arity),
                ControlItem::Branch { .. } => {
                    Err(unknown_control_item(item.describe(self.names)))
                }
            },
        }
    }

    fn trace(&self, rule: Rule) {
        tracing::trace!(
            %rule,
            step = self.steps,
            control = self.control.len(),
            stack = self.stack.len(),
            env = ?self.current.map(EnvId::raw),
        );
    }

    fn current_env(&self) -> RpalResult<EnvId> {
        self.current
            .ok_or_else(|| machine_invariant("no current environment"))
    }

    fn push(&mut self, value: Value) {
        self.stack.push(Operand::Value(value));
    }

    fn pop_value(&mut self) -> RpalResult<Value> {
        match self.stack.pop() {
            Some(Operand::Value(value)) => Ok(value),
            Some(Operand::Env(env)) => Err(machine_invariant(format!(
                "expected a value, found environment marker e{}",
                env.raw()
            ))),
            None => Err(machine_invariant("operand stack underflow")),
        }
    }

    /// Push the items of structure `id` onto the control stack, in order,
    /// so its last item is processed first.
    fn splice(&mut self, id: ControlId) -> RpalResult<()> {
        let structure = self
            .table
            .get(id)
            .ok_or_else(|| malformed_control_input(format!("missing control structure {id}")))?;
        self.control
            .extend(structure.items().iter().map(Control::Item));
        Ok(())
    }

    /// Rule 1.
    fn load(&mut self, token: &Token) -> RpalResult<()> {
        self.trace(Rule::Lookup);
        let value = match token {
            Token::Identifier(name) => {
                let env = self.current_env()?;
                self.envs.resolve(env, *name, self.names)?
            }
            Token::Integer(n) => Value::Int(*n),
            Token::String(s) => Value::Str(s.clone()),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Nil => Value::nil(),
            Token::Dummy => Value::Dummy,
        };
        self.push(value);
        Ok(())
    }

    /// Rule 2: capture the current environment.
    fn make_closure(&mut self, spec: &LambdaSpec) -> RpalResult<()> {
        self.trace(Rule::MakeClosure);
        let env = self.current_env()?;
        self.push(Value::Closure(Closure {
            body: spec.body,
            params: spec.params.clone(),
            env,
        }));
        Ok(())
    }

    /// `gamma`: dispatch on the operator value.
    fn apply(&mut self, gamma: Control<'t>) -> RpalResult<()> {
        let rator = self.pop_value()?;
        match rator {
            Value::Closure(closure) if closure.params.len() == 1 => {
                self.trace(Rule::ApplyClosure);
                let arg = self.pop_value()?;
                let bindings = [(closure.params[0], arg)];
                self.enter(&closure, bindings)
            }
            Value::Closure(closure) => {
                self.trace(Rule::ApplyMulti);
                let arg = self.pop_value()?;
                let Value::Tuple(items) = arg else {
                    return Err(type_mismatch(
                        format!("a tuple of {} values", closure.params.len()),
                        arg.type_name(),
                    ));
                };
                if items.len() != closure.params.len() {
                    return Err(arity_mismatch(closure.params.len(), items.len()));
                }
                let bindings: Vec<(Name, Value)> = closure
                    .params
                    .iter()
                    .copied()
                    .zip(items.iter().cloned())
                    .collect();
                self.enter(&closure, bindings)
            }
            Value::Tuple(items) if !items.is_empty() => {
                self.trace(Rule::IndexTuple);
                let index = match self.pop_value()? {
                    Value::Int(i) => i,
                    other => return Err(type_mismatch("an integer index", other.type_name())),
                };
                let item = usize::try_from(index)
                    .ok()
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| items.get(i))
                    .ok_or_else(|| index_out_of_range(index, items.len()))?;
                self.push(item.clone());
                Ok(())
            }
            Value::YStar => {
                self.trace(Rule::FixedPoint);
                match self.pop_value()? {
                    Value::Closure(closure) => {
                        self.push(Value::Eta(closure));
                        Ok(())
                    }
                    other => Err(type_mismatch("a function after Y", other.type_name())),
                }
            }
            Value::Eta(closure) => {
                // The eta stays in place as the argument of its own body;
                // the extra gamma applies the result to the original argument.
                self.trace(Rule::Unfold);
                self.push(Value::Eta(closure.clone()));
                self.push(Value::Closure(closure));
                self.control.push(gamma);
                self.control.push(Control::Apply);
                Ok(())
            }
            Value::Builtin(builtin) => self.call_builtin(builtin, &[]),
            Value::Partial(builtin, pending) => self.call_builtin(builtin, &pending),
            other => Err(type_mismatch("a function or tuple", other.type_name())),
        }
    }

    /// Rules 4 and 11: open a scope for `closure`'s body.
    ///
    /// The new environment is a child of the closure's defining environment.
    fn enter(
        &mut self,
        closure: &Closure,
        bindings: impl IntoIterator<Item = (Name, Value)>,
    ) -> RpalResult<()> {
        let env = self.envs.extend(closure.env, bindings)?;
        self.current = Some(env);
        self.control.push(Control::Env(env));
        self.stack.push(Operand::Env(env));
        self.splice(closure.body)
    }

    fn call_builtin(&mut self, builtin: Builtin, pending: &[Value]) -> RpalResult<()> {
        self.trace(Rule::Builtin);
        let arg = self.pop_value()?;
        let result = apply_builtin(
            builtin,
            pending,
            arg,
            &self.config.print_handler,
            self.names,
        )?;
        self.push(result);
        Ok(())
    }

    /// Rule 5: drop the marker under the result and restore the enclosing
    /// environment.
    fn exit_scope(&mut self, env: EnvId) -> RpalResult<()> {
        self.trace(Rule::ExitScope);
        let result = self.pop_value()?;
        match self.stack.pop() {
            Some(Operand::Env(marker)) if marker == env => {}
            Some(Operand::Env(marker)) => {
                return Err(machine_invariant(format!(
                    "closing e{} but the operand stack holds e{}",
                    env.raw(),
                    marker.raw()
                )))
            }
            _ => {
                return Err(machine_invariant(format!(
                    "no marker for e{} beneath the result",
                    env.raw()
                )))
            }
        }
        self.push(result);
        self.current = self.control.iter().rev().find_map(|entry| match entry {
            Control::Env(env) => Some(*env),
            _ => None,
        });
        Ok(())
    }

    /// Rule 6. The left operand is on top.
    fn binary(&mut self, op: BinaryOp) -> RpalResult<()> {
        self.trace(Rule::Binary);
        let left = self.pop_value()?;
        let right = self.pop_value()?;
        let result = evaluate_binary(left, right, op)?;
        self.push(result);
        Ok(())
    }

    /// Rule 7.
    fn unary(&mut self, op: UnaryOp) -> RpalResult<()> {
        self.trace(Rule::Unary);
        let operand = self.pop_value()?;
        let result = if op == UnaryOp::Print {
            apply_builtin(
                Builtin::Print,
                &[],
                operand,
                &self.config.print_handler,
                self.names,
            )?
        } else {
            evaluate_unary(operand, op)?
        };
        self.push(result);
        Ok(())
    }

    /// Rule 8: the branch pair sits directly under `β`.
    fn branch(&mut self) -> RpalResult<()> {
        self.trace(Rule::Branch);
        let condition = match self.pop_value()? {
            Value::Bool(b) => b,
            other => return Err(type_mismatch("truthvalue condition", other.type_name())),
        };
        let Some(Control::Item(ControlItem::Branch {
            then_branch,
            else_branch,
        })) = self.control.pop()
        else {
            return Err(machine_invariant("β without branch targets beneath it"));
        };
        self.splice(if condition { *then_branch } else { *else_branch })
    }

    /// Rule 9: the first popped value becomes the first component.
    fn build_tuple(&mut self, arity: usize) -> RpalResult<()> {
        self.trace(Rule::BuildTuple);
        let mut items = Vec::with_capacity(arity);
        for _ in 0..arity {
            items.push(self.pop_value()?);
        }
        self.push(Value::tuple(items));
        Ok(())
    }

    fn finish(&mut self) -> RpalResult<Value> {
        if self.stack.len() != 1 {
            return Err(machine_invariant(format!(
                "{} operands left when the machine halted",
                self.stack.len()
            )));
        }
        self.pop_value()
    }
}
