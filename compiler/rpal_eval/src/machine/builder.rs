//! `MachineBuilder` for configuring a [`Machine`] run.

use rpal_ir::errors::malformed_control_input;
use rpal_ir::{ControlTable, Name, RpalResult, StringInterner};

use super::{Control, Machine, Operand};
use crate::environment::{EnvId, Environments};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::value::Value;

/// Run-time knobs of a machine.
#[derive(Clone)]
pub struct MachineConfig {
    /// Destination for `Print` output. Defaults to stdout.
    pub print_handler: SharedPrintHandler,
    /// Maximum number of rule applications before the run is aborted.
    /// `None` means unbounded.
    pub step_budget: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            print_handler: stdout_handler(),
            step_budget: None,
        }
    }
}

/// Builder for [`Machine`].
///
/// ```text
/// let machine = MachineBuilder::new(&table, &interner)
///     .print_handler(buffer_handler())
///     .step_budget(10_000)
///     .build()?;
/// ```
pub struct MachineBuilder<'t> {
    table: &'t ControlTable,
    names: &'t StringInterner,
    config: MachineConfig,
    bindings: Vec<(Name, Value)>,
    primitives: bool,
}

impl<'t> MachineBuilder<'t> {
    pub fn new(table: &'t ControlTable, names: &'t StringInterner) -> Self {
        MachineBuilder {
            table,
            names,
            config: MachineConfig::default(),
            bindings: Vec::new(),
            primitives: true,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.config.print_handler = handler;
        self
    }

    #[must_use]
    pub fn step_budget(mut self, budget: u64) -> Self {
        self.config.step_budget = Some(budget);
        self
    }

    /// Add a binding to the root environment. Applied after the
    /// primitives, so it can shadow one.
    #[must_use]
    pub fn binding(mut self, name: Name, value: Value) -> Self {
        self.bindings.push((name, value));
        self
    }

    /// Whether to install `Print`, `Y`, `nil` and the other primitives.
    #[must_use]
    pub fn primitives(mut self, enabled: bool) -> Self {
        self.primitives = enabled;
        self
    }

    /// Load δ0 and the root environment.
    ///
    /// Fails if the table has no entry structure or the entry is empty.
    pub fn build(self) -> RpalResult<Machine<'t>> {
        let entry = self
            .table
            .entry()
            .ok_or_else(|| malformed_control_input("control table has no entry structure"))?;
        if entry.is_empty() {
            return Err(malformed_control_input("entry structure δ0 is empty"));
        }

        let mut envs = if self.primitives {
            Environments::with_primitives()
        } else {
            Environments::new()
        };
        for (name, value) in self.bindings {
            envs.define_root(name, value);
        }

        let mut control = Vec::with_capacity(entry.len().saturating_add(1));
        control.push(Control::Env(EnvId::ROOT));
        control.extend(entry.items().iter().map(Control::Item));

        tracing::debug!(
            structures = self.table.len(),
            entry_items = entry.len(),
            budget = ?self.config.step_budget,
            "machine loaded"
        );

        Ok(Machine {
            table: self.table,
            names: self.names,
            config: self.config,
            envs,
            control,
            stack: vec![Operand::Env(EnvId::ROOT)],
            current: Some(EnvId::ROOT),
            steps: 0,
        })
    }
}
