//! RPAL back end.
//!
//! Takes an AST built by an external parser and runs it:
//!
//! 1. [`rpal_canon::standardize`] rewrites sugar into `gamma`/`lambda` form
//! 2. [`rpal_canon::generate`] flattens the tree into control structures
//! 3. [`rpal_eval::Machine`] executes them
//!
//! [`Pipeline`] strings the three together. It never reads files or
//! parses text; callers hand it a [`Node`] and the [`StringInterner`] its
//! identifiers were interned in.

use std::sync::Once;

pub use rpal_eval::{
    buffer_handler, silent_handler, stdout_handler, SharedPrintHandler, Value,
};
pub use rpal_ir::{
    BinaryOp, ControlTable, Error, ErrorKind, Name, Node, RpalResult, SharedInterner,
    StringInterner, Tag, Token, UnaryOp,
};

use rpal_eval::{MachineBuilder, MachineConfig};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Result of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// The value left on the operand stack at halt.
    pub value: Value,
    /// Number of control structures generated.
    pub structures: usize,
    /// Rule applications executed.
    pub steps: u64,
    /// Environments created, the primitive environment included.
    pub environments: usize,
}

/// Standardize, generate and execute an AST.
pub struct Pipeline<'a> {
    names: &'a StringInterner,
    config: MachineConfig,
    bindings: Vec<(Name, Value)>,
}

impl<'a> Pipeline<'a> {
    /// A pipeline printing to stdout with no step budget.
    pub fn new(names: &'a StringInterner) -> Self {
        Pipeline {
            names,
            config: MachineConfig::default(),
            bindings: Vec::new(),
        }
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

    /// Extra root-environment binding, visible to the program by `name`.
    #[must_use]
    pub fn binding(mut self, name: Name, value: Value) -> Self {
        self.bindings.push((name, value));
        self
    }

    /// Standardize and generate without executing.
    pub fn compile(&self, mut ast: Node) -> RpalResult<ControlTable> {
        rpal_canon::standardize(&mut ast)?;
        rpal_canon::generate(&ast)
    }

    pub fn run(&self, ast: Node) -> RpalResult<Outcome> {
        let table = self.compile(ast)?;
        tracing::debug!(
            structures = table.len(),
            "executing control structures"
        );

        let mut builder = MachineBuilder::new(&table, self.names).config(self.config.clone());
        for (name, value) in &self.bindings {
            builder = builder.binding(*name, value.clone());
        }
        let mut machine = builder.build()?;
        let value = machine.run()?;

        Ok(Outcome {
            value,
            structures: table.len(),
            steps: machine.steps(),
            environments: machine.environment_count(),
        })
    }
}
