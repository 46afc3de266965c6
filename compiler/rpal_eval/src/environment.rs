//! Lexical environments for the CSE machine.
//!
//! Environments form a tree: each one records its parent and a set of
//! bindings. They live in an append-only arena and are addressed by
//! [`EnvId`]. An environment is never freed while the machine runs, so a
//! closure may hold its defining `EnvId` after that scope has been exited.

use rustc_hash::FxHashMap;

use rpal_ir::errors::{machine_invariant, unbound_variable};
use rpal_ir::{Name, RpalResult, StringLookup};

use crate::value::{Builtin, Value};

/// Handle to an environment in an [`Environments`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(u32);

impl EnvId {
    /// The primitive environment, `e0`.
    pub const ROOT: EnvId = EnvId(0);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

struct Frame {
    parent: Option<EnvId>,
    bindings: FxHashMap<Name, Value>,
}

/// Arena of environments. Index 0 is always the root.
pub struct Environments {
    frames: Vec<Frame>,
}

impl Environments {
    /// An arena holding only an empty root environment.
    pub fn new() -> Self {
        Environments {
            frames: vec![Frame {
                parent: None,
                bindings: FxHashMap::default(),
            }],
        }
    }

    /// An arena whose root holds the [`primitive_bindings`].
    pub fn with_primitives() -> Self {
        let mut envs = Self::new();
        for (name, value) in primitive_bindings() {
            envs.define_root(name, value);
        }
        envs
    }

    /// Bind `name` in the root environment, replacing any earlier binding.
    pub fn define_root(&mut self, name: Name, value: Value) {
        self.frames[EnvId::ROOT.index()].bindings.insert(name, value);
    }

    /// Create a child of `parent` holding `bindings`.
    ///
    /// Later bindings for the same name shadow earlier ones.
    pub fn extend(
        &mut self,
        parent: EnvId,
        bindings: impl IntoIterator<Item = (Name, Value)>,
    ) -> RpalResult<EnvId> {
        if parent.index() >= self.frames.len() {
            return Err(machine_invariant(format!(
                "environment e{} does not exist",
                parent.raw()
            )));
        }
        let id = u32::try_from(self.frames.len())
            .map(EnvId)
            .map_err(|_| machine_invariant("environment arena exhausted"))?;
        self.frames.push(Frame {
            parent: Some(parent),
            bindings: bindings.into_iter().collect(),
        });
        Ok(id)
    }

    /// Find the innermost binding of `name`, starting at `env` and walking
    /// parent links to the root.
    pub fn lookup(&self, env: EnvId, name: Name) -> Option<&Value> {
        let mut current = Some(env);
        while let Some(id) = current {
            let frame = self.frames.get(id.index())?;
            if let Some(value) = frame.bindings.get(&name) {
                return Some(value);
            }
            current = frame.parent;
        }
        None
    }

    /// Like [`lookup`](Self::lookup), but an unbound name is an error.
    pub fn resolve(&self, env: EnvId, name: Name, names: &dyn StringLookup) -> RpalResult<Value> {
        self.lookup(env, name)
            .cloned()
            .ok_or_else(|| unbound_variable(names.lookup(name)))
    }

    pub fn parent(&self, env: EnvId) -> Option<EnvId> {
        self.frames.get(env.index()).and_then(|frame| frame.parent)
    }

    /// Number of environments created so far, the root included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

/// Bindings installed in `e0` before a program runs.
pub fn primitive_bindings() -> Vec<(Name, Value)> {
    vec![
        (Name::PRINT, Value::Builtin(Builtin::Print)),
        (Name::PRINT_LOWER, Value::Builtin(Builtin::Print)),
        (Name::NIL, Value::nil()),
        (Name::Y, Value::YStar),
        (Name::CONC, Value::Builtin(Builtin::Conc)),
        (Name::STEM, Value::Builtin(Builtin::Stem)),
        (Name::STERN, Value::Builtin(Builtin::Stern)),
        (Name::ISINTEGER, Value::Builtin(Builtin::IsInteger)),
        (Name::ISSTRING, Value::Builtin(Builtin::IsString)),
        (Name::ISTRUTHVALUE, Value::Builtin(Builtin::IsTruthValue)),
        (Name::ISFUNCTION, Value::Builtin(Builtin::IsFunction)),
        (Name::ISTUPLE, Value::Builtin(Builtin::IsTuple)),
        (Name::ISDUMMY, Value::Builtin(Builtin::IsDummy)),
        (Name::ORDER, Value::Builtin(Builtin::Order)),
        (Name::NULL, Value::Builtin(Builtin::Null)),
        (Name::ITOS, Value::Builtin(Builtin::ItoS)),
    ]
}
