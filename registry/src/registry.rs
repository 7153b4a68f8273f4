//! The global three-table registry and the registration protocol.

use std::sync::atomic::AtomicBool;

use bon::bon;
use decomp_ops::{Decomposition, OpOverload, OpRef, OpTarget};
use indexmap::{IndexMap, IndexSet};

use crate::adapt::adapt_output;
use crate::error::Result;
use crate::mode::Mode;
use crate::table::DecompositionTable;

/// One decomposition table per [`Mode`], plus the overloads whose authors
/// opted out of meta registration.
///
/// Populated once at startup through [`Registry::register`], then read by
/// queries and by meta activation. See [`Registry::freeze`] for the
/// read-only form.
///
/// # Example
///
/// ```
/// # use decomp_ops::{Decomposition, OperatorCatalog, Value};
/// # use decomp_registry::{Mode, Registry};
/// let catalog = OperatorCatalog::new();
/// let add = catalog.define("aten::add.Tensor(Tensor self, Tensor other) -> Tensor").unwrap();
///
/// let mut registry = Registry::new();
/// registry
///     .register()
///     .target(&add)
///     .decomposition(Decomposition::new("add_meta", |_| Ok(Value::None)))
///     .mode(Mode::Meta)
///     .call()
///     .unwrap();
///
/// assert!(registry.table(Mode::Meta).contains(&add));
/// assert!(registry.table(Mode::PostAutograd).is_empty());
/// ```
#[derive(Debug)]
pub struct Registry {
    pre_autograd: DecompositionTable,
    post_autograd: DecompositionTable,
    meta: DecompositionTable,
    disabled_meta: IndexSet<OpOverload>,
    pub(crate) activated: AtomicBool,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            pre_autograd: DecompositionTable::new(Mode::PreAutograd.as_str()),
            post_autograd: DecompositionTable::new(Mode::PostAutograd.as_str()),
            meta: DecompositionTable::new(Mode::Meta.as_str()),
            disabled_meta: IndexSet::new(),
            activated: AtomicBool::new(false),
        }
    }
}

impl Registry {
    /// Empty registry with one table per mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table backing `mode`.
    pub fn table(&self, mode: Mode) -> &DecompositionTable {
        match mode {
            Mode::PreAutograd => &self.pre_autograd,
            Mode::PostAutograd => &self.post_autograd,
            Mode::Meta => &self.meta,
        }
    }

    fn table_mut(&mut self, mode: Mode) -> &mut DecompositionTable {
        match mode {
            Mode::PreAutograd => &mut self.pre_autograd,
            Mode::PostAutograd => &mut self.post_autograd,
            Mode::Meta => &mut self.meta,
        }
    }

    /// Look a table up by its mode string, e.g. `"post_autograd"`.
    pub fn table_by_name(&self, mode: &str) -> Result<&DecompositionTable> {
        Ok(self.table(mode.parse()?))
    }

    /// Every table with its mode, in pipeline order.
    pub fn tables(&self) -> impl Iterator<Item = (Mode, &DecompositionTable)> {
        [Mode::PreAutograd, Mode::PostAutograd, Mode::Meta].into_iter().map(|mode| (mode, self.table(mode)))
    }

    /// Overloads registered with `disable_meta`, in registration order.
    pub fn disabled_meta(&self) -> &IndexSet<OpOverload> {
        &self.disabled_meta
    }

    /// Whether `overload` was registered with `disable_meta`.
    pub fn is_meta_disabled(&self, overload: &OpOverload) -> bool {
        self.disabled_meta.contains(overload)
    }

    /// Decompositions registered in `mode` for `requested`.
    ///
    /// Packets expand to their registered members. Unregistered items are
    /// left out of the result rather than reported.
    pub fn get_decompositions<I>(&self, requested: I, mode: Mode) -> IndexMap<OpOverload, Decomposition>
    where
        I: IntoIterator,
        I::Item: Into<OpRef>,
    {
        self.table(mode).select(requested)
    }

    /// [`Registry::get_decompositions`] with the mode given as a string.
    pub fn get_decompositions_by_name<I>(
        &self,
        requested: I,
        mode: &str,
    ) -> Result<IndexMap<OpOverload, Decomposition>>
    where
        I: IntoIterator,
        I::Item: Into<OpRef>,
    {
        Ok(self.table_by_name(mode)?.select(requested))
    }
}

#[bon]
impl Registry {
    /// Register `decomposition` for every overload `target` denotes.
    ///
    /// Returns the callable actually stored, which differs from the input when
    /// the input declares an aggregate `out` (see [`crate::adapt_output`]).
    /// Fails without modifying anything if any overload is already registered
    /// in `mode`.
    #[builder]
    pub fn register(
        &mut self,
        #[builder(into)] target: OpTarget,
        decomposition: Decomposition,
        #[builder(default)] mode: Mode,
        #[builder(default = false)] disable_meta: bool,
    ) -> Result<Decomposition> {
        let overloads = target.overloads();
        let decomposition = insert_expanded(self.table_mut(mode), &overloads, decomposition)?;

        if disable_meta {
            self.disabled_meta.extend(overloads);
        }
        Ok(decomposition)
    }
}

/// Register into a caller-owned table instead of one of the registry's own.
pub fn register_into(
    table: &mut DecompositionTable,
    target: impl Into<OpTarget>,
    decomposition: Decomposition,
) -> Result<Decomposition> {
    insert_expanded(table, &target.into().overloads(), decomposition)
}

fn insert_expanded(
    table: &mut DecompositionTable,
    overloads: &[OpOverload],
    decomposition: Decomposition,
) -> Result<Decomposition> {
    tracing::trace!(table = table.name(), overloads = overloads.len(), "expanded registration target");

    let decomposition = adapt_output(decomposition);
    table.insert_all(overloads, &decomposition)?;
    Ok(decomposition)
}
