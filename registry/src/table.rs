//! A single overload-keyed decomposition table.

use std::collections::HashSet;

use decomp_ops::{Decomposition, OpOverload, OpRef, OperatorName};
use indexmap::IndexMap;

use crate::error::{DuplicateRegistrationSnafu, Result};

/// Maps concrete overloads to the decomposition registered for them.
///
/// Entries keep insertion order, so iteration and query results are
/// reproducible across runs.
#[derive(Debug, Clone)]
pub struct DecompositionTable {
    name: String,
    entries: IndexMap<OpOverload, Decomposition>,
}

impl DecompositionTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: IndexMap::new() }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decomposition registered for exactly this overload.
    pub fn get(&self, overload: &OpOverload) -> Option<&Decomposition> {
        self.entries.get(overload)
    }

    /// Whether `overload` has an entry.
    pub fn contains(&self, overload: &OpOverload) -> bool {
        self.entries.contains_key(overload)
    }

    /// Number of registered overloads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&OpOverload, &Decomposition)> {
        self.entries.iter()
    }

    pub fn overloads(&self) -> impl Iterator<Item = &OpOverload> {
        self.entries.keys()
    }

    /// Insert `decomposition` under every overload, or under none.
    ///
    /// Fails on the first overload that is already present, either in the
    /// table or earlier in `overloads`. The table is left untouched on error.
    pub fn insert_all(&mut self, overloads: &[OpOverload], decomposition: &Decomposition) -> Result<()> {
        let mut seen = HashSet::with_capacity(overloads.len());
        for overload in overloads {
            if self.entries.contains_key(overload) || !seen.insert(overload) {
                tracing::warn!(operator = %overload, table = %self.name, "duplicate decomposition registration");
                return DuplicateRegistrationSnafu { operator: overload.to_string(), table: self.name.clone() }.fail();
            }
        }

        for overload in overloads {
            tracing::debug!(
                operator = %overload,
                table = %self.name,
                decomposition = decomposition.name(),
                "registered decomposition"
            );
            self.entries.insert(overload.clone(), decomposition.clone());
        }
        Ok(())
    }

    /// Registered overloads grouped by the packet that owns them.
    pub fn packet_index(&self) -> IndexMap<OperatorName, Vec<OpOverload>> {
        let mut index: IndexMap<OperatorName, Vec<OpOverload>> = IndexMap::new();
        for overload in self.entries.keys() {
            index.entry(overload.packet_name().clone()).or_default().push(overload.clone());
        }
        index
    }

    /// Entries matching `requested`, in discovery order.
    ///
    /// A packet contributes every registered member, an overload contributes
    /// itself. Anything not registered is skipped.
    pub fn select<I>(&self, requested: I) -> IndexMap<OpOverload, Decomposition>
    where
        I: IntoIterator,
        I::Item: Into<OpRef>,
    {
        let index = self.packet_index();
        let mut found = IndexMap::new();

        for item in requested {
            match item.into() {
                OpRef::Packet(packet) => {
                    let Some(members) = index.get(packet.name()) else { continue };
                    for overload in members {
                        if let Some(decomposition) = self.entries.get(overload) {
                            found.insert(overload.clone(), decomposition.clone());
                        }
                    }
                }
                OpRef::Overload(overload) => {
                    if let Some(decomposition) = self.entries.get(&overload) {
                        found.insert(overload, decomposition.clone());
                    }
                }
            }
        }

        tracing::trace!(table = %self.name, found = found.len(), "selected decompositions");
        found
    }
}
