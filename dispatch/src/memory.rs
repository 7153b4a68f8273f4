//! Self-contained dispatcher keeping kernels in memory.

use std::fmt::Write;

use decomp_ops::{CallArgs, Decomposition, OpOverload, Value};
use indexmap::IndexMap;
use snafu::ResultExt;

use crate::dispatcher::Dispatcher;
use crate::error::{
    InstallConflictSnafu, KernelSnafu, MissingKernelSnafu, NativeKernelSnafu, Result, UnknownOperatorSnafu,
};
use crate::key::DispatchKey;

/// What a dispatch key of an operator is bound to.
#[derive(Debug, Clone)]
pub enum KernelSlot {
    /// Kernel owned by the host, described by where it was registered.
    Native { origin: String },
    /// Decomposition installed through [`Dispatcher::install_abstract_impl`].
    Decomposition(Decomposition),
}

#[derive(Debug, Default)]
struct OperatorEntry {
    schema: Option<String>,
    kernels: IndexMap<DispatchKey, KernelSlot>,
}

/// Dispatcher that records kernels per operator and key.
///
/// # Example
///
/// ```
/// # use decomp_dispatch::{DispatchKey, Dispatcher, InMemoryDispatcher};
/// let mut dispatcher = InMemoryDispatcher::new();
/// dispatcher.register_native("aten::add.Tensor", DispatchKey::CPU, "native/BinaryOps.cpp").unwrap();
///
/// let dump = dispatcher.dump_registration_table("aten::add.Tensor");
/// assert!(dump.contains("CPU: registered at native/BinaryOps.cpp"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDispatcher {
    operators: IndexMap<String, OperatorEntry>,
    installs: Vec<(String, DispatchKey)>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the operator known, recording its schema for the dump.
    pub fn declare(&mut self, overload: &OpOverload) {
        self.operators.entry(overload.qualified_name()).or_default().schema = Some(overload.schema().to_string());
    }

    /// Record a kernel the host provides itself.
    pub fn register_native(
        &mut self,
        qualified_name: &str,
        key: DispatchKey,
        origin: impl Into<String>,
    ) -> Result<()> {
        self.bind(qualified_name, key, KernelSlot::Native { origin: origin.into() })
    }

    /// Whatever is bound to `key` for the operator, if anything.
    pub fn kernel(&self, qualified_name: &str, key: DispatchKey) -> Option<&KernelSlot> {
        self.operators.get(qualified_name)?.kernels.get(&key)
    }

    /// Keys bound for the operator, in registration order.
    pub fn keys(&self, qualified_name: &str) -> Vec<DispatchKey> {
        self.operators.get(qualified_name).map(|entry| entry.kernels.keys().copied().collect()).unwrap_or_default()
    }

    /// Run the decomposition bound at `key`.
    pub fn call(&self, qualified_name: &str, key: DispatchKey, args: CallArgs) -> Result<Value> {
        let entry = self
            .operators
            .get(qualified_name)
            .ok_or_else(|| UnknownOperatorSnafu { operator: qualified_name }.build())?;

        match entry.kernels.get(&key) {
            Some(KernelSlot::Decomposition(kernel)) => {
                kernel.call(args).context(KernelSnafu { operator: qualified_name })
            }
            Some(KernelSlot::Native { .. }) => NativeKernelSnafu { operator: qualified_name, key }.fail(),
            None => MissingKernelSnafu { operator: qualified_name, key }.fail(),
        }
    }

    /// Every successful abstract-kernel install, in order.
    pub fn install_log(&self) -> &[(String, DispatchKey)] {
        &self.installs
    }

    fn bind(&mut self, qualified_name: &str, key: DispatchKey, slot: KernelSlot) -> Result<()> {
        let entry = self.operators.entry(qualified_name.to_string()).or_default();
        if entry.kernels.contains_key(&key) {
            return InstallConflictSnafu { operator: qualified_name, key }.fail();
        }
        entry.kernels.insert(key, slot);
        Ok(())
    }
}

impl Dispatcher for InMemoryDispatcher {
    fn dump_registration_table(&self, qualified_name: &str) -> String {
        let mut dump = format!("name: {qualified_name}\n");
        let Some(entry) = self.operators.get(qualified_name) else {
            dump.push_str("schema: (none)\n");
            return dump;
        };

        let _ = writeln!(dump, "schema: {}", entry.schema.as_deref().unwrap_or("(none)"));
        for (key, slot) in &entry.kernels {
            let alias = if key.is_alias() { "[alias]" } else { "" };
            let _ = match slot {
                KernelSlot::Native { origin } => writeln!(dump, "{key}{alias}: registered at {origin}"),
                KernelSlot::Decomposition(kernel) => {
                    writeln!(dump, "{key}{alias}: registered by decomposition {}", kernel.name())
                }
            };
        }
        dump
    }

    fn install_abstract_impl(&mut self, overload: &OpOverload, kernel: Decomposition) -> Result<()> {
        let name = overload.qualified_name();
        let kernel_name = kernel.shared_name().clone();
        self.bind(&name, DispatchKey::Meta, KernelSlot::Decomposition(kernel))?;

        tracing::debug!(operator = %name, kernel = %kernel_name, "installed abstract kernel");
        self.installs.push((name, DispatchKey::Meta));
        Ok(())
    }
}
