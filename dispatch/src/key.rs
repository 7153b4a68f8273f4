//! Dispatch keys.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dispatch keys a kernel can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::VariantArray)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DispatchKey {
    CPU,
    CUDA,
    /// Abstract execution: computes result metadata only.
    Meta,
    BackendSelect,
    Autograd,
    /// Kernel that is written in terms of other operators and works for every backend and autograd.
    CompositeImplicitAutograd,
    /// Kernel that is written in terms of other operators and works for every backend.
    CompositeExplicitAutograd,
}

impl DispatchKey {
    /// Alias keys stand for a set of runtime keys rather than one backend.
    pub const fn is_alias(&self) -> bool {
        matches!(self, Self::Autograd | Self::CompositeImplicitAutograd | Self::CompositeExplicitAutograd)
    }
}
