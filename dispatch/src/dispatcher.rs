//! The dispatcher seam used by meta activation.

use decomp_ops::{Decomposition, OpOverload};

use crate::error::Result;

/// Operations the registry performs against the hosting dispatcher.
pub trait Dispatcher {
    /// Human-readable listing of every kernel registered for `qualified_name`
    /// (`ns::op` or `ns::op.overload`).
    ///
    /// Callers only test the listing for markers such as a dispatch key name,
    /// so the exact layout is up to the implementation. Unknown operators
    /// produce a listing without kernels.
    fn dump_registration_table(&self, qualified_name: &str) -> String;

    /// Bind `kernel` as the abstract (meta) implementation of `overload`.
    ///
    /// Fails with [`crate::Error::InstallConflict`] if the dispatcher refuses,
    /// e.g. because a meta kernel is already bound.
    fn install_abstract_impl(&mut self, overload: &OpOverload, kernel: Decomposition) -> Result<()>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &mut D {
    fn dump_registration_table(&self, qualified_name: &str) -> String {
        (**self).dump_registration_table(qualified_name)
    }

    fn install_abstract_impl(&mut self, overload: &OpOverload, kernel: Decomposition) -> Result<()> {
        (**self).install_abstract_impl(overload, kernel)
    }
}
