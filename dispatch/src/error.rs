//! Error types for dispatcher operations.

use snafu::Snafu;

use crate::key::DispatchKey;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The operator already has a kernel bound to this key.
    #[snafu(display("operator {operator} already has a kernel for dispatch key {key}"))]
    InstallConflict { operator: String, key: DispatchKey },

    /// The dispatcher has never seen this operator.
    #[snafu(display("operator {operator} is not known to the dispatcher"))]
    UnknownOperator { operator: String },

    /// An operator was found but has nothing bound to the requested key.
    #[snafu(display("operator {operator} has no kernel for dispatch key {key}"))]
    MissingKernel { operator: String, key: DispatchKey },

    /// The kernel bound to the key is owned by the host and cannot be called here.
    #[snafu(display("kernel for {operator} at {key} is native and not callable here"))]
    NativeKernel { operator: String, key: DispatchKey },

    /// The installed decomposition failed.
    #[snafu(display("kernel for {operator} failed: {source}"))]
    Kernel { operator: String, source: decomp_ops::Error },
}
