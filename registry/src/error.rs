//! Error types for registration, queries and activation.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The destination table already holds an entry for this overload.
    #[snafu(display("duplicate registrations for {operator} in the {table} table"))]
    DuplicateRegistration { operator: String, table: String },

    /// A mode string names none of the three tables.
    #[snafu(display("unsupported decomposition mode '{mode}', expected pre_autograd, post_autograd or meta"))]
    UnsupportedMode { mode: String },

    /// The dispatcher refused to install a meta kernel.
    #[snafu(display("failed to install meta kernel for {operator}: {source}"))]
    InstallConflict { operator: String, source: decomp_dispatch::Error },

    /// Meta kernels were already installed from this registry.
    #[snafu(display("meta activation already ran for this registry"))]
    AlreadyActivated,
}
