//! Decomposition registry.
//!
//! Decompositions are registered at startup into one of three tables, keyed
//! by [`Mode`]. Graph transforms query a table for the operators they care
//! about, and a single activation pass installs the collected decompositions
//! as meta kernels on the hosting dispatcher.
//!
//! # Module Organization
//!
//! - [`mode`] - The three decomposition modes
//! - [`table`] - One overload-keyed table and its query protocol
//! - [`registry`] - The three-table registry and registration
//! - [`adapt`] - Rewriting aggregate `out` bodies to per-slot keywords
//! - [`config`] - Activation settings
//! - [`activate`] - Table merging, meta activation and freezing
//! - [`error`] - Error types and result handling

pub mod activate;
pub mod adapt;
pub mod config;
pub mod error;
pub mod mode;
pub mod registry;
pub mod table;


pub use activate::{ActivationReport, FrozenRegistry, SkipReason, merge_tables};
pub use adapt::adapt_output;
pub use config::{ActivationConfig, COMPOSITE_IMPLICIT_MARKER};
pub use error::{Error, Result};
pub use mode::Mode;
pub use registry::{Registry, register_into};
pub use table::DecompositionTable;
