//! Operator identities for the decomposition registry.
//!
//! This crate models the operators a hosting runtime exposes and the callables
//! that can stand in for them.
//!
//! # Module Organization
//!
//! - [`name`] - Qualified operator names (`namespace::op`)
//! - [`schema`] - Operator signatures with alias annotations, and their parser
//! - [`overload`] - `OpOverload` (one concrete signature) and `OpOverloadPacket` (its family)
//! - [`catalog`] - `OperatorCatalog`, the runtime-side owner of packets and overloads
//! - [`target`] - Nested registration targets and flat query references
//! - [`value`] - Call arguments and result values seen by decompositions
//! - [`kernel`] - The `Decomposition` callable and its output conventions
//! - [`error`] - Error types and result handling

pub mod catalog;
pub mod error;
pub mod kernel;
pub mod name;
pub mod overload;
pub mod schema;
pub mod target;
pub mod value;


pub use catalog::OperatorCatalog;
pub use error::{Error, Result};
pub use kernel::{Decomposition, OutConvention, OutputSpec};
pub use name::OperatorName;
pub use overload::{OpOverload, OpOverloadPacket};
pub use schema::{AliasInfo, Argument, OpSchema};
pub use target::{OpRef, OpTarget};
pub use value::{CallArgs, ScalarType, StructValue, TensorMeta, Value};
