//! Decomposition callables.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::Result;
use crate::value::{CallArgs, Value};

/// Body of a decomposition.
pub type DecompositionFn = dyn Fn(CallArgs) -> Result<Value> + Send + Sync;

/// Declared aggregate output of a decomposition.
///
/// A body that writes several results into one pre-allocated `out` struct
/// declares the struct's name and fields here. Registration uses the
/// declaration to expose each field as its own keyword argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputSpec {
    pub type_name: String,
    pub fields: SmallVec<[String; 2]>,
}

impl OutputSpec {
    /// Keyword the body receives the aggregate under.
    pub const PARAMETER: &'static str = "out";

    pub fn new<S: Into<String>>(type_name: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        Self { type_name: type_name.into(), fields: fields.into_iter().map(Into::into).collect() }
    }
}

/// How a decomposition receives pre-allocated outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutConvention {
    /// No aggregate output, or a single `out` tensor passed as is.
    #[default]
    Single,
    /// The body takes one `out` struct built from the declared fields.
    Aggregate(Arc<OutputSpec>),
    /// Callers pass one keyword per field; the wrapper rebuilds `out`.
    PerSlot(Arc<OutputSpec>),
}

/// A named, shareable decomposition body.
///
/// Clones share the body. Two decompositions are the same callable when
/// [`Decomposition::ptr_eq`] holds, regardless of name.
#[derive(Clone, derive_more::Debug)]
pub struct Decomposition {
    name: Arc<str>,
    #[debug(skip)]
    func: Arc<DecompositionFn>,
    convention: OutConvention,
}

impl Decomposition {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(CallArgs) -> Result<Value> + Send + Sync + 'static,
    {
        Self { name: Arc::from(name.into()), func: Arc::new(func), convention: OutConvention::Single }
    }

    /// Assemble a decomposition from an existing body, e.g. a wrapper around another one.
    pub fn from_parts(name: Arc<str>, func: Arc<DecompositionFn>, convention: OutConvention) -> Self {
        Self { name, func, convention }
    }

    /// Declare that the body expects an aggregate `out` shaped like `spec`.
    pub fn with_output(mut self, spec: OutputSpec) -> Self {
        self.convention = OutConvention::Aggregate(Arc::new(spec));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn convention(&self) -> &OutConvention {
        &self.convention
    }

    pub fn output_spec(&self) -> Option<&OutputSpec> {
        match &self.convention {
            OutConvention::Single => None,
            OutConvention::Aggregate(spec) | OutConvention::PerSlot(spec) => Some(spec),
        }
    }

    pub fn call(&self, args: CallArgs) -> Result<Value> {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}
