//! Concrete overloads and overload packets.
//!
//! Both types are cheap `Arc` handles. An `OpOverload` is identified by its
//! `(name, overload_name)` pair, so handles produced by different catalogs for
//! the same signature compare equal and key the same table entry.
//!
//! An `OpOverloadPacket` shares its member map with the catalog that created
//! it: overloads defined after the packet handle was obtained are visible
//! through [`OpOverloadPacket::overloads`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{DuplicateOverloadSnafu, Result};
use crate::name::OperatorName;
use crate::schema::OpSchema;

#[derive(Clone)]
pub struct OpOverload {
    schema: Arc<OpSchema>,
}

impl OpOverload {
    pub fn new(schema: OpSchema) -> Self {
        Self { schema: Arc::new(schema) }
    }

    pub fn schema(&self) -> &OpSchema {
        &self.schema
    }

    /// Name of the owning packet.
    pub fn packet_name(&self) -> &OperatorName {
        &self.schema.name
    }

    pub fn overload_name(&self) -> &str {
        &self.schema.overload_name
    }

    pub fn is_default_overload(&self) -> bool {
        self.schema.overload_name.is_empty()
    }

    /// See [`OpSchema::qualified_name`].
    pub fn qualified_name(&self) -> String {
        self.schema.qualified_name()
    }

    pub fn has_read_only_alias(&self) -> bool {
        self.schema.has_read_only_alias()
    }
}

impl PartialEq for OpOverload {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
            || (self.schema.name == other.schema.name && self.schema.overload_name == other.schema.overload_name)
    }
}

impl Eq for OpOverload {}

impl Hash for OpOverload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.name.hash(state);
        self.schema.overload_name.hash(state);
    }
}

impl fmt::Display for OpOverload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.schema.name)?;
        if !self.schema.overload_name.is_empty() {
            write!(f, ".{}", self.schema.overload_name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for OpOverload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpOverload({self})")
    }
}

struct PacketInner {
    name: OperatorName,
    overloads: RwLock<IndexMap<String, OpOverload>>,
}

/// Family of every overload sharing one operator name.
#[derive(Clone)]
pub struct OpOverloadPacket {
    inner: Arc<PacketInner>,
}

impl OpOverloadPacket {
    pub fn new(name: OperatorName) -> Self {
        Self { inner: Arc::new(PacketInner { name, overloads: RwLock::new(IndexMap::new()) }) }
    }

    pub fn name(&self) -> &OperatorName {
        &self.inner.name
    }

    /// Current members, in definition order.
    pub fn overloads(&self) -> Vec<OpOverload> {
        self.inner.overloads.read().values().cloned().collect()
    }

    pub fn overload_names(&self) -> Vec<String> {
        self.inner.overloads.read().keys().cloned().collect()
    }

    /// Look up a member by overload name; `""` is the default overload.
    pub fn overload(&self, overload_name: &str) -> Option<OpOverload> {
        self.inner.overloads.read().get(overload_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.overloads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.overloads.read().is_empty()
    }

    /// Add a member built from `schema`, which must carry this packet's name.
    pub(crate) fn insert(&self, schema: OpSchema) -> Result<OpOverload> {
        debug_assert_eq!(schema.name, self.inner.name);

        let mut overloads = self.inner.overloads.write();
        if overloads.contains_key(&schema.overload_name) {
            return DuplicateOverloadSnafu { name: schema.qualified_name() }.fail();
        }

        let overload = OpOverload::new(schema);
        overloads.insert(overload.overload_name().to_string(), overload.clone());
        Ok(overload)
    }
}

impl PartialEq for OpOverloadPacket {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.name == other.inner.name
    }
}

impl Eq for OpOverloadPacket {}

impl Hash for OpOverloadPacket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl fmt::Display for OpOverloadPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.name)
    }
}

impl fmt::Debug for OpOverloadPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpOverloadPacket")
            .field("name", &self.inner.name.as_str())
            .field("overloads", &self.overload_names())
            .finish()
    }
}
