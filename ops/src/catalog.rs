//! Runtime-side owner of operator definitions.

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::Result;
use crate::name::OperatorName;
use crate::overload::{OpOverload, OpOverloadPacket};
use crate::schema::OpSchema;

/// Every operator the hosting runtime has defined, grouped into packets.
///
/// Packets handed out by the catalog stay connected to it, so a packet
/// obtained before an overload is defined still lists that overload
/// afterwards.
///
/// # Example
///
/// ```
/// # use decomp_ops::OperatorCatalog;
/// let catalog = OperatorCatalog::new();
/// let add = catalog.packet_or_insert("aten::add").unwrap();
/// assert!(add.is_empty());
///
/// catalog.define("aten::add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
/// assert_eq!(add.overload_names(), ["Tensor"]);
/// ```
#[derive(Default)]
pub struct OperatorCatalog {
    packets: RwLock<IndexMap<OperatorName, OpOverloadPacket>>,
}

impl OperatorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `schema` and define it as a new overload.
    pub fn define(&self, schema: &str) -> Result<OpOverload> {
        self.define_schema(OpSchema::parse(schema)?)
    }

    /// Define an overload. Fails if the qualified name is already taken.
    pub fn define_schema(&self, schema: OpSchema) -> Result<OpOverload> {
        self.packet_entry(&schema.name).insert(schema)
    }

    /// Packet for `name`, created empty if the catalog has not seen it yet.
    pub fn packet_or_insert(&self, name: &str) -> Result<OpOverloadPacket> {
        let name = OperatorName::parse(name)?;
        Ok(self.packet_entry(&name))
    }

    fn packet_entry(&self, name: &OperatorName) -> OpOverloadPacket {
        if let Some(packet) = self.packets.read().get(name) {
            return packet.clone();
        }

        self.packets.write().entry(name.clone()).or_insert_with(|| OpOverloadPacket::new(name.clone())).clone()
    }

    pub fn packet(&self, name: &str) -> Option<OpOverloadPacket> {
        self.packets.read().get(name).cloned()
    }

    /// Look up an overload by qualified name (`aten::add.Tensor`, or `aten::add`
    /// for the default overload).
    pub fn overload(&self, qualified_name: &str) -> Option<OpOverload> {
        let (packet, overload_name) = qualified_name.split_once('.').unwrap_or((qualified_name, ""));
        self.packet(packet)?.overload(overload_name)
    }

    pub fn packets(&self) -> Vec<OpOverloadPacket> {
        self.packets.read().values().cloned().collect()
    }

    /// All overloads of all packets, in definition order.
    pub fn overloads(&self) -> Vec<OpOverload> {
        self.packets.read().values().flat_map(OpOverloadPacket::overloads).collect()
    }

    pub fn len(&self) -> usize {
        self.packets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.read().is_empty()
    }
}
