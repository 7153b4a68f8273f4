//! Registration targets and query references.

use indexmap::IndexMap;

use crate::overload::{OpOverload, OpOverloadPacket};

/// What a registration applies to.
///
/// Targets nest arbitrarily, so a single registration can cover a mix of
/// overloads and whole packets grouped in lists or named maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpTarget {
    Overload(OpOverload),
    Packet(OpOverloadPacket),
    List(Vec<OpTarget>),
    Map(IndexMap<String, OpTarget>),
}

impl OpTarget {
    pub fn list<T: Into<OpTarget>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<String>, T: Into<OpTarget>>(entries: impl IntoIterator<Item = (K, T)>) -> Self {
        Self::Map(entries.into_iter().map(|(key, target)| (key.into(), target.into())).collect())
    }

    /// Concrete overloads denoted by this target, depth first.
    ///
    /// Packets expand to their members at the time of the call. The result may
    /// contain repeats when the same overload is reachable twice.
    pub fn overloads(&self) -> Vec<OpOverload> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<OpOverload>) {
        match self {
            Self::Overload(overload) => out.push(overload.clone()),
            Self::Packet(packet) => out.extend(packet.overloads()),
            Self::List(items) => items.iter().for_each(|item| item.collect_into(out)),
            Self::Map(entries) => entries.values().for_each(|item| item.collect_into(out)),
        }
    }
}

impl From<OpOverload> for OpTarget {
    fn from(overload: OpOverload) -> Self {
        Self::Overload(overload)
    }
}

impl From<&OpOverload> for OpTarget {
    fn from(overload: &OpOverload) -> Self {
        Self::Overload(overload.clone())
    }
}

impl From<OpOverloadPacket> for OpTarget {
    fn from(packet: OpOverloadPacket) -> Self {
        Self::Packet(packet)
    }
}

impl From<&OpOverloadPacket> for OpTarget {
    fn from(packet: &OpOverloadPacket) -> Self {
        Self::Packet(packet.clone())
    }
}

impl From<OpRef> for OpTarget {
    fn from(item: OpRef) -> Self {
        match item {
            OpRef::Overload(overload) => Self::Overload(overload),
            OpRef::Packet(packet) => Self::Packet(packet),
        }
    }
}

impl<T: Into<OpTarget>> From<Vec<T>> for OpTarget {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<OpTarget>, const N: usize> From<[T; N]> for OpTarget {
    fn from(items: [T; N]) -> Self {
        Self::list(items)
    }
}

impl FromIterator<OpTarget> for OpTarget {
    fn from_iter<I: IntoIterator<Item = OpTarget>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

/// A single requested operator in a decomposition query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpRef {
    Overload(OpOverload),
    Packet(OpOverloadPacket),
}

impl From<OpOverload> for OpRef {
    fn from(overload: OpOverload) -> Self {
        Self::Overload(overload)
    }
}

impl From<&OpOverload> for OpRef {
    fn from(overload: &OpOverload) -> Self {
        Self::Overload(overload.clone())
    }
}

impl From<OpOverloadPacket> for OpRef {
    fn from(packet: OpOverloadPacket) -> Self {
        Self::Packet(packet)
    }
}

impl From<&OpOverloadPacket> for OpRef {
    fn from(packet: &OpOverloadPacket) -> Self {
        Self::Packet(packet.clone())
    }
}
