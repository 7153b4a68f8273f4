//! Qualified operator names.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{InvalidOperatorNameSnafu, Result};

/// Validated `namespace::op` name shared by every overload of an operator.
///
/// Cloning is cheap; the string is reference counted. Equality, ordering and
/// hashing follow the full string, so maps keyed by `OperatorName` can be
/// queried with `&str`.
#[derive(Clone)]
pub struct OperatorName {
    full: Arc<str>,
    split: usize,
}

impl OperatorName {
    pub fn parse(name: &str) -> Result<Self> {
        let Some(split) = name.find("::") else {
            return InvalidOperatorNameSnafu { name, reason: "missing '::' namespace separator" }.fail();
        };

        let (namespace, base) = (&name[..split], &name[split + 2..]);
        for (part, what) in [(namespace, "namespace"), (base, "operator")] {
            if part.is_empty() {
                return InvalidOperatorNameSnafu { name, reason: format!("empty {what}") }.fail();
            }
            if !is_identifier(part) {
                return InvalidOperatorNameSnafu { name, reason: format!("{what} '{part}' is not an identifier") }
                    .fail();
            }
        }

        Ok(Self { full: Arc::from(name), split })
    }

    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    /// Operator name without the namespace (`add` for `aten::add`).
    pub fn base(&self) -> &str {
        &self.full[self.split + 2..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PartialEq for OperatorName {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for OperatorName {}

impl PartialOrd for OperatorName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OperatorName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.full.cmp(&other.full)
    }
}

impl Hash for OperatorName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl Borrow<str> for OperatorName {
    fn borrow(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl fmt::Debug for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorName({})", self.full)
    }
}

impl AsRef<str> for OperatorName {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for OperatorName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for OperatorName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}
