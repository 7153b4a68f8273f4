//! Operator signatures.
//!
//! Schemas use the native operator grammar:
//!
//! ```text
//! aten::transpose.int(Tensor(a) self, int dim0, int dim1) -> Tensor(a)
//! aten::add.out(Tensor self, Tensor other, *, Scalar alpha=1, Tensor(a!) out) -> Tensor(a!)
//! aten::var_mean.correction(Tensor self, int[1]? dim=None, *, Scalar? correction=None) -> (Tensor, Tensor)
//! ```
//!
//! An alias annotation `(a)` marks an argument whose storage is viewed by the
//! result; `(a!)` marks one that is written through.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MalformedSchemaSnafu, Result};
use crate::name::{OperatorName, is_identifier};

/// Alias annotation attached to an argument or return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AliasInfo {
    /// Alias set name (`a` in `Tensor(a!)`), or `*` for the wildcard set.
    pub set: String,
    /// Whether the argument is mutated through the alias.
    pub is_write: bool,
    /// Set the contents alias after the call (`*` in `Tensor(a -> *)`).
    pub after: Option<String>,
    /// Written after a list suffix (`t[](*)`) instead of before it (`Tensor(a)[]`).
    pub on_list: bool,
}

impl AliasInfo {
    pub fn new(set: impl Into<String>, is_write: bool) -> Self {
        Self { set: set.into(), is_write, after: None, on_list: false }
    }
}

impl fmt::Display for AliasInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.set)?;
        if self.is_write {
            f.write_str("!")?;
        }
        if let Some(after) = &self.after {
            write!(f, " -> {after}")?;
        }
        f.write_str(")")
    }
}

/// A formal argument or return slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Argument {
    /// Argument name. Empty for unnamed return slots.
    pub name: String,
    /// Type without the alias annotation (`Tensor[]`, `int[1]?`).
    pub ty: String,
    pub alias_info: Option<AliasInfo>,
    /// Default value as written in the schema.
    pub default: Option<String>,
    pub kwarg_only: bool,
}

impl Argument {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into(), alias_info: None, default: None, kwarg_only: false }
    }

    pub fn with_alias(mut self, set: impl Into<String>, is_write: bool) -> Self {
        self.alias_info = Some(AliasInfo::new(set, is_write));
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn kwarg_only(mut self) -> Self {
        self.kwarg_only = true;
        self
    }

    /// A view of another argument's storage that is not written through.
    pub fn is_read_only_alias(&self) -> bool {
        self.alias_info.as_ref().is_some_and(|info| !info.is_write)
    }

    fn fmt_type(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias_info {
            None => f.write_str(&self.ty),
            Some(alias) if alias.on_list => write!(f, "{}{alias}", self.ty),
            Some(alias) => {
                let split =
                    self.ty.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(self.ty.len());
                write!(f, "{}{alias}{}", &self.ty[..split], &self.ty[split..])
            }
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_type(f)?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        if let Some(default) = &self.default {
            write!(f, "={default}")?;
        }
        Ok(())
    }
}

/// Full signature of one operator overload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpSchema {
    pub name: OperatorName,
    /// Overload discriminator; empty for the default overload.
    pub overload_name: String,
    pub arguments: Vec<Argument>,
    pub returns: Vec<Argument>,
}

impl OpSchema {
    pub fn new(name: OperatorName, overload_name: impl Into<String>) -> Self {
        Self { name, overload_name: overload_name.into(), arguments: Vec::new(), returns: Vec::new() }
    }

    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        self.arguments = arguments.into_iter().collect();
        self
    }

    pub fn with_returns(mut self, returns: impl IntoIterator<Item = Argument>) -> Self {
        self.returns = returns.into_iter().collect();
        self
    }

    /// Name as the dispatcher knows it: `ns::op` or `ns::op.overload`.
    pub fn qualified_name(&self) -> String {
        if self.overload_name.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.name, self.overload_name)
        }
    }

    /// True if any argument is a read-only alias, i.e. the operator is a view.
    pub fn has_read_only_alias(&self) -> bool {
        self.arguments.iter().any(Argument::is_read_only_alias)
    }

    /// True if any argument is written through an alias.
    pub fn is_mutable(&self) -> bool {
        self.arguments.iter().any(|arg| arg.alias_info.as_ref().is_some_and(|info| info.is_write))
    }

    pub fn parse(schema: &str) -> Result<Self> {
        Parser { schema }.parse()
    }
}

impl fmt::Display for OpSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.qualified_name())?;
        let mut in_kwargs = false;
        for (idx, arg) in self.arguments.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if arg.kwarg_only && !in_kwargs {
                f.write_str("*, ")?;
                in_kwargs = true;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(") -> ")?;

        match self.returns.as_slice() {
            [single] if single.name.is_empty() => write!(f, "{single}"),
            returns => {
                f.write_str("(")?;
                for (idx, ret) in returns.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ret}")?;
                }
                f.write_str(")")
            }
        }
    }
}

struct Parser<'s> {
    schema: &'s str,
}

impl<'s> Parser<'s> {
    fn fail<T>(&self, position: usize, reason: impl Into<String>) -> Result<T> {
        MalformedSchemaSnafu { schema: self.schema, position, reason: reason.into() }.fail()
    }

    fn parse(&self) -> Result<OpSchema> {
        let src = self.schema;
        let Some(open) = src.find('(') else {
            return self.fail(src.len(), "expected '(' after operator name");
        };

        let head = src[..open].trim();
        let (name, overload_name) = head.split_once('.').unwrap_or((head, ""));
        let name = match OperatorName::parse(name) {
            Ok(name) => name,
            Err(err) => return self.fail(0, err.to_string()),
        };
        if !overload_name.is_empty() && !is_identifier(overload_name) {
            return self.fail(name.as_str().len() + 1, format!("overload name '{overload_name}' is not an identifier"));
        }

        let close = self.closing(open)?;
        let arguments = self.arguments(open + 1, &src[open + 1..close])?;

        let tail = &src[close + 1..];
        let Some(returns) = tail.trim_start().strip_prefix("->") else {
            return self.fail(close + 1, "expected '->' after argument list");
        };
        let returns_at = src.len() - returns.len();
        let returns = self.returns(returns_at, returns)?;

        Ok(OpSchema { name, overload_name: overload_name.to_string(), arguments, returns })
    }

    /// Index of the bracket that closes the one at `open`.
    fn closing(&self, open: usize) -> Result<usize> {
        let mut depth = 0usize;
        for (idx, c) in self.schema[open..].char_indices() {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(open + idx);
                    }
                }
                _ => {}
            }
        }
        self.fail(open, "unbalanced brackets")
    }

    fn arguments(&self, base: usize, src: &str) -> Result<Vec<Argument>> {
        let mut arguments = Vec::new();
        let mut kwarg_only = false;

        for (offset, piece) in split_top_level(src) {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                if arguments.is_empty() && src.trim().is_empty() {
                    break;
                }
                return self.fail(base + offset, "empty argument");
            }
            if trimmed == "*" {
                kwarg_only = true;
                continue;
            }

            let at = base + offset + (piece.len() - piece.trim_start().len());
            let (mut arg, rest) = self.typed(at, trimmed)?;
            let rest = rest.trim();
            let (name, default) = match rest.split_once('=') {
                Some((name, default)) => (name.trim(), Some(default.trim().to_string())),
                None => (rest, None),
            };
            if !is_identifier(name) {
                return self.fail(at, format!("argument name '{name}' is not an identifier"));
            }

            arg.name = name.to_string();
            arg.default = default;
            arg.kwarg_only = kwarg_only;
            arguments.push(arg);
        }

        Ok(arguments)
    }

    fn returns(&self, base: usize, src: &str) -> Result<Vec<Argument>> {
        let trimmed = src.trim();
        let at = base + (src.len() - src.trim_start().len());

        if trimmed.starts_with('(') {
            let close = self.closing(at)?;
            if close != at + trimmed.len() - 1 {
                return self.fail(close + 1, "unexpected text after return tuple");
            }
            let inner = &trimmed[1..trimmed.len() - 1];
            if inner.trim().is_empty() {
                return Ok(Vec::new());
            }
            return split_top_level(inner).into_iter().map(|(offset, piece)| self.ret(at + 1 + offset, piece)).collect();
        }

        if trimmed.is_empty() {
            return self.fail(at, "missing return type");
        }
        Ok(vec![self.ret(at, trimmed)?])
    }

    fn ret(&self, at: usize, piece: &str) -> Result<Argument> {
        let (mut arg, rest) = self.typed(at, piece.trim())?;
        let name = rest.trim();
        if !name.is_empty() && !is_identifier(name) {
            return self.fail(at, format!("return name '{name}' is not an identifier"));
        }
        arg.name = name.to_string();
        Ok(arg)
    }

    /// Parse `Type[(alias)][suffixes][(alias)]` from the front of `src`.
    ///
    /// A parenthesized group is an alias annotation only after `Tensor` or a
    /// type variable. After any other name it belongs to the type, as in
    /// `Future(t)` or `Dict(str, t)`.
    fn typed<'a>(&self, at: usize, src: &'a str) -> Result<(Argument, &'a str)> {
        let ident_end = src.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(src.len());
        if ident_end == 0 {
            return self.fail(at, format!("expected a type in '{src}'"));
        }

        let base = &src[..ident_end];
        let aliasable = base == "Tensor" || is_type_variable(base);
        let mut ty = base.to_string();
        let mut rest = &src[ident_end..];
        let mut alias_info = None;

        if rest.starts_with('(') {
            let Some(end) = group_end(rest) else {
                return self.fail(at + ident_end, "unterminated parenthesized type");
            };
            if aliasable {
                alias_info = Some(self.annotation(at + ident_end, &rest[1..end], false)?);
            } else {
                ty.push_str(&rest[..=end]);
            }
            rest = &rest[end + 1..];
        }

        loop {
            if let Some(after) = rest.strip_prefix('?') {
                ty.push('?');
                rest = after;
            } else if rest.starts_with('[') {
                let Some(end) = rest.find(']') else {
                    return self.fail(at, "unterminated list suffix");
                };
                ty.push_str(&rest[..=end]);
                rest = &rest[end + 1..];
            } else if rest.starts_with('(') && aliasable && alias_info.is_none() && ty.ends_with(']') {
                let offset = at + (src.len() - rest.len());
                let Some(end) = group_end(rest) else {
                    return self.fail(offset, "unterminated alias annotation");
                };
                alias_info = Some(self.annotation(offset, &rest[1..end], true)?);
                rest = &rest[end + 1..];
            } else {
                break;
            }
        }

        Ok((Argument { name: String::new(), ty, alias_info, default: None, kwarg_only: false }, rest))
    }

    /// Parse the inside of `(a)`, `(a!)`, `(a -> *)` or `(*)`.
    fn annotation(&self, at: usize, src: &str, on_list: bool) -> Result<AliasInfo> {
        let (before, after) = match src.split_once("->") {
            Some((before, after)) => (before.trim(), Some(after.trim())),
            None => (src.trim(), None),
        };
        let (set, is_write) = match before.strip_suffix('!') {
            Some(set) => (set, true),
            None => (before, false),
        };

        if !is_alias_set(set) {
            return self.fail(at, format!("malformed alias annotation '({src})'"));
        }
        if let Some(after) = after
            && !is_alias_set(after)
        {
            return self.fail(at, format!("malformed alias target in '({src})'"));
        }

        Ok(AliasInfo { set: set.to_string(), is_write, after: after.map(str::to_string), on_list })
    }
}

/// Lowercase type names that are builtins rather than type variables.
const BUILTIN_LOWERCASE_TYPES: [&str; 5] = ["int", "float", "bool", "str", "complex"];

fn is_type_variable(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) && !BUILTIN_LOWERCASE_TYPES.contains(&name)
}

/// `*` or a lowercase alias set name such as `a` or `b1`.
fn is_alias_set(set: &str) -> bool {
    set == "*"
        || (set.starts_with(|c: char| c.is_ascii_lowercase())
            && set.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
}

/// Index of the `)` closing the `(` that `src` starts with.
fn group_end(src: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in src.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside brackets.
fn split_top_level(src: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (idx, c) in src.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push((start, &src[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &src[start..]));
    pieces
}
