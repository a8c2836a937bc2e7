use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use ulid::Ulid;

///
/// Value
///
/// Tagged runtime value for one mapped attribute. The tag travels with the
/// encoded bytes so decoding can dispatch on the declared attribute kind
/// instead of inspecting the stored representation.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Ulid(Ulid),
}

impl Value {
    /// Project the declared-kind tag of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Unit => FieldKind::Unit,
            Self::Bool(_) => FieldKind::Bool,
            Self::Int(_) => FieldKind::Int,
            Self::Uint(_) => FieldKind::Uint,
            Self::Float(_) => FieldKind::Float,
            Self::Text(_) => FieldKind::Text,
            Self::Bytes(_) => FieldKind::Bytes,
            Self::Ulid(_) => FieldKind::Ulid,
        }
    }

    /// Render this value as a column or group name.
    ///
    /// Only kinds with a canonical, unambiguous textual form qualify;
    /// floats and byte blobs do not name columns.
    #[must_use]
    pub fn as_name(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Ulid(u) => Some(u.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Uint(u) => Some(u.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Unit | Self::Float(_) | Self::Bytes(_) => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "bytes[{}]", b.len()),
            Self::Ulid(u) => write!(f, "{u}"),
        }
    }
}

///
/// FieldKind
///
/// Declared semantic kind of a mapped attribute. Used to pick the decode
/// target for stored bytes and to reject tag mismatches.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    Unit,
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Bytes,
    Ulid,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Ulid => "ulid",
        };
        write!(f, "{label}")
    }
}
