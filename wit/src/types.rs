use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

use super::{Ref, TypeDefinition};

/// A built-in WIT value type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    S8,
    U8,
    S16,
    U16,
    S32,
    U32,
    S64,
    U64,
    F32,
    F64,
    /// A Unicode scalar value
    Char,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 13] = [
        Self::Bool,
        Self::S8,
        Self::U8,
        Self::S16,
        Self::U16,
        Self::S32,
        Self::U32,
        Self::S64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Char,
        Self::String,
    ];

    /// The canonical name, as written in WIT and in the resolved JSON form.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::S8 => "s8",
            Self::U8 => "u8",
            Self::S16 => "s16",
            Self::U16 => "u16",
            Self::S32 => "s32",
            Self::U32 => "u32",
            Self::S64 => "s64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
        }
    }

    /// Looks up a primitive by name. Besides the canonical names, the spellings `float32` and
    /// `float64` used by older toolchains are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        PRIMITIVES_BY_NAME.get(name).copied()
    }
}

lazy_static! {
    static ref PRIMITIVES_BY_NAME: HashMap<&'static str, Primitive> = {
        let mut table: HashMap<_, _> = Primitive::ALL.iter().map(|p| (p.name(), *p)).collect();
        table.insert("float32", Primitive::F32);
        table.insert("float64", Primitive::F64);
        table
    };
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown primitive type {0:?}")]
pub struct UnknownPrimitive(pub String);

impl FromStr for Primitive {
    type Err = UnknownPrimitive;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownPrimitive(s.into()))
    }
}

/// A type in reference position: either a primitive or a link to a [`TypeDefinition`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(Primitive),
    Defined(Ref<TypeDefinition>),
}

impl Type {
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            Self::Defined(_) => None,
        }
    }

    pub fn defined(self) -> Option<Ref<TypeDefinition>> {
        match self {
            Self::Defined(d) => Some(d),
            Self::Primitive(_) => None,
        }
    }
}

impl From<Primitive> for Type {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<Ref<TypeDefinition>> for Type {
    fn from(d: Ref<TypeDefinition>) -> Self {
        Self::Defined(d)
    }
}
