//! The flat, index-addressed form emitted by `wasm-tools component wit -j`.
//!
//! These types only describe the shape of the document; indices are checked and linked by the
//! [resolver](crate::resolve). Unknown fields are ignored so that additions to the tool's output do
//! not break decoding, while missing required fields are errors.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::Primitive;

#[derive(Clone, Debug, Deserialize)]
pub struct Document {
    pub worlds: Vec<RawWorld>,
    pub interfaces: Vec<RawInterface>,
    pub types: Vec<RawTypeDefinition>,
    pub packages: Vec<RawPackage>,
}

impl Document {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawDocs {
    #[serde(default)]
    pub contents: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawPackage {
    pub name: String,
    pub interfaces: NameMap<usize>,
    pub worlds: NameMap<usize>,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawInterface {
    #[serde(deserialize_with = "Option::deserialize")]
    pub name: Option<String>,
    pub types: NameMap<usize>,
    pub functions: NameMap<RawFunction>,
    pub package: usize,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawWorld {
    pub name: String,
    pub imports: NameMap<RawWorldItem>,
    pub exports: NameMap<RawWorldItem>,
    pub package: usize,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawWorldItem {
    Interface(RawInterfaceRef),
    Function(RawFunction),
    Type(usize),
}

/// Older tools emit a bare index, newer ones an object carrying the index and stability
/// information.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawInterfaceRef {
    Index(usize),
    Detailed { id: usize },
}

impl RawInterfaceRef {
    pub fn index(self) -> usize {
        match self {
            Self::Index(id) | Self::Detailed { id } => id,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawTypeDefinition {
    #[serde(deserialize_with = "Option::deserialize")]
    pub name: Option<String>,
    pub kind: RawTypeDefinitionKind,
    #[serde(deserialize_with = "Option::deserialize")]
    pub owner: Option<RawOwner>,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawOwner {
    World(usize),
    Interface(usize),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawTypeDefinitionKind {
    Record(RawRecord),
    Resource,
    Handle(RawHandle),
    Flags(RawFlags),
    Tuple(RawTuple),
    Variant(RawVariant),
    Enum(RawEnum),
    Option(RawType),
    Result(RawResult),
    List(RawType),
    Future(Option<RawType>),
    Stream(RawStream),
    Type(RawType),
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawRecord {
    pub fields: Vec<RawField>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawHandle {
    Own(usize),
    Borrow(usize),
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawFlags {
    pub flags: Vec<RawFlag>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawFlag {
    pub name: String,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawTuple {
    pub types: Vec<RawType>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawVariant {
    pub cases: Vec<RawCase>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawCase {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<RawType>,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawEnum {
    pub cases: Vec<RawEnumCase>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawEnumCase {
    pub name: String,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct RawResult {
    #[serde(deserialize_with = "Option::deserialize")]
    pub ok: Option<RawType>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub err: Option<RawType>,
}

/// `{"element": .., "end": ..}` in older output, a bare element type in newer output.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawStream {
    Parts {
        element: Option<RawType>,
        end: Option<RawType>,
    },
    Element(Option<RawType>),
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawFunction {
    pub name: String,
    pub kind: RawFunctionKind,
    pub params: Vec<RawParam>,
    /// Older output: a list of results, named or a single unnamed one
    #[serde(default)]
    pub results: Option<Vec<RawResultParam>>,
    /// Newer output: at most one anonymous result
    #[serde(default)]
    pub result: Option<RawType>,
    #[serde(default)]
    pub docs: RawDocs,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawFunctionKind {
    Freestanding,
    Method(usize),
    Static(usize),
    Constructor(usize),
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawResultParam {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: RawType,
}

/// A type in reference position: a primitive given by name, or an index into `types`.
///
/// Primitive names are looked up while decoding, so an unknown name is reported together with its
/// position in the document.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RawType {
    Primitive(Primitive),
    Index(usize),
}

impl<'de> Deserialize<'de> for RawType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawTypeVisitor;

        impl<'de> Visitor<'de> for RawTypeVisitor {
            type Value = RawType;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a primitive type name or a non-negative type index")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawType, E> {
                Primitive::from_name(v)
                    .map(RawType::Primitive)
                    .ok_or_else(|| E::custom(format!("unknown primitive type {v:?}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawType, E> {
                usize::try_from(v)
                    .map(RawType::Index)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawType, E> {
                match u64::try_from(v) {
                    Ok(v) => self.visit_u64(v),
                    Err(_) => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
                }
            }
        }

        deserializer.deserialize_any(RawTypeVisitor)
    }
}

/// An insertion-ordered JSON object whose keys must be unique.
///
/// `serde_json` would otherwise let a repeated key silently replace the earlier entry.
#[derive(Clone, Debug)]
pub struct NameMap<T>(pub IndexMap<String, T>);

impl<T> Default for NameMap<T> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<T> NameMap<T> {
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NameMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NameMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for NameMapVisitor<T> {
            type Value = NameMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map with unique names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<NameMap<T>, A::Error> {
                let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, T>()? {
                    if map.contains_key(&name) {
                        return Err(de::Error::custom(format!("duplicate name {name:?}")));
                    }
                    map.insert(name, value);
                }
                Ok(NameMap(map))
            }
        }

        deserializer.deserialize_map(NameMapVisitor(PhantomData))
    }
}
