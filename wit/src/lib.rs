//! A fully resolved graph of WIT packages, interfaces, worlds and types.
//!
//! The graph is built from the flat JSON document `wasm-tools component wit -j` prints, either read
//! directly ([`decode_json()`], [`load_json()`]) or produced on demand by running the tool
//! ([`load_wit()`], [`decode_wit()`], [`load()`]).

pub mod error;
pub mod function;
pub mod graph;
pub mod interface;
pub mod json;
pub mod load;
pub mod package;
pub mod package_name;
pub mod resolve;
pub mod shared;
pub mod type_def;
pub mod types;
pub mod world;

mod components;

pub use error::{EntityKind, LoadError, Location, ResolveError};
pub use function::{Function, FunctionKind, Results};
pub use graph::{TypeDisplay, TypeGraph};
pub use interface::Interface;
pub use load::{decode_wit, load, load_wit, CancellationToken, WasmTools, WitCompiler, WitInput};
pub use package::Package;
pub use package_name::{PackageName, PackageNameError};
pub use resolve::Resolver;
pub use shared::{Docs, Param};
pub use type_def::{
    Case, Enum, EnumCase, Field, Flag, Flags, Handle, Ownership, Record, ResultType, Stream,
    Tuple, TypeDefinition, TypeDefinitionKind, TypeOwner, Variant,
};
pub use types::{Primitive, Type, UnknownPrimitive};
pub use world::{Direction, World, WorldItem};

pub use components::{Component, ComponentTable, Ref};

use std::io::Read;
use std::path::Path;

use json::Document;

/// Resolves a serialized document held in memory.
pub fn resolve_slice(json: &[u8]) -> Result<TypeGraph, ResolveError> {
    let document = Document::from_slice(json)?;
    Resolver::new(&document).resolve()
}

pub fn resolve_str(json: &str) -> Result<TypeGraph, ResolveError> {
    resolve_slice(json.as_bytes())
}

/// Reads and resolves a serialized document.
pub fn decode_json(reader: impl Read) -> Result<TypeGraph, ResolveError> {
    let document = Document::from_reader(std::io::BufReader::new(reader))?;
    Resolver::new(&document).resolve()
}

/// Reads and resolves the serialized document stored at `path`.
pub fn load_json(path: impl AsRef<Path>) -> Result<TypeGraph, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(resolve_slice(&bytes)?)
}
