use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use super::PackageNameError;

/// The kind of entity a diagnostic refers to, which is also the collection an index points into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Package,
    Interface,
    World,
    TypeDefinition,
}

impl EntityKind {
    /// The name of the top-level array holding this kind in the serialized document.
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Package => "packages",
            Self::Interface => "interfaces",
            Self::World => "worlds",
            Self::TypeDefinition => "types",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Package => "package",
            Self::Interface => "interface",
            Self::World => "world",
            Self::TypeDefinition => "type",
        })
    }
}

/// Where in the serialized document a problem was found: an entity and a field path within it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub entity: EntityKind,
    pub index: usize,
    /// Human readable path, e.g. `kind.record.fields[1] ("b").type`
    pub field: String,
}

impl Location {
    pub fn new(entity: EntityKind, index: usize, field: impl Into<String>) -> Self {
        Self {
            entity,
            index,
            field: field.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.entity, self.index)?;
        if !self.field.is_empty() {
            write!(f, ", field {}", self.field)?;
        }
        Ok(())
    }
}

/// Failure to turn a serialized document into a [`TypeGraph`](crate::TypeGraph).
///
/// Resolution stops at the first problem; no part of the graph is returned alongside an error.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    /// The index does not address a materialized entity. `available` is the number of entities
    /// that could be referenced at this point: the collection length, or for references between
    /// type definitions the position of the referencing type.
    #[error("{location}: {} index {index} is out of range ({available} available)", .target.collection())]
    IndexOutOfRange {
        location: Location,
        target: EntityKind,
        index: usize,
        available: usize,
    },

    #[error("{location}: handle target type #{target} is a {kind}, not a resource")]
    InvalidHandleTarget {
        location: Location,
        target: usize,
        kind: &'static str,
    },

    #[error("{location}: invalid package name {name:?}")]
    InvalidPackageName {
        location: Location,
        name: String,
        #[source]
        source: PackageNameError,
    },

    #[error("{location}: expected {expected}, found {found}")]
    OwnerMismatch {
        location: Location,
        expected: String,
        found: String,
    },

    #[error("{location}: duplicate name {name:?}")]
    DuplicateName { location: Location, name: String },
}

/// Failure to produce a [`TypeGraph`](crate::TypeGraph) from WIT source or a serialized file.
///
/// Errors of the external compiler are kept apart from [resolution errors](ResolveError).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("exactly one of a source path or a source reader must be provided")]
    InputConflict,

    #[error("executable {tool:?} was not found in PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} failed ({status}):\n{stderr}")]
    ToolExecutionFailure {
        tool: String,
        status: ExitStatus,
        /// Diagnostics printed by the tool, verbatim
        stderr: String,
    },

    #[error("I/O error while running {tool}")]
    ToolIo {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    TimedOut {
        tool: String,
        timeout: std::time::Duration,
    },

    #[error("{tool} was cancelled")]
    Cancelled { tool: String },

    #[error("could not read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_errors_name_the_field_and_index() {
        let error = ResolveError::IndexOutOfRange {
            location: Location::new(
                EntityKind::TypeDefinition,
                0,
                r#"kind.record.fields[0] ("x").type"#,
            ),
            target: EntityKind::TypeDefinition,
            index: 5,
            available: 3,
        };
        assert_eq!(
            error.to_string(),
            r#"type #0, field kind.record.fields[0] ("x").type: types index 5 is out of range (3 available)"#
        );
    }

    #[test]
    fn locations_without_field_omit_it() {
        let location = Location::new(EntityKind::Package, 2, "");
        assert_eq!(location.to_string(), "package #2");
    }
}
