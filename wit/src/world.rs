use indexmap::IndexMap;

use super::{
    components::Component, Docs, EntityKind, Function, Interface, Package, Ref, TypeDefinition,
};

/// Entity: World, the imports and exports describing a component's external contract.
///
/// Import and export names are each unique, but the same name may appear on both sides.
#[derive(Clone, Debug)]
pub struct World {
    pub name: String,
    pub imports: IndexMap<String, WorldItem>,
    pub exports: IndexMap<String, WorldItem>,
    pub package: Ref<Package>,
    pub docs: Docs,
}

impl Component for World {
    const DISPLAY_NAME: &'static str = "World";
    const ENTITY_KIND: EntityKind = EntityKind::World;
}

/// Anything a world can import or export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldItem {
    Interface(Ref<Interface>),
    TypeDefinition(Ref<TypeDefinition>),
    Function(Function),
}

impl WorldItem {
    pub fn interface(&self) -> Option<Ref<Interface>> {
        match self {
            Self::Interface(i) => Some(*i),
            _ => None,
        }
    }

    pub fn type_definition(&self) -> Option<Ref<TypeDefinition>> {
        match self {
            Self::TypeDefinition(t) => Some(*t),
            _ => None,
        }
    }

    pub fn function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// Whether a [`WorldItem`] is imported or exported.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Import,
    Export,
}

impl World {
    /// All items of the world, imports first.
    pub fn items(&self) -> impl Iterator<Item = (Direction, &str, &WorldItem)> {
        let imports = self
            .imports
            .iter()
            .map(|(name, item)| (Direction::Import, name.as_str(), item));
        let exports = self
            .exports
            .iter()
            .map(|(name, item)| (Direction::Export, name.as_str(), item));
        imports.chain(exports)
    }

    /// Functions imported or exported directly by the world, imports first.
    pub fn functions(&self) -> impl Iterator<Item = (Direction, &Function)> {
        self.items()
            .filter_map(|(direction, _, item)| item.function().map(|f| (direction, f)))
    }
}
