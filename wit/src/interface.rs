use indexmap::IndexMap;

use super::{components::Component, Docs, EntityKind, Function, Package, Ref, TypeDefinition};

/// Entity: Interface, a collection of type definitions and functions shared between components.
///
/// Interfaces declared inline in a world have no name.
#[derive(Clone, Debug)]
pub struct Interface {
    pub name: Option<String>,
    pub type_definitions: IndexMap<String, Ref<TypeDefinition>>,
    pub functions: IndexMap<String, Function>,
    pub package: Ref<Package>,
    pub docs: Docs,
}

impl Component for Interface {
    const DISPLAY_NAME: &'static str = "Interface";
    const ENTITY_KIND: EntityKind = EntityKind::Interface;
}

impl Interface {
    pub fn type_definition(&self, name: &str) -> Option<Ref<TypeDefinition>> {
        self.type_definitions.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }
}
