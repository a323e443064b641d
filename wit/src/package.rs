use indexmap::IndexMap;

use super::{components::Component, Docs, EntityKind, Interface, PackageName, Ref, World};

/// Entity: Package, a namespaced and optionally versioned unit of interfaces and worlds.
#[derive(Clone, Debug)]
pub struct Package {
    pub name: PackageName,
    pub interfaces: IndexMap<String, Ref<Interface>>,
    pub worlds: IndexMap<String, Ref<World>>,
    pub docs: Docs,
}

impl Component for Package {
    const DISPLAY_NAME: &'static str = "Package";
    const ENTITY_KIND: EntityKind = EntityKind::Package;
}

impl Package {
    pub fn interface(&self, name: &str) -> Option<Ref<Interface>> {
        self.interfaces.get(name).copied()
    }

    pub fn world(&self, name: &str) -> Option<Ref<World>> {
        self.worlds.get(name).copied()
    }
}
