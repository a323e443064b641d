use std::collections::HashMap;
use std::fmt;

use super::{
    components::{ComponentTable, ComponentTraits, Containers, HasArenaContainer},
    type_def::follow_aliases,
    Component, Function, Handle, Interface, Package, PackageName, Ref, Type, TypeDefinition,
    TypeDefinitionKind, World,
};

/// A fully resolved, immutable set of WIT packages.
///
/// All four collections are in topological order: a type definition only refers to type
/// definitions before it. Every cross reference is a [`Ref`] into this graph, and every entity
/// carries a back-link to its owner. There is no way to mutate a graph once it is built, so it can
/// be shared between threads without synchronization.
#[derive(Debug)]
pub struct TypeGraph {
    containers: Containers,
    packages_by_name: HashMap<PackageName, Ref<Package>>,
}

impl ComponentTable for TypeGraph {
    fn try_get<R>(&self, ref_: Ref<R>) -> Option<&R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        ComponentTraits::get_container_from_graph(self).get(ref_.index())
    }
}

fn enumerate<R>(items: &[R]) -> impl Iterator<Item = (Ref<R>, &R)>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| Ref::from_index(index).map(|ref_| (ref_, item)))
}

impl TypeGraph {
    pub(crate) fn new(
        containers: Containers,
        packages_by_name: HashMap<PackageName, Ref<Package>>,
    ) -> Self {
        Self {
            containers,
            packages_by_name,
        }
    }

    pub(crate) fn containers(&self) -> &Containers {
        &self.containers
    }

    pub fn packages(&self) -> impl Iterator<Item = (Ref<Package>, &Package)> {
        enumerate(&self.containers.packages)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = (Ref<Interface>, &Interface)> {
        enumerate(&self.containers.interfaces)
    }

    pub fn worlds(&self) -> impl Iterator<Item = (Ref<World>, &World)> {
        enumerate(&self.containers.worlds)
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = (Ref<TypeDefinition>, &TypeDefinition)> {
        enumerate(&self.containers.type_definitions)
    }

    pub fn package_by_name(&self, name: &PackageName) -> Option<Ref<Package>> {
        self.packages_by_name.get(name).copied()
    }

    /// Like [`Self::package_by_name()`], but parses `name` first. Unparseable names match nothing.
    pub fn package_by_str(&self, name: &str) -> Option<Ref<Package>> {
        self.package_by_name(&name.parse().ok()?)
    }

    pub fn interface(&self, package: Ref<Package>, name: &str) -> Option<Ref<Interface>> {
        self.try_get(package)?.interface(name)
    }

    pub fn world(&self, package: Ref<Package>, name: &str) -> Option<Ref<World>> {
        self.try_get(package)?.world(name)
    }

    /// Looks up an interface by its qualified name, e.g. `wasi:io/streams@0.2.0`.
    pub fn interface_by_qualified_name(&self, qualified: &str) -> Option<Ref<Interface>> {
        let (package, rest) = qualified.split_once('/')?;
        let (interface, version) = match rest.split_once('@') {
            Some((interface, version)) => (interface, Some(version)),
            None => (rest, None),
        };
        let package = match version {
            Some(version) => self.package_by_str(&format!("{package}@{version}"))?,
            None => self.package_by_str(package)?,
        };
        self.interface(package, interface)
    }

    /// The qualified name of a named interface, e.g. `wasi:io/streams@0.2.0`.
    pub fn qualified_interface_name(&self, interface: Ref<Interface>) -> Option<String> {
        let interface = self.try_get(interface)?;
        let name = interface.name.as_deref()?;
        let package = &self.get(interface.package).name;
        let mut qualified = format!("{}/{}", package.unversioned(), name);
        if let Some(version) = &package.version {
            qualified.push('@');
            qualified.push_str(&version.to_string());
        }
        Some(qualified)
    }

    /// Panics if `ref_` was handed out by a different graph.
    pub fn type_definition(&self, ref_: Ref<TypeDefinition>) -> &TypeDefinition {
        self.get(ref_)
    }

    /// Functions of `interface` in declaration order. Panics if `interface` belongs to another
    /// graph.
    pub fn interface_functions(&self, interface: Ref<Interface>) -> impl Iterator<Item = &Function> {
        self.get(interface).functions.values()
    }

    /// Follows alias definitions until reaching a definition that is not a plain alias of
    /// another definition.
    pub fn underlying(&self, ref_: Ref<TypeDefinition>) -> Ref<TypeDefinition> {
        follow_aliases(ref_, self).unwrap_or(ref_)
    }

    pub fn underlying_kind(&self, ref_: Ref<TypeDefinition>) -> &TypeDefinitionKind {
        &self.get(self.underlying(ref_)).kind
    }

    /// Renders a type the way it would be written in WIT, for diagnostics.
    pub fn display_type(&self, ty: Type) -> TypeDisplay<'_> {
        TypeDisplay {
            graph: self,
            ty,
            expand: false,
        }
    }

    /// Like [`Self::display_type()`], but renders the structure of a named definition instead of
    /// its name, e.g. `list<u8>` for `type bytes = list<u8>`. Nominal kinds such as records only
    /// render their keyword.
    pub fn display_definition(&self, ref_: Ref<TypeDefinition>) -> TypeDisplay<'_> {
        TypeDisplay {
            graph: self,
            ty: Type::Defined(ref_),
            expand: true,
        }
    }

    pub fn package_count(&self) -> usize {
        self.containers.packages.len()
    }

    pub fn interface_count(&self) -> usize {
        self.containers.interfaces.len()
    }

    pub fn world_count(&self) -> usize {
        self.containers.worlds.len()
    }

    pub fn type_definition_count(&self) -> usize {
        self.containers.type_definitions.len()
    }
}

/// See [`TypeGraph::display_type()`]
pub struct TypeDisplay<'a> {
    graph: &'a TypeGraph,
    ty: Type,
    /// Render the outermost definition structurally even if it has a name
    expand: bool,
}

impl TypeDisplay<'_> {
    fn nested(&self, ty: Type) -> Self {
        Self {
            graph: self.graph,
            ty,
            expand: false,
        }
    }

    fn optional(&self, ty: Option<Type>) -> Option<Self> {
        ty.map(|ty| self.nested(ty))
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ref_ = match self.ty {
            Type::Primitive(p) => return write!(f, "{p}"),
            Type::Defined(ref_) => ref_,
        };
        let Some(def) = self.graph.try_get(ref_) else {
            return write!(f, "{ref_:?}");
        };
        match &def.name {
            Some(name) if !self.expand => return f.write_str(name),
            _ => {}
        }
        match &def.kind {
            TypeDefinitionKind::List(ty) => write!(f, "list<{}>", self.nested(*ty)),
            TypeDefinitionKind::Option(ty) => write!(f, "option<{}>", self.nested(*ty)),
            TypeDefinitionKind::Result(r) => match (self.optional(r.ok), self.optional(r.err)) {
                (Some(ok), Some(err)) => write!(f, "result<{ok}, {err}>"),
                (Some(ok), None) => write!(f, "result<{ok}>"),
                (None, Some(err)) => write!(f, "result<_, {err}>"),
                (None, None) => f.write_str("result"),
            },
            TypeDefinitionKind::Tuple(t) => {
                f.write_str("tuple<")?;
                for (i, ty) in t.types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.nested(*ty))?;
                }
                f.write_str(">")
            }
            TypeDefinitionKind::Handle(h) => {
                let keyword = match h {
                    Handle::Owned(_) => "own",
                    Handle::Borrowed(_) => "borrow",
                };
                write!(f, "{keyword}<{}>", self.nested(Type::Defined(h.resource())))
            }
            TypeDefinitionKind::Future(ty) => match self.optional(*ty) {
                Some(ty) => write!(f, "future<{ty}>"),
                None => f.write_str("future"),
            },
            TypeDefinitionKind::Stream(s) => match (self.optional(s.element), self.optional(s.end)) {
                (Some(element), Some(end)) => write!(f, "stream<{element}, {end}>"),
                (Some(element), None) => write!(f, "stream<{element}>"),
                (None, Some(end)) => write!(f, "stream<_, {end}>"),
                (None, None) => f.write_str("stream"),
            },
            TypeDefinitionKind::Type(ty) => write!(f, "{}", self.nested(*ty)),
            kind @ (TypeDefinitionKind::Record(_)
            | TypeDefinitionKind::Resource
            | TypeDefinitionKind::Flags(_)
            | TypeDefinitionKind::Variant(_)
            | TypeDefinitionKind::Enum(_)) => match def.name {
                Some(_) => f.write_str(kind.name()),
                None => write!(f, "<anonymous {} #{}>", kind.name(), ref_.index()),
            },
        }
    }
}
