use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::num::NonZeroU32;

use super::{EntityKind, Interface, Package, TypeDefinition, TypeGraph, World};

/// Trait implemented by all entities stored in a [`TypeGraph`].
pub trait Component {
    const DISPLAY_NAME: &'static str;
    const ENTITY_KIND: EntityKind;
}

/// Carrier for the arena plumbing of each [`Component`], kept off the public component types.
pub struct ComponentTraits;

/// Maps a component type to its arena in either kind of table.
pub trait HasArenaContainer<R: Component>: Sized {
    fn get_container_from_construction_table(table: &ConstructionTable) -> &[R];
    fn get_container_from_construction_table_mut(table: &mut ConstructionTable) -> &mut Vec<R>;
    fn get_container_from_graph(graph: &TypeGraph) -> &[R];
}

/// A non-owning reference to a [`Component`] stored in a [`ComponentTable`].
///
/// Refs are plain indices: they never keep the referenced component alive on their own, and
/// comparing two refs compares their positions in the (topologically ordered) arena.
pub struct Ref<R>(NonZeroU32, PhantomData<R>)
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>;

impl<R> Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    /// Creates a ref for the zero-based `index`. Returns `None` if the index does not fit into
    /// the 32-bit id space.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        let id = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(id).map(|id| Self(id, PhantomData))
    }

    /// The zero-based position of the component in its arena.
    pub fn index(self) -> usize {
        // u32 -> usize is lossless on every supported target
        self.0.get() as usize - 1
    }

    pub fn get(self, table: &impl ComponentTable) -> &R {
        table.get(self)
    }
}

// Deriving would put bounds on R itself (which only appears in PhantomData), so the traits are
// implemented by hand.

impl<R> Copy for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
}

impl<R> Clone for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> fmt::Debug for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{} #{}>", R::DISPLAY_NAME, self.index())
    }
}

impl<R> PartialEq for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R> Eq for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
}

impl<R> PartialOrd for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> Ord for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<R> Hash for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// An arena-like container for the [`Component`]s of a resolved graph
pub trait ComponentTable {
    /// Retrieves a component by reference, or `None` if the table holds no such component (yet).
    fn try_get<R>(&self, ref_: Ref<R>) -> Option<&R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>;

    /// Dereferences `ref_`. Panics if the ref points past the end of this table, i.e. it was
    /// handed out by a different graph.
    fn get<R>(&self, ref_: Ref<R>) -> &R
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        self.try_get(ref_)
            .expect("component reference out of bounds")
    }
}

/// The [component table](ComponentTable) implementation that is used while a graph is being
/// resolved.
///
/// Components are appended in materialization order; a component is only ever pushed after all
/// of its hard dependencies, so the number of materialized components of a kind is exactly the
/// bound below which refs of that kind may be followed.
#[derive(Default)]
pub struct ConstructionTable {
    packages: Vec<Package>,
    interfaces: Vec<Interface>,
    worlds: Vec<World>,
    type_definitions: Vec<TypeDefinition>,
}

impl ComponentTable for ConstructionTable {
    fn try_get<R>(&self, ref_: Ref<R>) -> Option<&R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        ComponentTraits::get_container_from_construction_table(self).get(ref_.index())
    }
}

impl ConstructionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `value` and returns its ref.
    pub(crate) fn push<R>(&mut self, value: R) -> Ref<R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let container = ComponentTraits::get_container_from_construction_table_mut(self);
        let ref_ = Ref::from_index(container.len()).expect("ID did not fit into 32-bit integer");
        container.push(value);
        ref_
    }

    /// Number of components of kind `R` materialized so far.
    pub(crate) fn materialized<R>(&self) -> usize
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        ComponentTraits::get_container_from_construction_table(self).len()
    }

    /// Freezes the table into the read-only storage of a [`TypeGraph`].
    pub(crate) fn into_containers(self) -> Containers {
        Containers {
            packages: self.packages.into_boxed_slice(),
            interfaces: self.interfaces.into_boxed_slice(),
            worlds: self.worlds.into_boxed_slice(),
            type_definitions: self.type_definitions.into_boxed_slice(),
        }
    }
}

/// The frozen arenas of a [`TypeGraph`].
///
/// Since the graph is read-only, the components are stored in boxed slices, which reduces the
/// struct's size by one pointer per component type compared to the `Vec`-storage used in the
/// [`ConstructionTable`].
#[derive(Debug)]
pub(crate) struct Containers {
    pub(crate) packages: Box<[Package]>,
    pub(crate) interfaces: Box<[Interface]>,
    pub(crate) worlds: Box<[World]>,
    pub(crate) type_definitions: Box<[TypeDefinition]>,
}

macro_rules! has_arena_container_impl {
    ($type_name:ty, $field_name:ident) => {
        impl HasArenaContainer<$type_name> for ComponentTraits {
            fn get_container_from_construction_table(table: &ConstructionTable) -> &[$type_name] {
                &table.$field_name
            }

            fn get_container_from_construction_table_mut(
                table: &mut ConstructionTable,
            ) -> &mut Vec<$type_name> {
                &mut table.$field_name
            }

            fn get_container_from_graph(graph: &TypeGraph) -> &[$type_name] {
                &graph.containers().$field_name
            }
        }
    };
}

has_arena_container_impl!(Package, packages);
has_arena_container_impl!(Interface, interfaces);
has_arena_container_impl!(World, worlds);
has_arena_container_impl!(TypeDefinition, type_definitions);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Docs, TypeDefinitionKind, TypeOwner};

    fn resource(name: &str) -> TypeDefinition {
        TypeDefinition {
            name: Some(name.into()),
            kind: TypeDefinitionKind::Resource,
            owner: TypeOwner::None,
            docs: Docs::default(),
        }
    }

    #[test]
    fn refs_are_zero_based_and_ordered() {
        let mut table = ConstructionTable::new();
        let first = table.push(resource("a"));
        let second = table.push(resource("b"));

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert!(first < second);
        assert_eq!(table.materialized::<TypeDefinition>(), 2);
        assert_eq!(table.materialized::<Interface>(), 0);
        assert_eq!(second.get(&table).name.as_deref(), Some("b"));
    }

    #[test]
    fn try_get_rejects_unmaterialized_refs() {
        let table = ConstructionTable::new();
        let dangling = Ref::<TypeDefinition>::from_index(3).unwrap();
        assert!(table.try_get(dangling).is_none());
    }

    #[test]
    fn debug_output_names_the_component() {
        let ref_ = Ref::<Interface>::from_index(7).unwrap();
        assert_eq!(format!("{ref_:?}"), "<Interface #7>");
    }
}
