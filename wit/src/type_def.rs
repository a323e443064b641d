use super::{
    components::{Component, ComponentTable},
    Docs, EntityKind, Interface, Ref, Type, World,
};

/// Entity: Type Definition, a named or anonymous type classified by exactly one
/// [kind](TypeDefinitionKind).
#[derive(Clone, Debug)]
pub struct TypeDefinition {
    pub name: Option<String>,
    pub kind: TypeDefinitionKind,
    pub owner: TypeOwner,
    pub docs: Docs,
}

impl Component for TypeDefinition {
    const DISPLAY_NAME: &'static str = "TypeDefinition";
    const ENTITY_KIND: EntityKind = EntityKind::TypeDefinition;
}

impl TypeDefinition {
    pub fn is_resource(&self) -> bool {
        matches!(self.kind, TypeDefinitionKind::Resource)
    }

    /// If this definition is a plain alias, the type it aliases.
    pub fn alias_of(&self) -> Option<Type> {
        match self.kind {
            TypeDefinitionKind::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

/// The entity a [`TypeDefinition`] belongs to. Anonymous types such as `list<u8>` often have no
/// owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOwner {
    World(Ref<World>),
    Interface(Ref<Interface>),
    None,
}

impl TypeOwner {
    pub fn world(self) -> Option<Ref<World>> {
        match self {
            Self::World(w) => Some(w),
            _ => None,
        }
    }

    pub fn interface(self) -> Option<Ref<Interface>> {
        match self {
            Self::Interface(i) => Some(i),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDefinitionKind {
    Record(Record),
    /// Opaque; only reachable through a [`Handle`].
    Resource,
    Handle(Handle),
    Flags(Flags),
    Tuple(Tuple),
    Variant(Variant),
    Enum(Enum),
    Option(Type),
    Result(ResultType),
    List(Type),
    Future(Option<Type>),
    Stream(Stream),
    /// A direct alias to another type, e.g. created by `use` or `type x = y`.
    Type(Type),
}

impl TypeDefinitionKind {
    /// The lowercase name of the kind, as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Resource => "resource",
            Self::Handle(Handle::Owned(_)) => "own",
            Self::Handle(Handle::Borrowed(_)) => "borrow",
            Self::Flags(_) => "flags",
            Self::Tuple(_) => "tuple",
            Self::Variant(_) => "variant",
            Self::Enum(_) => "enum",
            Self::Option(_) => "option",
            Self::Result(_) => "result",
            Self::List(_) => "list",
            Self::Future(_) => "future",
            Self::Stream(_) => "stream",
            Self::Type(_) => "type",
        }
    }

    /// Every type directly referenced by this kind, in declaration order. Handle targets are
    /// included as [`Type::Defined`].
    pub fn referenced_types(&self) -> Vec<Type> {
        match self {
            Self::Record(r) => r.fields.iter().map(|f| f.ty).collect(),
            Self::Resource | Self::Flags(_) | Self::Enum(_) => Vec::new(),
            Self::Handle(h) => vec![Type::Defined(h.resource())],
            Self::Tuple(t) => t.types.clone(),
            Self::Variant(v) => v.cases.iter().filter_map(|c| c.ty).collect(),
            Self::Option(ty) | Self::List(ty) | Self::Type(ty) => vec![*ty],
            Self::Result(r) => r.ok.into_iter().chain(r.err).collect(),
            Self::Future(ty) => ty.iter().copied().collect(),
            Self::Stream(s) => s.element.into_iter().chain(s.end).collect(),
        }
    }
}

/// Bag of named fields, akin to a struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub docs: Docs,
}

/// An owned or borrowed handle to a resource. The target always resolves to a
/// [resource](TypeDefinitionKind::Resource), possibly through aliases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    Owned(Ref<TypeDefinition>),
    Borrowed(Ref<TypeDefinition>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    Owned,
    Borrowed,
}

impl Handle {
    pub fn resource(self) -> Ref<TypeDefinition> {
        match self {
            Self::Owned(r) | Self::Borrowed(r) => r,
        }
    }

    pub fn ownership(self) -> Ownership {
        match self {
            Self::Owned(_) => Ownership::Owned,
            Self::Borrowed(_) => Ownership::Borrowed,
        }
    }
}

/// A bitfield; the position of a flag is its bit index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flags {
    pub flags: Vec<Flag>,
}

impl Flags {
    pub fn bit(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub docs: Docs,
}

/// Ordered, fixed-length sequence of unnamed values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tuple {
    pub types: Vec<Type>,
}

/// Tagged union; each case may carry a payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variant {
    pub cases: Vec<Case>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub name: String,
    pub ty: Option<Type>,
    pub docs: Docs,
}

/// A [`Variant`] whose cases carry no data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enum {
    pub cases: Vec<EnumCase>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumCase {
    pub name: String,
    pub docs: Docs,
}

/// `result<ok, err>`; either side may be absent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResultType {
    pub ok: Option<Type>,
    pub err: Option<Type>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stream {
    pub element: Option<Type>,
    pub end: Option<Type>,
}

/// Follows alias definitions (`TypeDefinitionKind::Type(Type::Defined(..))`) starting at `start`
/// and returns the first definition that is not such an alias.
///
/// Only aliases pointing to earlier definitions are followed, which is all a resolved graph
/// contains; this also bounds the walk. `None` is returned if a ref along the way is not present
/// in `table`.
pub(crate) fn follow_aliases(
    start: Ref<TypeDefinition>,
    table: &impl ComponentTable,
) -> Option<Ref<TypeDefinition>> {
    let mut current = start;
    loop {
        match table.try_get(current)?.alias_of() {
            Some(Type::Defined(next)) if next < current => current = next,
            _ => return Some(current),
        }
    }
}
