//! Turns a decoded [`Document`] into a [`TypeGraph`].
//!
//! Entities are materialized in a fixed order (type definitions, interfaces, worlds, packages) into
//! a [`ConstructionTable`]. A reference to an entity is only followed once that entity exists:
//! type definitions may only refer to earlier type definitions, interfaces and worlds may refer to
//! every type definition, and so on. Back-links to owners only need to be in bounds. The first
//! problem aborts the whole resolution; the partially filled table is dropped with it.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::de::Error as _;
use tracing::{debug, trace};

use super::{
    components::{
        Component, ComponentTable, ComponentTraits, ConstructionTable, HasArenaContainer,
    },
    json::{
        Document, NameMap, RawDocs, RawFunction, RawFunctionKind, RawHandle, RawInterface, RawOwner,
        RawPackage, RawStream, RawType, RawTypeDefinition, RawTypeDefinitionKind, RawWorld,
        RawWorldItem,
    },
    type_def::follow_aliases,
    Case, Docs, EntityKind, Enum, EnumCase, Field, Flag, Flags, Function, FunctionKind, Handle,
    Interface, Location, Package, PackageName, Param, Record, Ref, ResolveError, ResultType,
    Results, Stream, Tuple, Type, TypeDefinition, TypeDefinitionKind, TypeGraph, TypeOwner,
    Variant, World, WorldItem,
};

/// How a reference relates to the entity holding it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dependency {
    /// The target must already be materialized.
    Hard,
    /// A link back to an owner, which is materialized later. Only checked for bounds.
    BackLink,
}

/// The entity currently being materialized.
#[derive(Copy, Clone, Debug)]
struct Site {
    entity: EntityKind,
    index: usize,
}

impl Site {
    fn new(entity: EntityKind, index: usize) -> Self {
        Self { entity, index }
    }

    fn at(self, field: impl Into<String>) -> Location {
        Location::new(self.entity, self.index, field)
    }
}

fn docs(raw: &RawDocs) -> Docs {
    Docs {
        contents: raw.contents.clone(),
    }
}

/// A structural problem serde cannot express, reported like any other decode error.
fn malformed(location: Location, message: &str) -> ResolveError {
    ResolveError::Decode(serde_json::Error::custom(format!("{location}: {message}")))
}

fn describe_owner(owner: TypeOwner) -> String {
    match owner {
        TypeOwner::Interface(i) => format!("owner interface #{}", i.index()),
        TypeOwner::World(w) => format!("owner world #{}", w.index()),
        TypeOwner::None => "no owner".to_string(),
    }
}

fn describe_name(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("name {name:?}"),
        None => "no name".to_string(),
    }
}

/// Resolves a single [`Document`]. Consumed by [`Resolver::resolve()`].
pub struct Resolver<'d> {
    document: &'d Document,
    table: ConstructionTable,
}

impl<'d> Resolver<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self {
            document,
            table: ConstructionTable::new(),
        }
    }

    pub fn resolve(mut self) -> Result<TypeGraph, ResolveError> {
        self.check_capacity()?;

        let document = self.document;
        debug!(
            types = document.types.len(),
            interfaces = document.interfaces.len(),
            worlds = document.worlds.len(),
            packages = document.packages.len(),
            "resolving document"
        );

        for (index, raw) in document.types.iter().enumerate() {
            let type_definition = self.type_definition(index, raw)?;
            trace!(
                index,
                name = ?type_definition.name,
                kind = type_definition.kind.name(),
                "materialized type definition"
            );
            self.table.push(type_definition);
        }

        for (index, raw) in document.interfaces.iter().enumerate() {
            let interface = self.interface(index, raw)?;
            trace!(index, name = ?interface.name, "materialized interface");
            self.table.push(interface);
        }

        for (index, raw) in document.worlds.iter().enumerate() {
            let world = self.world(index, raw)?;
            trace!(index, name = %world.name, "materialized world");
            self.table.push(world);
        }

        let mut packages_by_name = HashMap::with_capacity(document.packages.len());
        for (index, raw) in document.packages.iter().enumerate() {
            let package = self.package(index, raw)?;
            if packages_by_name.contains_key(&package.name) {
                return Err(ResolveError::DuplicateName {
                    location: Site::new(EntityKind::Package, index).at("name"),
                    name: raw.name.clone(),
                });
            }
            trace!(index, name = %package.name, "materialized package");
            let name = package.name.clone();
            let ref_ = self.table.push(package);
            packages_by_name.insert(name, ref_);
        }

        let graph = TypeGraph::new(self.table.into_containers(), packages_by_name);
        debug!(
            packages = graph.package_count(),
            type_definitions = graph.type_definition_count(),
            "resolved document"
        );
        Ok(graph)
    }

    fn collection_len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Package => self.document.packages.len(),
            EntityKind::Interface => self.document.interfaces.len(),
            EntityKind::World => self.document.worlds.len(),
            EntityKind::TypeDefinition => self.document.types.len(),
        }
    }

    /// Every index has to fit into a [`Ref`].
    fn check_capacity(&self) -> Result<(), ResolveError> {
        let limit = u32::MAX as usize;
        for kind in [
            EntityKind::TypeDefinition,
            EntityKind::Interface,
            EntityKind::World,
            EntityKind::Package,
        ] {
            let len = self.collection_len(kind);
            if len > limit {
                return Err(malformed(
                    Location::new(kind, limit, ""),
                    &format!("{len} {} exceed the supported maximum", kind.collection()),
                ));
            }
        }
        Ok(())
    }

    fn link<R>(
        &self,
        index: usize,
        dependency: Dependency,
        location: impl FnOnce() -> Location,
    ) -> Result<Ref<R>, ResolveError>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let len = self.collection_len(R::ENTITY_KIND);
        let bound = match dependency {
            Dependency::Hard => self.table.materialized::<R>(),
            Dependency::BackLink => len,
        };
        if index < bound {
            if let Some(ref_) = Ref::from_index(index) {
                return Ok(ref_);
            }
        }
        Err(ResolveError::IndexOutOfRange {
            location: location(),
            target: R::ENTITY_KIND,
            index,
            available: if index >= len { len } else { bound },
        })
    }

    fn ty(
        &self,
        raw: RawType,
        site: Site,
        field: impl FnOnce() -> String,
    ) -> Result<Type, ResolveError> {
        Ok(match raw {
            RawType::Primitive(primitive) => Type::Primitive(primitive),
            RawType::Index(index) => {
                Type::Defined(self.link(index, Dependency::Hard, || site.at(field()))?)
            }
        })
    }

    fn optional_ty(
        &self,
        raw: Option<RawType>,
        site: Site,
        field: &str,
    ) -> Result<Option<Type>, ResolveError> {
        raw.map(|raw| self.ty(raw, site, || field.to_string()))
            .transpose()
    }

    fn type_definition(
        &self,
        index: usize,
        raw: &RawTypeDefinition,
    ) -> Result<TypeDefinition, ResolveError> {
        let site = Site::new(EntityKind::TypeDefinition, index);
        let kind = self.type_definition_kind(&raw.kind, site)?;

        if let TypeDefinitionKind::Handle(handle) = &kind {
            let target = handle.resource();
            let resolved = follow_aliases(target, &self.table).and_then(|r| self.table.try_get(r));
            if let Some(resolved) = resolved.filter(|def| !def.is_resource()) {
                return Err(ResolveError::InvalidHandleTarget {
                    location: site.at(format!("kind.handle.{}", kind.name())),
                    target: target.index(),
                    kind: resolved.kind.name(),
                });
            }
        }

        let owner = match raw.owner {
            None => TypeOwner::None,
            Some(RawOwner::Interface(i)) => TypeOwner::Interface(self.link(
                i,
                Dependency::BackLink,
                || site.at("owner.interface"),
            )?),
            Some(RawOwner::World(w)) => {
                TypeOwner::World(self.link(w, Dependency::BackLink, || site.at("owner.world"))?)
            }
        };

        Ok(TypeDefinition {
            name: raw.name.clone(),
            kind,
            owner,
            docs: docs(&raw.docs),
        })
    }

    fn type_definition_kind(
        &self,
        raw: &RawTypeDefinitionKind,
        site: Site,
    ) -> Result<TypeDefinitionKind, ResolveError> {
        Ok(match raw {
            RawTypeDefinitionKind::Record(record) => {
                let fields = record
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        Ok(Field {
                            name: field.name.clone(),
                            ty: self.ty(field.ty, site, || {
                                format!("kind.record.fields[{i}] ({:?}).type", field.name)
                            })?,
                            docs: docs(&field.docs),
                        })
                    })
                    .collect::<Result<_, ResolveError>>()?;
                TypeDefinitionKind::Record(Record { fields })
            }
            RawTypeDefinitionKind::Resource => TypeDefinitionKind::Resource,
            RawTypeDefinitionKind::Handle(RawHandle::Own(target)) => {
                TypeDefinitionKind::Handle(Handle::Owned(self.link(
                    *target,
                    Dependency::Hard,
                    || site.at("kind.handle.own"),
                )?))
            }
            RawTypeDefinitionKind::Handle(RawHandle::Borrow(target)) => {
                TypeDefinitionKind::Handle(Handle::Borrowed(self.link(
                    *target,
                    Dependency::Hard,
                    || site.at("kind.handle.borrow"),
                )?))
            }
            RawTypeDefinitionKind::Flags(flags) => TypeDefinitionKind::Flags(Flags {
                flags: flags
                    .flags
                    .iter()
                    .map(|flag| Flag {
                        name: flag.name.clone(),
                        docs: docs(&flag.docs),
                    })
                    .collect(),
            }),
            RawTypeDefinitionKind::Tuple(tuple) => {
                let types = tuple
                    .types
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| self.ty(*ty, site, || format!("kind.tuple.types[{i}]")))
                    .collect::<Result<_, _>>()?;
                TypeDefinitionKind::Tuple(Tuple { types })
            }
            RawTypeDefinitionKind::Variant(variant) => {
                let cases = variant
                    .cases
                    .iter()
                    .enumerate()
                    .map(|(i, case)| {
                        let field = format!("kind.variant.cases[{i}] ({:?}).type", case.name);
                        Ok(Case {
                            name: case.name.clone(),
                            ty: self.optional_ty(case.ty, site, &field)?,
                            docs: docs(&case.docs),
                        })
                    })
                    .collect::<Result<_, ResolveError>>()?;
                TypeDefinitionKind::Variant(Variant { cases })
            }
            RawTypeDefinitionKind::Enum(enum_) => TypeDefinitionKind::Enum(Enum {
                cases: enum_
                    .cases
                    .iter()
                    .map(|case| EnumCase {
                        name: case.name.clone(),
                        docs: docs(&case.docs),
                    })
                    .collect(),
            }),
            RawTypeDefinitionKind::Option(ty) => {
                TypeDefinitionKind::Option(self.ty(*ty, site, || "kind.option".into())?)
            }
            RawTypeDefinitionKind::Result(result) => TypeDefinitionKind::Result(ResultType {
                ok: self.optional_ty(result.ok, site, "kind.result.ok")?,
                err: self.optional_ty(result.err, site, "kind.result.err")?,
            }),
            RawTypeDefinitionKind::List(ty) => {
                TypeDefinitionKind::List(self.ty(*ty, site, || "kind.list".into())?)
            }
            RawTypeDefinitionKind::Future(ty) => {
                TypeDefinitionKind::Future(self.optional_ty(*ty, site, "kind.future")?)
            }
            RawTypeDefinitionKind::Stream(RawStream::Parts { element, end }) => {
                TypeDefinitionKind::Stream(Stream {
                    element: self.optional_ty(*element, site, "kind.stream.element")?,
                    end: self.optional_ty(*end, site, "kind.stream.end")?,
                })
            }
            RawTypeDefinitionKind::Stream(RawStream::Element(element)) => {
                TypeDefinitionKind::Stream(Stream {
                    element: self.optional_ty(*element, site, "kind.stream")?,
                    end: None,
                })
            }
            RawTypeDefinitionKind::Type(ty) => {
                TypeDefinitionKind::Type(self.ty(*ty, site, || "kind.type".into())?)
            }
        })
    }

    fn function(
        &self,
        raw: &RawFunction,
        site: Site,
        path: &str,
    ) -> Result<Function, ResolveError> {
        let associated = |index: usize, kind: &str| {
            self.link::<TypeDefinition>(index, Dependency::Hard, || {
                site.at(format!("{path}.kind.{kind}"))
            })
        };
        let kind = match raw.kind {
            RawFunctionKind::Freestanding => FunctionKind::Freestanding,
            RawFunctionKind::Method(index) => FunctionKind::Method(associated(index, "method")?),
            RawFunctionKind::Static(index) => FunctionKind::Static(associated(index, "static")?),
            RawFunctionKind::Constructor(index) => {
                FunctionKind::Constructor(associated(index, "constructor")?)
            }
        };

        let params = raw
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                Ok(Param {
                    name: param.name.clone(),
                    ty: self.ty(param.ty, site, || {
                        format!("{path}.params[{i}] ({:?}).type", param.name)
                    })?,
                })
            })
            .collect::<Result<_, ResolveError>>()?;

        Ok(Function {
            name: raw.name.clone(),
            kind,
            params,
            results: self.results(raw, site, path)?,
            docs: docs(&raw.docs),
        })
    }

    fn results(
        &self,
        raw: &RawFunction,
        site: Site,
        path: &str,
    ) -> Result<Results, ResolveError> {
        let results = match (&raw.results, raw.result) {
            (Some(_), Some(_)) => {
                return Err(malformed(
                    site.at(path),
                    "function has both `results` and `result`",
                ))
            }
            (None, None) => return Ok(Results::default()),
            (None, Some(ty)) => {
                let field = format!("{path}.result");
                return Ok(Results::Anonymous(self.ty(ty, site, || field)?));
            }
            (Some(results), None) => results,
        };

        if let [single] = results.as_slice() {
            if single.name.is_none() {
                let field = format!("{path}.results[0]");
                return Ok(Results::Anonymous(self.ty(single.ty, site, || field)?));
            }
        }

        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let Some(name) = &result.name else {
                    return Err(malformed(
                        site.at(format!("{path}.results[{i}]")),
                        "unnamed result among several results",
                    ));
                };
                Ok(Param {
                    name: name.clone(),
                    ty: self.ty(result.ty, site, || {
                        format!("{path}.results[{i}] ({name:?}).type")
                    })?,
                })
            })
            .collect::<Result<_, _>>()
            .map(Results::Named)
    }

    fn interface(&self, index: usize, raw: &RawInterface) -> Result<Interface, ResolveError> {
        let site = Site::new(EntityKind::Interface, index);
        let package = self.link(raw.package, Dependency::BackLink, || site.at("package"))?;

        let mut type_definitions = IndexMap::with_capacity(raw.types.len());
        for (name, &type_index) in raw.types.iter() {
            let field = || format!("types.{name:?}");
            let ref_ = self.link::<TypeDefinition>(type_index, Dependency::Hard, || {
                site.at(field())
            })?;
            let definition = self.table.get(ref_);
            if definition.owner.interface().map(Ref::index) != Some(index) {
                return Err(ResolveError::OwnerMismatch {
                    location: site.at(field()),
                    expected: format!("owner interface #{index}"),
                    found: describe_owner(definition.owner),
                });
            }
            if definition.name.as_deref() != Some(name.as_str()) {
                return Err(ResolveError::OwnerMismatch {
                    location: site.at(field()),
                    expected: describe_name(Some(name.as_str())),
                    found: describe_name(definition.name.as_deref()),
                });
            }
            type_definitions.insert(name.clone(), ref_);
        }

        let mut functions = IndexMap::with_capacity(raw.functions.len());
        for (name, function) in raw.functions.iter() {
            let function = self.function(function, site, &format!("functions.{name:?}"))?;
            functions.insert(name.clone(), function);
        }

        Ok(Interface {
            name: raw.name.clone(),
            type_definitions,
            functions,
            package,
            docs: docs(&raw.docs),
        })
    }

    fn world(&self, index: usize, raw: &RawWorld) -> Result<World, ResolveError> {
        let site = Site::new(EntityKind::World, index);
        let package = self.link(raw.package, Dependency::BackLink, || site.at("package"))?;

        let items = |side: &str, raw_items: &NameMap<RawWorldItem>| {
            let mut items = IndexMap::with_capacity(raw_items.len());
            for (name, item) in raw_items.iter() {
                let path = format!("{side}.{name:?}");
                items.insert(name.clone(), self.world_item(item, site, &path)?);
            }
            Ok::<_, ResolveError>(items)
        };
        let imports = items("imports", &raw.imports)?;
        let exports = items("exports", &raw.exports)?;

        Ok(World {
            name: raw.name.clone(),
            imports,
            exports,
            package,
            docs: docs(&raw.docs),
        })
    }

    fn world_item(
        &self,
        raw: &RawWorldItem,
        site: Site,
        path: &str,
    ) -> Result<WorldItem, ResolveError> {
        Ok(match raw {
            RawWorldItem::Interface(interface) => {
                WorldItem::Interface(self.link(interface.index(), Dependency::Hard, || {
                    site.at(format!("{path}.interface"))
                })?)
            }
            RawWorldItem::Function(function) => {
                WorldItem::Function(self.function(function, site, &format!("{path}.function"))?)
            }
            RawWorldItem::Type(type_index) => {
                let location = || site.at(format!("{path}.type"));
                let ref_ = self.link::<TypeDefinition>(*type_index, Dependency::Hard, location)?;
                let owner = self.table.get(ref_).owner;
                if owner.world().map(Ref::index) != Some(site.index) {
                    return Err(ResolveError::OwnerMismatch {
                        location: location(),
                        expected: format!("owner world #{}", site.index),
                        found: describe_owner(owner),
                    });
                }
                WorldItem::TypeDefinition(ref_)
            }
        })
    }

    fn package(&self, index: usize, raw: &RawPackage) -> Result<Package, ResolveError> {
        let site = Site::new(EntityKind::Package, index);
        let name: PackageName =
            raw.name
                .parse()
                .map_err(|source| ResolveError::InvalidPackageName {
                    location: site.at("name"),
                    name: raw.name.clone(),
                    source,
                })?;

        let mut interfaces = IndexMap::with_capacity(raw.interfaces.len());
        for (key, &interface_index) in raw.interfaces.iter() {
            let field = || format!("interfaces.{key:?}");
            let ref_ = self.link::<Interface>(interface_index, Dependency::Hard, || {
                site.at(field())
            })?;
            let interface = self.table.get(ref_);
            self.check_package_member(
                site,
                field(),
                interface.package,
                Some(key.as_str()),
                interface.name.as_deref(),
            )?;
            interfaces.insert(key.clone(), ref_);
        }

        let mut worlds = IndexMap::with_capacity(raw.worlds.len());
        for (key, &world_index) in raw.worlds.iter() {
            let field = || format!("worlds.{key:?}");
            let ref_ =
                self.link::<World>(world_index, Dependency::Hard, || site.at(field()))?;
            let world = self.table.get(ref_);
            self.check_package_member(
                site,
                field(),
                world.package,
                Some(key.as_str()),
                Some(world.name.as_str()),
            )?;
            worlds.insert(key.clone(), ref_);
        }

        Ok(Package {
            name,
            interfaces,
            worlds,
            docs: docs(&raw.docs),
        })
    }

    fn check_package_member(
        &self,
        site: Site,
        field: String,
        package: Ref<Package>,
        expected_name: Option<&str>,
        found_name: Option<&str>,
    ) -> Result<(), ResolveError> {
        if package.index() != site.index {
            return Err(ResolveError::OwnerMismatch {
                location: site.at(field),
                expected: format!("package #{}", site.index),
                found: format!("package #{}", package.index()),
            });
        }
        if expected_name != found_name {
            return Err(ResolveError::OwnerMismatch {
                location: site.at(field),
                expected: describe_name(expected_name),
                found: describe_name(found_name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn with_function(function: serde_json::Value) -> Document {
        document(json!({
            "worlds": [],
            "interfaces": [{
                "name": "i",
                "types": {},
                "functions": {"f": function},
                "package": 0
            }],
            "types": [],
            "packages": [{"name": "a:b", "interfaces": {"i": 0}, "worlds": {}}]
        }))
    }

    fn resolve_function(function: serde_json::Value) -> Result<Function, ResolveError> {
        let document = with_function(function);
        let graph = Resolver::new(&document).resolve()?;
        let (_, interface) = graph.interfaces().next().unwrap();
        Ok(interface.functions["f"].clone())
    }

    #[test]
    fn single_unnamed_legacy_result_is_anonymous() {
        let function = resolve_function(json!({
            "name": "f",
            "kind": "freestanding",
            "params": [],
            "results": [{"type": "u32"}]
        }))
        .unwrap();
        assert_eq!(function.results, Results::Anonymous(Type::Primitive(Primitive::U32)));
    }

    #[test]
    fn named_legacy_results_keep_their_order() {
        let function = resolve_function(json!({
            "name": "f",
            "kind": "freestanding",
            "params": [{"name": "x", "type": "string"}],
            "results": [{"name": "b", "type": "u8"}, {"name": "a", "type": "bool"}]
        }))
        .unwrap();
        let Results::Named(results) = &function.results else {
            panic!("expected named results, got {:?}", function.results);
        };
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(function.params[0].ty, Type::Primitive(Primitive::String));
    }

    #[test]
    fn newer_result_field_is_anonymous_and_null_means_none() {
        let function = resolve_function(json!({
            "name": "f",
            "kind": "freestanding",
            "params": [],
            "result": "char"
        }))
        .unwrap();
        assert_eq!(function.results, Results::Anonymous(Type::Primitive(Primitive::Char)));

        let function = resolve_function(json!({
            "name": "f",
            "kind": "freestanding",
            "params": [],
            "result": null
        }))
        .unwrap();
        assert!(function.results.is_empty());
    }

    #[test]
    fn unnamed_result_among_several_is_malformed() {
        let err = resolve_function(json!({
            "name": "f",
            "kind": "freestanding",
            "params": [],
            "results": [{"name": "a", "type": "u8"}, {"type": "u8"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ResolveError::Decode(_)));
        assert!(err
            .to_string()
            .contains(r#"interface #0, field functions."f".results[1]"#));
    }

    #[test]
    fn forward_reference_reports_materialized_count() {
        let document = document(json!({
            "worlds": [],
            "interfaces": [],
            "types": [
                {"name": null, "kind": {"list": 1}, "owner": null},
                {"name": null, "kind": {"list": "u8"}, "owner": null}
            ],
            "packages": []
        }));
        let err = Resolver::new(&document).resolve().unwrap_err();
        match err {
            ResolveError::IndexOutOfRange {
                location,
                target,
                index,
                available,
            } => {
                assert_eq!(location, Location::new(EntityKind::TypeDefinition, 0, "kind.list"));
                assert_eq!(target, EntityKind::TypeDefinition);
                assert_eq!(index, 1);
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn owner_back_links_only_need_to_be_in_bounds() {
        let document = document(json!({
            "worlds": [],
            "interfaces": [{"name": "i", "types": {"t": 0}, "functions": {}, "package": 0}],
            "types": [{"name": "t", "kind": {"type": "u8"}, "owner": {"interface": 0}}],
            "packages": [{"name": "a:b", "interfaces": {"i": 0}, "worlds": {}}]
        }));
        let graph = Resolver::new(&document).resolve().unwrap();
        let (ref_, def) = graph.type_definitions().next().unwrap();
        assert_eq!(ref_.index(), 0);
        assert_eq!(def.owner.interface().map(Ref::index), Some(0));
    }

    #[test]
    fn stream_in_newer_form_has_no_end() {
        let document = document(json!({
            "worlds": [],
            "interfaces": [],
            "types": [{"name": null, "kind": {"stream": "u8"}, "owner": null}],
            "packages": []
        }));
        let graph = Resolver::new(&document).resolve().unwrap();
        let (_, def) = graph.type_definitions().next().unwrap();
        assert_eq!(
            def.kind,
            TypeDefinitionKind::Stream(Stream {
                element: Some(Type::Primitive(Primitive::U8)),
                end: None
            })
        );
    }
}
