use std::io::{self, Write};

use dt_wit::{
    ComponentTable, Direction, Function, FunctionKind, Interface, Ref, Results, TypeDefinition,
    TypeDefinitionKind, TypeGraph, WorldItem,
};

/// Prints every package with its interfaces and worlds, in a WIT-like notation.
pub fn write_outline(graph: &TypeGraph, out: &mut impl Write) -> io::Result<()> {
    for (index, (_, package)) in graph.packages().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "package {}", package.name)?;
        for (_, &interface) in &package.interfaces {
            write_interface(graph, interface, out)?;
        }
        for (name, &world) in &package.worlds {
            writeln!(out, "  world {name}")?;
            for (direction, item_name, item) in graph.get(world).items() {
                let keyword = match direction {
                    Direction::Import => "import",
                    Direction::Export => "export",
                };
                let item = match item {
                    WorldItem::Interface(interface) => format!(
                        "interface {}",
                        interface_label(graph, *interface)
                    ),
                    WorldItem::TypeDefinition(ty) => definition(graph, *ty),
                    WorldItem::Function(function) => signature(graph, function),
                };
                writeln!(out, "    {keyword} {item_name}: {item}")?;
            }
        }
    }
    Ok(())
}

/// Prints the number of entities of each kind.
pub fn write_summary(graph: &TypeGraph, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "packages: {}", graph.package_count())?;
    writeln!(out, "interfaces: {}", graph.interface_count())?;
    writeln!(out, "worlds: {}", graph.world_count())?;
    writeln!(out, "types: {}", graph.type_definition_count())
}

fn write_interface(
    graph: &TypeGraph,
    interface: Ref<Interface>,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "  interface {}", interface_label(graph, interface))?;
    let interface = graph.get(interface);
    for (_, &ty) in &interface.type_definitions {
        writeln!(out, "    {}", definition(graph, ty))?;
    }
    for (name, function) in &interface.functions {
        writeln!(out, "    {name}: {}", signature(graph, function))?;
    }
    Ok(())
}

fn interface_label(graph: &TypeGraph, interface: Ref<Interface>) -> String {
    graph
        .qualified_interface_name(interface)
        .unwrap_or_else(|| format!("<anonymous #{}>", interface.index()))
}

fn definition(graph: &TypeGraph, ref_: Ref<TypeDefinition>) -> String {
    let def = graph.get(ref_);
    let name = def.name.as_deref().unwrap_or("_");
    let members = |names: Vec<String>| names.join(", ");
    match &def.kind {
        TypeDefinitionKind::Record(record) => format!(
            "record {name} {{ {} }}",
            members(
                record
                    .fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, graph.display_type(f.ty)))
                    .collect()
            )
        ),
        TypeDefinitionKind::Variant(variant) => format!(
            "variant {name} {{ {} }}",
            members(
                variant
                    .cases
                    .iter()
                    .map(|c| match c.ty {
                        Some(ty) => format!("{}({})", c.name, graph.display_type(ty)),
                        None => c.name.clone(),
                    })
                    .collect()
            )
        ),
        TypeDefinitionKind::Enum(enum_) => format!(
            "enum {name} {{ {} }}",
            members(enum_.cases.iter().map(|c| c.name.clone()).collect())
        ),
        TypeDefinitionKind::Flags(flags) => format!(
            "flags {name} {{ {} }}",
            members(flags.flags.iter().map(|f| f.name.clone()).collect())
        ),
        TypeDefinitionKind::Resource => format!("resource {name}"),
        _ => format!("type {name} = {}", graph.display_definition(ref_)),
    }
}

fn signature(graph: &TypeGraph, function: &Function) -> String {
    let prefix = match function.kind {
        FunctionKind::Freestanding | FunctionKind::Method(_) => "func",
        FunctionKind::Static(_) => "static func",
        FunctionKind::Constructor(_) => "constructor",
    };
    let params = function
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, graph.display_type(p.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let results = match &function.results {
        Results::Anonymous(ty) => format!(" -> {}", graph.display_type(*ty)),
        Results::Named(named) if named.is_empty() => String::new(),
        Results::Named(named) => format!(
            " -> ({})",
            named
                .iter()
                .map(|p| format!("{}: {}", p.name, graph.display_type(p.ty)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    format!("{prefix}({params}){results}")
}
