use super::{FieldDef, FieldType, ObjectKind, ObjectType, PagingKind, SchemaRegistry, TypeDef};
use crate::{
    graph::{unresolved, FieldGraphExt, SchemaBuilderGraphExt, TypeRefGraphExt},
    PreprocessError, PreprocessResult,
};
use async_graphql::dynamic::{
    Field, InputObject, InputValue, Interface, InterfaceField, Object, Scalar,
    Schema as DynamicSchema, SchemaBuilder as DynamicSchemaBuilder, TypeRef, Union,
};
use lazy_static::lazy_static;
use std::collections::{BTreeMap, BTreeSet, HashSet};

lazy_static! {
    /// Types every dynamic schema built here already contains: the GraphQL built-in
    /// scalars and the paging/ordering types added by `register_graph_types`.
    static ref KNOWN_TYPES: HashSet<&'static str> = HashSet::from([
        "Boolean",
        "CollectionSegmentInfo",
        "Float",
        "ID",
        "Int",
        "PageInfo",
        "SortEnumType",
        "String",
    ]);
}

fn type_ref(ty: &FieldType) -> TypeRef {
    let name = ty.name.clone();
    match (ty.list, ty.nullable, ty.item_nullable) {
        (false, true, _) => TypeRef::named(name),
        (false, false, _) => TypeRef::named_nn(name),
        (true, true, true) => TypeRef::named_list(name),
        (true, true, false) => TypeRef::named_nn_list(name),
        (true, false, true) => TypeRef::named_list_nn(name),
        (true, false, false) => TypeRef::named_nn_list_nn(name),
    }
}

/// The type a field's `order` argument sorts: the node of a paginated container,
/// otherwise the field's own type.
fn sorted_type(registry: &SchemaRegistry, def: &FieldDef) -> String {
    match registry.get(&def.ty.name) {
        Some(TypeDef::Object(ObjectType {
            kind:
                ObjectKind::Connection { node }
                | ObjectKind::Edge { node }
                | ObjectKind::CollectionSegment { node },
            ..
        })) => node.clone(),
        _ => def.ty.name.clone(),
    }
}

fn build_field(registry: &SchemaRegistry, def: &FieldDef) -> Field {
    let mut field = Field::new(def.name.clone(), type_ref(&def.ty), unresolved);

    if def.is_sortable() {
        field = field.ordering_argument(sorted_type(registry, def));
    }

    match def.paging {
        Some(PagingKind::Cursor) => field.cursor_paging_arguments(),
        Some(PagingKind::Offset) => field.offset_paging_arguments(),
        None => field,
    }
}

/// Object fields, including those inherited from implemented interfaces.
fn object_fields<'a>(registry: &'a SchemaRegistry, obj: &'a ObjectType) -> Vec<&'a FieldDef> {
    let mut fields: Vec<&FieldDef> = obj.fields.iter().collect();
    for interface in obj.implements.iter() {
        if let Some(TypeDef::Interface(i)) = registry.get(interface) {
            for f in i.fields.iter() {
                if !fields.iter().any(|existing| existing.name == f.name) {
                    fields.push(f);
                }
            }
        }
    }
    fields
}

/// Build an introspection-only dynamic schema from the registry, so that hosts can
/// export SDL or serve introspection for the types this crate knows about.
pub fn build_dynamic_schema(registry: &SchemaRegistry) -> PreprocessResult<DynamicSchema> {
    if !matches!(registry.get(registry.query_type()), Some(TypeDef::Object(_))) {
        return Err(PreprocessError::UnrecognizedType(
            registry.query_type().to_string(),
        ));
    }

    let mut schema_builder: DynamicSchemaBuilder =
        DynamicSchema::build(registry.query_type(), None, None)
            .introspection_only()
            .register_graph_types();

    let mut sort_inputs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut scalars: BTreeSet<String> = BTreeSet::new();

    let mut visit_field = |def: &FieldDef| {
        if def.is_sortable() {
            sort_inputs
                .entry(sorted_type(registry, def))
                .or_default()
                .extend(def.sort_fields.iter().map(|f| f.name.clone()));
        }
        if registry.get(&def.ty.name).is_none()
            && !KNOWN_TYPES.contains(def.ty.name.as_str())
        {
            scalars.insert(def.ty.name.clone());
        }
    };

    for ty in registry.types() {
        match ty {
            TypeDef::Object(obj) => {
                let fields = object_fields(registry, obj);
                for f in fields.iter() {
                    visit_field(*f);
                }

                let object = obj
                    .implements
                    .iter()
                    .fold(Object::new(obj.name.clone()), |o, i| o.implement(i.clone()));
                let object = fields
                    .into_iter()
                    .fold(object, |o, f| o.field(build_field(registry, f)));
                schema_builder = schema_builder.register(object);
            }
            TypeDef::Interface(i) => {
                for f in i.fields.iter() {
                    visit_field(f);
                }
                let interface = i.fields.iter().fold(Interface::new(i.name.clone()), |it, f| {
                    it.field(InterfaceField::new(f.name.clone(), type_ref(&f.ty)))
                });
                schema_builder = schema_builder.register(interface);
            }
            TypeDef::Union(u) => {
                let union = u
                    .members
                    .iter()
                    .fold(Union::new(u.name.clone()), |un, m| un.possible_type(m.clone()));
                schema_builder = schema_builder.register(union);
            }
        }
    }

    for (node, fields) in sort_inputs {
        let input = fields
            .into_iter()
            .fold(InputObject::new(TypeRef::sort_input(node)), |io, f| {
                io.field(InputValue::new(f, TypeRef::named(TypeRef::SORT_ENUM)))
            });
        schema_builder = schema_builder.register(input);
    }

    for scalar in scalars {
        schema_builder = schema_builder.register(Scalar::new(scalar));
    }

    Ok(schema_builder.finish()?)
}
