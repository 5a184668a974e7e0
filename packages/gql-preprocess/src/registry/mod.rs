//! Static schema metadata consulted while a field is being resolved.
//!
//! The registry is built once at schema-build time and shared read-only by every
//! request. Types are a tagged sum over objects, interfaces and unions, so that
//! polymorphic selections are resolved by matching on the variant rather than by
//! asking the host engine at runtime.

pub mod dynamic;

use crate::{
    graph::TypeRefGraphExt,
    selection::DependencyLink,
};
use async_graphql::dynamic::TypeRef;
use gql_preprocess_lib::constants;
use std::collections::BTreeMap;

/// The shape of a field's type: a named type, optionally wrapped in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub name: String,
    pub nullable: bool,
    pub list: bool,
    pub item_nullable: bool,
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            list: false,
            item_nullable: false,
        }
    }

    pub fn named_nn(name: impl Into<String>) -> Self {
        Self {
            nullable: false,
            ..Self::named(name)
        }
    }

    pub fn named_list(name: impl Into<String>) -> Self {
        Self {
            list: true,
            item_nullable: true,
            ..Self::named(name)
        }
    }

    pub fn named_nn_list_nn(name: impl Into<String>) -> Self {
        Self {
            nullable: false,
            list: true,
            item_nullable: false,
            name: name.into(),
        }
    }
}

/// Which paging convention a field follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingKind {
    /// `first`/`after`/`last`/`before` over a `{Node}Connection`.
    Cursor,
    /// `skip`/`take` over a `{Node}CollectionSegment`.
    Offset,
}

/// A field that can be named in a sort argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFieldDef {
    pub name: String,
    pub member: Option<String>,
}

impl SortFieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member: None,
        }
    }

    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// The backing member name, falling back to the schema name.
    pub fn member_name(&self) -> &str {
        self.member.as_deref().unwrap_or(&self.name)
    }
}

/// A field declared on an object or interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    /// The data-model member backing this field, if any.
    pub member: Option<String>,
    pub paging: Option<PagingKind>,
    pub sort_fields: Vec<SortFieldDef>,
    dependencies: Vec<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            member: None,
            paging: None,
            sort_fields: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Declare that resolving this field needs `member` of the parent entity.
    pub fn depends_on(mut self, member: impl Into<String>) -> Self {
        self.dependencies.push(member.into());
        self
    }

    pub fn cursor_paging(mut self) -> Self {
        self.paging = Some(PagingKind::Cursor);
        self
    }

    pub fn offset_paging(mut self) -> Self {
        self.paging = Some(PagingKind::Offset);
        self
    }

    pub fn sort_field(mut self, field: SortFieldDef) -> Self {
        self.sort_fields.push(field);
        self
    }

    pub fn is_sortable(&self) -> bool {
        !self.sort_fields.is_empty()
    }
}

/// Generated role of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Entity,
    Connection { node: String },
    Edge { node: String },
    CollectionSegment { node: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub kind: ObjectKind,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDef>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Entity,
            implements: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn implement(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// `{Node}Connection` with the fields required by the Relay connection model.
    /// See: https://relay.dev/graphql/connections.htm#sec-Connection-Types
    pub fn connection(node: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            name: TypeRef::connection(node.clone()),
            kind: ObjectKind::Connection { node: node.clone() },
            implements: Vec::new(),
            fields: vec![
                FieldDef::new(constants::TOTAL_COUNT, FieldType::named_nn(TypeRef::INT)),
                FieldDef::new(constants::NODES, FieldType::named_nn_list_nn(node.clone())),
                FieldDef::new(
                    constants::EDGES,
                    FieldType::named_nn_list_nn(TypeRef::edge(node)),
                ),
                FieldDef::new(
                    constants::PAGE_INFO,
                    FieldType::named_nn(TypeRef::PAGE_INFO),
                ),
            ],
        }
    }

    /// `{Node}Edge` carrying a node and its cursor.
    pub fn edge(node: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            name: TypeRef::edge(node.clone()),
            kind: ObjectKind::Edge { node: node.clone() },
            implements: Vec::new(),
            fields: vec![
                FieldDef::new(constants::NODE, FieldType::named_nn(node)),
                FieldDef::new(constants::CURSOR, FieldType::named_nn(TypeRef::STRING)),
            ],
        }
    }

    /// `{Node}CollectionSegment` for offset paging.
    pub fn collection_segment(node: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            name: TypeRef::collection_segment(node.clone()),
            kind: ObjectKind::CollectionSegment { node: node.clone() },
            implements: Vec::new(),
            fields: vec![
                FieldDef::new(constants::ITEMS, FieldType::named_nn_list_nn(node)),
                FieldDef::new(
                    constants::PAGE_INFO,
                    FieldType::named_nn(TypeRef::COLLECTION_SEGMENT_INFO),
                ),
                FieldDef::new(constants::TOTAL_COUNT, FieldType::named_nn(TypeRef::INT)),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub members: Vec<String>,
}

impl UnionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn possible_type(mut self, member: impl Into<String>) -> Self {
        self.members.push(member.into());
        self
    }
}

/// A composite type known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Object(o) => &o.name,
            TypeDef::Interface(i) => &i.name,
            TypeDef::Union(u) => &u.name,
        }
    }

    fn fields_mut(&mut self) -> Option<&mut Vec<FieldDef>> {
        match self {
            TypeDef::Object(o) => Some(&mut o.fields),
            TypeDef::Interface(i) => Some(&mut i.fields),
            TypeDef::Union(_) => None,
        }
    }
}

impl From<ObjectType> for TypeDef {
    fn from(o: ObjectType) -> Self {
        TypeDef::Object(o)
    }
}

impl From<InterfaceType> for TypeDef {
    fn from(i: InterfaceType) -> Self {
        TypeDef::Interface(i)
    }
}

impl From<UnionType> for TypeDef {
    fn from(u: UnionType) -> Self {
        TypeDef::Union(u)
    }
}

/// `Type.field`, the identity under which per-field metadata is stored.
fn coordinate(type_name: &str, field_name: &str) -> String {
    format!("{type_name}.{field_name}")
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    query: String,
    types: BTreeMap<String, TypeDef>,
    dependencies: BTreeMap<String, Vec<DependencyLink>>,
}

impl SchemaRegistry {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Register a type. Dependencies declared on its fields are moved into the
    /// registry's per-field metadata map.
    pub fn register(mut self, ty: impl Into<TypeDef>) -> Self {
        let mut ty = ty.into();
        let type_name = ty.name().to_string();

        if let Some(fields) = ty.fields_mut() {
            for field in fields.iter_mut() {
                for member in field.dependencies.drain(..) {
                    self.dependencies
                        .entry(coordinate(&type_name, &field.name))
                        .or_default()
                        .push(DependencyLink::new(member));
                }
            }
        }

        self.types.insert(type_name, ty);
        self
    }

    /// Declare that `type_name.field_name` depends on `member` of its parent.
    pub fn declare_dependency(
        mut self,
        type_name: &str,
        field_name: &str,
        member: impl Into<String>,
    ) -> Self {
        self.dependencies
            .entry(coordinate(type_name, field_name))
            .or_default()
            .push(DependencyLink::new(member));
        self
    }

    /// Register `{Node}Connection` and `{Node}Edge`.
    pub fn connection(self, node: impl Into<String>) -> Self {
        let node = node.into();
        self.register(ObjectType::edge(node.clone()))
            .register(ObjectType::connection(node))
    }

    /// Register `{Node}CollectionSegment`.
    pub fn collection_segment(self, node: impl Into<String>) -> Self {
        self.register(ObjectType::collection_segment(node))
    }

    pub fn query_type(&self) -> &str {
        &self.query
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Whether `name` is a `{Node}Connection` or `{Node}CollectionSegment`.
    pub fn is_paginated(&self, name: &str) -> bool {
        matches!(
            self.get(name),
            Some(TypeDef::Object(ObjectType {
                kind: ObjectKind::Connection { .. } | ObjectKind::CollectionSegment { .. },
                ..
            }))
        )
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// The concrete object types a value of `name` may have at runtime: the type
    /// itself for objects, every implementer for interfaces, every member for unions.
    pub fn possible_types(&self, name: &str) -> Vec<&str> {
        match self.types.get(name) {
            Some(TypeDef::Object(o)) => vec![o.name.as_str()],
            Some(TypeDef::Interface(i)) => self
                .types
                .values()
                .filter_map(|t| match t {
                    TypeDef::Object(o) if o.implements.contains(&i.name) => {
                        Some(o.name.as_str())
                    }
                    _ => None,
                })
                .collect(),
            Some(TypeDef::Union(u)) => u
                .members
                .iter()
                .filter(|m| matches!(self.types.get(m.as_str()), Some(TypeDef::Object(_))))
                .map(String::as_str)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Find a field on a type, including fields an object inherits from the
    /// interfaces it implements.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDef> {
        match self.types.get(type_name)? {
            TypeDef::Object(o) => o
                .fields
                .iter()
                .find(|f| f.name == field_name)
                .or_else(|| {
                    o.implements
                        .iter()
                        .find_map(|i| self.field(i, field_name))
                }),
            TypeDef::Interface(i) => i.fields.iter().find(|f| f.name == field_name),
            TypeDef::Union(_) => None,
        }
    }

    /// Whether a value of type `from` can be used where `to` is expected.
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }

        match self.types.get(to) {
            Some(TypeDef::Interface(i)) => match self.types.get(from) {
                Some(TypeDef::Object(o)) => o.implements.contains(&i.name),
                _ => false,
            },
            Some(TypeDef::Union(u)) => u.members.iter().any(|m| m == from),
            _ => false,
        }
    }

    /// Dependencies declared on `type_name.field_name`, or on the same field of an
    /// interface the type implements.
    pub fn dependencies(&self, type_name: &str, field_name: &str) -> &[DependencyLink] {
        if let Some(links) = self.dependencies.get(&coordinate(type_name, field_name)) {
            return links;
        }

        if let Some(TypeDef::Object(o)) = self.types.get(type_name) {
            for interface in o.implements.iter() {
                if let Some(links) =
                    self.dependencies.get(&coordinate(interface, field_name))
                {
                    return links;
                }
            }
        }

        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_registry;

    #[test]
    fn test_possible_types_by_variant() {
        let registry = fixture_registry();

        assert_eq!(registry.possible_types("Droid"), vec!["Droid"]);
        assert_eq!(registry.possible_types("Character"), vec!["Droid", "Human"]);
        assert_eq!(
            registry.possible_types("SearchResult"),
            vec!["Human", "Droid", "Starship"]
        );
        assert!(registry.possible_types("Unknown").is_empty());
    }

    #[test]
    fn test_field_lookup_walks_interfaces() {
        let droid = ObjectType::new("Droid")
            .implement("Character")
            .field(FieldDef::new("primaryFunction", FieldType::named("String")));
        let registry = SchemaRegistry::new("Query")
            .register(
                InterfaceType::new("Character")
                    .field(FieldDef::new("id", FieldType::named_nn("ID")).member("Id")),
            )
            .register(droid);

        let id = registry.field("Droid", "id").unwrap();
        assert_eq!(id.member.as_deref(), Some("Id"));
        assert!(registry.field("Droid", "primaryFunction").is_some());
        assert!(registry.field("Droid", "missing").is_none());
    }

    #[test]
    fn test_is_assignable() {
        let registry = fixture_registry();

        assert!(registry.is_assignable("Droid", "Droid"));
        assert!(registry.is_assignable("Droid", "Character"));
        assert!(registry.is_assignable("Starship", "SearchResult"));
        assert!(!registry.is_assignable("Starship", "Character"));
        assert!(!registry.is_assignable("Human", "Droid"));
    }

    #[test]
    fn test_dependencies_are_keyed_by_field() {
        let registry = SchemaRegistry::new("Query")
            .register(
                ObjectType::new("Human").field(
                    FieldDef::new("friends", FieldType::named_list("Human"))
                        .depends_on("Id"),
                ),
            )
            .declare_dependency("Human", "starships", "StarshipIds");

        assert_eq!(
            registry.dependencies("Human", "friends"),
            &[DependencyLink::new("Id")]
        );
        assert_eq!(
            registry.dependencies("Human", "starships"),
            &[DependencyLink::new("StarshipIds")]
        );
        assert!(registry.dependencies("Human", "name").is_empty());
        // Moved out of the field definition into the registry.
        assert!(registry
            .field("Human", "friends")
            .unwrap()
            .dependencies
            .is_empty());
    }

    #[test]
    fn test_connection_types() {
        let registry = SchemaRegistry::new("Query").connection("Droid");

        let connection = registry.get("DroidConnection").unwrap();
        assert!(matches!(
            connection,
            TypeDef::Object(ObjectType {
                kind: ObjectKind::Connection { .. },
                ..
            })
        ));
        assert_eq!(
            registry.field("DroidConnection", "edges").unwrap().ty.name,
            "DroidEdge"
        );
        assert_eq!(registry.field("DroidEdge", "node").unwrap().ty.name, "Droid");
    }

    #[test]
    fn test_is_paginated() {
        let registry = SchemaRegistry::new("Query")
            .connection("Droid")
            .collection_segment("Human");

        assert!(registry.is_paginated("DroidConnection"));
        assert!(registry.is_paginated("HumanCollectionSegment"));
        assert!(!registry.is_paginated("DroidEdge"));
        assert!(!registry.is_paginated("Droid"));
    }
}
