use crate::{
    query::{FieldSelection, SelectionEntry},
    registry::SchemaRegistry,
    selection::SelectionNode,
};
use gql_preprocess_lib::constants;

/// Selections gathered beneath one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatheredSelections {
    /// Direct selections on the field's own type. For a paginated field these are
    /// the wrapper-level selections (`totalCount`, `pageInfo`, `nodes`, ...).
    pub container: Vec<SelectionNode>,
    /// Selections on the entity type, re-based through `nodes`, `edges.node` or
    /// `items` when the field is a paginated container.
    pub fields: Vec<SelectionNode>,
    /// Whether `fields` was re-based through a paginated container.
    pub is_paginated: bool,
}

/// A selection paired with the field it came from, for further descent.
type Collected<'a> = (SelectionNode, &'a FieldSelection);

fn is_named(node: &SelectionNode, name: &str) -> bool {
    node.schema_name().eq_ignore_ascii_case(name)
}

/// Whether a fragment with `type_condition` applies to values of `concrete_type`.
fn fragment_applies(
    schema: &SchemaRegistry,
    type_condition: Option<&str>,
    concrete_type: &str,
) -> bool {
    match type_condition {
        None => true,
        Some(cond) => schema.is_assignable(concrete_type, cond),
    }
}

fn collect_fields<'a>(
    schema: &SchemaRegistry,
    concrete_type: &str,
    entries: &'a [SelectionEntry],
    out: &mut Vec<Collected<'a>>,
) {
    for entry in entries {
        match entry {
            SelectionEntry::Field(f) => {
                if f.name.starts_with(constants::INTROSPECTION_PREFIX) {
                    continue;
                }

                let member = schema
                    .field(concrete_type, &f.name)
                    .and_then(|def| def.member.clone());
                out.push((SelectionNode::new(&f.name, member, concrete_type), f));
            }
            SelectionEntry::Fragment {
                type_condition,
                selection_set,
            } => {
                if fragment_applies(schema, type_condition.as_deref(), concrete_type) {
                    collect_fields(schema, concrete_type, selection_set, out);
                }
            }
        }
    }
}

/// Collect the selections of `entries` for every concrete type a value of
/// `type_name` may have.
fn collect_for_type<'a>(
    schema: &SchemaRegistry,
    type_name: &str,
    entries: &'a [SelectionEntry],
) -> Vec<Collected<'a>> {
    let mut out = Vec::new();
    for concrete_type in schema.possible_types(type_name) {
        collect_fields(schema, concrete_type, entries, &mut out);
    }
    out
}

/// Descend from a collected selection into its own sub-selections.
fn descend<'a>(schema: &SchemaRegistry, collected: &Collected<'a>) -> Vec<Collected<'a>> {
    let (node, field) = (&collected.0, collected.1);
    match schema.field(node.declaring_type(), node.schema_name()) {
        Some(def) => collect_for_type(schema, &def.ty.name, &field.selection_set),
        None => Vec::new(),
    }
}

/// Gather what was selected beneath `field`, a field of `parent_type`.
///
/// Abstract types are expanded to their possible concrete types and the
/// selections of each are unioned. When the field is a paginated container, the
/// walk is re-based onto the entity selections reachable through `nodes` and
/// `edges { node }`, or through `items` when neither of those is present.
pub fn gather(
    schema: &SchemaRegistry,
    parent_type: &str,
    field: &FieldSelection,
) -> GatheredSelections {
    if !field.has_selection_set() {
        return GatheredSelections::default();
    }

    let def = match schema.field(parent_type, &field.name) {
        Some(def) => def,
        None => return GatheredSelections::default(),
    };

    let container = collect_for_type(schema, &def.ty.name, &field.selection_set);

    let nodes = container.iter().filter(|(n, _)| is_named(n, constants::NODES));
    let edges = container.iter().filter(|(n, _)| is_named(n, constants::EDGES));
    let items = container.iter().filter(|(n, _)| is_named(n, constants::ITEMS));

    let mut rebased: Vec<Collected> = Vec::new();
    let mut is_connection = false;

    for selection in nodes {
        is_connection = true;
        rebased.extend(descend(schema, selection));
    }

    for selection in edges {
        is_connection = true;
        for edge_child in descend(schema, selection) {
            if is_named(&edge_child.0, constants::NODE) {
                rebased.extend(descend(schema, &edge_child));
            }
        }
    }

    let mut is_segment = false;
    if !is_connection {
        for selection in items {
            is_segment = true;
            rebased.extend(descend(schema, selection));
        }
    }

    let is_paginated = schema.is_paginated(&def.ty.name) || is_connection || is_segment;
    let container: Vec<SelectionNode> = container.into_iter().map(|(n, _)| n).collect();
    let fields = if is_paginated {
        rebased.into_iter().map(|(n, _)| n).collect()
    } else {
        container.clone()
    };

    GatheredSelections {
        container,
        fields,
        is_paginated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::FieldContext,
        test_utils::{fixture_registry, query},
    };
    use pretty_assertions::assert_eq;

    fn names(nodes: &[SelectionNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.schema_name()).collect()
    }

    fn gather_root(q: &str, field: &str) -> GatheredSelections {
        let resolution = query(q, field);
        gather(resolution.schema(), "Query", resolution.selection())
    }

    #[test]
    fn test_gather_plain_object() {
        let gathered = gather_root("{ starship { id name } }", "starship");

        assert_eq!(names(&gathered.fields), vec!["id", "name"]);
        assert_eq!(gathered.container, gathered.fields);
        assert!(gathered
            .fields
            .iter()
            .all(|n| n.declaring_type() == "Starship"));
    }

    #[test]
    fn test_gather_scalar_or_unknown_field_is_empty() {
        let schema = fixture_registry();

        let scalar = FieldSelection::new("name");
        assert_eq!(gather(&schema, "Starship", &scalar), GatheredSelections::default());

        let unknown = FieldSelection::new("missing").select(FieldSelection::new("id"));
        assert_eq!(gather(&schema, "Query", &unknown), GatheredSelections::default());
    }

    #[test]
    fn test_gather_connection_through_nodes() {
        let gathered = gather_root(
            "{ characters { totalCount nodes { id name } } }",
            "characters",
        );

        assert_eq!(names(&gathered.container), vec!["totalCount", "nodes"]);
        // Interface fields are attributed to every implementer.
        assert_eq!(names(&gathered.fields), vec!["id", "name", "id", "name"]);
        assert_eq!(
            gathered
                .fields
                .iter()
                .map(|n| n.declaring_type())
                .collect::<Vec<_>>(),
            vec!["Droid", "Droid", "Human", "Human"]
        );
    }

    #[test]
    fn test_gather_connection_through_edges() {
        let gathered = gather_root(
            "{ characters { edges { cursor node { id } } } }",
            "characters",
        );

        assert_eq!(names(&gathered.fields), vec!["id", "id"]);
    }

    #[test]
    fn test_gather_connection_unions_nodes_and_edges() {
        let gathered = gather_root(
            "{ characters { nodes { name } edges { node { ... on Droid { primaryFunction } } } } }",
            "characters",
        );

        assert_eq!(
            names(&gathered.fields),
            vec!["name", "name", "primaryFunction"]
        );
    }

    #[test]
    fn test_gather_collection_segment_through_items() {
        let gathered = gather_root(
            "{ droids { totalCount items { id primaryFunction } } }",
            "droids",
        );

        assert_eq!(names(&gathered.fields), vec!["id", "primaryFunction"]);
        let primary_function = &gathered.fields[1];
        assert_eq!(primary_function.member_name(), Some("PrimaryFunction"));
    }

    #[test]
    fn test_gather_splits_fragments_by_type() {
        let gathered = gather_root(
            "{ search { __typename ... on Human { homePlanet } ... on Droid { primaryFunction } ... on Starship { length } } }",
            "search",
        );

        let fields: Vec<(&str, &str)> = gathered
            .fields
            .iter()
            .map(|n| (n.declaring_type(), n.schema_name()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("Human", "homePlanet"),
                ("Droid", "primaryFunction"),
                ("Starship", "length"),
            ]
        );
    }

    #[test]
    fn test_gather_interface_fragment_applies_to_implementers() {
        let gathered = gather_root(
            "{ hero { ... on Character { id } ... on Human { homePlanet } } }",
            "hero",
        );

        let fields: Vec<(&str, &str)> = gathered
            .fields
            .iter()
            .map(|n| (n.declaring_type(), n.schema_name()))
            .collect();
        assert_eq!(
            fields,
            vec![("Droid", "id"), ("Human", "id"), ("Human", "homePlanet")]
        );
    }
}
