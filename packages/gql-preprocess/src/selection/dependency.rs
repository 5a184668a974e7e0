//! Parent-member dependencies declared on fields at schema-build time.

use crate::{registry::SchemaRegistry, selection::SelectionNode};
use tracing::trace;

/// A member of the parent entity that must be loaded for a field to resolve,
/// even when the caller did not select it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyLink {
    dependency_member_name: String,
}

impl DependencyLink {
    pub fn new(dependency_member_name: impl Into<String>) -> Self {
        Self {
            dependency_member_name: dependency_member_name.into(),
        }
    }

    pub fn dependency_member_name(&self) -> &str {
        &self.dependency_member_name
    }
}

/// Collect the dependency links declared on any of the selected fields, without
/// duplicates. `None` when no selected field declares one.
pub fn resolve_dependencies(
    schema: &SchemaRegistry,
    selections: &[SelectionNode],
) -> Option<Vec<DependencyLink>> {
    let mut links: Vec<DependencyLink> = Vec::new();

    for node in selections {
        for link in schema.dependencies(node.declaring_type(), node.schema_name()) {
            if !links.iter().any(|l| {
                l.dependency_member_name
                    .eq_ignore_ascii_case(&link.dependency_member_name)
            }) {
                trace!(
                    "{}.{} depends on {}",
                    node.declaring_type(),
                    node.schema_name(),
                    link.dependency_member_name
                );
                links.push(link.clone());
            }
        }
    }

    if links.is_empty() {
        None
    } else {
        Some(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_registry;

    fn node(declaring_type: &str, name: &str) -> SelectionNode {
        SelectionNode::new(name, None, declaring_type)
    }

    #[test]
    fn test_dependencies_of_selected_fields() {
        let schema = fixture_registry();

        let links = resolve_dependencies(
            &schema,
            &[node("Human", "name"), node("Human", "friends")],
        );
        assert_eq!(links, Some(vec![DependencyLink::new("Id")]));
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let schema = fixture_registry();

        let links = resolve_dependencies(
            &schema,
            &[node("Human", "friends"), node("Droid", "friends")],
        )
        .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].dependency_member_name(), "Id");
    }

    #[test]
    fn test_no_dependencies_is_none() {
        let schema = fixture_registry();

        assert_eq!(
            resolve_dependencies(&schema, &[node("Human", "name")]),
            None
        );
        assert_eq!(resolve_dependencies(&schema, &[]), None);
    }
}
