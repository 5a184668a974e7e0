use std::collections::HashMap;

use async_graphql_parser::{
    types::{
        Directive, FragmentDefinition, OperationDefinition, OperationType, Selection,
        SelectionSet, VariableDefinition,
    },
    Positioned,
};
use async_graphql_value::{ConstValue, Name, Value, Variables};

use crate::{query::FieldSelection, query::SelectionEntry, PreprocessError, PreprocessResult};

/// Normalize a query operation into an owned selection tree.
pub(crate) fn normalize_operation(
    operation_def: &OperationDefinition,
    fragments: &HashMap<Name, Positioned<FragmentDefinition>>,
    variables: &Variables,
) -> PreprocessResult<Vec<SelectionEntry>> {
    match operation_def.ty {
        OperationType::Query => {
            let variable_definitions = operation_def
                .variable_definitions
                .iter()
                .map(|def| (def.node.name.node.to_string(), &def.node))
                .collect();

            let mut normalizer = Normalizer {
                fragments,
                variables,
                variable_definitions,
                visiting: Vec::new(),
            };
            normalizer.selection_set(&operation_def.selection_set.node)
        }
        OperationType::Mutation => {
            Err(PreprocessError::OperationNotSupported("Mutation".to_string()))
        }
        OperationType::Subscription => Err(PreprocessError::OperationNotSupported(
            "Subscription".to_string(),
        )),
    }
}

struct Normalizer<'a> {
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    variables: &'a Variables,
    variable_definitions: HashMap<String, &'a VariableDefinition>,
    /// Fragment spreads currently being expanded, for cycle detection.
    visiting: Vec<Name>,
}

impl<'a> Normalizer<'a> {
    /// Substitute variables in `value`. A declared variable without a value falls
    /// back to its default, then to null.
    fn resolve(&self, value: Value) -> PreprocessResult<ConstValue> {
        value.into_const_with(|var| {
            let Some(definition) = self.variable_definitions.get(var.as_str()) else {
                return Err(PreprocessError::UndefinedVariable(var.to_string()));
            };

            Ok(self
                .variables
                .get(&var)
                .cloned()
                .or_else(|| {
                    definition
                        .default_value
                        .as_ref()
                        .map(|default| default.node.clone())
                })
                .unwrap_or(ConstValue::Null))
        })
    }

    /// Whether `@skip(if: true)` or `@include(if: false)` removes the selection.
    fn is_excluded(&self, directives: &[Positioned<Directive>]) -> PreprocessResult<bool> {
        for d in directives {
            let skip_when = match d.node.name.node.as_str() {
                "skip" => true,
                "include" => false,
                _ => continue,
            };

            if let Some(condition) = d.node.get_argument("if") {
                if let ConstValue::Boolean(cond) = self.resolve(condition.node.clone())? {
                    if cond == skip_when {
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn selection_set(&mut self, set: &SelectionSet) -> PreprocessResult<Vec<SelectionEntry>> {
        let mut entries = Vec::with_capacity(set.items.len());

        for selection in set.items.iter() {
            match &selection.node {
                Selection::Field(f) => {
                    if self.is_excluded(&f.node.directives)? {
                        continue;
                    }

                    let arguments = f
                        .node
                        .arguments
                        .iter()
                        .map(|(name, value)| {
                            Ok((name.node.to_string(), self.resolve(value.node.clone())?))
                        })
                        .collect::<PreprocessResult<Vec<_>>>()?;

                    entries.push(SelectionEntry::Field(FieldSelection {
                        name: f.node.name.node.to_string(),
                        alias: f.node.alias.as_ref().map(|a| a.node.to_string()),
                        arguments,
                        selection_set: self.selection_set(&f.node.selection_set.node)?,
                    }));
                }
                Selection::FragmentSpread(spread) => {
                    if self.is_excluded(&spread.node.directives)? {
                        continue;
                    }

                    let fragment_name = &spread.node.fragment_name.node;
                    let definition = self
                        .fragments
                        .get(fragment_name)
                        .ok_or(PreprocessError::FragmentResolverFailed)?;

                    if self.visiting.contains(fragment_name) {
                        return Err(PreprocessError::FragmentResolverFailed);
                    }

                    self.visiting.push(fragment_name.clone());
                    let selection_set =
                        self.selection_set(&definition.node.selection_set.node)?;
                    self.visiting.pop();

                    entries.push(SelectionEntry::Fragment {
                        type_condition: Some(
                            definition.node.type_condition.node.on.node.to_string(),
                        ),
                        selection_set,
                    });
                }
                Selection::InlineFragment(inline) => {
                    if self.is_excluded(&inline.node.directives)? {
                        continue;
                    }

                    entries.push(SelectionEntry::Fragment {
                        type_condition: inline
                            .node
                            .type_condition
                            .as_ref()
                            .map(|cond| cond.node.on.node.to_string()),
                        selection_set: self.selection_set(&inline.node.selection_set.node)?,
                    });
                }
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{FieldSelection, Operation, SelectionEntry};
    use crate::PreprocessError;
    use async_graphql_value::{ConstValue, Variables};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(query: &str, variables: serde_json::Value) -> Operation {
        Operation::parse(query, None, &Variables::from_json(variables)).unwrap()
    }

    #[test]
    fn test_variables_are_substituted() {
        let operation = parse(
            "query Q($first: Int, $after: String = \"AQAAAA==\") {
                characters(first: $first, after: $after) { totalCount }
            }",
            json!({ "first": 3 }),
        );

        let characters = operation.root_field("characters").unwrap();
        assert_eq!(characters.argument("first"), Some(&ConstValue::from(3)));
        assert_eq!(
            characters.argument("after"),
            Some(&ConstValue::String("AQAAAA==".to_string()))
        );
    }

    #[test]
    fn test_declared_variable_without_value_is_null() {
        let operation = parse(
            "query Q($take: Int) { droids(take: $take) { totalCount } }",
            json!({}),
        );

        assert_eq!(
            operation.root_field("droids").unwrap().argument("take"),
            Some(&ConstValue::Null)
        );
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let result = Operation::parse(
            "{ droids(take: $take) { totalCount } }",
            None,
            &Variables::default(),
        );

        assert!(matches!(
            result,
            Err(PreprocessError::UndefinedVariable(name)) if name == "take"
        ));
    }

    #[test]
    fn test_skip_and_include() {
        let operation = parse(
            "query Q($withName: Boolean!) {
                hero {
                    id @skip(if: true)
                    name @include(if: $withName)
                    friends @include(if: true) { id }
                }
            }",
            json!({ "withName": false }),
        );

        let hero = operation.root_field("hero").unwrap();
        assert_eq!(
            hero.selection_set,
            vec![SelectionEntry::Field(
                FieldSelection::new("friends").select(FieldSelection::new("id"))
            )]
        );
    }

    #[test]
    fn test_fragments_keep_type_conditions() {
        let operation = parse(
            "{
                hero {
                    ...CharacterFields
                    ... on Droid { primaryFunction }
                    ... { name }
                }
            }
            fragment CharacterFields on Character { id }",
            json!({}),
        );

        let hero = operation.root_field("hero").unwrap();
        assert_eq!(
            hero.selection_set,
            vec![
                SelectionEntry::fragment(
                    Some("Character"),
                    vec![FieldSelection::new("id").into()]
                ),
                SelectionEntry::fragment(
                    Some("Droid"),
                    vec![FieldSelection::new("primaryFunction").into()]
                ),
                SelectionEntry::fragment(None, vec![FieldSelection::new("name").into()]),
            ]
        );
    }

    #[test]
    fn test_unknown_and_cyclic_fragments_fail() {
        let unknown = Operation::parse(
            "{ hero { ...Missing } }",
            None,
            &Variables::default(),
        );
        assert!(matches!(
            unknown,
            Err(PreprocessError::FragmentResolverFailed)
        ));

        let cyclic = Operation::parse(
            "{ hero { ...A } }
            fragment A on Character { id ...B }
            fragment B on Character { name ...A }",
            None,
            &Variables::default(),
        );
        assert!(matches!(cyclic, Err(PreprocessError::FragmentResolverFailed)));
    }

    #[test]
    fn test_only_queries_are_supported() {
        let result = Operation::parse(
            "mutation { addDroid { id } }",
            None,
            &Variables::default(),
        );

        assert!(matches!(
            result,
            Err(PreprocessError::OperationNotSupported(kind)) if kind == "Mutation"
        ));
    }
}
