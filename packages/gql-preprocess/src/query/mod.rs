//! An owned, normalized view of the field selections in an executable document.
//!
//! Variables are substituted, `@skip`/`@include` are applied and fragment spreads
//! are expanded, but fragments keep their type condition so that polymorphic
//! selections can be split per concrete type later on.

pub(crate) mod parse;

use crate::{PreprocessError, PreprocessResult};
use async_graphql_parser::{parse_query, types::DocumentOperations};
use async_graphql_value::{ConstValue, Variables};

/// A selected field together with its resolved arguments and sub-selections.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelection {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: Vec<(String, ConstValue)>,
    pub selection_set: Vec<SelectionEntry>,
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: ConstValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    pub fn select(mut self, entry: impl Into<SelectionEntry>) -> Self {
        self.selection_set.push(entry.into());
        self
    }

    /// The key under which this field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn argument(&self, name: &str) -> Option<&ConstValue> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }

    pub fn has_selection_set(&self) -> bool {
        !self.selection_set.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEntry {
    Field(FieldSelection),
    /// An expanded fragment spread or inline fragment.
    Fragment {
        type_condition: Option<String>,
        selection_set: Vec<SelectionEntry>,
    },
}

impl SelectionEntry {
    pub fn fragment(
        type_condition: Option<&str>,
        selection_set: Vec<SelectionEntry>,
    ) -> Self {
        SelectionEntry::Fragment {
            type_condition: type_condition.map(str::to_string),
            selection_set,
        }
    }
}

impl From<FieldSelection> for SelectionEntry {
    fn from(f: FieldSelection) -> Self {
        SelectionEntry::Field(f)
    }
}

/// A normalized query operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: Option<String>,
    pub selection_set: Vec<SelectionEntry>,
}

impl Operation {
    /// Parse `query` and normalize the operation named `operation_name`, or the
    /// only operation in the document when no name is given.
    pub fn parse(
        query: &str,
        operation_name: Option<&str>,
        variables: &Variables,
    ) -> PreprocessResult<Self> {
        let document = parse_query(query)?;

        let (name, operation) = match document.operations {
            DocumentOperations::Single(op) => (None, op),
            DocumentOperations::Multiple(ops) => {
                let found = match operation_name {
                    Some(wanted) => {
                        ops.into_iter().find(|(name, _)| name.as_str() == wanted)
                    }
                    None if ops.len() == 1 => ops.into_iter().next(),
                    None => None,
                };

                match found {
                    Some((name, op)) => (Some(name.to_string()), op),
                    None => {
                        return Err(PreprocessError::UnknownOperation(
                            operation_name.unwrap_or_default().to_string(),
                        ))
                    }
                }
            }
        };

        let selection_set =
            parse::normalize_operation(&operation.node, &document.fragments, variables)?;

        Ok(Self {
            name,
            selection_set,
        })
    }

    /// Root fields of the operation, including those nested in root fragments.
    pub fn root_fields(&self) -> Vec<&FieldSelection> {
        fn collect<'a>(entries: &'a [SelectionEntry], out: &mut Vec<&'a FieldSelection>) {
            for entry in entries {
                match entry {
                    SelectionEntry::Field(f) => out.push(f),
                    SelectionEntry::Fragment { selection_set, .. } => {
                        collect(selection_set, out)
                    }
                }
            }
        }

        let mut fields = Vec::new();
        collect(&self.selection_set, &mut fields);
        fields
    }

    pub fn root_field(&self, response_key: &str) -> Option<&FieldSelection> {
        self.root_fields()
            .into_iter()
            .find(|f| f.response_key() == response_key)
    }
}
