//! Extraction of the `order` argument into backing-member sort instructions.

use crate::registry::SortFieldDef;
use async_graphql_value::{ConstValue, Name};
use gql_preprocess_lib::{
    config::SortDirectionPolicy,
    constants::{ASCENDING_PREFIX, DESCENDING_PREFIX},
};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

fn has_prefix_ignore_case(token: &str, prefix: &str) -> bool {
    token
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

impl SortDirection {
    /// Parse a direction token: anything starting with `ASC` or `DESC`, ignoring
    /// case. `None` for any other token.
    pub fn parse(token: &str) -> Option<Self> {
        if has_prefix_ignore_case(token, DESCENDING_PREFIX) {
            Some(SortDirection::Descending)
        } else if has_prefix_ignore_case(token, ASCENDING_PREFIX) {
            Some(SortDirection::Ascending)
        } else {
            None
        }
    }
}

/// One resolved sort instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrderField {
    pub schema_field_name: String,
    pub member_name: String,
    pub direction: SortDirection,
}

fn direction_token(value: &ConstValue) -> Option<&str> {
    match value {
        ConstValue::Enum(name) => Some(name.as_str()),
        ConstValue::String(s) => Some(s.as_str()),
        _ => None,
    }
}

fn extract_entries<'a>(
    sort_fields: &[SortFieldDef],
    entries: impl IntoIterator<Item = (&'a Name, &'a ConstValue)>,
    policy: SortDirectionPolicy,
    out: &mut Vec<SortOrderField>,
) {
    for (name, value) in entries {
        let Some(field) = sort_fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.as_str()))
        else {
            debug!("Dropping sort entry for unknown field {name:?}");
            continue;
        };

        let direction = match direction_token(value).and_then(SortDirection::parse) {
            Some(direction) => direction,
            None => match policy {
                SortDirectionPolicy::Lenient => SortDirection::Ascending,
                SortDirectionPolicy::Strict => {
                    warn!("Dropping sort entry {name:?} with unknown direction {value}");
                    continue;
                }
            },
        };

        out.push(SortOrderField {
            schema_field_name: field.name.clone(),
            member_name: field.member_name().to_string(),
            direction,
        });
    }
}

/// Turn the literal value of an `order` argument into sort instructions, in
/// argument order.
///
/// The value is an object of field name to direction (`{name: ASC, id: DESC}`)
/// or a list of such objects. Entries naming a field that is not sortable are
/// dropped. Direction tokens other than `ASC…`/`DESC…` follow `policy`.
pub fn extract_sort(
    sort_fields: &[SortFieldDef],
    value: &ConstValue,
    policy: SortDirectionPolicy,
) -> Vec<SortOrderField> {
    let mut out = Vec::new();

    match value {
        ConstValue::Object(entries) => extract_entries(sort_fields, entries, policy, &mut out),
        ConstValue::List(items) => {
            for item in items {
                if let ConstValue::Object(entries) = item {
                    extract_entries(sort_fields, entries, policy, &mut out);
                }
            }
        }
        _ => {}
    }

    out
}
